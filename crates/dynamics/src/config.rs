//! Global tunables of a [`World`](crate::World).

use crate::error::PhysicsError;
use crate::types::Vec3;

/// Simulation constants. Every field has a documented default.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Acceleration added to every dynamic body as `gravity * mass`.
    /// Default `(0, -9.8, 0)`.
    pub gravity: Vec3,
    /// Linear damping `kdl`. Each integration removes `velocity * kdl * dt`
    /// from the linear momentum. Default `0.1`.
    pub linear_damping: f32,
    /// Angular damping `kdw`, applied to the angular momentum the same way.
    /// Default `0.1`.
    pub angular_damping: f32,
    /// Restitution ε of the contact impulse: 0 is perfectly inelastic, 1 is
    /// elastic. Default `0.5`.
    pub restitution: f32,
    /// Smallest sub-step the bisection tries. Once the trial sub-step is at or
    /// below this floor a too-deep contact is accepted as a fallback.
    /// Default `1 / (30 * 32)`.
    pub min_substep: f32,
    /// Contact depth above which a sub-step is rejected and bisected.
    /// Default `0.01`.
    pub penetration_threshold: f32,
    /// Number of equal [`World::step`](crate::World::step) calls made by
    /// [`World::advance`](crate::World::advance) per frame. Default `10`.
    pub substeps: u32,
}

impl WorldConfig {
    pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);
    pub const DEFAULT_MIN_SUBSTEP: f32 = 1.0 / (30.0 * 32.0);

    /// Checks that every field is usable by the stepping loop.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite"));
        }
        if !(self.linear_damping.is_finite() && self.linear_damping >= 0.0) {
            return Err(PhysicsError::InvalidConfig(
                "linear_damping must be finite and non-negative",
            ));
        }
        if !(self.angular_damping.is_finite() && self.angular_damping >= 0.0) {
            return Err(PhysicsError::InvalidConfig(
                "angular_damping must be finite and non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(PhysicsError::InvalidConfig("restitution must lie in [0, 1]"));
        }
        if !(self.min_substep.is_finite() && self.min_substep > 0.0) {
            return Err(PhysicsError::InvalidConfig(
                "min_substep must be finite and positive",
            ));
        }
        if !(self.penetration_threshold.is_finite() && self.penetration_threshold > 0.0) {
            return Err(PhysicsError::InvalidConfig(
                "penetration_threshold must be finite and positive",
            ));
        }
        if self.substeps == 0 {
            return Err(PhysicsError::InvalidConfig("substeps must be at least 1"));
        }
        Ok(())
    }

    /// Same configuration without gravity or damping. Handy for isolating
    /// contact and spring behaviour.
    #[must_use]
    pub fn frictionless(self) -> Self {
        Self {
            gravity: Vec3::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
            ..self
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Self::DEFAULT_GRAVITY,
            linear_damping: 0.1,
            angular_damping: 0.1,
            restitution: 0.5,
            min_substep: Self::DEFAULT_MIN_SUBSTEP,
            penetration_threshold: 0.01,
            substeps: 10,
        }
    }
}
