//! # Rigid Bodies
//!
//! A [`RigidBody`] is a box with uniform density. Its state is stored as
//! position, orientation matrix and linear/angular momentum; velocities are
//! derived from the momenta by [`RigidBody::compute_aux`].
//!
//! A negative mass marks a body fixed in the world. Fixed bodies are never
//! integrated and never receive impulses, but they take part in collision
//! detection and can anchor springs.

use crate::error::PhysicsError;
use crate::types::{skew_symmetric, Mat3, Vec3};

/// Mass stored for fixed bodies.
pub const FIXED_MASS: f32 = -1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct RigidBody {
    // Constant
    size: Vec3,
    mass: f32,
    inertia_body: Mat3,
    inv_inertia_body: Mat3,

    // State
    pub position: Vec3,
    /// Columns are the body axes in world space.
    pub orientation: Mat3,
    pub momentum: Vec3,
    pub angular_momentum: Vec3,

    // Derived
    inv_inertia_world: Mat3,
    velocity: Vec3,
    angular_velocity: Vec3,

    // Accumulated during one `World::step`
    pub force: Vec3,
    pub torque: Vec3,
}

impl RigidBody {
    /// Creates a dynamic box with edge lengths `size`.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::InvalidMass`] if `mass` is not positive and finite,
    /// [`PhysicsError::InvalidSize`] if an edge length is not.
    pub fn new_box(
        size: Vec3,
        mass: f32,
        position: Vec3,
        orientation: Mat3,
    ) -> Result<Self, PhysicsError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidMass(mass));
        }
        validate_size(size)?;
        let inertia_body = box_inertia(size, mass);
        let inv_inertia_body = Mat3::from_diagonal(Vec3::ONE / box_inertia_diagonal(size, mass));
        Ok(Self::assemble(
            size,
            mass,
            inertia_body,
            inv_inertia_body,
            position,
            orientation,
        ))
    }

    /// Creates a box fixed in world space.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::InvalidSize`] if an edge length is not positive and finite.
    pub fn fixed_box(size: Vec3, position: Vec3, orientation: Mat3) -> Result<Self, PhysicsError> {
        validate_size(size)?;
        Ok(Self::assemble(
            size,
            FIXED_MASS,
            Mat3::ZERO,
            Mat3::ZERO,
            position,
            orientation,
        ))
    }

    fn assemble(
        size: Vec3,
        mass: f32,
        inertia_body: Mat3,
        inv_inertia_body: Mat3,
        position: Vec3,
        orientation: Mat3,
    ) -> Self {
        let mut body = Self {
            size,
            mass,
            inertia_body,
            inv_inertia_body,
            position,
            orientation,
            momentum: Vec3::ZERO,
            angular_momentum: Vec3::ZERO,
            inv_inertia_world: Mat3::ZERO,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        };
        body.compute_aux();
        body
    }

    /// Edge lengths of the box. The box spans `±size / 2` on each local axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.size
    }

    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    #[must_use]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.mass < 0.0
    }

    /// Bodies with positive mass receive impulses.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.mass > 0.0
    }

    #[must_use]
    pub fn inertia_body(&self) -> Mat3 {
        self.inertia_body
    }

    #[must_use]
    pub fn inv_inertia_body(&self) -> Mat3 {
        self.inv_inertia_body
    }

    #[must_use]
    pub fn inv_inertia_world(&self) -> Mat3 {
        self.inv_inertia_world
    }

    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[must_use]
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Recomputes velocity, world inverse inertia and angular velocity from
    /// the current state. Call after any direct change to momentum or
    /// orientation.
    pub fn compute_aux(&mut self) {
        if self.is_fixed() {
            self.velocity = Vec3::ZERO;
            self.inv_inertia_world = Mat3::ZERO;
            self.angular_velocity = Vec3::ZERO;
            return;
        }
        self.velocity = self.momentum / self.mass;
        self.inv_inertia_world =
            self.orientation * self.inv_inertia_body * self.orientation.transpose();
        self.angular_velocity = self.inv_inertia_world * self.angular_momentum;
    }

    /// One explicit Euler step over `dt`, followed by linear and angular
    /// damping. Uses the derived velocities from before the step; the caller
    /// renormalizes and calls [`compute_aux`](Self::compute_aux) afterwards.
    pub fn integrate_euler(&mut self, dt: f32, linear_damping: f32, angular_damping: f32) {
        self.position += self.velocity * dt;
        let spin = skew_symmetric(self.angular_velocity) * self.orientation;
        self.orientation = self.orientation + spin * dt;

        self.momentum += self.force * dt;
        self.angular_momentum += self.torque * dt;

        self.momentum -= self.velocity * (linear_damping * dt);
        self.angular_momentum -= self.angular_velocity * (angular_damping * dt);
    }

    /// Gram-Schmidt re-orthonormalization of the orientation. The linear
    /// update in `integrate_euler` lets the matrix drift away from a rotation.
    pub fn renormalize(&mut self) {
        self.orientation = orthonormalized(self.orientation);
    }

    /// Maps a point from body space to world space.
    #[must_use]
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.orientation * local + self.position
    }

    /// World velocity of the material point currently at world position `point`.
    #[must_use]
    pub fn point_velocity(&self, point: Vec3) -> Vec3 {
        self.velocity + self.angular_velocity.cross(point - self.position)
    }

    /// Sets the linear and angular velocity by rewriting the momenta.
    /// Fixed bodies ignore the call.
    pub fn set_velocity(&mut self, velocity: Vec3, angular_velocity: Vec3) {
        if !self.is_dynamic() {
            return;
        }
        self.momentum = velocity * self.mass;
        let inertia_world = self.orientation * self.inertia_body * self.orientation.transpose();
        self.angular_momentum = inertia_world * angular_velocity;
        self.compute_aux();
    }

    /// Accumulates `force` applied at `lever` (world-space offset from the
    /// centre of mass) into force and torque.
    pub fn apply_force_at(&mut self, force: Vec3, lever: Vec3) {
        self.force += force;
        self.torque += lever.cross(force);
    }

    pub fn clear_accumulators(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Linear and angular contributions of this body to the denominator of
    /// the contact impulse along `normal` at lever `r`. Zero for bodies that
    /// do not take impulses.
    pub(crate) fn impulse_terms(&self, r: Vec3, normal: Vec3) -> (f32, f32) {
        if !self.is_dynamic() {
            return (0.0, 0.0);
        }
        let angular = normal.dot((self.inv_inertia_world * r.cross(normal)).cross(r));
        (1.0 / self.mass, angular)
    }

    /// Adds `impulse` at lever `r` and refreshes the derived quantities.
    pub(crate) fn apply_impulse(&mut self, impulse: Vec3, r: Vec3) {
        self.momentum += impulse;
        self.angular_momentum += r.cross(impulse);
        self.compute_aux();
    }
}

fn validate_size(size: Vec3) -> Result<(), PhysicsError> {
    if size.is_finite() && size.min_element() > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidSize(size))
    }
}

/// Principal moments of a uniform box of edge lengths `size`.
fn box_inertia_diagonal(size: Vec3, mass: f32) -> Vec3 {
    let sq = size * size;
    Vec3::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y) * (mass / 12.0)
}

fn box_inertia(size: Vec3, mass: f32) -> Mat3 {
    Mat3::from_diagonal(box_inertia_diagonal(size, mass))
}

fn orthonormalized(m: Mat3) -> Mat3 {
    let x = m.x_axis.normalize();
    let y = m.y_axis.normalize();
    let z = x.cross(y).normalize();
    let y = z.cross(x);
    Mat3::from_cols(x, y, z)
}
