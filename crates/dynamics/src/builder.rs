//! # World Builder
//!
//! Methods for populating a [`World`] with bodies and springs. Every method
//! validates its input and returns a handle, so bodies and springs are only
//! ever addressed by index into the world that created them.

use crate::body::RigidBody;
use crate::error::PhysicsError;
use crate::spring::{Anchor, Spring};
use crate::types::{BodyHandle, Mat3, SpringHandle, Vec3};
use crate::World;

impl World {
    /// Add an already constructed body.
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        self.bodies.push(body);
        BodyHandle(self.bodies.len() - 1)
    }

    /// Add a dynamic box with full edge lengths `size`, at rest.
    ///
    /// # Errors
    ///
    /// See [`RigidBody::new_box`].
    pub fn add_box(
        &mut self,
        size: Vec3,
        mass: f32,
        position: Vec3,
        orientation: Mat3,
    ) -> Result<BodyHandle, PhysicsError> {
        let body = RigidBody::new_box(size, mass, position, orientation)?;
        Ok(self.add_body(body))
    }

    /// Add an immovable box.
    ///
    /// # Errors
    ///
    /// See [`RigidBody::fixed_box`].
    pub fn add_fixed_box(
        &mut self,
        size: Vec3,
        position: Vec3,
        orientation: Mat3,
    ) -> Result<BodyHandle, PhysicsError> {
        let body = RigidBody::fixed_box(size, position, orientation)?;
        Ok(self.add_body(body))
    }

    /// Add a damped spring between two anchors.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownBody`] if an anchor names a body this
    /// world does not hold, and [`PhysicsError::InvalidSpring`] if a parameter
    /// is negative or not finite, or an anchor point is not finite.
    pub fn add_spring(
        &mut self,
        anchor0: Anchor,
        anchor1: Anchor,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    ) -> Result<SpringHandle, PhysicsError> {
        for anchor in [anchor0, anchor1] {
            let point = match anchor {
                Anchor::Fixed(point) => point,
                Anchor::Attached { body, local } => {
                    if self.body(body).is_none() {
                        return Err(PhysicsError::UnknownBody(body));
                    }
                    local
                }
            };
            if !point.is_finite() {
                return Err(PhysicsError::InvalidSpring("anchor point must be finite"));
            }
        }
        check_parameter(rest_length, "rest length must be finite and non-negative")?;
        check_parameter(stiffness, "stiffness must be finite and non-negative")?;
        check_parameter(damping, "damping must be finite and non-negative")?;

        self.springs.push(Spring::new(
            [anchor0, anchor1],
            rest_length,
            stiffness,
            damping,
        ));
        Ok(SpringHandle(self.springs.len() - 1))
    }
}

fn check_parameter(value: f32, message: &'static str) -> Result<(), PhysicsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidSpring(message))
    }
}
