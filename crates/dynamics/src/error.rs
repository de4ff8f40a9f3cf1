use thiserror::Error;

use crate::types::{BodyHandle, Vec3};

/// Configuration errors raised while building or stepping a world.
///
/// Numerical conditions inside a step (degenerate springs, carried-over
/// penetration, fallback contacts) are not errors; they are logged and
/// counted in [`StepReport`](crate::StepReport).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("dynamic body mass must be positive and finite, got {0}")]
    InvalidMass(f32),
    #[error("box size must be positive and finite on every axis, got {0}")]
    InvalidSize(Vec3),
    #[error("time step must be finite and non-negative, got {0}")]
    InvalidTimeStep(f32),
    #[error("invalid world configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("no body with handle {0:?}")]
    UnknownBody(BodyHandle),
    #[error("invalid spring: {0}")]
    InvalidSpring(&'static str),
}
