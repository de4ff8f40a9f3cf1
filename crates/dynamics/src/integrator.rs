//! # Body Integration
//!
//! Advances every dynamic body by one explicit Euler step and restores the
//! invariants the step breaks: the orientation is re-orthonormalized and the
//! derived velocities are recomputed from the new momenta.

use tracing::trace;

use crate::body::RigidBody;

/// Integrate all non-fixed bodies over `dt`.
pub fn integrate_bodies(
    bodies: &mut [RigidBody],
    dt: f32,
    linear_damping: f32,
    angular_damping: f32,
) {
    trace!(dt, "integrating bodies");
    for body in bodies.iter_mut().filter(|body| !body.is_fixed()) {
        body.integrate_euler(dt, linear_damping, angular_damping);
        body.renormalize();
        body.compute_aux();
    }
}
