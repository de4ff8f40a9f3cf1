//! Impulse-based collision response

use tracing::trace;

use super::Contact;
use crate::body::RigidBody;

/// Applies the restitution impulse for `contact` and returns its signed
/// magnitude `j` (the impulse on `reference` is `normal * j`).
///
/// `reference` and `incident` must be the bodies named by the contact. Bodies
/// without positive mass contribute nothing to the denominator and are left
/// untouched. The impulse is applied whatever the sign of the relative
/// normal velocity. Returns `None` only when neither body can move.
#[must_use]
#[allow(clippy::similar_names)]
pub fn resolve_contact(
    reference: &mut RigidBody,
    incident: &mut RigidBody,
    contact: &Contact,
    restitution: f32,
) -> Option<f32> {
    let normal = contact.normal;
    let padot = reference.point_velocity(contact.position);
    let pbdot = incident.point_velocity(contact.position);
    let ra = contact.position - reference.position;
    let rb = contact.position - incident.position;

    let vrel = normal.dot(padot - pbdot);
    let numerator = -(1.0 + restitution) * vrel;
    let (linear_a, angular_a) = reference.impulse_terms(ra, normal);
    let (linear_b, angular_b) = incident.impulse_terms(rb, normal);
    let denominator = linear_a + linear_b + angular_a + angular_b;
    if !(denominator.is_finite() && denominator > 0.0) {
        trace!(denominator, "no movable body in contact");
        return None;
    }

    let j = numerator / denominator;
    let impulse = normal * j;
    if reference.is_dynamic() {
        reference.apply_impulse(impulse, ra);
    }
    if incident.is_dynamic() {
        incident.apply_impulse(-impulse, rb);
    }
    Some(j)
}
