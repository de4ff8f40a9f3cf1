//! Box-box collision detection against the unit cube

use tracing::{debug, warn};

use super::{
    line_plane_intersection, Contact, CUBE_CORNERS, CUBE_FACE_NORMALS, CUBE_FACE_POINTS,
};
use crate::body::RigidBody;
use crate::types::{BodyHandle, Mat3, Vec3};

/// The reference body's frame scaled so its box becomes the unit cube.
struct UnitCubeFrame {
    origin: Vec3,
    inv_rotation: Mat3,
    inv_size: Vec3,
}

impl UnitCubeFrame {
    fn of(body: &RigidBody) -> Self {
        Self {
            origin: body.position,
            inv_rotation: body.orientation.transpose(),
            inv_size: Vec3::ONE / body.size(),
        }
    }

    /// Corner `corner` of `body`'s unit box, expressed in this frame.
    fn corner_of(&self, body: &RigidBody, corner: Vec3) -> Vec3 {
        let rotated = body.orientation * (corner * body.size());
        let relative = rotated + (body.position - self.origin);
        (self.inv_rotation * relative) * self.inv_size
    }
}

/// Interior test for the closed cube, excluding points that only touch it.
/// A corner lying on some face planes counts as inside as long as it is
/// strictly inside along at least one axis, so equal boxes overlapping
/// face-aligned are still detected. A corner on the boundary along all
/// three axes is a touching contact and counts as outside.
fn inside_unit_cube(p: Vec3) -> bool {
    let a = p.abs();
    a.max_element() <= 0.5 && a.min_element() < 0.5
}

/// Distance of `p` behind face `face`, positive inside the cube.
fn face_depth(face: usize, p: Vec3) -> f32 {
    -(p - CUBE_FACE_POINTS[face]).dot(CUBE_FACE_NORMALS[face])
}

/// Face the segment `previous → current` entered through: among faces whose
/// plane it meets at `t <= 1`, the one met last.
fn entry_face(previous: Vec3, current: Vec3) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (face, (&point, &normal)) in CUBE_FACE_POINTS
        .iter()
        .zip(CUBE_FACE_NORMALS.iter())
        .enumerate()
    {
        let t = line_plane_intersection(point, normal, previous, current);
        if t <= 1.0 && best.map_or(true, |(_, best_t)| t > best_t) {
            best = Some((face, t));
        }
    }
    best
}

/// Face closest to `p` among the faces `p` is actually behind; faces whose
/// plane `p` lies on are skipped. The first face wins ties.
fn nearest_face(p: Vec3) -> usize {
    let mut best: Option<(usize, f32)> = None;
    for face in 0..CUBE_FACE_POINTS.len() {
        let depth = face_depth(face, p);
        if depth > 0.0 && best.map_or(true, |(_, best_depth)| depth < best_depth) {
            best = Some((face, depth));
        }
    }
    best.map_or(0, |(face, _)| face)
}

/// Tests the corners of `incident` against the box of `reference`.
///
/// `incident_previous` is the incident body at the start of the slice and
/// `incident_current` after integration; `reference` is taken at its current
/// pose. The first corner found inside produces the contact; corners are
/// tried in [`CUBE_CORNERS`] order.
///
/// The contact face is the last face plane the corner's motion segment
/// crossed at or before the end of the slice. That holds even for a corner
/// that was already inside at the start of the slice; such a contact is
/// reported with `carried_over` set. A degenerate segment that meets no
/// plane falls back to the nearest penetrated face.
#[must_use]
pub fn detect_body_body(
    reference: &RigidBody,
    incident_previous: &RigidBody,
    incident_current: &RigidBody,
    handles: (BodyHandle, BodyHandle),
) -> Option<Contact> {
    let frame = UnitCubeFrame::of(reference);

    for corner in CUBE_CORNERS {
        let current = frame.corner_of(incident_current, corner);
        if !inside_unit_cube(current) {
            continue;
        }

        let previous = frame.corner_of(incident_previous, corner);
        let carried_over = inside_unit_cube(previous);
        if carried_over {
            warn!(
                reference = handles.0.index(),
                incident = handles.1.index(),
                "penetration not resolved on previous step"
            );
        }

        let (face, t) =
            entry_face(previous, current).unwrap_or_else(|| (nearest_face(current), 1.0));

        let hit = previous + (current - previous) * t;
        let position = reference.local_to_world(hit * reference.size());
        let normal = (reference.orientation * CUBE_FACE_NORMALS[face]).normalize_or_zero();
        let depth = face_depth(face, current);

        debug!(
            reference = handles.0.index(),
            incident = handles.1.index(),
            face,
            depth,
            "collided"
        );

        return Some(Contact {
            position,
            normal,
            depth,
            reference: handles.0,
            incident: handles.1,
            carried_over,
        });
    }
    None
}
