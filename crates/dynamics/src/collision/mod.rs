//! # Collision Detection and Response
//!
//! Boxes are tested corner-against-box in the normalized frame of the
//! reference box, where it becomes the unit cube `[-0.5, 0.5]³`. A corner
//! that moved inside during the last slice is traced back along its motion
//! to the face it crossed; that face gives the contact normal and depth.
//! Response is a single restitution impulse per contact.

mod box_box;
mod response;

pub use box_box::detect_body_body;
pub use response::resolve_contact;

use crate::types::{BodyHandle, Vec3};

/// Segment parameter reported when a segment is parallel to a plane.
pub const NO_INTERSECTION: f32 = 1.0e30;

/// Face centres of the unit cube, ordered −x, +x, −y, +y, −z, +z.
pub const CUBE_FACE_POINTS: [Vec3; 6] = [
    Vec3::new(-0.5, 0.0, 0.0),
    Vec3::new(0.5, 0.0, 0.0),
    Vec3::new(0.0, -0.5, 0.0),
    Vec3::new(0.0, 0.5, 0.0),
    Vec3::new(0.0, 0.0, -0.5),
    Vec3::new(0.0, 0.0, 0.5),
];

/// Outward normals matching [`CUBE_FACE_POINTS`].
pub const CUBE_FACE_NORMALS: [Vec3; 6] = [
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(0.0, 0.0, 1.0),
];

/// Unit cube corners in detection order: x outermost, z innermost, each
/// running from −0.5 to +0.5.
pub const CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(-0.5, 0.5, 0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(0.5, 0.5, 0.5),
];

/// One detected contact between a corner of `incident` and a face of
/// `reference`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world space
    pub position: Vec3,
    /// World-space normal of the crossed face, pointing out of `reference`
    pub normal: Vec3,
    /// Penetration of the corner beyond the face, in the unit-cube frame of
    /// `reference`. Positive means interpenetrating.
    pub depth: f32,
    /// Body whose face was hit
    pub reference: BodyHandle,
    /// Body whose corner entered
    pub incident: BodyHandle,
    /// The corner was already inside at the start of the slice, i.e. a
    /// penetration left unresolved by an earlier step.
    pub carried_over: bool,
}

impl Contact {
    #[must_use]
    pub fn is_too_deep(&self, threshold: f32) -> bool {
        self.depth > threshold
    }
}

/// Parameter `t` at which the line `a + (b - a) t` meets the plane through
/// `point` with normal `normal`, or [`NO_INTERSECTION`] when they are parallel.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn line_plane_intersection(point: Vec3, normal: Vec3, a: Vec3, b: Vec3) -> f32 {
    let denominator = (b - a).dot(normal);
    if denominator == 0.0 {
        return NO_INTERSECTION;
    }
    (point - a).dot(normal) / denominator
}
