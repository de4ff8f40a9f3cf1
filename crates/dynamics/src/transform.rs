//! Transform matrix utilities for bodies
//!
//! Converts a body's position and orientation into 4x4 column-major matrices
//! for a renderer. [`BodyTransform`] is `Pod`, so a slice of them can be
//! uploaded as raw bytes.

use bytemuck::{Pod, Zeroable};

use crate::body::RigidBody;
use crate::types::{Mat4, Vec4};
use crate::World;

/// Model matrix of one body, columns first.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyTransform {
    pub model: [[f32; 4]; 4],
}

impl RigidBody {
    /// Rigid transform: rotation by the orientation, then translation.
    #[must_use]
    pub fn transform_matrix(&self) -> Mat4 {
        Mat4::from_cols(
            self.orientation.x_axis.extend(0.0),
            self.orientation.y_axis.extend(0.0),
            self.orientation.z_axis.extend(0.0),
            Vec4::new(self.position.x, self.position.y, self.position.z, 1.0),
        )
    }

    /// Transform that maps the unit cube `[-0.5, 0.5]³` onto this box.
    #[must_use]
    pub fn scaled_transform_matrix(&self) -> Mat4 {
        self.transform_matrix() * Mat4::from_scale(self.size())
    }

    /// Orientation as a 4x4 column-major array with no translation.
    #[must_use]
    pub fn rotation_cols_array(&self) -> [f32; 16] {
        Mat4::from_mat3(self.orientation).to_cols_array()
    }

    #[must_use]
    pub fn body_transform(&self) -> BodyTransform {
        BodyTransform {
            model: self.scaled_transform_matrix().to_cols_array_2d(),
        }
    }
}

impl World {
    /// Model matrices of all bodies, in handle order.
    #[must_use]
    pub fn transforms(&self) -> Vec<BodyTransform> {
        self.bodies.iter().map(RigidBody::body_transform).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mat3, Vec3};

    #[test]
    fn test_identity_transform() {
        let body = RigidBody::new_box(Vec3::ONE, 1.0, Vec3::ZERO, Mat3::IDENTITY).unwrap();
        assert_eq!(body.transform_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_translation_only() {
        let body =
            RigidBody::new_box(Vec3::ONE, 1.0, Vec3::new(1.0, 2.0, 3.0), Mat3::IDENTITY).unwrap();
        let cols = body.transform_matrix().to_cols_array_2d();
        // Translation should be in the last column
        assert_eq!(cols[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_scaled_transform_maps_unit_corner() {
        let orientation = Mat3::from_rotation_y(0.4);
        let body = RigidBody::new_box(
            Vec3::new(2.0, 1.0, 0.5),
            1.0,
            Vec3::new(0.0, 3.0, 0.0),
            orientation,
        )
        .unwrap();
        let corner = Vec3::splat(0.5);
        let mapped = body.scaled_transform_matrix().transform_point3(corner);
        let expected = body.local_to_world(corner * body.size());
        assert!(mapped.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_rotation_array_has_no_translation() {
        let body = RigidBody::new_box(
            Vec3::ONE,
            1.0,
            Vec3::new(4.0, 5.0, 6.0),
            Mat3::from_rotation_z(std::f32::consts::FRAC_PI_2),
        )
        .unwrap();
        let cols = body.rotation_cols_array();
        assert_eq!(cols[12..], [0.0, 0.0, 0.0, 1.0]);
        // First column is the body x axis, now world +y.
        assert!((cols[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_transforms_cast_to_bytes() {
        let mut world = World::default();
        world
            .add_box(Vec3::ONE, 1.0, Vec3::ZERO, Mat3::IDENTITY)
            .unwrap();
        world
            .add_fixed_box(Vec3::new(10.0, 1.0, 10.0), Vec3::NEG_Y, Mat3::IDENTITY)
            .unwrap();
        let transforms = world.transforms();
        let bytes: &[u8] = bytemuck::cast_slice(&transforms);
        assert_eq!(bytes.len(), 2 * 16 * std::mem::size_of::<f32>());
        assert_eq!(transforms[1].model[0][0], 10.0);
    }
}
