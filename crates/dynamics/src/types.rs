//! Shared value types.
//!
//! Vector and matrix algebra comes from `glam`. This module adds the handles
//! used to address bodies and springs inside a [`World`](crate::World) and the
//! one matrix construction glam does not provide.

pub use glam::{Mat3, Mat4, Vec3, Vec4};

/// Index of a rigid body inside a world. Bodies are never removed, so a
/// handle stays valid for the lifetime of the world that issued it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub usize);

impl BodyHandle {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Index of a spring inside a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpringHandle(pub usize);

impl SpringHandle {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Matrix form of the cross product: `skew_symmetric(v) * u == v.cross(u)`.
#[must_use]
pub fn skew_symmetric(v: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(0.0, v.z, -v.y),
        Vec3::new(-v.z, 0.0, v.x),
        Vec3::new(v.y, -v.x, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skew_matches_cross_product() {
        let v = Vec3::new(1.0, -2.0, 0.5);
        let u = Vec3::new(-3.0, 0.25, 4.0);
        assert!((skew_symmetric(v) * u).abs_diff_eq(v.cross(u), 1e-6));
    }

    #[test]
    fn skew_is_antisymmetric() {
        let m = skew_symmetric(Vec3::new(0.3, 0.7, -1.1));
        assert!(m.transpose().abs_diff_eq(-m, 1e-7));
    }
}
