// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3/transform_vector3 and
// inverse(); this adds the bounding-box transform used by rotated
// primitives.

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Extension trait for Mat4 with ray tracing helpers.
pub trait Mat4Ext {
    /// Transform a box by transforming its eight corners and bounding them.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let (lo, hi) = (aabb.min(), aabb.max());

        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let corner = Vec3::new(
                        if i == 1 { hi.x } else { lo.x },
                        if j == 1 { hi.y } else { lo.y },
                        if k == 1 { hi.z } else { lo.z },
                    );
                    let moved = self.transform_point3(corner);
                    result_min = result_min.min(moved);
                    result_max = result_max.max(moved);
                }
            }
        }

        Aabb::from_points(result_min, result_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = Mat4::IDENTITY.transform_aabb(&aabb);

        assert!((transformed.min() - aabb.min()).length() < 0.001);
        assert!((transformed.max() - aabb.max()).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_quarter_turn_about_y() {
        // x in [0,2], z in [0,1]; a quarter turn about +Y maps x -> -z, z -> x
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let turned = Mat4::from_rotation_y(FRAC_PI_2).transform_aabb(&aabb);

        assert!((turned.min() - Vec3::new(0.0, 0.0, -2.0)).length() < 0.001);
        assert!((turned.max() - Vec3::new(1.0, 1.0, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_eighth_turn_grows_box() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let turned = Mat4::from_rotation_y(FRAC_PI_4).transform_aabb(&aabb);

        let half_diagonal = 2.0_f32.sqrt();
        assert!((turned.x.max - half_diagonal).abs() < 0.001);
        assert!((turned.z.min + half_diagonal).abs() < 0.001);
        assert!((turned.y.max - 1.0).abs() < 0.001);
    }
}
