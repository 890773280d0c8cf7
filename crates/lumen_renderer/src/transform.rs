//! Wrappers that move, turn, or flip another primitive.

use crate::{
    hittable::{HitRecord, Hittable},
    Primitive, Ray,
};
use lumen_math::{Aabb, Interval, Mat4, Mat4Ext, Quat, Vec3};
use rand::RngCore;

/// Reports the wrapped primitive's normal negated. Geometry is unchanged.
pub struct FlippedNormal {
    object: Box<Primitive>,
}

impl FlippedNormal {
    pub fn new(object: Primitive) -> Self {
        Self {
            object: Box::new(object),
        }
    }
}

impl Hittable for FlippedNormal {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.object.hit(ray, ray_t, rng).map(|mut rec| {
            rec.normal = -rec.normal;
            rec
        })
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        self.object.bounding_box(time)
    }
}

/// The wrapped primitive displaced by `offset`.
pub struct Translated {
    object: Box<Primitive>,
    offset: Vec3,
}

impl Translated {
    pub fn new(object: Primitive, offset: Vec3) -> Self {
        Self {
            object: Box::new(object),
            offset,
        }
    }
}

impl Hittable for Translated {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let moved = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());
        self.object.hit(&moved, ray_t, rng).map(|mut rec| {
            rec.p += self.offset;
            rec
        })
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        self.object
            .bounding_box(time)
            .map(|bbox| bbox.translate(self.offset))
    }
}

/// The wrapped primitive rotated about an axis through the origin.
///
/// Rays are taken into object space with the inverse rotation; hit points
/// and normals come back with the forward rotation. Rotations are
/// orthogonal, so normals transform like positions.
pub struct Rotated {
    object: Box<Primitive>,
    rotation: Quat,
    inverse: Quat,
    matrix: Mat4,
}

impl Rotated {
    /// Rotate by `degrees` about `axis` (need not be normalized).
    pub fn new(object: Primitive, axis: Vec3, degrees: f32) -> Self {
        let rotation = Quat::from_axis_angle(axis.normalize(), degrees.to_radians());
        Self {
            object: Box::new(object),
            rotation,
            inverse: rotation.inverse(),
            matrix: Mat4::from_quat(rotation),
        }
    }

    /// Rotate about +Y.
    pub fn y(object: Primitive, degrees: f32) -> Self {
        Self::new(object, Vec3::Y, degrees)
    }
}

impl Hittable for Rotated {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local = Ray::new(
            self.inverse * ray.origin(),
            self.inverse * ray.direction(),
            ray.time(),
        );
        self.object.hit(&local, ray_t, rng).map(|mut rec| {
            rec.p = self.rotation * rec.p;
            rec.normal = self.rotation * rec.normal;
            rec
        })
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        self.object
            .bounding_box(time)
            .map(|bbox| self.matrix.transform_aabb(&bbox))
    }
}
