//! Constant-density participating media (fog, smoke).

use crate::{
    gen_f32,
    hittable::{HitRecord, Hittable},
    Isotropic, Material, Primitive, Ray, Texture,
};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Gap between the entry hit and the search for the exit hit, so the
/// boundary is not found twice at the same point.
const EXIT_EPSILON: f32 = 0.0001;

/// A volume of uniform density bounded by a closed primitive.
///
/// A ray passing through travels an exponentially distributed free path
/// before scattering; if that path is longer than the chord through the
/// boundary, the ray passes through untouched.
pub struct ConstantMedium {
    boundary: Box<Primitive>,
    neg_inv_density: f32,
    phase_function: Material,
}

impl ConstantMedium {
    pub fn new(boundary: Primitive, density: f32, albedo: impl Into<Texture>) -> Self {
        Self {
            boundary: Box::new(boundary),
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(albedo).into(),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY), rng)?;

        let mut t0 = entry.t.max(ray_t.min);
        let t1 = exit.t.min(ray_t.max);
        if t0 >= t1 {
            return None;
        }
        t0 = t0.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside = (t1 - t0) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();
        if hit_distance >= distance_inside {
            return None;
        }

        let t = t0 + hit_distance / ray_length;
        Some(HitRecord {
            t,
            p: ray.at(t),
            // Arbitrary; isotropic scattering ignores it
            normal: Vec3::X,
            u: 0.0,
            v: 0.0,
            material: &self.phase_function,
        })
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        self.boundary.bounding_box(time)
    }
}
