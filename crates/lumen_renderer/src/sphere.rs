//! Sphere primitives for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::f32::consts::{FRAC_PI_2, PI};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: impl Into<Material>) -> Self {
        Self {
            center,
            radius,
            material: material.into(),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }
}

/// UV coordinates for a point on the unit sphere.
///
/// `u` runs around the Y axis, `v` from the south pole (0) to the north pole (1).
fn sphere_uv(p: Vec3) -> (f32, f32) {
    let phi = p.z.atan2(p.x);
    let theta = p.y.clamp(-1.0, 1.0).asin();
    let u = 1.0 - (phi + PI) / (2.0 * PI);
    let v = (theta + FRAC_PI_2) / PI;
    (u, v)
}

/// Shared quadratic solve: smaller root first, larger root if the smaller
/// one falls outside `ray_t`.
fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = ray.origin() - center;
    let a = ray.direction().length_squared();
    let b = oc.dot(ray.direction());
    let c = oc.length_squared() - radius * radius;

    let discriminant = b * b - a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let mut root = (-b - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (-b + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let p = ray.at(root);
    let normal = (p - center) / radius;
    let (u, v) = sphere_uv(normal);

    Some(HitRecord {
        t: root,
        p,
        normal,
        u,
        v,
        material,
    })
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        hit_sphere(self.center, self.radius, &self.material, ray, ray_t)
    }

    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius.abs());
        Some(Aabb::from_points(self.center - rvec, self.center + rvec))
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Material,
}

impl MovingSphere {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: impl Into<Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material: material.into(),
        }
    }

    /// Center at the given time. Times outside the shutter extrapolate.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        hit_sphere(
            self.center(ray.time()),
            self.radius,
            &self.material,
            ray,
            ray_t,
        )
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius.abs());
        let c0 = self.center(time.min);
        let c1 = self.center(time.max);
        let box0 = Aabb::from_points(c0 - rvec, c0 + rvec);
        let box1 = Aabb::from_points(c1 - rvec, c1 + rvec);
        Some(Aabb::surrounding(&box0, &box1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_sphere() -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Lambertian::solid(Color::new(0.5, 0.5, 0.5)),
        )
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = test_sphere();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .expect("ray should hit");

        assert!((rec.t - 0.5).abs() < 0.001);
        assert!((rec.normal.length() - 1.0).abs() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = test_sphere();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .is_none());
    }

    #[test]
    fn test_sphere_falls_back_to_far_root() {
        // Origin inside the sphere: near root is behind the ray
        let sphere = test_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .expect("ray should exit the sphere");
        assert!((rec.t - 0.5).abs() < 1e-5);
        assert!((rec.normal - (-Vec3::Z)).length() < 1e-5);
    }

    #[test]
    fn test_sphere_roots_match_quadratic() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, -6.0), 2.0, Lambertian::solid(Color::ONE));
        let mut rng = StdRng::seed_from_u64(3);
        let origin = Vec3::new(0.5, 1.0, 0.0);

        for _ in 0..100 {
            // Aim somewhere inside the sphere so the ray always intersects it
            let target = sphere.center() + crate::random_in_unit_sphere(&mut rng) * 1.5;
            let dir = target - origin;
            let ray = Ray::new(origin, dir, 0.0);

            let oc = origin - sphere.center();
            let a = dir.dot(dir);
            let b = 2.0 * oc.dot(dir);
            let c = oc.dot(oc) - 4.0;
            let expected = (-b - (b * b - 4.0 * a * c).sqrt()) / (2.0 * a);

            let rec = sphere
                .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
                .expect("ray aimed inside sphere must hit");
            assert!((rec.t - expected).abs() < 1e-3 * expected.abs().max(1.0));
            assert!((rec.normal.length() - 1.0).abs() < 1e-4);
            assert!((rec.p - sphere.center()).normalize().dot(rec.normal) > 0.999);
        }
    }

    #[test]
    fn test_sphere_uv_poles_and_seam() {
        let (_, v_top) = sphere_uv(Vec3::Y);
        let (_, v_bottom) = sphere_uv(-Vec3::Y);
        assert!((v_top - 1.0).abs() < 1e-6);
        assert!(v_bottom.abs() < 1e-6);

        let (u, v) = sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_moving_sphere_center_and_box() {
        let sphere = MovingSphere::new(
            Vec3::ZERO,
            Vec3::new(0.0, 2.0, 0.0),
            0.0,
            1.0,
            0.5,
            Lambertian::solid(Color::ONE),
        );
        assert_eq!(sphere.center(0.5), Vec3::new(0.0, 1.0, 0.0));

        let bbox = sphere.bounding_box(Interval::new(0.0, 1.0)).unwrap();
        assert!((bbox.min() - Vec3::new(-0.5, -0.5, -0.5)).length() < 1e-6);
        assert!((bbox.max() - Vec3::new(0.5, 2.5, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_moving_sphere_hit_uses_ray_time() {
        let sphere = MovingSphere::new(
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(10.0, 0.0, -2.0),
            0.0,
            1.0,
            0.5,
            Lambertian::solid(Color::ONE),
        );
        let mut rng = StdRng::seed_from_u64(0);
        let early = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let late = Ray::new(Vec3::ZERO, -Vec3::Z, 1.0);
        let t = Interval::new(0.001, f32::INFINITY);

        assert!(sphere.hit(&early, t, &mut rng).is_some());
        assert!(sphere.hit(&late, t, &mut rng).is_none());
    }
}
