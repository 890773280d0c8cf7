//! Axis-aligned rectangles and the boxes built from them.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Primitive, PrimitiveList, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Which coordinate plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectPlane {
    /// Spans x and y, fixed z
    Xy,
    /// Spans x and z, fixed y
    Xz,
    /// Spans y and z, fixed x
    Yz,
}

impl RectPlane {
    /// Axis indices as (first free axis, second free axis, fixed axis).
    fn axes(self) -> (usize, usize, usize) {
        match self {
            RectPlane::Xy => (0, 1, 2),
            RectPlane::Xz => (0, 2, 1),
            RectPlane::Yz => (1, 2, 0),
        }
    }
}

/// A one-sided rectangle perpendicular to a coordinate axis.
///
/// The reported normal is always the positive fixed axis; wrap in
/// [`Primitive::flip_normal`] to face the other way.
pub struct AxisRect {
    plane: RectPlane,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    material: Material,
}

impl AxisRect {
    /// Rectangle spanning `[a0,a1] x [b0,b1]` on `plane`'s free axes at
    /// coordinate `k` on the fixed axis.
    pub fn new(
        plane: RectPlane,
        a0: f32,
        a1: f32,
        b0: f32,
        b1: f32,
        k: f32,
        material: impl Into<Material>,
    ) -> Self {
        Self {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material: material.into(),
        }
    }

    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, z: f32, material: impl Into<Material>) -> Self {
        Self::new(RectPlane::Xy, x0, x1, y0, y1, z, material)
    }

    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, y: f32, material: impl Into<Material>) -> Self {
        Self::new(RectPlane::Xz, x0, x1, z0, z1, y, material)
    }

    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, x: f32, material: impl Into<Material>) -> Self {
        Self::new(RectPlane::Yz, y0, y1, z0, z1, x, material)
    }
}

impl Hittable for AxisRect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let (ia, ib, ik) = self.plane.axes();
        let origin = ray.origin();
        let dir = ray.direction();

        let t = (self.k - origin[ik]) / dir[ik];
        if !ray_t.surrounds(t) {
            return None;
        }

        let a = origin[ia] + t * dir[ia];
        let b = origin[ib] + t * dir[ib];
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return None;
        }

        let mut normal = Vec3::ZERO;
        normal[ik] = 1.0;

        Some(HitRecord {
            t,
            p: ray.at(t),
            normal,
            u: (a - self.a0) / (self.a1 - self.a0),
            v: (b - self.b0) / (self.b1 - self.b0),
            material: &self.material,
        })
    }

    /// Zero thickness on the fixed axis; the box padding gives it depth.
    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        let (ia, ib, ik) = self.plane.axes();
        let mut lo = Vec3::ZERO;
        let mut hi = Vec3::ZERO;
        lo[ia] = self.a0;
        hi[ia] = self.a1;
        lo[ib] = self.b0;
        hi[ib] = self.b1;
        lo[ik] = self.k;
        hi[ik] = self.k;
        Some(Aabb::from_points(lo, hi))
    }
}

/// Axis-aligned box made of six rectangles with outward normals.
pub struct Block {
    pmin: Vec3,
    pmax: Vec3,
    sides: PrimitiveList,
}

impl Block {
    pub fn new(p0: Vec3, p1: Vec3, material: impl Into<Material>) -> Self {
        let material: Material = material.into();
        let mut sides = PrimitiveList::new();

        let flipped = |rect: AxisRect| Primitive::from(rect).flip_normal();
        sides.add(AxisRect::xy(p0.x, p1.x, p0.y, p1.y, p1.z, material.clone()));
        sides.add(flipped(AxisRect::xy(p0.x, p1.x, p0.y, p1.y, p0.z, material.clone())));
        sides.add(AxisRect::xz(p0.x, p1.x, p0.z, p1.z, p1.y, material.clone()));
        sides.add(flipped(AxisRect::xz(p0.x, p1.x, p0.z, p1.z, p0.y, material.clone())));
        sides.add(AxisRect::yz(p0.y, p1.y, p0.z, p1.z, p1.x, material.clone()));
        sides.add(flipped(AxisRect::yz(p0.y, p1.y, p0.z, p1.z, p0.x, material)));

        Self {
            pmin: p0,
            pmax: p1,
            sides,
        }
    }
}

impl Hittable for Block {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        Some(Aabb::from_points(self.pmin, self.pmax))
    }
}
