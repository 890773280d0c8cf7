//! Hittable trait, HitRecord, and the closed set of scene primitives.

use crate::{
    AxisRect, Block, BvhNode, ConstantMedium, FlippedNormal, Material, MovingSphere, Ray,
    Rotated, SceneError, Sphere, Translated,
};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Ray parameter of the intersection
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, outward unless a wrapper flipped it
    pub normal: Vec3,
    /// Texture coordinates
    pub u: f32,
    pub v: f32,
    /// Material at the intersection point
    pub material: &'a Material,
}

/// Something a ray can hit.
///
/// `rng` is only consumed by primitives with stochastic extent
/// (participating media); surfaces ignore it.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `t` inside `ray_t`, if any.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore)
        -> Option<HitRecord<'a>>;

    /// Box enclosing the object for every instant in `time`.
    fn bounding_box(&self, time: Interval) -> Option<Aabb>;
}

/// Every kind of object a scene can contain.
pub enum Primitive {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(AxisRect),
    Block(Block),
    FlippedNormal(FlippedNormal),
    Translated(Translated),
    Rotated(Rotated),
    ConstantMedium(ConstantMedium),
    Bvh(BvhNode),
    List(PrimitiveList),
}

impl Primitive {
    /// Wrap so the reported normal points the other way.
    pub fn flip_normal(self) -> Primitive {
        Primitive::FlippedNormal(FlippedNormal::new(self))
    }

    /// Wrap with a rigid translation.
    pub fn translate(self, offset: Vec3) -> Primitive {
        Primitive::Translated(Translated::new(self, offset))
    }

    /// Wrap with a rotation about the +Y axis, in degrees.
    pub fn rotate_y(self, degrees: f32) -> Primitive {
        Primitive::Rotated(Rotated::y(self, degrees))
    }
}

impl Hittable for Primitive {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            Primitive::Sphere(s) => s.hit(ray, ray_t, rng),
            Primitive::MovingSphere(s) => s.hit(ray, ray_t, rng),
            Primitive::Rect(r) => r.hit(ray, ray_t, rng),
            Primitive::Block(b) => b.hit(ray, ray_t, rng),
            Primitive::FlippedNormal(f) => f.hit(ray, ray_t, rng),
            Primitive::Translated(t) => t.hit(ray, ray_t, rng),
            Primitive::Rotated(r) => r.hit(ray, ray_t, rng),
            Primitive::ConstantMedium(m) => m.hit(ray, ray_t, rng),
            Primitive::Bvh(b) => b.hit(ray, ray_t, rng),
            Primitive::List(l) => l.hit(ray, ray_t, rng),
        }
    }

    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        match self {
            Primitive::Sphere(s) => s.bounding_box(time),
            Primitive::MovingSphere(s) => s.bounding_box(time),
            Primitive::Rect(r) => r.bounding_box(time),
            Primitive::Block(b) => b.bounding_box(time),
            Primitive::FlippedNormal(f) => f.bounding_box(time),
            Primitive::Translated(t) => t.bounding_box(time),
            Primitive::Rotated(r) => r.bounding_box(time),
            Primitive::ConstantMedium(m) => m.bounding_box(time),
            Primitive::Bvh(b) => b.bounding_box(time),
            Primitive::List(l) => l.bounding_box(time),
        }
    }
}

macro_rules! impl_from_for_primitive {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Primitive {
                fn from(value: $variant) -> Self {
                    Primitive::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_primitive!(
    Sphere,
    MovingSphere,
    Block,
    FlippedNormal,
    Translated,
    Rotated,
    ConstantMedium,
);

impl From<AxisRect> for Primitive {
    fn from(value: AxisRect) -> Self {
        Primitive::Rect(value)
    }
}

impl From<BvhNode> for Primitive {
    fn from(value: BvhNode) -> Self {
        Primitive::Bvh(value)
    }
}

impl From<PrimitiveList> for Primitive {
    fn from(value: PrimitiveList) -> Self {
        Primitive::List(value)
    }
}

/// An unordered collection of primitives, searched linearly.
#[derive(Default)]
pub struct PrimitiveList {
    objects: Vec<Primitive>,
}

impl PrimitiveList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Primitive>) {
        self.objects.push(object.into());
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Index the list for traversal. Bounding boxes are taken over `time`.
    pub fn into_bvh(self, time: Interval) -> Result<BvhNode, SceneError> {
        BvhNode::new(self.objects, time)
    }
}

impl From<Vec<Primitive>> for PrimitiveList {
    fn from(objects: Vec<Primitive>) -> Self {
        Self { objects }
    }
}

impl Hittable for PrimitiveList {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for object in &self.objects {
            let max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, max), rng) {
                closest = Some(rec);
            }
        }

        closest
    }

    /// Aggregate box; `None` for an empty list or if any member is unbounded.
    fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        let mut boxes = self.objects.iter().map(|o| o.bounding_box(time));
        let first = boxes.next()??;
        boxes.try_fold(first, |acc, b| Some(Aabb::surrounding(&acc, &b?)))
    }
}
