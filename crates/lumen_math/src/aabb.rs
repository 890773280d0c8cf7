use crate::{Interval, Ray, Vec3};

/// Thinnest extent a box is allowed to have on any axis.
const MIN_EXTENT: f32 = 0.0001;

/// Axis-aligned bounding box, one interval per axis.
///
/// Boxes built from points are padded so no axis is thinner than
/// `MIN_EXTENT`; axis-aligned rectangles would otherwise produce slabs
/// the ray test can never enter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Box from per-axis extents, each widened to at least `MIN_EXTENT`.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self {
            x: padded(x),
            y: padded(y),
            z: padded(z),
        }
    }

    /// Create an AABB from two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let lo = a.min(b);
        let hi = a.max(b);
        Self::new(
            Interval::new(lo.x, hi.x),
            Interval::new(lo.y, hi.y),
            Interval::new(lo.z, hi.z),
        )
    }

    /// Component-wise min/max of two boxes. Commutative.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Extent along axis `n` (0=X, 1=Y, anything else Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test: does the ray pass through the box within `ray_t`?
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let inv_d = 1.0 / r.direction()[axis];
            let mut t0 = (slab.min - r.origin()[axis]) * inv_d;
            let mut t1 = (slab.max - r.origin()[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// True when every bound is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.min().cmple(other.min()).all() && self.max().cmpge(other.max()).all()
    }

    /// The same box moved by `offset`.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.shift(offset.x),
            self.y.shift(offset.y),
            self.z.shift(offset.z),
        )
    }

    /// Index (0=X, 1=Y, 2=Z) of the widest axis; later axes win ties.
    pub fn longest_axis(&self) -> usize {
        let size = self.max() - self.min();
        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    /// Contains nothing; identity for `surrounding`.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

/// Widen a too-thin axis. Far from the origin `MIN_EXTENT` drops below the
/// f32 spacing, so the pad grows with the coordinate's magnitude.
fn padded(extent: Interval) -> Interval {
    let magnitude = extent.min.abs().max(extent.max.abs());
    if !magnitude.is_finite() {
        return extent;
    }
    let min_extent = MIN_EXTENT.max(4.0 * f32::EPSILON * magnitude);
    if extent.size() < min_extent {
        extent.expand(min_extent)
    } else {
        extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(aabb.min(), Vec3::ZERO);
        assert_eq!(aabb.max(), Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_pads_flat_axis() {
        let flat = Aabb::from_points(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 1.0, 5.0));
        assert!(flat.z.size() > 0.0);
        assert!(flat.z.min < 5.0 && flat.z.max > 5.0);
    }

    #[test]
    fn test_aabb_pads_flat_axis_far_from_origin() {
        for k in [1500.0, 5000.0, -1.0e5] {
            let flat = Aabb::from_points(Vec3::new(-1.0, -1.0, k), Vec3::new(1.0, 1.0, k));
            assert!(flat.z.min < k && flat.z.max > k, "k = {k}");

            let toward = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, k.signum()), 0.0);
            assert!(flat.hit(&toward, Interval::new(0.001, f32::INFINITY)), "k = {k}");
        }

        let moved = Aabb::from_points(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0))
            .translate(Vec3::new(0.0, 0.0, -3000.0));
        assert!(moved.z.size() > 0.0);
    }

    #[test]
    fn test_aabb_surrounding_commutes_and_contains_inputs() {
        let a = Aabb::from_points(Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, 4.0, 1.0));
        let b = Aabb::from_points(Vec3::new(0.0, -5.0, -2.0), Vec3::new(1.0, 0.0, 7.0));
        let ab = Aabb::surrounding(&a, &b);
        let ba = Aabb::surrounding(&b, &a);

        assert_eq!(ab, ba);
        assert!(ab.contains_box(&a));
        assert!(ab.contains_box(&b));
        assert_eq!(ab.min(), a.min().min(b.min()));
        assert_eq!(ab.max(), a.max().max(b.max()));
    }

    #[test]
    fn test_aabb_surrounding_empty_is_identity() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &a), a);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));

        let toward = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&toward, Interval::new(0.0, 100.0)));

        let away = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, 0.0);
        assert!(!aabb.hit(&away, Interval::new(0.0, 100.0)));

        let beside = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&beside, Interval::new(0.0, 100.0)));

        // Box is beyond the allowed range
        assert!(!aabb.hit(&toward, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_aabb_is_finite() {
        assert!(Aabb::from_points(Vec3::ZERO, Vec3::ONE).is_finite());
        assert!(!Aabb::EMPTY.is_finite());
        let unbounded = Aabb::from_points(Vec3::ZERO, Vec3::splat(f32::INFINITY));
        assert!(!unbounded.is_finite());
        let nan = Aabb::new(
            Interval::new(0.0, f32::NAN),
            Interval::new(0.0, 1.0),
            Interval::new(0.0, 1.0),
        );
        assert!(!nan.is_finite());
    }

    #[test]
    fn test_aabb_longest_axis_and_centroid() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 2.0));
        assert_eq!(aabb.longest_axis(), 1);
        assert_eq!(aabb.centroid(), Vec3::new(0.5, 5.0, 1.0));
    }

    #[test]
    fn test_aabb_translate() {
        let moved = Aabb::from_points(Vec3::ZERO, Vec3::ONE).translate(Vec3::new(5.0, 0.0, -1.0));
        assert_eq!(moved.min(), Vec3::new(5.0, 0.0, -1.0));
        assert_eq!(moved.max(), Vec3::new(6.0, 1.0, 0.0));
    }
}
