//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's primitives, built once before rendering.
//! It only changes traversal cost: the closest hit found through the tree
//! is the one a linear scan over the same primitives would find.

use crate::{HitRecord, Hittable, Primitive, Ray, SceneError};
use lumen_math::{Aabb, Interval};
use rand::RngCore;

/// BVH node - either a branch with two children or a single-primitive leaf.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding one primitive.
    Leaf { object: Box<Primitive>, bbox: Aabb },
    /// Empty scene.
    Empty,
}

impl BvhNode {
    /// Build a BVH over `objects`, taking bounding boxes over the shutter
    /// interval `time`.
    ///
    /// Fails if any primitive is unbounded or has non-finite bounds, naming
    /// its position in `objects`.
    pub fn new(objects: Vec<Primitive>, time: Interval) -> Result<Self, SceneError> {
        let mut entries = Vec::with_capacity(objects.len());
        for (index, object) in objects.into_iter().enumerate() {
            let bbox = object
                .bounding_box(time)
                .ok_or(SceneError::MissingBoundingBox { index })?;
            if !bbox.is_finite() {
                return Err(SceneError::NonFiniteBounds { index });
            }
            entries.push((bbox, object));
        }

        let count = entries.len();
        let node = Self::build(entries);
        log::info!(
            "Built BVH: {} primitives, depth {}",
            count,
            node.depth()
        );
        Ok(node)
    }

    /// Recursive median split on the longest axis of the node's bounds,
    /// ordering primitives by their box minimum on that axis.
    fn build(mut entries: Vec<(Aabb, Primitive)>) -> Self {
        if entries.len() <= 1 {
            return entries
                .pop()
                .map_or(BvhNode::Empty, |(bbox, object)| BvhNode::Leaf {
                    object: Box::new(object),
                    bbox,
                });
        }

        let bounds = entries
            .iter()
            .fold(Aabb::EMPTY, |acc, (b, _)| Aabb::surrounding(&acc, b));
        let axis = bounds.longest_axis();

        // Stable, so equal keys keep input order and the tree is deterministic
        entries.sort_by(|(a, _), (b, _)| {
            a.axis_interval(axis)
                .min
                .partial_cmp(&b.axis_interval(axis).min)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = entries.len() / 2;
        let right_entries = entries.split_off(mid);

        let left = Self::build(entries);
        let right = Self::build(right_entries);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }

    /// Number of levels, counting a lone leaf as 1.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                object.hit(ray, ray_t, rng)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t, rng);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rng);

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self, _time: Interval) -> Option<Aabb> {
        match self {
            BvhNode::Empty => None,
            BvhNode::Leaf { bbox, .. } => Some(*bbox),
            BvhNode::Branch { bbox, .. } => Some(*bbox),
        }
    }
}
