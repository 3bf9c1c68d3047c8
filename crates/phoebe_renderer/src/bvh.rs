//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree over the bounded primitives of a scene. The tree only stores
//! primitive indices; the scene owns the geometry and decides which hit wins.

use phoebe_math::{BoundBox, Interval, Ray};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
pub(crate) enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: BoundBox,
    },
    /// Leaf node with a small number of primitive indices.
    Leaf { items: Vec<usize>, bbox: BoundBox },
    /// No bounded primitives at all.
    Empty,
}

impl BvhNode {
    /// Create a BVH from `(index, bounds)` pairs.
    pub fn new(items: Vec<(usize, BoundBox)>) -> Self {
        if items.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(items)
    }

    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort items by centroid on the axis with
    /// the widest centroid spread, split in half, recurse.
    fn build(mut items: Vec<(usize, BoundBox)>) -> Self {
        let n = items.len();

        let bounds = items
            .iter()
            .skip(1)
            .fold(items[0].1, |acc, (_, b)| BoundBox::surrounding(&acc, b));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                items: items.into_iter().map(|(index, _)| index).collect(),
                bbox: bounds,
            };
        }

        let first = items[0].1.centroid();
        let centroid_bounds = items.iter().fold(
            BoundBox::from_points(first, first),
            |acc, (_, b)| {
                let c = b.centroid();
                BoundBox::surrounding(&acc, &BoundBox::from_points(c, c))
            },
        );
        let axis = centroid_bounds.longest_axis();

        items.sort_unstable_by(|(ia, a), (ib, b)| {
            a.centroid()[axis]
                .partial_cmp(&b.centroid()[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ia.cmp(ib))
        });

        let right_items = items.split_off(n / 2);
        let left = Self::build(items);
        let right = Self::build(right_items);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }

    /// Walk every leaf whose box the ray crosses within `ray_t`.
    ///
    /// `visit` tests one primitive and returns the current upper bound on
    /// useful `t`, which prunes the remaining boxes. Returns that bound.
    pub fn visit<F>(&self, ray: &Ray, ray_t: Interval, visit: &mut F) -> f64
    where
        F: FnMut(usize) -> f64,
    {
        match self {
            BvhNode::Empty => ray_t.max,

            BvhNode::Leaf { items, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return ray_t.max;
                }
                items
                    .iter()
                    .fold(ray_t.max, |limit, &index| limit.min(visit(index)))
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return ray_t.max;
                }
                let limit = left.visit(ray, ray_t, visit);
                right.visit(ray, Interval::new(ray_t.min, limit), visit)
            }
        }
    }

    /// Number of leaves, for diagnostics.
    pub fn leaf_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}
