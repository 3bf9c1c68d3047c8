use crate::{Interval, MathError, MathResult, Ray, Vec3};

/// Minimum thickness of a box built from primitive extents.
const MIN_EXTENT: f64 = 1e-4;

/// Axis-aligned bounding box.
///
/// Describes the spatial extent of the scene and bounds primitives inside the
/// BVH, so rays that cannot reach any geometry are rejected before the
/// per-primitive tests. `min <= max` holds on every axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundBox {
    min: Vec3,
    max: Vec3,
}

impl BoundBox {
    /// Create a box from its low and high corners.
    ///
    /// Fails if `min` exceeds `max` on any axis.
    pub fn new(min: Vec3, max: Vec3) -> MathResult<Self> {
        if !min.is_finite() || !max.is_finite() || min.cmpgt(max).any() {
            return Err(MathError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Create the box spanned by two arbitrary corner points.
    ///
    /// Flat boxes are padded so the slab test never sees a zero-width slab.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut min = a.min(b);
        let mut max = a.max(b);
        for axis in 0..3 {
            if max[axis] - min[axis] < MIN_EXTENT {
                min[axis] -= MIN_EXTENT / 2.0;
                max[axis] += MIN_EXTENT / 2.0;
            }
        }
        Self { min, max }
    }

    /// Create a box that surrounds two other boxes.
    pub fn surrounding(a: &BoundBox, b: &BoundBox) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Low corner.
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// High corner.
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Test if a ray intersects this box within the given interval.
    ///
    /// Slab method. A zero direction component yields infinite slab bounds,
    /// and the NaN produced by an origin lying exactly on a slab plane is
    /// discarded by `f64::max`/`f64::min`.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let inv_d = 1.0 / ray.direction[axis];
            let mut t0 = (self.min[axis] - ray.origin[axis]) * inv_d;
            let mut t1 = (self.max[axis] - ray.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = ray_t.min.max(t0);
            ray_t.max = ray_t.max.min(t1);
            if ray_t.max < ray_t.min {
                return false;
            }
        }
        true
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let size = self.max - self.min;
        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}
