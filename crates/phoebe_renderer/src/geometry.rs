//! Geometry trait shared by every primitive.

use crate::Material;
use phoebe_math::{BoundBox, Ray, Vec3};

/// A surface that rays can hit.
///
/// Implementations report intersections through a single ray parameter `t`;
/// only hits with `t > EPSILON` count, which keeps scattered rays from
/// re-hitting the surface they leave.
pub trait Geometry: Send + Sync {
    /// Smallest `t > EPSILON` at which the ray meets the surface, if any.
    fn intersect(&self, ray: &Ray) -> Option<f64>;

    /// Outward unit normal at a point on the surface.
    fn normal_at(&self, position: Vec3) -> Vec3;

    /// Material used to shade hits on this surface.
    fn material(&self) -> &dyn Material;

    /// Bounding box of the surface, or `None` if it is unbounded.
    fn bounding_box(&self) -> Option<BoundBox>;
}
