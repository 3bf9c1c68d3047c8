use crate::{Geometry, SurfacePoint};
use phoebe_math::{Ray, Vec3};

/// A ray-geometry intersection.
///
/// Only built for an actual hit, and only lives for the duration of one
/// bounce.
pub struct Intersect<'a> {
    ray: Ray,
    geometry: &'a dyn Geometry,
    position: Vec3,
    t: f64,
}

impl<'a> Intersect<'a> {
    pub(crate) fn new(ray: Ray, geometry: &'a dyn Geometry, t: f64) -> Self {
        debug_assert!(t > 0.0, "intersection at non-positive t = {t}");
        Self {
            ray,
            geometry,
            position: ray.at(t),
            t,
        }
    }

    /// The geometry that was hit.
    pub fn geometry(&self) -> &'a dyn Geometry {
        self.geometry
    }

    /// The hit position, `ray.at(t)`.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    /// Shading frame with the normal oriented against the ray.
    pub fn surface(&self) -> SurfacePoint {
        let outward = self.geometry.normal_at(self.position);
        SurfacePoint::new(&self.ray, self.position, outward)
    }
}

impl std::fmt::Debug for Intersect<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intersect")
            .field("ray", &self.ray)
            .field("position", &self.position)
            .field("t", &self.t)
            .finish_non_exhaustive()
    }
}
