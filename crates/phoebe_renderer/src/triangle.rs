//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{Geometry, Material, RenderError, RenderResult};
use phoebe_math::{BoundBox, Ray, Vec3, EPSILON};
use std::sync::Arc;

/// A single-sided-normal triangle.
pub struct Triangle {
    v0: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    /// Face normal (unit length), following the v0 -> v1 -> v2 winding
    normal: Vec3,
    material: Arc<dyn Material>,
    bbox: BoundBox,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// Fails if the vertices are collinear (zero area).
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> RenderResult<Self> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1
            .cross(edge2)
            .try_normalize()
            .ok_or(RenderError::DegenerateTriangle)?;

        let bbox = BoundBox::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Ok(Self {
            v0,
            edge1,
            edge2,
            normal,
            material,
            bbox,
        })
    }
}

impl Geometry for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let h = ray.direction().cross(self.edge2);
        let a = self.edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.edge2.dot(q);
        (t > EPSILON).then_some(t)
    }

    fn normal_at(&self, _position: Vec3) -> Vec3 {
        self.normal
    }

    fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    fn bounding_box(&self) -> Option<BoundBox> {
        Some(self.bbox)
    }
}
