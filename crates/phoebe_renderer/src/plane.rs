//! Infinite plane primitive.

use crate::{Geometry, Material, RenderResult};
use phoebe_math::{BoundBox, Ray, Vec3, VecExt, EPSILON};
use std::sync::Arc;

/// An infinite plane through `point` with unit normal `normal`.
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    material: Arc<dyn Material>,
}

impl Plane {
    /// Create a new plane. The normal is normalized; a zero normal is an error.
    pub fn new(point: Vec3, normal: Vec3, material: Arc<dyn Material>) -> RenderResult<Self> {
        Ok(Self {
            point,
            normal: normal.unit()?,
            material,
        })
    }
}

impl Geometry for Plane {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let denom = ray.direction().dot(self.normal);

        // Parallel to the plane
        if denom.abs() <= EPSILON {
            return None;
        }

        let t = (self.point - ray.origin()).dot(self.normal) / denom;
        (t > EPSILON).then_some(t)
    }

    fn normal_at(&self, _position: Vec3) -> Vec3 {
        self.normal
    }

    fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    fn bounding_box(&self) -> Option<BoundBox> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian, MathError, RenderError};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn back_wall() -> Plane {
        Plane::new(
            Vec3::new(0.0, 0.0, -20.0),
            Vec3::new(0.0, 0.0, 1.0),
            Arc::new(Lambertian::new(Color::splat(0.8)).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_plane_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let t = back_wall().intersect(&ray).unwrap();
        assert!((t - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_plane_hit_from_behind() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -30.0), Vec3::new(0.0, 0.0, 1.0));
        let t = back_wall().intersect(&ray).unwrap();
        assert!((t - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_plane_parallel_ray_misses() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        assert!(back_wall().intersect(&ray).is_none());
    }

    #[test]
    fn test_plane_behind_ray_misses() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(back_wall().intersect(&ray).is_none());
    }

    #[test]
    fn test_plane_normalizes_normal() {
        let plane = Plane::new(
            Vec3::ZERO,
            Vec3::new(0.0, 5.0, 0.0),
            Arc::new(Lambertian::new(Color::ONE).unwrap()),
        )
        .unwrap();
        assert_eq!(plane.normal_at(Vec3::new(3.0, 0.0, 1.0)), Vec3::Y);
        assert!(plane.bounding_box().is_none());
    }

    #[test]
    fn test_plane_rejects_zero_normal() {
        let material = Arc::new(Lambertian::new(Color::ONE).unwrap());
        let result = Plane::new(Vec3::ZERO, Vec3::ZERO, material);
        assert!(matches!(
            result,
            Err(RenderError::Math(MathError::DegenerateVector))
        ));
    }

    #[test]
    fn test_plane_hits_lie_on_plane() {
        let point = Vec3::new(1.0, -2.0, 3.0);
        let normal = Vec3::new(1.0, 2.0, -0.5).normalize();
        let material = Arc::new(Lambertian::new(Color::ONE).unwrap());
        let plane = Plane::new(point, normal, material).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..500 {
            let origin = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let Some(direction) = direction.try_normalize() else {
                continue;
            };
            // Keep t bounded so the tolerance below stays meaningful
            if direction.dot(normal).abs() < 0.1 {
                continue;
            }
            let ray = Ray::new(origin, direction);

            if let Some(t) = plane.intersect(&ray) {
                assert!(t > 0.0);
                assert!((ray.at(t) - point).dot(normal).abs() < 1e-9);
            }
        }
    }
}
