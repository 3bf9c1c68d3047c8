//! Sphere primitive for ray tracing.

use crate::{Geometry, Material, RenderError, RenderResult};
use phoebe_math::{BoundBox, Ray, Vec3, EPSILON};
use std::sync::Arc;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: BoundBox,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Fails if the radius is not a positive finite number.
    pub fn new(center: Vec3, radius: f64, material: Arc<dyn Material>) -> RenderResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(RenderError::InvalidRadius(radius));
        }
        let rvec = Vec3::splat(radius);
        let bbox = BoundBox::from_points(center - rvec, center + rvec);

        Ok(Self {
            center,
            radius,
            material,
            bbox,
        })
    }
}

impl Geometry for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Prefer the nearer root, fall back to the far one when the ray
        // starts inside the sphere
        let near = (h - sqrtd) / a;
        if near > EPSILON {
            return Some(near);
        }
        let far = (h + sqrtd) / a;
        (far > EPSILON).then_some(far)
    }

    fn normal_at(&self, position: Vec3) -> Vec3 {
        (position - self.center) / self.radius
    }

    fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    fn bounding_box(&self) -> Option<BoundBox> {
        Some(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)).unwrap())
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 3.0, grey()).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey()).unwrap();

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.intersect(&ray).is_none());

        // Sphere entirely behind the ray
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(sphere.intersect(&ray).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, grey()).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_sphere_rejects_invalid_radius() {
        assert!(matches!(
            Sphere::new(Vec3::ZERO, 0.0, grey()),
            Err(RenderError::InvalidRadius(_))
        ));
        assert!(Sphere::new(Vec3::ZERO, -1.0, grey()).is_err());
        assert!(Sphere::new(Vec3::ZERO, f64::NAN, grey()).is_err());
    }

    #[test]
    fn test_sphere_normal() {
        let sphere = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0, grey()).unwrap();
        let n = sphere.normal_at(Vec3::new(1.0, 2.0, 0.0));
        assert!((n - Vec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_sphere_hits_lie_on_surface() {
        let center = Vec3::new(0.5, -1.0, -6.0);
        let radius = 2.5;
        let sphere = Sphere::new(center, radius, grey()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let mut hits = 0;
        for _ in 0..500 {
            let origin = Vec3::new(
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-4.0..4.0),
            );
            let target = center + Vec3::new(
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
            );
            let ray = Ray::new(origin, (target - origin).normalize());

            if let Some(t) = sphere.intersect(&ray) {
                hits += 1;
                assert!(t > 0.0);
                assert!(((ray.at(t) - center).length() - radius).abs() < 1e-9);
            }
        }
        assert!(hits > 0);
    }
}
