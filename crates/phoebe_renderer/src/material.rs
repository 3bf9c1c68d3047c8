//! Material trait for surface scattering.

use crate::sampling::{gen_f64, random_unit_vector};
use crate::{RenderError, RenderResult};
use phoebe_math::{Ray, Vec3, VecExt, EPSILON};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Shading frame at a hit point.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoint {
    /// Point of intersection
    pub position: Vec3,
    /// Unit surface normal, flipped to point against the incoming ray
    pub normal: Vec3,
    /// Whether the ray hit the outside of the surface
    pub front_face: bool,
}

impl SurfacePoint {
    /// Build a shading frame from the geometry's outward normal.
    pub fn new(ray: &Ray, position: Vec3, outward_normal: Vec3) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };
        Self {
            position,
            normal,
            front_face,
        }
    }

    /// Ray leaving the surface on the side the normal points to.
    fn spawn(&self, direction: Vec3) -> Ray {
        Ray::new(self.position + EPSILON * self.normal, direction)
    }

    /// Ray leaving the surface through to the other side.
    fn spawn_through(&self, direction: Vec3) -> Ray {
        Ray::new(self.position - EPSILON * self.normal, direction)
    }
}

/// Result of scattering a ray off a surface.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel fraction of the scattered radiance that reaches the viewer
    pub attenuation: Color,
    /// Outgoing ray
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        surface: &SurfacePoint,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Light emitted at the surface. Most materials emit nothing.
    fn emitted(&self, _surface: &SurfacePoint) -> Color {
        Color::ZERO
    }
}

/// Accept a color only if every channel is finite and non-negative.
fn checked_color(what: &str, color: Color) -> RenderResult<Color> {
    if !color.is_finite() || color.min_element() < 0.0 {
        return Err(RenderError::InvalidMaterial(format!(
            "{what} must be finite and non-negative, got {color}"
        )));
    }
    Ok(color)
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> RenderResult<Self> {
        Ok(Self {
            albedo: checked_color("albedo", albedo)?,
        })
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        surface: &SurfacePoint,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // normal + uniform sphere sample is cosine distributed over the
        // hemisphere. The cosine term cancels against the pdf, leaving the
        // albedo as the attenuation.
        let mut direction = surface.normal + random_unit_vector(rng);
        if direction.near_zero(1e-8) {
            direction = surface.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: surface.spawn(direction.normalize()),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough; clamped
    ///   to that range
    pub fn new(albedo: Color, fuzz: f64) -> RenderResult<Self> {
        if !fuzz.is_finite() {
            return Err(RenderError::InvalidMaterial(format!(
                "metal fuzz must be finite, got {fuzz}"
            )));
        }
        Ok(Self {
            albedo: checked_color("albedo", albedo)?,
            fuzz: fuzz.clamp(0.0, 1.0),
        })
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        surface: &SurfacePoint,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), surface.normal);
        let direction = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzzed directions below the surface are absorbed
        if direction.dot(surface.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: surface.spawn(direction.normalize()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> RenderResult<Self> {
        if !(ior.is_finite() && ior > 0.0) {
            return Err(RenderError::InvalidMaterial(format!(
                "index of refraction must be positive and finite, got {ior}"
            )));
        }
        Ok(Self { ior })
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ior: f64) -> f64 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        surface: &SurfacePoint,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if surface.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(surface.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let scattered = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng)
        {
            surface.spawn(reflect(unit_direction, surface.normal))
        } else {
            surface.spawn_through(refract(unit_direction, surface.normal, refraction_ratio))
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered,
        })
    }
}

/// Diffuse light emitter.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> RenderResult<Self> {
        Ok(Self {
            emit: checked_color("emission", emit)?,
        })
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _surface: &SurfacePoint,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, _surface: &SurfacePoint) -> Color {
        self.emit
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
