//! Camera for ray generation.

use crate::{RenderError, RenderResult};
use phoebe_math::{Ray, Vec3, VecExt};

/// Smallest |tangent x up| accepted before the basis counts as collinear.
const MIN_BASIS_SIN: f64 = 1e-6;

/// Pinhole camera casting rays through the image plane.
///
/// The orthonormal basis is `tangent` (look direction), `normal` (up) and
/// `binormal` (right, `tangent x normal`). The camera is immutable once built,
/// so ray generation needs no synchronisation.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,

    tangent: Vec3,
    normal: Vec3,
    binormal: Vec3,

    // Lens settings
    aspect_ratio: f64,
    norm_height: f64, // Half-height of the image plane at unit distance
}

impl Camera {
    /// Create a camera at `eye` looking towards `center`.
    ///
    /// `up` only needs to be roughly upward; it is re-orthogonalised against
    /// the view direction. Fails if `eye == center`, if `up` is zero, or if
    /// `up` is parallel to the view direction.
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> RenderResult<Self> {
        let tangent = (center - eye).unit()?;
        let up = up.unit()?;

        let cross = tangent.cross(up);
        if cross.length() < MIN_BASIS_SIN {
            return Err(RenderError::CollinearCamera);
        }
        let binormal = cross.unit()?;
        let normal = binormal.cross(tangent);

        Ok(Self {
            position: eye,
            tangent,
            normal,
            binormal,
            aspect_ratio: 1.0,
            norm_height: 1.0,
        })
    }

    /// Set lens settings.
    ///
    /// - `aspect_ratio`: image width over height
    /// - `vfov`: vertical field of view in degrees, in (0, 180)
    pub fn with_lens(mut self, aspect_ratio: f64, vfov: f64) -> RenderResult<Self> {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(RenderError::InvalidSettings(format!(
                "aspect ratio must be positive, got {aspect_ratio}"
            )));
        }
        if !(vfov > 0.0 && vfov < 180.0) {
            return Err(RenderError::InvalidSettings(format!(
                "field of view must be in (0, 180) degrees, got {vfov}"
            )));
        }
        self.aspect_ratio = aspect_ratio;
        self.norm_height = (vfov.to_radians() / 2.0).tan();
        Ok(self)
    }

    /// Returns `(tangent, normal, binormal)`.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.tangent, self.normal, self.binormal)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn norm_height(&self) -> f64 {
        self.norm_height
    }

    /// Generate the ray through pixel `(x, y)` of a `width x height` image.
    ///
    /// `jitter_x` and `jitter_y` in [0, 1) pick the point inside the pixel;
    /// (0.5, 0.5) is the pixel center. Pixel (0, 0) is the top-left corner.
    pub fn ray_through(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        jitter_x: f64,
        jitter_y: f64,
    ) -> Ray {
        let ndc_x = 2.0 * (x as f64 + jitter_x) / width as f64 - 1.0;
        let ndc_y = 1.0 - 2.0 * (y as f64 + jitter_y) / height as f64;

        let u = ndc_x * self.aspect_ratio * self.norm_height;
        let v = ndc_y * self.norm_height;

        // tangent is orthogonal to the other two, so this never has zero length
        let direction = (self.tangent + u * self.binormal + v * self.normal).normalize();
        Ray::new(self.position, direction)
    }
}
