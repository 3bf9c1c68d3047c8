//! Output sink for rendered pixels.

use crate::Color;

/// Destination for rendered pixel values.
///
/// The renderer calls [`RenderTarget::set_intensity_at`] exactly once per
/// pixel. Values are linear radiance and are not clamped; tone mapping and
/// clamping belong to the target.
pub trait RenderTarget {
    /// Image dimensions as `(width, height)`.
    fn dims(&self) -> (u32, u32);

    /// Store the final value of pixel `(x, y)`.
    fn set_intensity_at(&mut self, x: u32, y: u32, color: Color);
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to gamma-corrected RGBA bytes, row-major from the top-left.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

impl RenderTarget for ImageBuffer {
    fn dims(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_intensity_at(&mut self, x: u32, y: u32, color: Color) {
        self.set(x, y, color);
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA, clamping each channel to [0, 1].
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f64| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)).round() as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}
