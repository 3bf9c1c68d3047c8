//! Phoebe math - vector, ray and bounding volume primitives.
//!
//! Everything is double precision: `Vec3` is glam's `DVec3`, which keeps the
//! small intersection epsilon meaningful at scene scale.

pub use glam;

/// Three-component vector used for points, directions and RGB colors.
pub use glam::DVec3 as Vec3;

mod bound_box;
mod interval;
mod ray;
mod vector;

pub use bound_box::BoundBox;
pub use interval::Interval;
pub use ray::Ray;
pub use vector::VecExt;

use thiserror::Error;

/// Small value that approximates zero for intersection tests and ray offsets.
pub const EPSILON: f64 = 1e-8;

/// Errors raised while constructing math primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    #[error("invalid bounds: min {min} exceeds max {max}")]
    InvalidBounds { min: Vec3, max: Vec3 },
}

/// Result type for math operations.
pub type MathResult<T> = Result<T, MathError>;
