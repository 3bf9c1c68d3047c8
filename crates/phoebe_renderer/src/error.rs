//! Errors raised while building a scene or starting a render.

use phoebe_math::MathError;
use thiserror::Error;

/// Errors that can occur while constructing primitives, cameras or renders.
///
/// All of these are raised before any pixel is traced; a render either starts
/// with a fully valid scene or does not start.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Math(#[from] MathError),

    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    #[error("triangle vertices are collinear")]
    DegenerateTriangle,

    #[error("camera up direction is parallel to the view direction")]
    CollinearCamera,

    #[error("invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("failed to start render workers: {0}")]
    ThreadPool(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
