//! Phoebe renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer: camera rays are traced through a scene of
//! spheres, planes and triangles, scattered by their materials up to a fixed
//! depth, and averaged per pixel into an output sink.
//!
//! Rendering is split into buckets that run in parallel. Every pixel draws
//! its random numbers from a generator seeded by `(seed, x, y)`, so the image
//! does not depend on the number of workers or the order they run in.

mod bucket;
mod buffer;
mod bvh;
mod camera;
mod error;
mod geometry;
mod intersect;
mod material;
mod plane;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use buffer::{color_to_rgba, linear_to_gamma, ImageBuffer, RenderTarget};
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use geometry::Geometry;
pub use intersect::Intersect;
pub use material::{
    Color, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult, SurfacePoint,
};
pub use plane::Plane;
pub use renderer::{Background, PathTracer, RenderSettings, RenderStats};
pub use sampling::pixel_rng;
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from phoebe_math
pub use phoebe_math::{BoundBox, Interval, MathError, Ray, Vec3, VecExt, EPSILON};
