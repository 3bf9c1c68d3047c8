//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing truncated at a fixed depth
//! - Several scattered rays averaged per intersection
//! - Anti-aliasing via jittered multi-sampling
//! - Bucket-parallel rendering with per-pixel random streams

use std::time::{Duration, Instant};

use rand::RngCore;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, DEFAULT_BUCKET_SIZE};
use crate::sampling::{gen_f64, pixel_rng};
use crate::{Camera, Color, RenderError, RenderResult, RenderTarget, Scene};
use phoebe_math::Ray;

/// Radiance returned for rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Same color in every direction.
    Solid(Color),
    /// Vertical blend from `horizon` (looking down) to `zenith` (looking up).
    Gradient { horizon: Color, zenith: Color },
}

impl Background {
    /// Radiance seen along an escaping ray.
    pub fn radiance(&self, ray: &Ray) -> Color {
        match *self {
            Background::Solid(color) => color,
            Background::Gradient { horizon, zenith } => {
                let unit_direction = ray.direction().normalize();
                let a = 0.5 * (unit_direction.y + 1.0);
                horizon * (1.0 - a) + zenith * a
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ONE)
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Camera samples per pixel for anti-aliasing
    pub pixel_sample_size: u32,
    /// Scattered rays averaged at every intersection
    pub intersect_sample_size: u32,
    /// Maximum number of bounces; rays reaching it return black
    pub trace_depth: u32,
    /// Global random seed
    pub seed: u64,
    /// Radiance for rays that miss every object
    pub background: Background,
    /// Worker threads; 0 uses every logical CPU
    pub workers: usize,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            pixel_sample_size: 9,
            intersect_sample_size: 4,
            trace_depth: 3,
            seed: 0,
            background: Background::default(),
            workers: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderSettings {
    /// Check the sampling parameters.
    pub fn validate(&self) -> RenderResult<()> {
        if self.pixel_sample_size == 0 {
            return Err(RenderError::InvalidSettings(
                "pixel sample size must be at least 1".into(),
            ));
        }
        if self.intersect_sample_size == 0 {
            return Err(RenderError::InvalidSettings(
                "intersection sample size must be at least 1".into(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidSettings(
                "bucket size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    /// Pixels written to the target
    pub pixels: u64,
    /// Camera rays traced (pixels times pixel samples)
    pub camera_rays: u64,
    /// Wall-clock render time
    pub elapsed: Duration,
}

/// Renders a scene through a camera.
///
/// Scene and camera are read-only for the tracer's lifetime and shared
/// between render workers without locking.
pub struct PathTracer {
    scene: Scene,
    camera: Camera,
    settings: RenderSettings,
}

impl PathTracer {
    /// Create a tracer, validating the settings up front.
    pub fn new(scene: Scene, camera: Camera, settings: RenderSettings) -> RenderResult<Self> {
        settings.validate()?;
        Ok(Self {
            scene,
            camera,
            settings,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Compute the radiance carried back along a ray.
    ///
    /// At `depth >= trace_depth` the path is cut off and returns black without
    /// querying the scene. A miss returns the background; a hit returns the
    /// emitted light plus the attenuated average of `intersect_sample_size`
    /// scattered paths.
    pub fn trace_ray(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        if depth >= self.settings.trace_depth {
            return Color::ZERO;
        }

        let Some(hit) = self.scene.intersect(ray) else {
            return self.settings.background.radiance(ray);
        };

        let surface = hit.surface();
        let material = hit.geometry().material();
        let emitted = material.emitted(&surface);

        let samples = self.settings.intersect_sample_size;
        let mut scattered = Color::ZERO;
        for _ in 0..samples {
            // Absorbed samples contribute nothing
            if let Some(result) = material.scatter(ray, &surface, rng) {
                scattered += result.attenuation * self.trace_ray(&result.scattered, depth + 1, rng);
            }
        }

        emitted + scattered / samples as f64
    }

    /// Average radiance over `pixel_sample_size` jittered camera rays through
    /// pixel `(x, y)` of a `width x height` image.
    pub fn accumulate(&self, x: u32, y: u32, width: u32, height: u32) -> Color {
        let mut rng = pixel_rng(self.settings.seed, x, y);
        let mut pixel_color = Color::ZERO;

        for _ in 0..self.settings.pixel_sample_size {
            let jitter_x = gen_f64(&mut rng);
            let jitter_y = gen_f64(&mut rng);
            let ray = self
                .camera
                .ray_through(x, y, width, height, jitter_x, jitter_y);
            pixel_color += self.trace_ray(&ray, 0, &mut rng);
        }

        pixel_color / self.settings.pixel_sample_size as f64
    }

    /// Render every pixel of the target.
    ///
    /// Buckets are traced in parallel on a dedicated pool of
    /// `settings.workers` threads; the finished pixels are then written to the
    /// target on the calling thread, each exactly once.
    pub fn render(&self, target: &mut dyn RenderTarget) -> RenderResult<RenderStats> {
        let (width, height) = target.dims();
        let start = Instant::now();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.workers)
            .build()
            .map_err(|e| RenderError::ThreadPool(e.to_string()))?;

        let buckets = generate_buckets(width, height, self.settings.bucket_size);
        log::info!(
            "Rendering {}x{} in {} buckets on {} threads ({} spp, {} samples per hit, depth {})",
            width,
            height,
            buckets.len(),
            pool.current_num_threads(),
            self.settings.pixel_sample_size,
            self.settings.intersect_sample_size,
            self.settings.trace_depth
        );

        let results: Vec<_> = pool.install(|| {
            buckets
                .par_iter()
                .map(|bucket| {
                    let result = render_bucket(bucket, self, width, height);
                    log::trace!("Finished bucket {} at ({}, {})", bucket.index, bucket.x, bucket.y);
                    result
                })
                .collect()
        });

        for result in &results {
            let bucket = &result.bucket;
            for (i, color) in result.pixels.iter().enumerate() {
                let x = bucket.x + i as u32 % bucket.width;
                let y = bucket.y + i as u32 / bucket.width;
                target.set_intensity_at(x, y, *color);
            }
        }

        let pixels = u64::from(width) * u64::from(height);
        let stats = RenderStats {
            pixels,
            camera_rays: pixels * u64::from(self.settings.pixel_sample_size),
            elapsed: start.elapsed(),
        };
        log::info!("Rendered {} pixels in {:.2?}", stats.pixels, stats.elapsed);
        Ok(stats)
    }
}
