//! Phoebe path tracer command-line front end.
//!
//! Loads a JSON configuration (or the defaults), builds the scene, renders it
//! in parallel and writes the result as a PNG.

mod config;
mod scene_desc;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use phoebe_renderer::{ImageBuffer, PathTracer};

use crate::config::Config;

/// A Monte Carlo path tracer.
#[derive(Parser, Debug)]
#[command(name = "phoebe", version, about)]
struct Cli {
    /// JSON configuration file. Defaults are used when omitted.
    config: Option<PathBuf>,

    /// Output PNG path, overriding `fileName`.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Number of render threads [default: number of logical CPUs].
    #[arg(long, short = 't')]
    threads: Option<usize>,

    /// Random seed, overriding `seed`.
    #[arg(long)]
    seed: Option<i64>,

    /// Image width, overriding `width`.
    #[arg(long)]
    width: Option<u32>,

    /// Image height, overriding `height`.
    #[arg(long)]
    height: Option<u32>,

    /// Camera samples per pixel, overriding `pixelSampleSize`.
    #[arg(long, short)]
    samples: Option<u32>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.file_name = output.display().to_string();
        }
        if let Some(threads) = self.threads {
            config.num_cpu = threads;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.pixel_sample_size = samples;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Phoebe Path Tracer v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate()?;
    config.log_summary();

    let scene = scene_desc::build_scene(&config)?;
    let camera = config.camera()?;
    let tracer = PathTracer::new(scene, camera, config.render_settings())?;

    let mut image = ImageBuffer::new(config.width, config.height);
    let stats = tracer.render(&mut image).context("Render failed")?;

    let rays_per_sec = stats.camera_rays as f64 / stats.elapsed.as_secs_f64().max(1e-9);
    log::info!(
        "Traced {} camera rays in {:.2?} ({:.0} rays/s)",
        stats.camera_rays,
        stats.elapsed,
        rays_per_sec
    );

    export_png(&image, Path::new(&config.file_name))?;
    log::info!("Saved {}", config.file_name);
    Ok(())
}

/// Write the buffer as an 8-bit RGBA PNG.
fn export_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .ok_or_else(|| anyhow!("image buffer does not match {}x{}", image.width, image.height))?;
    rgba.save(path)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    Ok(())
}
