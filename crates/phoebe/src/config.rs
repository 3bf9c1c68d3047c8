//! Render configuration loaded from JSON.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use phoebe_renderer::{
    Background, BoundBox, Camera, Color, RenderSettings, Vec3, DEFAULT_BUCKET_SIZE,
};

use crate::scene_desc::ObjectDesc;

/// Radiance for rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundDesc {
    Solid { color: [f64; 3] },
    Gradient { horizon: [f64; 3], zenith: [f64; 3] },
}

impl Default for BackgroundDesc {
    fn default() -> Self {
        BackgroundDesc::Solid {
            color: [1.0, 1.0, 1.0],
        }
    }
}

impl From<BackgroundDesc> for Background {
    fn from(desc: BackgroundDesc) -> Self {
        match desc {
            BackgroundDesc::Solid { color } => Background::Solid(Color::from_array(color)),
            BackgroundDesc::Gradient { horizon, zenith } => Background::Gradient {
                horizon: Color::from_array(horizon),
                zenith: Color::from_array(zenith),
            },
        }
    }
}

/// Everything needed to render one image.
///
/// Keys missing from the file keep their default values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Worker threads; never read from the file
    #[serde(skip)]
    pub num_cpu: usize,

    /// Output PNG path
    pub file_name: String,
    pub seed: i64,

    pub width: u32,
    pub height: u32,

    pub scene_bound_min: [f64; 3],
    pub scene_bound_max: [f64; 3],

    pub camera_eye: [f64; 3],
    pub camera_center: [f64; 3],
    pub camera_up: [f64; 3],
    /// Vertical field of view in degrees
    pub field_of_view: f64,

    /// Camera rays per pixel
    pub pixel_sample_size: u32,
    /// Scattered rays averaged at every hit
    pub intersect_sample_size: u32,
    pub trace_depth: u32,

    pub background: BackgroundDesc,
    /// Scene contents; empty selects the built-in Cornell box
    pub objects: Vec<ObjectDesc>,
}

impl Default for Config {
    fn default() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        Self {
            num_cpu: rayon::current_num_threads(),
            file_name: format!("phoebe_{nanos}.png"),
            seed: 0,
            width: 800,
            height: 800,
            scene_bound_min: [-5.0, -5.0, -5.0],
            scene_bound_max: [5.0, 5.0, 5.0],
            camera_eye: [0.0, 0.0, 0.0],
            camera_center: [0.0, 0.0, -1.0],
            camera_up: [0.0, 1.0, 0.0],
            field_of_view: 90.0,
            pixel_sample_size: 9,
            intersect_sample_size: 4,
            trace_depth: 3,
            background: BackgroundDesc::default(),
            objects: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let config = serde_json::from_str(json).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    /// Check every value before any scene or render work starts.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "image dimensions must be positive, got {}x{}",
            self.width,
            self.height
        );
        ensure!(!self.file_name.is_empty(), "output file name is empty");
        ensure!(
            self.pixel_sample_size >= 1,
            "pixelSampleSize must be at least 1"
        );
        ensure!(
            self.intersect_sample_size >= 1,
            "intersectSampleSize must be at least 1"
        );

        self.scene_bound()?;
        self.camera()?;
        for (i, object) in self.objects.iter().enumerate() {
            object
                .build()
                .with_context(|| format!("Invalid object #{i}"))?;
        }
        self.render_settings().validate()?;
        Ok(())
    }

    /// Configured scene extent.
    pub fn scene_bound(&self) -> Result<BoundBox> {
        let bound = BoundBox::new(
            Vec3::from_array(self.scene_bound_min),
            Vec3::from_array(self.scene_bound_max),
        )
        .context("Invalid scene bounds")?;
        Ok(bound)
    }

    /// Camera position, look-at point and up direction.
    pub fn eye_center_up(&self) -> (Vec3, Vec3, Vec3) {
        (
            Vec3::from_array(self.camera_eye),
            Vec3::from_array(self.camera_center),
            Vec3::from_array(self.camera_up),
        )
    }

    /// Camera matching the image aspect ratio and field of view.
    pub fn camera(&self) -> Result<Camera> {
        let (eye, center, up) = self.eye_center_up();
        let aspect_ratio = f64::from(self.width) / f64::from(self.height);
        let camera = Camera::new(eye, center, up)
            .and_then(|c| c.with_lens(aspect_ratio, self.field_of_view))
            .context("Invalid camera settings")?;
        Ok(camera)
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            pixel_sample_size: self.pixel_sample_size,
            intersect_sample_size: self.intersect_sample_size,
            trace_depth: self.trace_depth,
            // Negative seeds keep their bit pattern
            seed: self.seed as u64,
            background: self.background.into(),
            workers: self.num_cpu,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }

    /// Log the configuration, one line per group.
    pub fn log_summary(&self) {
        let fmt3 = |v: [f64; 3]| format!("({:.3}, {:.3}, {:.3})", v[0], v[1], v[2]);

        log::info!("Configuration summary:");
        log::info!("  CPU cores:          {}", self.num_cpu);
        log::info!("  Output file:        {}", self.file_name);
        log::info!("  Random seed:        {}", self.seed);
        log::info!("  Image dimensions:   ({}, {})", self.width, self.height);
        log::info!(
            "  Scene bounds:       {} to {}",
            fmt3(self.scene_bound_min),
            fmt3(self.scene_bound_max)
        );
        log::info!(
            "  Camera:             eye {} center {} up {} fov {:.1}",
            fmt3(self.camera_eye),
            fmt3(self.camera_center),
            fmt3(self.camera_up),
            self.field_of_view
        );
        log::info!(
            "  Samples:            {} per pixel, {} per intersection",
            self.pixel_sample_size,
            self.intersect_sample_size
        );
        log::info!("  Recursion depth:    {}", self.trace_depth);
        if self.objects.is_empty() {
            log::info!("  Scene:              built-in Cornell box");
        } else {
            log::info!("  Scene:              {} objects", self.objects.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!((config.width, config.height), (800, 800));
        assert_eq!(config.pixel_sample_size, 9);
        assert_eq!(config.intersect_sample_size, 4);
        assert_eq!(config.trace_depth, 3);
        assert!(config.file_name.starts_with("phoebe_"));
        assert!(config.file_name.ends_with(".png"));
        assert!(config.num_cpu >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(
            r#"{
                "fileName": "out.png",
                "seed": -3,
                "width": 320,
                "height": 240,
                "cameraEye": [0, 1, 5],
                "traceDepth": 5
            }"#,
        )
        .unwrap();

        assert_eq!(config.file_name, "out.png");
        assert_eq!(config.seed, -3);
        assert_eq!((config.width, config.height), (320, 240));
        assert_eq!(config.camera_eye, [0.0, 1.0, 5.0]);
        assert_eq!(config.camera_center, [0.0, 0.0, -1.0]);
        assert_eq!(config.trace_depth, 5);
        assert_eq!(config.pixel_sample_size, 9);
        assert!(config.objects.is_empty());
        assert!(config.num_cpu >= 1);
    }

    #[test]
    fn test_background_desc() {
        let config = Config::from_json(
            r#"{"background":
                {"type": "gradient", "horizon": [1, 1, 1], "zenith": [0.5, 0.7, 1]}}"#,
        )
        .unwrap();
        assert_eq!(
            Background::from(config.background),
            Background::Gradient {
                horizon: Color::ONE,
                zenith: Color::new(0.5, 0.7, 1.0),
            }
        );

        assert_eq!(
            Background::from(BackgroundDesc::default()),
            Background::Solid(Color::ONE)
        );
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(Config::from_json("{ not json").is_err());
        assert!(Config::from_json(r#"{"width": "wide"}"#).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            Config {
                width: 0,
                ..Config::default()
            },
            Config {
                pixel_sample_size: 0,
                ..Config::default()
            },
            Config {
                intersect_sample_size: 0,
                ..Config::default()
            },
            Config {
                scene_bound_min: [1.0, 0.0, 0.0],
                scene_bound_max: [0.0, 1.0, 1.0],
                ..Config::default()
            },
            Config {
                camera_center: [0.0, 0.0, 0.0],
                ..Config::default()
            },
            Config {
                camera_up: [0.0, 0.0, -2.0],
                ..Config::default()
            },
            Config {
                field_of_view: 0.0,
                ..Config::default()
            },
        ];

        for config in &bad {
            assert!(config.validate().is_err(), "accepted {config:?}");
        }
    }

    #[test]
    fn test_render_settings_mapping() {
        let config = Config {
            seed: -1,
            num_cpu: 3,
            trace_depth: 0,
            ..Config::default()
        };
        let settings = config.render_settings();

        assert_eq!(settings.seed, u64::MAX);
        assert_eq!(settings.workers, 3);
        assert_eq!(settings.trace_depth, 0);
        assert_eq!(settings.background, Background::Solid(Color::ONE));
    }

    #[test]
    fn test_camera_uses_image_aspect() {
        let config = Config {
            width: 400,
            height: 200,
            ..Config::default()
        };
        let camera = config.camera().unwrap();
        assert!((camera.aspect_ratio() - 2.0).abs() < 1e-12);
        assert!((camera.norm_height() - 1.0).abs() < 1e-12);
    }
}
