//! Scene description: serde bindings for objects and materials, converted
//! explicitly into renderer types.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use phoebe_renderer::{
    Color, Dielectric, DiffuseLight, Geometry, Lambertian, Material, Metal, Plane, RenderResult,
    Scene, Sphere, Triangle, Vec3,
};

use crate::config::Config;

/// Surface material of an object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialDesc {
    Lambertian {
        albedo: [f64; 3],
    },
    Metal {
        albedo: [f64; 3],
        #[serde(default)]
        fuzz: f64,
    },
    Dielectric {
        ior: f64,
    },
    Light {
        emit: [f64; 3],
    },
}

impl MaterialDesc {
    /// Construct the material, validating its parameters.
    pub fn build(&self) -> RenderResult<Arc<dyn Material>> {
        let material: Arc<dyn Material> = match *self {
            MaterialDesc::Lambertian { albedo } => {
                Arc::new(Lambertian::new(Color::from_array(albedo))?)
            }
            MaterialDesc::Metal { albedo, fuzz } => {
                Arc::new(Metal::new(Color::from_array(albedo), fuzz)?)
            }
            MaterialDesc::Dielectric { ior } => Arc::new(Dielectric::new(ior)?),
            MaterialDesc::Light { emit } => {
                Arc::new(DiffuseLight::new(Color::from_array(emit))?)
            }
        };
        Ok(material)
    }
}

/// A single scene object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectDesc {
    Sphere {
        center: [f64; 3],
        radius: f64,
        material: MaterialDesc,
    },
    Plane {
        point: [f64; 3],
        normal: [f64; 3],
        material: MaterialDesc,
    },
    Triangle {
        vertices: [[f64; 3]; 3],
        material: MaterialDesc,
    },
}

impl ObjectDesc {
    /// Construct the geometry, validating its parameters.
    pub fn build(&self) -> RenderResult<Box<dyn Geometry>> {
        let geometry: Box<dyn Geometry> = match self {
            ObjectDesc::Sphere {
                center,
                radius,
                material,
            } => Box::new(Sphere::new(
                Vec3::from_array(*center),
                *radius,
                material.build()?,
            )?),
            ObjectDesc::Plane {
                point,
                normal,
                material,
            } => Box::new(Plane::new(
                Vec3::from_array(*point),
                Vec3::from_array(*normal),
                material.build()?,
            )?),
            ObjectDesc::Triangle { vertices, material } => {
                let [v0, v1, v2] = vertices.map(Vec3::from_array);
                Box::new(Triangle::new(v0, v1, v2, material.build()?)?)
            }
        };
        Ok(geometry)
    }
}

/// The classic scene: two diffuse spheres inside a box of five planes with
/// a red left wall and a green right wall.
pub fn cornell_box() -> Vec<ObjectDesc> {
    let diffuse = |r, g, b| MaterialDesc::Lambertian { albedo: [r, g, b] };
    let wall = |point, normal, material| ObjectDesc::Plane {
        point,
        normal,
        material,
    };

    vec![
        ObjectDesc::Sphere {
            center: [0.0, 0.0, -10.0],
            radius: 3.0,
            material: diffuse(0.1, 0.3, 0.7),
        },
        ObjectDesc::Sphere {
            center: [-2.0, -2.0, -7.0],
            radius: 1.0,
            material: diffuse(0.8, 0.4, 0.2),
        },
        // ceiling, back, floor
        wall([0.0, 10.0, -10.0], [0.0, -1.0, 0.0], diffuse(0.9, 0.9, 0.9)),
        wall([0.0, 0.0, -20.0], [0.0, 0.0, 1.0], diffuse(0.8, 0.8, 0.8)),
        wall([0.0, -10.0, -10.0], [0.0, 1.0, 0.0], diffuse(0.7, 0.7, 0.7)),
        // right, left
        wall([10.0, 0.0, -10.0], [-1.0, 0.0, 0.0], diffuse(0.0, 0.7, 0.0)),
        wall([-10.0, 0.0, -10.0], [1.0, 0.0, 0.0], diffuse(1.0, 0.0, 0.0)),
    ]
}

/// Build the scene described by the configuration.
///
/// Falls back to [`cornell_box`] when the configuration lists no objects.
pub fn build_scene(config: &Config) -> Result<Scene> {
    let mut scene = Scene::new(config.scene_bound()?);

    let builtin;
    let objects = if config.objects.is_empty() {
        builtin = cornell_box();
        &builtin
    } else {
        &config.objects
    };

    for (i, object) in objects.iter().enumerate() {
        let geometry = object
            .build()
            .with_context(|| format!("Invalid object #{i}"))?;
        scene.add_object(geometry);
    }

    log::debug!("Scene built with {} objects", scene.len());
    Ok(scene)
}
