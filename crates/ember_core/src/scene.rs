//! Scene container.
//!
//! A [`Scene`] is assembled once through [`SceneBuilder`], which validates
//! every piece, and is read-only afterwards so render workers can share it
//! without synchronisation.

use std::path::PathBuf;
use std::sync::Arc;

use ember_math::{Aabb, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;
use crate::material::{Color, Material};
use crate::mesh::{Mesh, MeshError};
use crate::texture::TextureError;

/// Errors raised while assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("failed to read scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("sphere {index} has non-positive radius {radius}")]
    InvalidSphere { index: usize, radius: f32 },

    #[error("camera basis is degenerate (position {position}, target {target}, up {up})")]
    DegenerateCamera {
        position: Vec3,
        target: Vec3,
        up: Vec3,
    },

    #[error("camera field of view must be in (0, 180) degrees, got {fov}")]
    InvalidFov { fov: f32 },

    #[error("unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("unknown texture '{0}'")]
    UnknownTexture(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Image size and sampling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    /// Number of bounces after the primary hit; a path visits at most
    /// `max_depth + 1` surfaces.
    pub max_depth: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            samples_per_pixel: 25,
            max_depth: 5,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> SceneResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidSettings(format!(
                "image size must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(SceneError::InvalidSettings(
                "samples per pixel must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `width / height`
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// An analytic sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub radius: f32,
    pub center: Vec3,
    pub material: Arc<Material>,
}

impl Sphere {
    pub fn new(radius: f32, center: Vec3, material: Arc<Material>) -> Self {
        Self {
            radius,
            center,
            material,
        }
    }
}

/// A mesh placed at `center` with one material on every face.
#[derive(Debug, Clone)]
pub struct Model {
    pub mesh: Arc<Mesh>,
    pub center: Vec3,
    pub material: Arc<Material>,
}

impl Model {
    pub fn new(mesh: Arc<Mesh>, center: Vec3, material: Arc<Material>) -> Self {
        Self {
            mesh,
            center,
            material,
        }
    }

    /// World-space bounds (mesh bounds moved by `center`).
    pub fn bounds(&self) -> Aabb {
        let local = self.mesh.bounds();
        let min = Vec3::new(local.x.min, local.y.min, local.z.min) + self.center;
        let max = Vec3::new(local.x.max, local.y.max, local.z.max) + self.center;
        Aabb::from_points(min, max)
    }
}

/// Everything a render needs. Immutable once built.
#[derive(Debug, Clone)]
pub struct Scene {
    camera: Camera,
    settings: RenderSettings,
    spheres: Vec<Sphere>,
    models: Vec<Model>,
    ambient: Color,
}

impl Scene {
    pub fn builder(camera: Camera, settings: RenderSettings) -> SceneBuilder {
        SceneBuilder::new(camera, settings)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Ambient light color. Carried with the scene and reported, but the
    /// integrator gathers light from emissive surfaces and the sky only.
    pub fn ambient(&self) -> Color {
        self.ambient
    }

    /// Total number of triangles across all models.
    pub fn triangle_count(&self) -> usize {
        self.models.iter().map(|m| m.mesh.triangle_count()).sum()
    }

    /// Number of primitives the intersector will test.
    pub fn primitive_count(&self) -> usize {
        self.spheres.len() + self.triangle_count()
    }
}

/// Collects scene contents and validates them in [`SceneBuilder::build`].
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    camera: Camera,
    settings: RenderSettings,
    spheres: Vec<Sphere>,
    models: Vec<Model>,
    ambient: Color,
}

impl SceneBuilder {
    pub fn new(camera: Camera, settings: RenderSettings) -> Self {
        Self {
            camera,
            settings,
            spheres: Vec::new(),
            models: Vec::new(),
            ambient: Color::splat(0.6),
        }
    }

    pub fn ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn sphere(mut self, sphere: Sphere) -> Self {
        self.spheres.push(sphere);
        self
    }

    pub fn model(mut self, model: Model) -> Self {
        self.models.push(model);
        self
    }

    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub fn add_model(&mut self, model: Model) {
        self.models.push(model);
    }

    /// Validate and freeze the scene.
    pub fn build(self) -> SceneResult<Scene> {
        self.settings.validate()?;

        if self.camera.basis().is_none() {
            return Err(SceneError::DegenerateCamera {
                position: self.camera.position,
                target: self.camera.target,
                up: self.camera.up,
            });
        }

        // tan(fov / 2) must be finite and positive
        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return Err(SceneError::InvalidFov {
                fov: self.camera.fov,
            });
        }

        if let Some((index, sphere)) = self
            .spheres
            .iter()
            .enumerate()
            .find(|(_, s)| s.radius.is_nan() || s.radius <= 0.0)
        {
            return Err(SceneError::InvalidSphere {
                index,
                radius: sphere.radius,
            });
        }

        Ok(Scene {
            camera: self.camera,
            settings: self.settings,
            spheres: self.spheres,
            models: self.models,
            ambient: self.ambient,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Face;
    use ember_math::Vec2;

    fn grey() -> Arc<Material> {
        Arc::new(Material::diffuse(Vec3::splat(0.5)))
    }

    fn triangle_mesh() -> Arc<Mesh> {
        Arc::new(
            Mesh::new(
                vec![
                    Vec3::new(-1.0, -1.0, 0.0),
                    Vec3::new(1.0, -1.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                ],
                vec![Vec3::Z],
                vec![Vec2::ZERO],
                vec![Face {
                    v: [0, 1, 2],
                    vt: [0, 0, 0],
                    vn: [0, 0, 0],
                }],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_build_scene() {
        let scene = Scene::builder(Camera::default(), RenderSettings::default())
            .sphere(Sphere::new(0.5, Vec3::new(0.0, 0.0, -5.0), grey()))
            .model(Model::new(triangle_mesh(), Vec3::new(0.0, 0.0, -3.0), grey()))
            .build()
            .unwrap();

        assert_eq!(scene.spheres().len(), 1);
        assert_eq!(scene.triangle_count(), 1);
        assert_eq!(scene.primitive_count(), 2);
        assert_eq!(scene.ambient(), Vec3::splat(0.6));
    }

    #[test]
    fn test_model_bounds_follow_center() {
        let model = Model::new(triangle_mesh(), Vec3::new(0.0, 0.0, -3.0), grey());
        let bounds = model.bounds();
        assert!((bounds.z.min + 3.0).abs() < 0.001);
        assert!((bounds.x.max - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_invalid_settings() {
        let settings = RenderSettings {
            width: 0,
            ..Default::default()
        };
        let err = Scene::builder(Camera::default(), settings).build().unwrap_err();
        assert!(matches!(err, SceneError::InvalidSettings(_)));

        let settings = RenderSettings {
            samples_per_pixel: 0,
            ..Default::default()
        };
        assert!(Scene::builder(Camera::default(), settings).build().is_err());
    }

    #[test]
    fn test_invalid_sphere_radius() {
        let err = Scene::builder(Camera::default(), RenderSettings::default())
            .sphere(Sphere::new(1.0, Vec3::ZERO, grey()))
            .sphere(Sphere::new(0.0, Vec3::ZERO, grey()))
            .build()
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidSphere { index: 1, .. }));
    }

    #[test]
    fn test_degenerate_camera_rejected() {
        let camera = Camera {
            up: Vec3::NEG_Z,
            ..Default::default()
        };
        let err = Scene::builder(camera, RenderSettings::default())
            .build()
            .unwrap_err();
        assert!(matches!(err, SceneError::DegenerateCamera { .. }));
    }

    #[test]
    fn test_out_of_range_fov_rejected() {
        for fov in [0.0, -10.0, 180.0, 270.0, f32::NAN] {
            let camera = Camera {
                fov,
                ..Default::default()
            };
            let err = Scene::builder(camera, RenderSettings::default())
                .build()
                .unwrap_err();
            assert!(matches!(err, SceneError::InvalidFov { .. }), "fov {fov}");
        }

        let camera = Camera {
            fov: 179.0,
            ..Default::default()
        };
        assert!(Scene::builder(camera, RenderSettings::default()).build().is_ok());
    }

    #[test]
    fn test_scene_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scene>();
    }
}
