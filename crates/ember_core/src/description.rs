//! JSON scene descriptions.
//!
//! ```json
//! {
//!   "camera": { "fov": 60, "position": [0, 0, 0], "target": [0, 0, -1] },
//!   "settings": { "width": 320, "height": 240, "samples_per_pixel": 25, "max_depth": 5 },
//!   "ambient": [0.6, 0.6, 0.6],
//!   "textures": { "checker": "checker.ppm" },
//!   "materials": {
//!     "green": { "albedo": [0, 1, 0], "specular": 0.5 },
//!     "light": { "emission_color": [1, 1, 1], "emission_strength": 2 }
//!   },
//!   "spheres": [ { "radius": 0.5, "center": [0, 0, -5], "material": "green" } ],
//!   "models": [ { "mesh": "bunny.obj", "center": [0.5, 0, -5], "material": "green" } ]
//! }
//! ```
//!
//! Relative texture and mesh paths resolve against the directory holding
//! the scene file. When the camera omits `aspect_ratio` it is derived from
//! the image size.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ember_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::material::{Color, Material};
use crate::mesh::Mesh;
use crate::obj::load_obj;
use crate::scene::{Model, RenderSettings, Scene, SceneError, SceneResult, Sphere};
use crate::texture::TextureCache;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub fov: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub near: f32,
    pub far: f32,
    pub aspect_ratio: Option<f32>,
}

impl Default for CameraDescription {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            fov: camera.fov,
            position: camera.position,
            target: camera.target,
            up: camera.up,
            near: camera.near,
            far: camera.far,
            aspect_ratio: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDescription {
    pub albedo: Color,
    pub emission_color: Color,
    pub emission_strength: f32,
    pub specular: f32,
    /// Name of an entry in the scene's `textures` table
    pub texture: Option<String>,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        Self {
            albedo: Color::ONE,
            emission_color: Color::ZERO,
            emission_strength: 0.0,
            specular: 0.0,
            texture: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub radius: f32,
    pub center: Vec3,
    pub material: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    pub mesh: PathBuf,
    #[serde(default)]
    pub center: Vec3,
    pub material: String,
}

/// Serialized form of a [`Scene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    pub settings: RenderSettings,
    pub ambient: Color,
    pub textures: BTreeMap<String, PathBuf>,
    pub materials: BTreeMap<String, MaterialDescription>,
    pub spheres: Vec<SphereDescription>,
    pub models: Vec<ModelDescription>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            camera: CameraDescription::default(),
            settings: RenderSettings::default(),
            ambient: Color::splat(0.6),
            textures: BTreeMap::new(),
            materials: BTreeMap::new(),
            spheres: Vec::new(),
            models: Vec::new(),
        }
    }
}

impl SceneDescription {
    /// Read a description from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SceneError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load every referenced asset and build the scene. Relative asset
    /// paths resolve against `base_dir`.
    pub fn build(&self, base_dir: impl AsRef<Path>) -> SceneResult<Scene> {
        let base_dir = base_dir.as_ref();

        let mut textures = TextureCache::with_base_dir(base_dir);
        let mut materials = HashMap::new();
        for (name, desc) in &self.materials {
            let texture = match &desc.texture {
                Some(texture_name) => {
                    let path = self
                        .textures
                        .get(texture_name)
                        .ok_or_else(|| SceneError::UnknownTexture(texture_name.clone()))?;
                    Some(textures.load(path)?)
                }
                None => None,
            };
            let material = Material::new(
                desc.albedo,
                desc.emission_color,
                desc.emission_strength,
                desc.specular,
                texture,
            );
            materials.insert(name.as_str(), Arc::new(material));
        }

        let material = |name: &str| {
            materials
                .get(name)
                .cloned()
                .ok_or_else(|| SceneError::UnknownMaterial(name.to_string()))
        };

        let mut builder = Scene::builder(self.camera(), self.settings).ambient(self.ambient);

        for sphere in &self.spheres {
            builder.add_sphere(Sphere::new(
                sphere.radius,
                sphere.center,
                material(&sphere.material)?,
            ));
        }

        let mut meshes: HashMap<PathBuf, Arc<Mesh>> = HashMap::new();
        for model in &self.models {
            let path = base_dir.join(&model.mesh);
            let mesh = match meshes.get(&path) {
                Some(mesh) => mesh.clone(),
                None => {
                    let mesh = Arc::new(load_obj(&path)?);
                    meshes.insert(path, mesh.clone());
                    mesh
                }
            };
            builder.add_model(Model::new(mesh, model.center, material(&model.material)?));
        }

        log::debug!(
            "Scene description resolved: {} materials, {} textures, {} meshes",
            materials.len(),
            textures.len(),
            meshes.len()
        );

        builder.build()
    }

    /// Read and build a scene file in one step.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Scene> {
        let path = path.as_ref();
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_path(path)?.build(base_dir)
    }

    fn camera(&self) -> Camera {
        let desc = &self.camera;
        Camera {
            fov: desc.fov,
            position: desc.position,
            target: desc.target,
            up: desc.up,
            near: desc.near,
            far: desc.far,
            aspect_ratio: desc
                .aspect_ratio
                .unwrap_or_else(|| self.settings.aspect_ratio()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE_JSON: &str = r#"{
        "camera": { "fov": 90, "position": [0, 0, 0], "target": [0, 0, -1] },
        "settings": { "width": 40, "height": 20, "samples_per_pixel": 2, "max_depth": 3 },
        "materials": {
            "green": { "albedo": [0, 1, 0], "specular": 0.5 },
            "light": { "albedo": [0, 0, 0], "emission_color": [1, 1, 1], "emission_strength": 2 }
        },
        "spheres": [
            { "radius": 0.5, "center": [0, 0, -5], "material": "green" },
            { "radius": 10, "center": [7.5, 2.5, -25], "material": "light" }
        ]
    }"#;

    #[test]
    fn test_parse_and_build() {
        let desc: SceneDescription = serde_json::from_str(SCENE_JSON).unwrap();
        let scene = desc.build(".").unwrap();

        assert_eq!(scene.settings().width, 40);
        assert_eq!(scene.spheres().len(), 2);
        assert_eq!(scene.ambient(), Vec3::splat(0.6));
        // Aspect ratio falls back to width / height
        assert!((scene.camera().aspect_ratio - 2.0).abs() < 1e-6);
        assert_eq!(scene.spheres()[1].material.emitted(), Vec3::splat(2.0));
        assert_eq!(scene.spheres()[0].material.specular, 0.5);
    }

    #[test]
    fn test_unknown_material() {
        let desc = SceneDescription {
            spheres: vec![SphereDescription {
                radius: 1.0,
                center: Vec3::ZERO,
                material: "missing".to_string(),
            }],
            ..Default::default()
        };
        let err = desc.build(".").unwrap_err();
        assert!(matches!(err, SceneError::UnknownMaterial(name) if name == "missing"));
    }

    #[test]
    fn test_unknown_texture() {
        let mut desc = SceneDescription::default();
        desc.materials.insert(
            "tex".to_string(),
            MaterialDescription {
                texture: Some("nope".to_string()),
                ..Default::default()
            },
        );
        let err = desc.build(".").unwrap_err();
        assert!(matches!(err, SceneError::UnknownTexture(_)));
    }

    #[test]
    fn test_load_from_disk_with_relative_assets() {
        let dir = std::env::temp_dir().join("ember_description_test");
        std::fs::create_dir_all(&dir).unwrap();

        std::fs::write(
            dir.join("tri.obj"),
            "v -1 -1 0\nv 1 -1 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n",
        )
        .unwrap();
        let mut ppm = b"P6\n1 1\n255\n".to_vec();
        ppm.extend_from_slice(&[0, 0, 255]);
        std::fs::write(dir.join("blue.ppm"), ppm).unwrap();

        let json = r#"{
            "textures": { "blue": "blue.ppm" },
            "materials": { "tex": { "texture": "blue" } },
            "models": [
                { "mesh": "tri.obj", "center": [0, 0, -3], "material": "tex" },
                { "mesh": "tri.obj", "center": [0, 0, -4], "material": "tex" }
            ]
        }"#;
        std::fs::write(dir.join("scene.json"), json).unwrap();

        let scene = SceneDescription::load(dir.join("scene.json")).unwrap();
        assert_eq!(scene.models().len(), 2);
        assert!(Arc::ptr_eq(&scene.models()[0].mesh, &scene.models()[1].mesh));
        assert_eq!(scene.triangle_count(), 2);

        let texture = scene.models()[0].material.texture.as_ref().unwrap();
        assert_eq!(texture.width(), 1);
    }

    #[test]
    fn test_missing_scene_file() {
        let err = SceneDescription::from_path("no/such/scene.json").unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
        assert!(err.to_string().contains("no/such/scene.json"));
    }

    #[test]
    fn test_malformed_json() {
        let dir = std::env::temp_dir().join("ember_description_bad_json");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("bad.json"), "{ \"spheres\": 3 }").unwrap();

        let err = SceneDescription::from_path(dir.join("bad.json")).unwrap_err();
        assert!(matches!(err, SceneError::Parse { .. }));
    }
}
