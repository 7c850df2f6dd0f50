//! Ember Core - scene description for the Ember path tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Sphere`, `Model`, `Mesh`, `Material`, `Texture`, `Camera`
//! - **Loaders**: OBJ meshes (via `tobj`), image textures (via `image`) and
//!   JSON scene descriptions (via `serde_json`)
//!
//! Every index and parameter is validated while the scene is built, so the
//! renderer can trust what it is given.
//!
//! # Example
//!
//! ```ignore
//! use ember_core::SceneDescription;
//!
//! let scene = SceneDescription::load("scenes/demo.json")?;
//! println!("{} spheres, {} triangles", scene.spheres().len(), scene.triangle_count());
//! ```

pub mod camera;
pub mod description;
pub mod material;
pub mod mesh;
pub mod obj;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use camera::{Camera, CameraBasis};
pub use description::SceneDescription;
pub use material::{Color, Material};
pub use mesh::{Attribute, Face, Mesh, MeshError, MeshResult, TriangleVertices};
pub use obj::{load_obj, parse_obj};
pub use scene::{Model, RenderSettings, Scene, SceneBuilder, SceneError, SceneResult, Sphere};
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
