//! Ember Renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer over the scenes described by `ember_core`:
//! analytic spheres and triangle meshes, diffuse/specular blending,
//! emissive surfaces and a sky gradient.
//!
//! ```ignore
//! use ember_renderer::{RenderOptions, Renderer};
//!
//! let renderer = Renderer::new(&scene, RenderOptions::default())?;
//! renderer.render()?.save("out.ppm")?;
//! ```

mod bucket;
mod bvh;
mod camera;
mod hittable;
pub mod integrator;
mod output;
mod renderer;
pub mod shading;
mod sphere;
mod triangle;

pub use bucket::{
    bucket_seed, generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::BvhNode;
pub use camera::ViewCamera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use output::{quantize, ImageBuffer};
pub use renderer::{
    build_world, render, render_parallel, render_pixel, Accelerator, RenderError, RenderOptions,
    RenderResult, Renderer,
};
pub use sphere::Sphere;
pub use triangle::Triangle;

pub use ember_core::Color;
