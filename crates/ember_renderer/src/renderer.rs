//! Core path tracing renderer.
//!
//! Two drivers share [`render_pixel`]:
//! - [`render`]: one random stream walked in scanline order
//! - [`render_parallel`]: spiral-ordered buckets on the rayon pool, one
//!   stream per bucket, identical output for any thread count

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::integrator::trace;
use crate::{BvhNode, Hittable, HittableList, ImageBuffer, Sphere, Triangle, ViewCamera};
use ember_core::{Color, RenderSettings, Scene};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render cancelled")]
    Cancelled,

    #[error("camera has no valid orientation")]
    DegenerateCamera,

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// How the world is organised for intersection queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accelerator {
    /// Bounding volume hierarchy.
    #[default]
    Bvh,
    /// Every primitive tested for every ray.
    List,
}

/// Renderer knobs that are not part of the scene.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Seed for every random stream of the render
    pub seed: u64,
    /// Worker threads; `None` uses the global rayon pool
    pub threads: Option<usize>,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    pub accelerator: Accelerator,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            threads: None,
            bucket_size: DEFAULT_BUCKET_SIZE,
            accelerator: Accelerator::Bvh,
        }
    }
}

/// Turn the scene's spheres and model faces into renderable primitives.
pub fn build_world(scene: &Scene, accelerator: Accelerator) -> Box<dyn Hittable> {
    let mut objects: Vec<Box<dyn Hittable>> = Vec::with_capacity(scene.primitive_count());

    for sphere in scene.spheres() {
        objects.push(Box::new(Sphere::from(sphere)));
    }
    for model in scene.models() {
        for tri in model.mesh.triangles(model.center) {
            objects.push(Box::new(Triangle::from_mesh(tri, model.material.clone())));
        }
    }

    log::debug!("Built world with {} primitives ({:?})", objects.len(), accelerator);

    match accelerator {
        Accelerator::Bvh => Box::new(BvhNode::new(objects)),
        Accelerator::List => Box::new(HittableList::from(objects)),
    }
}

/// Average of `samples_per_pixel` jittered paths through pixel (x, y).
pub fn render_pixel(
    camera: &ViewCamera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..settings.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += trace(&ray, world, settings.max_depth, rng);
    }

    pixel_color / settings.samples_per_pixel.max(1) as f32
}

/// Render the whole image on the calling thread from a single random stream.
pub fn render(
    world: &dyn Hittable,
    camera: &ViewCamera,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(settings.width, settings.height);

    for y in 0..settings.height {
        for x in 0..settings.width {
            let color = render_pixel(camera, world, x, y, settings, rng);
            image.set_color(x, y, color);
        }
    }

    image
}

/// Render buckets in parallel on the current rayon pool.
///
/// `cancel` is checked before each bucket starts. `progress` receives
/// (finished buckets, total buckets) after every bucket and may be called
/// from any worker.
pub fn render_parallel(
    world: &dyn Hittable,
    camera: &ViewCamera,
    settings: &RenderSettings,
    options: &RenderOptions,
    cancel: &AtomicBool,
    progress: &(dyn Fn(usize, usize) + Sync),
) -> RenderResult<ImageBuffer> {
    let buckets = generate_buckets(settings.width, settings.height, options.bucket_size);
    let total = buckets.len();
    let finished = AtomicUsize::new(0);

    log::debug!(
        "Rendering {} buckets of {}px on {} threads",
        total,
        options.bucket_size,
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            if cancel.load(Ordering::Relaxed) {
                return Err(RenderError::Cancelled);
            }
            let result = render_bucket(bucket, camera, world, settings, options.seed);
            log::debug!(
                "Bucket {} at ({}, {}) done",
                bucket.index,
                bucket.x,
                bucket.y
            );
            progress(finished.fetch_add(1, Ordering::Relaxed) + 1, total);
            Ok(result)
        })
        .collect::<RenderResult<_>>()?;

    let mut image = ImageBuffer::new(settings.width, settings.height);
    for result in &results {
        let b = &result.bucket;
        image.blit(b.x, b.y, b.width, &result.pixels);
    }

    Ok(image)
}

/// A scene made ready to render: primitives built, camera prepared.
pub struct Renderer {
    world: Box<dyn Hittable>,
    camera: ViewCamera,
    settings: RenderSettings,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(scene: &Scene, options: RenderOptions) -> RenderResult<Self> {
        let settings = *scene.settings();
        let camera = ViewCamera::new(scene.camera(), settings.width, settings.height)?;
        let world = build_world(scene, options.accelerator);

        Ok(Self {
            world,
            camera,
            settings,
            options,
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn world(&self) -> &dyn Hittable {
        self.world.as_ref()
    }

    /// Render with every bucket, no progress reporting.
    pub fn render(&self) -> RenderResult<ImageBuffer> {
        self.render_with(&AtomicBool::new(false), &|_, _| {})
    }

    /// Parallel render, on a dedicated pool when `threads` is set.
    pub fn render_with(
        &self,
        cancel: &AtomicBool,
        progress: &(dyn Fn(usize, usize) + Sync),
    ) -> RenderResult<ImageBuffer> {
        log::info!(
            "Rendering {}x{} at {} spp, depth {}",
            self.settings.width,
            self.settings.height,
            self.settings.samples_per_pixel,
            self.settings.max_depth
        );

        let run = || {
            render_parallel(
                self.world.as_ref(),
                &self.camera,
                &self.settings,
                &self.options,
                cancel,
                progress,
            )
        };

        match self.options.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
                pool.install(run)
            }
            None => run(),
        }
    }

    /// Single-threaded render from one random stream seeded with `seed`.
    pub fn render_sequential(&self) -> ImageBuffer {
        let mut rng = StdRng::seed_from_u64(self.options.seed);
        render(self.world.as_ref(), &self.camera, &self.settings, &mut rng)
    }
}
