//! Primary ray generation.

use crate::{RenderError, RenderResult};
use ember_core::Camera;
use ember_math::sampling::sample_square;
use ember_math::{Mat4, Ray, Vec3};
use rand::RngCore;

/// A [`Camera`] prepared for one image resolution.
///
/// The transform and field-of-view factor are computed once; `get_ray` only
/// does the per-sample work.
#[derive(Debug, Clone)]
pub struct ViewCamera {
    camera_to_world: Mat4,
    origin: Vec3,
    tan_half_fov: f32,
    aspect_ratio: f32,
    width: u32,
    height: u32,
}

impl ViewCamera {
    pub fn new(camera: &Camera, width: u32, height: u32) -> RenderResult<Self> {
        let camera_to_world = camera
            .camera_to_world()
            .ok_or(RenderError::DegenerateCamera)?;

        Ok(Self {
            camera_to_world,
            origin: camera_to_world.transform_point3(Vec3::ZERO),
            tan_half_fov: camera.tan_half_fov(),
            aspect_ratio: camera.aspect_ratio,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// World-space eye position.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Jittered ray through pixel (x, y). Row 0 is the top of the image.
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);
        self.ray_through(x as f32 + 0.5 + offset.x, y as f32 + 0.5 + offset.y)
    }

    /// Ray through a continuous raster position.
    fn ray_through(&self, raster_x: f32, raster_y: f32) -> Ray {
        let px = (2.0 * (raster_x / self.width as f32) - 1.0) * self.tan_half_fov * self.aspect_ratio;
        let py = (1.0 - 2.0 * (raster_y / self.height as f32)) * self.tan_half_fov;

        let point = self.camera_to_world.transform_point3(Vec3::new(px, py, -1.0));
        Ray::new(self.origin, (point - self.origin).normalize_or_zero())
    }
}
