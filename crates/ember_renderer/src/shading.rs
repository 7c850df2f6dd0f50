//! Surface and sky terms used by the integrator.

use ember_core::{Color, Material};
use ember_math::{lerp, Vec2, Vec3};

const HORIZON: Color = Color::ONE;
const ZENITH: Color = Color::new(0.5, 0.7, 1.0);

/// Sky gradient seen by rays that leave the scene.
///
/// White looking straight down, light blue looking straight up.
pub fn background(direction: Vec3) -> Color {
    let unit_direction = direction.normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    lerp(HORIZON, ZENITH, a)
}

/// Reflectance at a surface point: the texture when the material has one,
/// otherwise its albedo.
#[inline]
pub fn texture_color(uv: Vec2, material: &Material) -> Color {
    material.color_at(uv)
}

/// Light given off by a surface.
#[inline]
pub fn emitted(material: &Material) -> Color {
    material.emitted()
}
