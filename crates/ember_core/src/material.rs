//! Surface materials.

use std::sync::Arc;

use ember_math::{Vec2, Vec3};

use crate::texture::Texture;

/// Color type alias (linear RGB, nominally 0-1)
pub type Color = Vec3;

/// Surface description shared by every primitive type.
///
/// `specular` blends the bounce direction from diffuse (0) to a perfect
/// mirror (1). Emission is `emission_color * emission_strength`.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub albedo: Color,
    pub emission_color: Color,
    pub emission_strength: f32,
    pub specular: f32,
    pub texture: Option<Arc<Texture>>,
}

impl Material {
    /// Black, non-emissive, fully diffuse and untextured.
    pub const BLACK: Material = Material {
        albedo: Vec3::ZERO,
        emission_color: Vec3::ZERO,
        emission_strength: 0.0,
        specular: 0.0,
        texture: None,
    };

    /// Create a material. `specular` is clamped to `[0, 1]` and a negative
    /// emission strength to zero.
    pub fn new(
        albedo: Color,
        emission_color: Color,
        emission_strength: f32,
        specular: f32,
        texture: Option<Arc<Texture>>,
    ) -> Self {
        Self {
            albedo,
            emission_color,
            emission_strength: emission_strength.max(0.0),
            specular: specular.clamp(0.0, 1.0),
            texture,
        }
    }

    /// Plain diffuse material: no emission, no specular, no texture.
    pub fn diffuse(albedo: Color) -> Self {
        Self {
            albedo,
            ..Self::BLACK
        }
    }

    /// A light source that absorbs everything it does not emit.
    pub fn emissive(color: Color, strength: f32) -> Self {
        Self::new(Vec3::ZERO, color, strength, 0.0, None)
    }

    pub fn with_specular(mut self, specular: f32) -> Self {
        self.specular = specular.clamp(0.0, 1.0);
        self
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Light emitted by the surface.
    #[inline]
    pub fn emitted(&self) -> Color {
        self.emission_color * self.emission_strength
    }

    /// Surface color at `uv`: the texture when one is bound, otherwise the
    /// albedo.
    #[inline]
    pub fn color_at(&self, uv: Vec2) -> Color {
        match &self.texture {
            Some(texture) => texture.sample(uv),
            None => self.albedo,
        }
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emission_strength > 0.0 && self.emission_color.length_squared() > 0.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::BLACK
    }
}
