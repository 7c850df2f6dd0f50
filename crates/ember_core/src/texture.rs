//! Textures and the texture cache.
//!
//! Textures are stored exactly as loaded: a row-major grid of 8-bit RGB
//! pixels. No color space conversion is applied; channels are divided by
//! 255 at lookup time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ember_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors that can occur during texture creation or loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("texture is {width}x{height} but has {actual} pixels")]
    PixelCountMismatch { width: u32, height: u32, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A read-only 8-bit RGB texture.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Texture {
    /// Create a texture from row-major pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyDimensions { width, height });
        }
        if pixels.len() != width as usize * height as usize {
            return Err(TextureError::PixelCountMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A 1x1 texture of a single color.
    pub fn solid_color(rgb: [u8; 3]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![rgb],
        }
    }

    /// Load any image format the `image` crate understands (PPM included).
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| p.0).collect();

        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-pixel lookup.
    ///
    /// `uv` maps to pixel `(floor(width * u), floor(height * v))` with row 0
    /// at the top. A coordinate landing exactly on the far edge snaps back
    /// onto the last pixel, and anything outside the texture is clamped to
    /// the border.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let x = Self::texel_index(uv.x, self.width);
        let y = Self::texel_index(uv.y, self.height);
        let [r, g, b] = self.pixels[y * self.width as usize + x];

        Vec3::new(r as f32, g as f32, b as f32) / 255.0
    }

    fn texel_index(coord: f32, dim: u32) -> usize {
        // Float to int casts saturate, NaN becomes 0
        let mut pos = (dim as f32 * coord).floor() as i64;
        if pos == dim as i64 {
            pos -= 1;
        }
        pos.clamp(0, dim as i64 - 1) as usize
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[u8; 3]>()
    }
}

/// Cache for loaded textures.
///
/// Several materials may reference the same file; it is loaded once and
/// shared through an `Arc`.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<PathBuf, Arc<Texture>>,
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: impl AsRef<Path>) -> TextureResult<Arc<Texture>> {
        let full_path = self.resolve_path(path.as_ref());

        if let Some(texture) = self.textures.get(&full_path) {
            return Ok(texture.clone());
        }

        let texture = Arc::new(Texture::load(&full_path)?);
        self.textures.insert(full_path.clone(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            full_path.display(),
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
