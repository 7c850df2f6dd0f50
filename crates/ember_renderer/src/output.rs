//! Render output buffer and image writers.

use crate::{RenderError, RenderResult};
use ember_core::Color;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Row-major 8-bit RGB image. Row 0 is the top of the picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 3],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.offset(x, y);
        self.pixels[i..i + 3].copy_from_slice(&rgb);
    }

    /// Quantize and store a linear color at (x, y).
    pub fn set_color(&mut self, x: u32, y: u32, color: Color) {
        self.set(x, y, quantize(color));
    }

    /// Copy a row-major block of colors into the image at (x0, y0).
    pub fn blit(&mut self, x0: u32, y0: u32, width: u32, colors: &[Color]) {
        for (i, color) in colors.iter().enumerate() {
            let x = x0 + i as u32 % width;
            let y = y0 + i as u32 / width;
            self.set_color(x, y, *color);
        }
    }

    /// Raw RGB bytes, `width * height * 3` of them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Write as binary PPM (P6).
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        writer.write_all(&self.pixels)?;
        writer.flush()
    }

    /// Save to `path`. `.ppm` (or no extension) is written as P6 directly;
    /// anything else goes through the `image` crate.
    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .map_or(true, |ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let io_err = |source| RenderError::Io {
                path: path.to_path_buf(),
                source,
            };
            let file = File::create(path).map_err(io_err)?;
            self.write_ppm(BufWriter::new(file)).map_err(io_err)?;
        } else {
            ::image::save_buffer(
                path,
                &self.pixels,
                self.width,
                self.height,
                ::image::ColorType::Rgb8,
            )?;
        }

        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Map a linear color to 8 bits per channel: clamp to [0, 1], then
/// `floor(255.999 * c)`.
pub fn quantize(color: Color) -> [u8; 3] {
    let channel = |c: f32| (255.999 * c.clamp(0.0, 1.0)) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}
