use image::RgbaImage;

use crate::error::{Error, Result};
use crate::pixel;

/// Packed ARGB pixel buffer.
///
/// Pixels are stored row-major as one `u32` per pixel (`0xAARRGGBB`).
/// The dimensions are fixed at construction; transforms always produce a
/// fresh buffer of the same size instead of editing one in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Zero-filled (fully transparent black) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::InvalidImage(format!(
                "expected {expected} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Reject buffers the engine cannot process: zero width or height, or a
    /// pixel vector that does not match the dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.pixels.is_empty() {
            return Err(Error::InvalidImage(format!(
                "{}x{} buffer has no pixels",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize;
        if self.pixels.len() != expected {
            return Err(Error::InvalidImage(format!(
                "expected {expected} pixels for {}x{}, got {}",
                self.width,
                self.height,
                self.pixels.len()
            )));
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn row(&self, y: u32) -> &[u32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    /// BLAKE3 digest of the packed pixel words, hex encoded.
    ///
    /// Two buffers with the same dimensions and the same digest hold the same
    /// pixels, which lets reports show output equality without shipping images.
    pub fn digest(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        hasher.update(bytemuck::cast_slice(self.pixels.as_slice()));
        hasher.finalize().to_hex().to_string()
    }

    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let pixels = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                pixel::pack(a as u32, r as u32, g as u32, b as u32)
            })
            .collect();
        Self {
            width: img.width(),
            height: img.height(),
            pixels,
        }
    }

    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &p in &self.pixels {
            bytes.push(pixel::red(p) as u8);
            bytes.push(pixel::green(p) as u8);
            bytes.push(pixel::blue(p) as u8);
            bytes.push(pixel::alpha(p) as u8);
        }
        RgbaImage::from_raw(self.width, self.height, bytes).ok_or_else(|| {
            Error::InvalidImage(format!(
                "{} pixels do not fill {}x{}",
                self.pixels.len(),
                self.width,
                self.height
            ))
        })
    }
}
