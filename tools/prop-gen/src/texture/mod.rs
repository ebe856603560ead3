//! Procedural texture synthesis
//!
//! Signals are computed as floating-point [`Field`]s and quantized into
//! 8-bit [`TextureBuffer`]s at the end of each recipe.
//!
//! # Example
//! ```no_run
//! use prop_gen::texture::*;
//!
//! // Coarse block noise, blurred
//! let noise = block_noise(256, 256, 8, 42);
//!
//! // Emboss it into a tangent-space normal map
//! let normal = normal_map(&noise, 2.0);
//!
//! // Full material set
//! let wood = wood(256, 11);
//! write_png(&wood.base_color, std::path::Path::new("wood.png")).unwrap();
//! # let _ = normal;
//! ```

mod export;
mod field;
mod materials;
mod noise;
mod normal;

// Float plane
pub use field::Field;

// Noise generators
pub use noise::block_noise;

// Height to normal conversion
pub use normal::{normal_map, normal_vectors};

// Material recipes
pub use materials::{brass, felt, wood, MaterialTextures, Recipe};
pub(crate) use materials::{pack_metal_rough, rgb_texture};

// Export
pub use export::{encode_png, write_png};

pub use self::buffer::{PixelFormat, TextureBuffer};

mod buffer {
    /// Channel layout of a quantized texture
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum PixelFormat {
        /// One grayscale channel
        Luma,
        /// Three color channels
        Rgb,
    }

    impl PixelFormat {
        /// Bytes per pixel
        pub fn channels(self) -> usize {
            match self {
                PixelFormat::Luma => 1,
                PixelFormat::Rgb => 3,
            }
        }
    }

    /// 8-bit texture buffer, row-major, top row first
    #[derive(Clone, Debug)]
    pub struct TextureBuffer {
        /// Width in pixels
        pub width: u32,
        /// Height in pixels
        pub height: u32,
        /// Channel layout
        pub format: PixelFormat,
        /// Pixel data (`format.channels()` bytes per pixel)
        pub pixels: Vec<u8>,
    }

    impl TextureBuffer {
        /// Create a new texture buffer initialized to black
        pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
            Self {
                width,
                height,
                format,
                pixels: vec![0u8; width as usize * height as usize * format.channels()],
            }
        }

        #[inline]
        fn offset(&self, x: u32, y: u32) -> usize {
            (y as usize * self.width as usize + x as usize) * self.format.channels()
        }

        /// Get pixel at (x, y); grayscale pixels repeat their value in every slot
        #[inline]
        pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
            let idx = self.offset(x, y);
            match self.format {
                PixelFormat::Luma => [self.pixels[idx]; 3],
                PixelFormat::Rgb => [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]],
            }
        }

        /// Set pixel at (x, y); grayscale buffers take the first component
        #[inline]
        pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
            let idx = self.offset(x, y);
            match self.format {
                PixelFormat::Luma => self.pixels[idx] = color[0],
                PixelFormat::Rgb => self.pixels[idx..idx + 3].copy_from_slice(&color),
            }
        }

        /// True when both buffers have the same dimensions
        pub fn same_size(&self, other: &TextureBuffer) -> bool {
            self.width == other.width && self.height == other.height
        }
    }
}

/// Quantize a unit-range value to a byte (truncating, clamped)
#[inline]
pub(crate) fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_buffer_new() {
        let buf = TextureBuffer::new(64, 32, PixelFormat::Rgb);
        assert_eq!(buf.width, 64);
        assert_eq!(buf.height, 32);
        assert_eq!(buf.pixels.len(), 64 * 32 * 3);
        assert!(buf.pixels.iter().all(|&p| p == 0));

        let gray = TextureBuffer::new(8, 8, PixelFormat::Luma);
        assert_eq!(gray.pixels.len(), 64);
    }

    #[test]
    fn test_texture_buffer_set_get_pixel() {
        let mut buf = TextureBuffer::new(4, 4, PixelFormat::Rgb);
        buf.set_pixel(2, 3, [100, 150, 200]);
        assert_eq!(buf.get_pixel(2, 3), [100, 150, 200]);
        assert_eq!(buf.get_pixel(0, 0), [0, 0, 0]);

        let mut gray = TextureBuffer::new(4, 4, PixelFormat::Luma);
        gray.set_pixel(1, 1, [77, 0, 0]);
        assert_eq!(gray.get_pixel(1, 1), [77, 77, 77]);
    }

    #[test]
    fn test_to_byte_truncates_and_clamps() {
        assert_eq!(to_byte(1.0), 255);
        assert_eq!(to_byte(2.0), 255);
        assert_eq!(to_byte(-1.0), 0);
        assert_eq!(to_byte(0.5), 127);
    }
}
