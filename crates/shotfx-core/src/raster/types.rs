//! Core raster buffer types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// Error types for raster buffer operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    /// Pixel data length doesn't match the stated dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Too large for the vector rasterizer, which addresses pixels with u16.
    #[error("Image {width}x{height} exceeds the rasterizer limit of 65535x65535")]
    PixmapTooLarge { width: u32, height: u32 },
}

/// Filter type for scale-resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Physical resolution of a buffer in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            horizontal: 96.0,
            vertical: 96.0,
        }
    }
}

/// An RGBA pixel: `[r, g, b, a]`, straight (non-premultiplied) alpha.
pub type Rgba8 = [u8; 4];

/// Fully transparent black, the background of freshly allocated canvases.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// An owned grid of RGBA8 pixels.
///
/// Effects never mutate the buffer they are handed; every effect either
/// allocates a new buffer or clones the source before mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
    /// Physical resolution, carried through every effect.
    pub resolution: Resolution,
}

impl RasterBuffer {
    /// Create a buffer from raw RGBA data at the default resolution.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
            resolution: Resolution::default(),
        }
    }

    /// Create a buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8, resolution: Resolution) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            pixels,
            resolution,
        }
    }

    /// Replace the resolution.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Create a RasterBuffer from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage, resolution: Resolution) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
            resolution,
        }
    }

    /// Copy into an image::RgbaImage for use with `image::imageops`.
    pub fn to_rgba_image(&self) -> Result<image::RgbaImage, RasterError> {
        self.clone().into_rgba_image()
    }

    /// Convert into an image::RgbaImage without copying the pixels.
    pub fn into_rgba_image(self) -> Result<image::RgbaImage, RasterError> {
        let expected = self.width as usize * self.height as usize * CHANNELS;
        let actual = self.pixels.len();
        image::RgbaImage::from_raw(self.width, self.height, self.pixels)
            .ok_or(RasterError::BufferSizeMismatch { expected, actual })
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Read the pixel at `(x, y)`.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba8 {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Overwrite the pixel at `(x, y)`.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        let i = self.offset(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&color);
    }

    /// Number of bytes in one row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid buffer.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_buffer_creation() {
        let buf = RasterBuffer::new(100, 50, vec![0u8; 100 * 50 * 4]);

        assert_eq!(buf.width, 100);
        assert_eq!(buf.height, 50);
        assert_eq!(buf.pixel_count(), 5000);
        assert_eq!(buf.byte_size(), 20000);
        assert_eq!(buf.stride(), 400);
        assert!(!buf.is_empty());
        assert_eq!(buf.resolution, Resolution::default());
    }

    #[test]
    fn test_buffer_empty() {
        let buf = RasterBuffer::new(0, 0, vec![]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_filled_and_pixel_access() {
        let mut buf = RasterBuffer::filled(3, 2, [1, 2, 3, 4], Resolution::default());
        assert_eq!(buf.get_pixel(2, 1), [1, 2, 3, 4]);

        buf.put_pixel(1, 1, [9, 8, 7, 6]);
        assert_eq!(buf.get_pixel(1, 1), [9, 8, 7, 6]);
        assert_eq!(buf.get_pixel(0, 1), [1, 2, 3, 4]);
    }

    #[test]
    fn test_rgba_image_round_trip_keeps_resolution() {
        let res = Resolution {
            horizontal: 300.0,
            vertical: 150.0,
        };
        let buf = RasterBuffer::filled(4, 3, [10, 20, 30, 255], res);
        let img = buf.to_rgba_image().unwrap();
        assert_eq!(img.dimensions(), (4, 3));

        let back = RasterBuffer::from_rgba_image(img, buf.resolution);
        assert_eq!(back, buf);
    }

    #[test]
    fn test_raster_error_display() {
        let err = RasterError::InvalidDimensions {
            width: 0,
            height: 7,
        };
        assert_eq!(
            err.to_string(),
            "Invalid dimensions: width (0) and height (7) must be non-zero"
        );
    }
}
