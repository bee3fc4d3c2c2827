//! Color quantization.
//!
//! [`Quantizer`] is the seam the ReduceColors effect talks to. The default
//! implementation is [`MedianCutQuantizer`].

mod median_cut;

use std::collections::HashSet;

use thiserror::Error;

use crate::raster::{RasterBuffer, CHANNELS};

pub use median_cut::{MedianCutQuantizer, Palette};

/// Largest palette a quantizer will produce.
pub const MAX_PALETTE_SIZE: usize = 256;

/// Error types for quantization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantizeError {
    #[error("Unsupported palette size {0}: must be between 1 and 256")]
    UnsupportedPaletteSize(usize),

    #[error("Cannot quantize an empty image")]
    EmptyImage,
}

/// Reduces the number of distinct colors in a buffer.
pub trait Quantizer {
    /// Number of distinct RGBA colors in `buffer`.
    fn color_count(&self, buffer: &RasterBuffer) -> usize {
        count_colors(buffer)
    }

    /// Produce a copy of `buffer` using at most `max_colors` distinct colors.
    fn quantize(
        &self,
        buffer: &RasterBuffer,
        max_colors: usize,
    ) -> Result<RasterBuffer, QuantizeError>;
}

/// Count distinct RGBA colors.
pub fn count_colors(buffer: &RasterBuffer) -> usize {
    buffer
        .pixels
        .chunks_exact(CHANNELS)
        .map(|px| u32::from_le_bytes([px[0], px[1], px[2], px[3]]))
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_colors() {
        let mut buf = RasterBuffer::filled(4, 4, [10, 20, 30, 255], Default::default());
        assert_eq!(count_colors(&buf), 1);

        buf.put_pixel(1, 1, [10, 20, 30, 254]);
        buf.put_pixel(2, 2, [0, 0, 0, 0]);
        buf.put_pixel(3, 3, [0, 0, 0, 0]);
        assert_eq!(count_colors(&buf), 3);
    }

    #[test]
    fn test_count_colors_empty() {
        assert_eq!(count_colors(&RasterBuffer::new(0, 0, vec![])), 0);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            QuantizeError::UnsupportedPaletteSize(0).to_string(),
            "Unsupported palette size 0: must be between 1 and 256"
        );
    }
}
