//! Scale resizing.
//!
//! Provides the resampling primitive used by the resize effect, backed by the
//! `image` crate's filters. Always returns a new buffer.

use super::{FilterType, RasterBuffer, RasterError};

/// Resize a buffer to exact dimensions.
///
/// # Arguments
///
/// * `buffer` - The source buffer
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
/// * `filter` - Interpolation filter to use
///
/// # Errors
///
/// Returns `RasterError::InvalidDimensions` for a zero target dimension.
pub fn resize(
    buffer: &RasterBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RasterBuffer, RasterError> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if buffer.width == width && buffer.height == height {
        return Ok(buffer.clone());
    }

    let rgba = buffer.to_rgba_image()?;
    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    Ok(RasterBuffer::from_rgba_image(resized, buffer.resolution))
}
