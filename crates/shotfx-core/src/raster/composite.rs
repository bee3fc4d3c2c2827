//! Source-over compositing of one buffer onto another.

use image::{ImageBuffer, Rgba};

use super::{RasterBuffer, RasterError};

/// Draw `top` over `bottom` with its top-left corner at `(x, y)`.
///
/// Offsets may be negative; whatever falls outside `bottom` is clipped.
/// Blending is straight-alpha source-over, as done by `image::imageops::overlay`.
pub fn overlay(
    bottom: &mut RasterBuffer,
    top: &RasterBuffer,
    x: i64,
    y: i64,
) -> Result<(), RasterError> {
    let expected = top.width as usize * top.height as usize * 4;
    let view: ImageBuffer<Rgba<u8>, &[u8]> =
        ImageBuffer::from_raw(top.width, top.height, top.pixels.as_slice()).ok_or(
            RasterError::BufferSizeMismatch {
                expected,
                actual: top.pixels.len(),
            },
        )?;

    let target = RasterBuffer {
        pixels: std::mem::take(&mut bottom.pixels),
        ..*bottom
    };
    let mut canvas = target.into_rgba_image()?;
    image::imageops::overlay(&mut canvas, &view, x, y);
    bottom.pixels = canvas.into_raw();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Resolution, TRANSPARENT};

    #[test]
    fn test_overlay_opaque_replaces() {
        let mut bottom = RasterBuffer::filled(4, 4, TRANSPARENT, Resolution::default());
        let top = RasterBuffer::filled(2, 2, [10, 20, 30, 255], Resolution::default());

        overlay(&mut bottom, &top, 1, 1).unwrap();

        assert_eq!(bottom.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(bottom.get_pixel(1, 1), [10, 20, 30, 255]);
        assert_eq!(bottom.get_pixel(2, 2), [10, 20, 30, 255]);
        assert_eq!(bottom.get_pixel(3, 3), TRANSPARENT);
    }

    #[test]
    fn test_overlay_negative_offset_clips() {
        let mut bottom = RasterBuffer::filled(3, 3, [0, 0, 0, 255], Resolution::default());
        let top = RasterBuffer::filled(3, 3, [255, 255, 255, 255], Resolution::default());

        overlay(&mut bottom, &top, -2, -2).unwrap();

        assert_eq!(bottom.get_pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(bottom.get_pixel(1, 0), [0, 0, 0, 255]);
        assert_eq!(bottom.get_pixel(0, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_overlay_transparent_top_keeps_bottom() {
        let mut bottom = RasterBuffer::filled(2, 2, [5, 6, 7, 255], Resolution::default());
        let top = RasterBuffer::filled(2, 2, TRANSPARENT, Resolution::default());
        let before = bottom.clone();

        overlay(&mut bottom, &top, 0, 0).unwrap();

        assert_eq!(bottom, before);
    }
}
