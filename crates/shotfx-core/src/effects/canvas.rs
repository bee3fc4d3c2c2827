//! Canvas resize: pad or crop each side independently.

use kurbo::{Affine, Vec2};
use serde::{Deserialize, Serialize};

use super::{Effect, EffectError, EffectOutput};
use crate::raster::{overlay, RasterBuffer, Rgba8, TRANSPARENT};

/// Adds `left`/`right`/`top`/`bottom` pixels around the image.
///
/// Negative insets crop that side. The new area is filled with
/// `background`, or left transparent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeCanvasEffect {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
    pub background: Option<Rgba8>,
}

impl ResizeCanvasEffect {
    /// Output size for a `width x height` source, before validation.
    pub fn output_size(&self, width: u32, height: u32) -> (i64, i64) {
        (
            width as i64 + self.left as i64 + self.right as i64,
            height as i64 + self.top as i64 + self.bottom as i64,
        )
    }
}

impl Effect for ResizeCanvasEffect {
    fn apply(
        &self,
        source: &RasterBuffer,
        transform: &mut Affine,
    ) -> Result<EffectOutput, EffectError> {
        let (width, height) = self.output_size(source.width, source.height);
        if width <= 0 || height <= 0 || width > u32::MAX as i64 || height > u32::MAX as i64 {
            return Err(EffectError::InvalidDimensions { width, height });
        }

        let background = self.background.unwrap_or(TRANSPARENT);
        let mut canvas =
            RasterBuffer::filled(width as u32, height as u32, background, source.resolution);
        overlay(&mut canvas, source, self.left as i64, self.top as i64)?;

        *transform = transform.then_translate(Vec2::new(self.left as f64, self.top as f64));
        Ok(EffectOutput::Buffer(canvas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::{assert_affine_eq, gradient};

    fn insets(left: i32, right: i32, top: i32, bottom: i32) -> ResizeCanvasEffect {
        ResizeCanvasEffect {
            left,
            right,
            top,
            bottom,
            background: None,
        }
    }

    #[test]
    fn test_default_is_identity() {
        let src = gradient(12, 9);
        let mut transform = Affine::IDENTITY;
        let out = ResizeCanvasEffect::default()
            .apply(&src, &mut transform)
            .unwrap()
            .into_buffer()
            .unwrap();
        assert_eq!(out, src);
        assert_affine_eq(transform, Affine::IDENTITY);
    }

    #[test]
    fn test_padding_with_background() {
        let src = gradient(10, 8);
        let effect = ResizeCanvasEffect {
            background: Some([255, 255, 255, 255]),
            ..insets(3, 1, 2, 5)
        };
        let mut transform = Affine::IDENTITY;
        let out = effect.apply(&src, &mut transform).unwrap().into_buffer().unwrap();

        assert_eq!((out.width, out.height), (14, 15));
        assert_affine_eq(transform, Affine::translate((3.0, 2.0)));
        assert_eq!(out.get_pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(13, 14), [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(3, 2), src.get_pixel(0, 0));
        assert_eq!(out.get_pixel(12, 9), src.get_pixel(9, 7));
    }

    #[test]
    fn test_padding_is_transparent_without_background() {
        let src = gradient(4, 4);
        let out = insets(2, 2, 2, 2)
            .apply(&src, &mut Affine::IDENTITY)
            .unwrap()
            .into_buffer()
            .unwrap();
        assert_eq!(out.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(out.get_pixel(7, 7), TRANSPARENT);
    }

    #[test]
    fn test_negative_insets_crop() {
        let src = gradient(20, 10);
        let mut transform = Affine::IDENTITY;
        let out = insets(-5, -2, -1, 0)
            .apply(&src, &mut transform)
            .unwrap()
            .into_buffer()
            .unwrap();

        assert_eq!((out.width, out.height), (13, 9));
        assert_affine_eq(transform, Affine::translate((-5.0, -1.0)));
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(5, 1));
        assert_eq!(out.get_pixel(12, 8), src.get_pixel(17, 9));
    }

    #[test]
    fn test_cropping_everything_is_an_error() {
        let src = gradient(10, 10);
        assert_eq!(
            insets(-6, -4, 0, 0).apply(&src, &mut Affine::IDENTITY),
            Err(EffectError::InvalidDimensions {
                width: 0,
                height: 10
            })
        );
        assert_eq!(
            insets(0, 0, -20, 0).apply(&src, &mut Affine::IDENTITY),
            Err(EffectError::InvalidDimensions {
                width: 10,
                height: -10
            })
        );
    }
}
