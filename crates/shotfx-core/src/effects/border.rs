//! Solid border around the image.

use kurbo::{Affine, Vec2};
use serde::{Deserialize, Serialize};
use vello_cpu::kurbo::{Join, Rect, Stroke};
use vello_cpu::peniko::Color;

use super::{grown_size, Effect, EffectError, EffectOutput};
use crate::raster::{overlay, paint, RasterBuffer, Rgba8, TRANSPARENT};

/// Grows the canvas by `width` on every side and strokes the new band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderEffect {
    /// Stroke color, RGBA.
    pub color: Rgba8,
    /// Band width in pixels.
    pub width: u32,
}

impl Default for BorderEffect {
    fn default() -> Self {
        Self {
            color: [0, 0, 0, 255],
            width: 2,
        }
    }
}

impl Effect for BorderEffect {
    fn apply(
        &self,
        source: &RasterBuffer,
        transform: &mut Affine,
    ) -> Result<EffectOutput, EffectError> {
        let band = self.width;
        let (width, height) = grown_size(source, band)?;
        *transform = transform.then_translate(Vec2::new(band as f64, band as f64));

        let mut canvas = if band > 0 {
            // Stroke centered on the band: inset by half the width.
            let inset = (band >> 1) as f64;
            let outline = Rect::new(
                inset,
                inset,
                inset + (width - band) as f64,
                inset + (height - band) as f64,
            );
            let [r, g, b, a] = self.color;
            paint::render(width, height, source.resolution, |ctx| {
                ctx.set_stroke(Stroke::new(band as f64).with_join(Join::Round));
                ctx.set_paint(Color::from_rgba8(r, g, b, a));
                ctx.stroke_rect(&outline);
            })?
        } else {
            RasterBuffer::filled(width, height, TRANSPARENT, source.resolution)
        };

        overlay(&mut canvas, source, band as i64, band as i64)?;
        Ok(EffectOutput::Buffer(canvas))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: output grows by twice the band width on both axes.
        #[test]
        fn prop_border_dimension_law(
            (width, height) in (1u32..=40, 1u32..=40),
            band in 0u32..=12,
        ) {
            let src = RasterBuffer::filled(width, height, [1, 2, 3, 255], Default::default());
            let mut transform = Affine::IDENTITY;
            let out = BorderEffect { color: [0, 0, 0, 255], width: band }
                .apply(&src, &mut transform)
                .unwrap()
                .into_buffer()
                .unwrap();

            prop_assert_eq!(out.width, width + 2 * band);
            prop_assert_eq!(out.height, height + 2 * band);
            prop_assert_eq!(transform.translation(), Vec2::new(band as f64, band as f64));
        }
    }
}
