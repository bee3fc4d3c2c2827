//! Scale resize effect.

use kurbo::Affine;
use serde::{Deserialize, Serialize};

use super::{Effect, EffectError, EffectOutput};
use crate::raster::{resize, FilterType, RasterBuffer};

/// Scale the image towards a target box.
///
/// A zero target axis is unconstrained: with `maintain_aspect_ratio` it is
/// derived from the other axis, otherwise that axis keeps its size. When
/// both axes are zero there is nothing to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeEffect {
    pub width: u32,
    pub height: u32,
    pub maintain_aspect_ratio: bool,
    pub filter: FilterType,
}

impl Default for ResizeEffect {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            maintain_aspect_ratio: true,
            filter: FilterType::Bilinear,
        }
    }
}

impl ResizeEffect {
    /// Horizontal and vertical scale factors for a `width x height` source.
    ///
    /// Returns `None` when neither axis is constrained.
    pub fn scale_factors(&self, width: u32, height: u32) -> Option<(f64, f64)> {
        if self.width == 0 && self.height == 0 {
            return None;
        }
        let sx = self.width as f64 / width as f64;
        let sy = self.height as f64 / height as f64;

        if self.maintain_aspect_ratio {
            let scale = match (self.width, self.height) {
                (0, _) => sy,
                (_, 0) => sx,
                _ => sx.min(sy),
            };
            Some((scale, scale))
        } else {
            Some((
                if self.width == 0 { 1.0 } else { sx },
                if self.height == 0 { 1.0 } else { sy },
            ))
        }
    }
}

impl Effect for ResizeEffect {
    fn apply(
        &self,
        source: &RasterBuffer,
        transform: &mut Affine,
    ) -> Result<EffectOutput, EffectError> {
        let Some((sx, sy)) = self.scale_factors(source.width, source.height) else {
            return Ok(EffectOutput::Unchanged);
        };

        // Truncate, but never below one pixel
        let width = ((source.width as f64 * sx) as u32).max(1);
        let height = ((source.height as f64 * sy) as u32).max(1);

        let output = resize(source, width, height, self.filter)?;
        *transform = transform.then_scale_non_uniform(sx, sy);
        Ok(EffectOutput::Buffer(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::{assert_affine_eq, gradient};

    fn run(effect: ResizeEffect, src: &RasterBuffer) -> (RasterBuffer, Affine) {
        let mut transform = Affine::IDENTITY;
        let out = effect.apply(src, &mut transform).unwrap().into_buffer().unwrap();
        (out, transform)
    }

    fn target(width: u32, height: u32, maintain_aspect_ratio: bool) -> ResizeEffect {
        ResizeEffect {
            width,
            height,
            maintain_aspect_ratio,
            ..Default::default()
        }
    }

    #[test]
    fn test_aspect_uses_smaller_factor() {
        let src = gradient(200, 100);
        let (out, transform) = run(target(100, 100, true), &src);

        assert_eq!((out.width, out.height), (100, 50));
        assert_affine_eq(transform, Affine::scale(0.5));
    }

    #[test]
    fn test_independent_axes() {
        let src = gradient(200, 100);
        let (out, transform) = run(target(50, 300, false), &src);

        assert_eq!((out.width, out.height), (50, 300));
        assert_affine_eq(transform, Affine::scale_non_uniform(0.25, 3.0));
    }

    #[test]
    fn test_zero_axis_is_derived() {
        let src = gradient(200, 100);
        let (out, _) = run(target(0, 50, true), &src);
        assert_eq!((out.width, out.height), (100, 50));

        let (out, _) = run(target(400, 0, true), &src);
        assert_eq!((out.width, out.height), (400, 200));

        let (out, transform) = run(target(0, 50, false), &src);
        assert_eq!((out.width, out.height), (200, 50));
        assert_affine_eq(transform, Affine::scale_non_uniform(1.0, 0.5));
    }

    #[test]
    fn test_unconstrained_is_unchanged() {
        let src = gradient(20, 10);
        let mut transform = Affine::translate((1.0, 2.0));
        let out = ResizeEffect::default().apply(&src, &mut transform).unwrap();
        assert!(out.is_unchanged());
        assert_affine_eq(transform, Affine::translate((1.0, 2.0)));
    }

    #[test]
    fn test_tiny_result_keeps_one_pixel() {
        let src = gradient(100, 3);
        let (out, _) = run(target(10, 10, true), &src);
        assert_eq!((out.width, out.height), (10, 1));
    }

    #[test]
    fn test_scale_appends_after_translate() {
        let src = gradient(10, 10);
        let mut transform = Affine::translate((4.0, 6.0));
        target(5, 5, true).apply(&src, &mut transform).unwrap();

        let mapped = transform * kurbo::Point::ORIGIN;
        assert!((mapped.x - 2.0).abs() < 1e-9);
        assert!((mapped.y - 3.0).abs() < 1e-9);
    }
}
