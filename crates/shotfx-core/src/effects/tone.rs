//! Per-pixel tone effects: adjust, grayscale, invert and monochrome.
//!
//! None of these change the geometry, so the transform is left alone.

use kurbo::Affine;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Effect, EffectError, EffectOutput};
use crate::color::{apply_color_matrix, apply_gamma, average_brightness, ColorMatrix};
use crate::raster::{RasterBuffer, CHANNELS};

/// Contrast, brightness and gamma.
///
/// `1.0` for all three leaves the image unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustEffect {
    /// Scale applied to R, G and B.
    pub contrast: f32,
    /// `brightness - 1.0` is added to R, G and B.
    pub brightness: f32,
    /// Exponent of the gamma pass.
    pub gamma: f32,
}

impl Default for AdjustEffect {
    fn default() -> Self {
        Self {
            contrast: 1.0,
            brightness: 1.0,
            gamma: 1.0,
        }
    }
}

impl AdjustEffect {
    /// Check if all values are at their neutral defaults.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

impl Effect for AdjustEffect {
    fn apply(&self, source: &RasterBuffer, _: &mut Affine) -> Result<EffectOutput, EffectError> {
        let mut output = source.clone();
        apply_color_matrix(
            &mut output,
            &ColorMatrix::adjust(self.contrast, self.brightness),
        );
        apply_gamma(&mut output, self.gamma);
        Ok(EffectOutput::Buffer(output))
    }
}

/// Luma grayscale (0.3 R + 0.59 G + 0.11 B), alpha preserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrayscaleEffect;

impl Effect for GrayscaleEffect {
    fn apply(&self, source: &RasterBuffer, _: &mut Affine) -> Result<EffectOutput, EffectError> {
        let mut output = source.clone();
        apply_color_matrix(&mut output, &ColorMatrix::grayscale());
        Ok(EffectOutput::Buffer(output))
    }
}

/// Color negative, alpha preserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertEffect;

impl Effect for InvertEffect {
    fn apply(&self, source: &RasterBuffer, _: &mut Affine) -> Result<EffectOutput, EffectError> {
        let mut output = source.clone();
        apply_color_matrix(&mut output, &ColorMatrix::invert());
        Ok(EffectOutput::Buffer(output))
    }
}

/// Two-level black/white threshold on the channel mean.
///
/// Pixels brighter than `threshold` become white, everything else black.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonochromeEffect {
    pub threshold: u8,
}

impl Default for MonochromeEffect {
    fn default() -> Self {
        Self { threshold: 127 }
    }
}

impl Effect for MonochromeEffect {
    fn apply(&self, source: &RasterBuffer, _: &mut Affine) -> Result<EffectOutput, EffectError> {
        let mut output = source.clone();
        if output.is_empty() {
            return Ok(EffectOutput::Buffer(output));
        }

        let threshold = self.threshold;
        let stride = output.stride();
        // Rows are independent: each worker only touches its own scanline.
        output.pixels.par_chunks_mut(stride).for_each(|row| {
            for px in row.chunks_exact_mut(CHANNELS) {
                let level = if average_brightness(px[0], px[1], px[2]) > threshold {
                    255
                } else {
                    0
                };
                px[0] = level;
                px[1] = level;
                px[2] = level;
            }
        });

        Ok(EffectOutput::Buffer(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::gradient;

    fn apply_one(effect: &dyn Effect, source: &RasterBuffer) -> RasterBuffer {
        let mut transform = Affine::IDENTITY;
        let out = effect.apply(source, &mut transform).unwrap();
        assert_eq!(transform, Affine::IDENTITY, "tone effects keep geometry");
        out.into_buffer().expect("tone effects always produce a buffer")
    }

    #[test]
    fn test_adjust_identity_is_noop() {
        let src = gradient(16, 9);
        let out = apply_one(&AdjustEffect::default(), &src);
        assert_eq!(out, src);
        assert!(AdjustEffect::default().is_identity());
    }

    #[test]
    fn test_adjust_contrast_and_brightness() {
        let src = RasterBuffer::new(1, 1, vec![100, 100, 100, 255]);

        let brighter = AdjustEffect {
            brightness: 1.2,
            ..Default::default()
        };
        let px = apply_one(&brighter, &src).get_pixel(0, 0);
        // 100 + 0.2 * 255 = 151
        assert!((px[0] as i32 - 151).abs() <= 1, "got {:?}", px);
        assert_eq!(px[3], 255);

        let flat = AdjustEffect {
            contrast: 0.5,
            ..Default::default()
        };
        let px = apply_one(&flat, &src).get_pixel(0, 0);
        assert_eq!(px[0], 50);
    }

    #[test]
    fn test_adjust_gamma_darkens() {
        let src = RasterBuffer::new(1, 1, vec![128, 128, 128, 255]);
        let effect = AdjustEffect {
            gamma: 2.0,
            ..Default::default()
        };
        let px = apply_one(&effect, &src).get_pixel(0, 0);
        assert!(px[0] < 128);
    }

    #[test]
    fn test_grayscale_pure_red() {
        let src = RasterBuffer::new(1, 1, vec![255, 0, 0, 180]);
        let px = apply_one(&GrayscaleEffect, &src).get_pixel(0, 0);
        assert!((px[0] as i32 - 77).abs() <= 1, "got {:?}", px);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 180);
    }

    #[test]
    fn test_invert_known_value() {
        let src = RasterBuffer::new(1, 1, vec![255, 0, 128, 42]);
        let px = apply_one(&InvertEffect, &src).get_pixel(0, 0);
        assert_eq!(px, [0, 255, 127, 42]);
    }

    #[test]
    fn test_source_is_not_mutated() {
        let src = gradient(8, 8);
        let before = src.clone();
        apply_one(&InvertEffect, &src);
        apply_one(&GrayscaleEffect, &src);
        apply_one(&MonochromeEffect::default(), &src);
        assert_eq!(src, before);
    }

    #[test]
    fn test_monochrome_threshold_boundary() {
        // brightness exactly 100 -> black, 101 -> white
        let src = RasterBuffer::new(2, 1, vec![99, 100, 101, 77, 100, 101, 102, 200]);
        let out = apply_one(&MonochromeEffect { threshold: 100 }, &src);

        assert_eq!(out.get_pixel(0, 0), [0, 0, 0, 77]);
        assert_eq!(out.get_pixel(1, 0), [255, 255, 255, 200]);
    }

    #[test]
    fn test_monochrome_uses_truncating_mean() {
        // (100 + 100 + 102) / 3 = 100.67 -> 100, not above 100
        let src = RasterBuffer::new(1, 1, vec![100, 100, 102, 255]);
        let out = apply_one(&MonochromeEffect { threshold: 100 }, &src);
        assert_eq!(out.get_pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_monochrome_matches_sequential_on_large_buffer() {
        let src = gradient(300, 200);
        let out = apply_one(&MonochromeEffect { threshold: 90 }, &src);

        for (i, (a, b)) in src
            .pixels
            .chunks_exact(4)
            .zip(out.pixels.chunks_exact(4))
            .enumerate()
        {
            let expected = if average_brightness(a[0], a[1], a[2]) > 90 { 255 } else { 0 };
            assert_eq!(b, &[expected, expected, expected, a[3]], "pixel {}", i);
        }
    }
}
