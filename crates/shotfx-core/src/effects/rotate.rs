//! Quarter-turn rotation.

use std::f64::consts::FRAC_PI_2;

use kurbo::{Affine, Vec2};
use serde::{Deserialize, Serialize};

use super::{Effect, EffectError, EffectOutput};
use crate::raster::RasterBuffer;

/// Lossless rotation by a quarter turn.
///
/// Positive angles turn clockwise in image coordinates (y down). Only 90,
/// -90 and 270 are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotateEffect {
    /// Angle in degrees.
    pub angle: i32,
}

impl Default for RotateEffect {
    fn default() -> Self {
        Self { angle: 90 }
    }
}

impl Effect for RotateEffect {
    fn apply(
        &self,
        source: &RasterBuffer,
        transform: &mut Affine,
    ) -> Result<EffectOutput, EffectError> {
        let clockwise = match self.angle {
            90 => true,
            -90 | 270 => false,
            other => return Err(EffectError::UnsupportedAngle(other)),
        };

        let img = source.to_rgba_image()?;
        let (rotated, turn, shift) = if clockwise {
            (
                image::imageops::rotate90(&img),
                FRAC_PI_2,
                Vec2::new(source.height as f64, 0.0),
            )
        } else {
            (
                image::imageops::rotate270(&img),
                -FRAC_PI_2,
                Vec2::new(0.0, source.width as f64),
            )
        };

        *transform = transform.then_rotate(turn).then_translate(shift);
        Ok(EffectOutput::Buffer(RasterBuffer::from_rgba_image(
            rotated,
            source.resolution,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::{assert_affine_eq, gradient};
    use kurbo::Point;

    fn rotate(angle: i32, src: &RasterBuffer, transform: &mut Affine) -> RasterBuffer {
        RotateEffect { angle }
            .apply(src, transform)
            .unwrap()
            .into_buffer()
            .unwrap()
    }

    fn assert_point_eq(actual: Point, expected: Point) {
        assert!(
            (actual - expected).hypot() < 1e-9,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn test_rotate_swaps_dimensions() {
        let src = gradient(100, 50);
        let out = rotate(90, &src, &mut Affine::IDENTITY);
        assert_eq!((out.width, out.height), (50, 100));

        let out = rotate(270, &src, &mut Affine::IDENTITY);
        assert_eq!((out.width, out.height), (50, 100));
    }

    #[test]
    fn test_four_turns_restore_everything() {
        let src = gradient(100, 50);
        let mut transform = Affine::IDENTITY;
        let mut buf = src.clone();
        for _ in 0..4 {
            buf = rotate(90, &buf, &mut transform);
        }
        assert_eq!(buf, src);
        assert_affine_eq(transform, Affine::IDENTITY);
    }

    #[test]
    fn test_clockwise_then_counter_clockwise_cancel() {
        let src = gradient(7, 3);
        let mut transform = Affine::IDENTITY;
        let turned = rotate(90, &src, &mut transform);
        let back = rotate(-90, &turned, &mut transform);
        assert_eq!(back, src);
        assert_affine_eq(transform, Affine::IDENTITY);
    }

    #[test]
    fn test_pixels_follow_the_transform() {
        let mut src = RasterBuffer::filled(2, 1, [0, 0, 0, 255], Default::default());
        src.put_pixel(0, 0, [255, 0, 0, 255]);
        src.put_pixel(1, 0, [0, 0, 255, 255]);

        let mut transform = Affine::IDENTITY;
        let out = rotate(90, &src, &mut transform);
        assert_eq!((out.width, out.height), (1, 2));
        assert_eq!(out.get_pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(0, 1), [0, 0, 255, 255]);
        // Pixel centers land on the centers of their new positions
        assert_point_eq(transform * Point::new(0.5, 0.5), Point::new(0.5, 0.5));
        assert_point_eq(transform * Point::new(1.5, 0.5), Point::new(0.5, 1.5));

        let mut transform = Affine::IDENTITY;
        let out = rotate(-90, &src, &mut transform);
        assert_eq!(out.get_pixel(0, 0), [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(0, 1), [255, 0, 0, 255]);
        assert_point_eq(transform * Point::new(1.5, 0.5), Point::new(0.5, 0.5));
    }

    #[test]
    fn test_unsupported_angles() {
        let src = gradient(4, 4);
        for angle in [0, 45, 180, -270, 360] {
            let mut transform = Affine::IDENTITY;
            assert_eq!(
                RotateEffect { angle }.apply(&src, &mut transform),
                Err(EffectError::UnsupportedAngle(angle))
            );
            assert_eq!(transform, Affine::IDENTITY);
        }
    }
}
