//! Drop shadow effect and the shadow compositing primitive.
//!
//! # Algorithm
//!
//! 1. Allocate a transparent canvas `shadow_size` larger on every side
//! 2. Paint the source's alpha silhouette at `(shadow_size, shadow_size)`,
//!    black and scaled by `darkness`
//! 3. Box blur the canvas with a window of `shadow_size` (bumped to odd)
//! 4. Draw the source over it at `offset + (shadow_size - 1, shadow_size - 1)`
//!
//! The draw position from step 4 is appended to the transform.

use kurbo::{Affine, Vec2};
use serde::{Deserialize, Serialize};

use super::{grown_size, Effect, EffectError, EffectOutput};
use crate::raster::{box_blur, overlay, RasterBuffer, TRANSPARENT};

/// A blurred, darkened silhouette behind the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropShadowEffect {
    /// Shadow opacity, 0.0 (invisible) to 1.0 (solid).
    pub darkness: f32,
    /// Blur size and canvas growth on each side, in pixels.
    pub shadow_size: u32,
    /// Displacement of the image relative to its shadow.
    pub offset: (i32, i32),
}

impl Default for DropShadowEffect {
    fn default() -> Self {
        Self {
            darkness: 0.6,
            shadow_size: 7,
            offset: (-1, -1),
        }
    }
}

impl Effect for DropShadowEffect {
    fn apply(
        &self,
        source: &RasterBuffer,
        transform: &mut Affine,
    ) -> Result<EffectOutput, EffectError> {
        let output = create_shadow(
            source,
            self.darkness,
            self.shadow_size,
            self.offset,
            transform,
        )?;
        Ok(EffectOutput::Buffer(output))
    }
}

/// Composite `source` over a blurred shadow of itself on an enlarged canvas.
///
/// Appends the origin shift of the source to `transform`.
pub fn create_shadow(
    source: &RasterBuffer,
    darkness: f32,
    shadow_size: u32,
    offset: (i32, i32),
    transform: &mut Affine,
) -> Result<RasterBuffer, EffectError> {
    let size = shadow_size;
    let (width, height) = grown_size(source, size)?;
    let shift_x = offset.0 as i64 + size as i64 - 1;
    let shift_y = offset.1 as i64 + size as i64 - 1;
    *transform = transform.then_translate(Vec2::new(shift_x as f64, shift_y as f64));

    let mut canvas = RasterBuffer::filled(width, height, TRANSPARENT, source.resolution);

    let darkness = if darkness.is_finite() {
        darkness.clamp(0.0, 1.0)
    } else {
        0.0
    };
    for y in 0..source.height {
        for x in 0..source.width {
            let alpha = source.get_pixel(x, y)[3];
            let shade = (alpha as f32 * darkness).round() as u8;
            canvas.put_pixel(x + size, y + size, [0, 0, 0, shade]);
        }
    }

    // An even window has no center pixel.
    let window = if size % 2 == 0 { size + 1 } else { size };
    box_blur(&mut canvas, window / 2);

    overlay(&mut canvas, source, shift_x, shift_y)?;

    tracing::trace!(
        width = canvas.width,
        height = canvas.height,
        shift_x,
        shift_y,
        "shadow composited"
    );
    Ok(canvas)
}
