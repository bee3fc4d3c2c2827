//! Applying an ordered list of effects.

use kurbo::Affine;

use crate::effects::{Effect, EffectError, EffectOutput, ImageEffect};
use crate::raster::RasterBuffer;

/// Run `effects` over `source` in order.
///
/// Starts from the identity transform and returns the final buffer with the
/// accumulated transform. Effects that report [`EffectOutput::Unchanged`]
/// pass the current buffer through. `source` itself is never modified.
///
/// Stops at the first failing effect.
#[tracing::instrument(skip_all, fields(width = source.width, height = source.height, effects = effects.len()))]
pub fn apply_effects(
    source: &RasterBuffer,
    effects: &[ImageEffect],
) -> Result<(RasterBuffer, Affine), EffectError> {
    let mut transform = Affine::IDENTITY;
    let mut current: Option<RasterBuffer> = None;

    for effect in effects {
        let input = current.as_ref().unwrap_or(source);
        match effect.apply(input, &mut transform)? {
            EffectOutput::Buffer(buffer) => current = Some(buffer),
            EffectOutput::Unchanged => {
                tracing::debug!(effect = %effect.kind(), "effect left the image unchanged");
            }
        }
    }

    let output = current.unwrap_or_else(|| source.clone());
    tracing::debug!(
        width = output.width,
        height = output.height,
        "pipeline finished"
    );
    Ok((output, transform))
}
