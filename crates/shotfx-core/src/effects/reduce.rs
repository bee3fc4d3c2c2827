//! Palette reduction effect.

use kurbo::Affine;
use serde::{Deserialize, Serialize};

use super::{Effect, EffectError, EffectOutput};
use crate::quantize::{MedianCutQuantizer, Quantizer};
use crate::raster::RasterBuffer;

/// Reduce the image to at most `colors` distinct colors.
///
/// Reduction is best effort: a quantizer failure is logged and reported as
/// [`EffectOutput::Unchanged`], never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceColorsEffect {
    pub colors: u32,
}

impl Default for ReduceColorsEffect {
    fn default() -> Self {
        Self { colors: 256 }
    }
}

impl ReduceColorsEffect {
    /// Apply using a specific quantizer.
    pub fn apply_with(&self, source: &RasterBuffer, quantizer: &dyn Quantizer) -> EffectOutput {
        let target = self.colors as usize;
        let count = quantizer.color_count(source);
        if count <= target {
            tracing::debug!(count, target, "already within palette size");
            return EffectOutput::Unchanged;
        }

        match quantizer.quantize(source, target) {
            Ok(buffer) => EffectOutput::Buffer(buffer),
            Err(err) => {
                tracing::warn!(%err, count, target, "color reduction skipped");
                EffectOutput::Unchanged
            }
        }
    }
}

impl Effect for ReduceColorsEffect {
    fn apply(&self, source: &RasterBuffer, _: &mut Affine) -> Result<EffectOutput, EffectError> {
        Ok(self.apply_with(source, &MedianCutQuantizer))
    }
}
