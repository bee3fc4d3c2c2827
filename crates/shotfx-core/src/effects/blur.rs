//! Box blur effect.

use kurbo::Affine;
use serde::{Deserialize, Serialize};

use super::{Effect, EffectError, EffectOutput};
use crate::raster::{box_blur, RasterBuffer};

/// Averages each pixel over a `(2 * range + 1)²` neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurEffect {
    /// Blur radius in pixels.
    pub range: u32,
}

impl Default for BlurEffect {
    fn default() -> Self {
        Self { range: 3 }
    }
}

impl Effect for BlurEffect {
    fn apply(&self, source: &RasterBuffer, _: &mut Affine) -> Result<EffectOutput, EffectError> {
        let mut output = source.clone();
        box_blur(&mut output, self.range);
        Ok(EffectOutput::Buffer(output))
    }
}
