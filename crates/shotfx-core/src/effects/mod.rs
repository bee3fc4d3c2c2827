//! The effect set.
//!
//! Every effect consumes a source buffer and the transform accumulated so
//! far, and produces a new buffer. Geometry-changing effects append their
//! displacement to the transform so callers can reposition overlays.
//!
//! ## Transform Order
//!
//! Contributions are always appended (`Affine::then_*`): an effect's
//! transform is applied after everything earlier in the chain.
//!
//! ## Ownership
//!
//! The source buffer is never mutated. Effects that work in place
//! (blur, grayscale, invert, monochrome) clone first.

mod blur;
mod border;
mod canvas;
mod reduce;
mod resize;
mod rotate;
mod shadow;
mod tone;
mod torn_edge;

use std::fmt;
use std::str::FromStr;

use kurbo::Affine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::{RasterBuffer, RasterError};

pub use blur::BlurEffect;
pub use border::BorderEffect;
pub use canvas::ResizeCanvasEffect;
pub use reduce::ReduceColorsEffect;
pub use resize::ResizeEffect;
pub use rotate::RotateEffect;
pub use shadow::{create_shadow, DropShadowEffect};
pub use tone::{AdjustEffect, GrayscaleEffect, InvertEffect, MonochromeEffect};
pub use torn_edge::TornEdgeEffect;

/// Error types for effect application.
#[derive(Debug, Error, PartialEq)]
pub enum EffectError {
    /// Rotation is limited to quarter turns.
    #[error("Unsupported rotation angle {0}: only 90, -90 and 270 are supported")]
    UnsupportedAngle(i32),

    /// The effect would produce an empty or negative-size buffer.
    #[error("Invalid output dimensions: {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    /// A raster primitive rejected its input.
    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Result of applying one effect.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectOutput {
    /// A newly allocated buffer, owned by the caller.
    Buffer(RasterBuffer),
    /// Nothing needed to change; the source is already acceptable.
    Unchanged,
}

impl EffectOutput {
    /// Check if this is the no-op sentinel.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, EffectOutput::Unchanged)
    }

    /// The produced buffer, if any.
    pub fn into_buffer(self) -> Option<RasterBuffer> {
        match self {
            EffectOutput::Buffer(buffer) => Some(buffer),
            EffectOutput::Unchanged => None,
        }
    }

    /// The produced buffer, or a copy of `fallback` for the no-op sentinel.
    pub fn into_buffer_or(self, fallback: &RasterBuffer) -> RasterBuffer {
        self.into_buffer().unwrap_or_else(|| fallback.clone())
    }
}

/// Source size grown by `margin` on every side.
pub(crate) fn grown_size(source: &RasterBuffer, margin: u32) -> Result<(u32, u32), EffectError> {
    let grown = |side: u32| margin.checked_mul(2).and_then(|m| side.checked_add(m));
    match (grown(source.width), grown(source.height)) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(EffectError::InvalidDimensions {
            width: source.width as i64 + 2 * margin as i64,
            height: source.height as i64 + 2 * margin as i64,
        }),
    }
}

/// The single contract every effect implements.
pub trait Effect {
    /// Apply the effect to `source`, appending any geometric change to `transform`.
    fn apply(&self, source: &RasterBuffer, transform: &mut Affine)
        -> Result<EffectOutput, EffectError>;
}

/// Stable names of the effect kinds, used by the text codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Adjust,
    Blur,
    Border,
    DropShadow,
    Grayscale,
    Invert,
    Monochrome,
    ReduceColors,
    ResizeCanvas,
    Resize,
    Rotate,
    TornEdge,
}

impl EffectKind {
    /// All kinds, in declaration order.
    pub const ALL: [EffectKind; 12] = [
        EffectKind::Adjust,
        EffectKind::Blur,
        EffectKind::Border,
        EffectKind::DropShadow,
        EffectKind::Grayscale,
        EffectKind::Invert,
        EffectKind::Monochrome,
        EffectKind::ReduceColors,
        EffectKind::ResizeCanvas,
        EffectKind::Resize,
        EffectKind::Rotate,
        EffectKind::TornEdge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Adjust => "Adjust",
            EffectKind::Blur => "Blur",
            EffectKind::Border => "Border",
            EffectKind::DropShadow => "DropShadow",
            EffectKind::Grayscale => "Grayscale",
            EffectKind::Invert => "Invert",
            EffectKind::Monochrome => "Monochrome",
            EffectKind::ReduceColors => "ReduceColors",
            EffectKind::ResizeCanvas => "ResizeCanvas",
            EffectKind::Resize => "Resize",
            EffectKind::Rotate => "Rotate",
            EffectKind::TornEdge => "TornEdge",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown effect name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown effect kind: {0}")]
pub struct UnknownEffectKind(pub String);

impl FromStr for EffectKind {
    type Err = UnknownEffectKind;

    /// Names match case-insensitively and may be written with `-` or `_`
    /// separators (`drop-shadow`, `torn_edge`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| UnknownEffectKind(s.to_string()))
    }
}

/// One configured effect: the closed set of effect parameter shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ImageEffect {
    Adjust(AdjustEffect),
    Blur(BlurEffect),
    Border(BorderEffect),
    DropShadow(DropShadowEffect),
    Grayscale(GrayscaleEffect),
    Invert(InvertEffect),
    Monochrome(MonochromeEffect),
    ReduceColors(ReduceColorsEffect),
    ResizeCanvas(ResizeCanvasEffect),
    Resize(ResizeEffect),
    Rotate(RotateEffect),
    TornEdge(TornEdgeEffect),
}

impl ImageEffect {
    /// The default-configured effect of the given kind.
    pub fn default_for(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Adjust => ImageEffect::Adjust(AdjustEffect::default()),
            EffectKind::Blur => ImageEffect::Blur(BlurEffect::default()),
            EffectKind::Border => ImageEffect::Border(BorderEffect::default()),
            EffectKind::DropShadow => ImageEffect::DropShadow(DropShadowEffect::default()),
            EffectKind::Grayscale => ImageEffect::Grayscale(GrayscaleEffect),
            EffectKind::Invert => ImageEffect::Invert(InvertEffect),
            EffectKind::Monochrome => ImageEffect::Monochrome(MonochromeEffect::default()),
            EffectKind::ReduceColors => ImageEffect::ReduceColors(ReduceColorsEffect::default()),
            EffectKind::ResizeCanvas => ImageEffect::ResizeCanvas(ResizeCanvasEffect::default()),
            EffectKind::Resize => ImageEffect::Resize(ResizeEffect::default()),
            EffectKind::Rotate => ImageEffect::Rotate(RotateEffect::default()),
            EffectKind::TornEdge => ImageEffect::TornEdge(TornEdgeEffect::default()),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            ImageEffect::Adjust(_) => EffectKind::Adjust,
            ImageEffect::Blur(_) => EffectKind::Blur,
            ImageEffect::Border(_) => EffectKind::Border,
            ImageEffect::DropShadow(_) => EffectKind::DropShadow,
            ImageEffect::Grayscale(_) => EffectKind::Grayscale,
            ImageEffect::Invert(_) => EffectKind::Invert,
            ImageEffect::Monochrome(_) => EffectKind::Monochrome,
            ImageEffect::ReduceColors(_) => EffectKind::ReduceColors,
            ImageEffect::ResizeCanvas(_) => EffectKind::ResizeCanvas,
            ImageEffect::Resize(_) => EffectKind::Resize,
            ImageEffect::Rotate(_) => EffectKind::Rotate,
            ImageEffect::TornEdge(_) => EffectKind::TornEdge,
        }
    }

    fn as_effect(&self) -> &dyn Effect {
        match self {
            ImageEffect::Adjust(e) => e,
            ImageEffect::Blur(e) => e,
            ImageEffect::Border(e) => e,
            ImageEffect::DropShadow(e) => e,
            ImageEffect::Grayscale(e) => e,
            ImageEffect::Invert(e) => e,
            ImageEffect::Monochrome(e) => e,
            ImageEffect::ReduceColors(e) => e,
            ImageEffect::ResizeCanvas(e) => e,
            ImageEffect::Resize(e) => e,
            ImageEffect::Rotate(e) => e,
            ImageEffect::TornEdge(e) => e,
        }
    }
}

impl Effect for ImageEffect {
    fn apply(
        &self,
        source: &RasterBuffer,
        transform: &mut Affine,
    ) -> Result<EffectOutput, EffectError> {
        tracing::debug!(
            effect = %self.kind(),
            width = source.width,
            height = source.height,
            "applying effect"
        );
        self.as_effect().apply(source, transform)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.to_string().parse::<EffectKind>(), Ok(kind));
            assert_eq!(ImageEffect::default_for(kind).kind(), kind);
        }
    }

    #[test]
    fn test_kind_parsing_is_lenient() {
        assert_eq!("drop-shadow".parse(), Ok(EffectKind::DropShadow));
        assert_eq!("TORN_EDGE".parse(), Ok(EffectKind::TornEdge));
        assert_eq!(" reducecolors ".parse(), Ok(EffectKind::ReduceColors));
        assert_eq!(
            "sepia".parse::<EffectKind>(),
            Err(UnknownEffectKind("sepia".to_string()))
        );
    }

    #[test]
    fn test_effect_output_helpers() {
        let buf = test_support::gradient(2, 2);
        assert!(EffectOutput::Unchanged.is_unchanged());
        assert_eq!(EffectOutput::Unchanged.into_buffer_or(&buf), buf);
        assert_eq!(EffectOutput::Buffer(buf.clone()).into_buffer(), Some(buf));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            EffectError::UnsupportedAngle(45).to_string(),
            "Unsupported rotation angle 45: only 90, -90 and 270 are supported"
        );
    }
}
