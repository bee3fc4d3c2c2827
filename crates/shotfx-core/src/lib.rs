//! ShotFX Core - Screenshot effect pipeline
//!
//! Composable raster effects for decorating screenshots: tone adjustment,
//! blur, borders, drop shadows, torn-paper edges, palette reduction and
//! simple geometry (canvas resize, scaling, quarter-turn rotation).
//!
//! Every effect maps a [`RasterBuffer`] and an accumulated [`Affine`]
//! transform to a new buffer, appending its own geometric change to the
//! transform so callers can keep annotations aligned with the pixels.
//!
//! ```text
//! let (output, transform) = apply_effects(&screenshot, &effects)?;
//! ```
//!
//! Effect parameters persist as `Key:Value|Key:Value` strings through
//! [`EffectConverter`].

pub mod codec;
pub mod color;
pub mod effects;
pub mod pipeline;
pub mod quantize;
pub mod raster;

pub use codec::EffectConverter;
pub use effects::{Effect, EffectError, EffectKind, EffectOutput, ImageEffect};
pub use pipeline::apply_effects;
pub use quantize::{MedianCutQuantizer, QuantizeError, Quantizer};
pub use raster::{FilterType, RasterBuffer, RasterError, Resolution, Rgba8};

/// Re-exported so callers can use the transform type without depending on kurbo.
pub use kurbo::Affine;
