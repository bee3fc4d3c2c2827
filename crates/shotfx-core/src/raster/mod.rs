//! Raster buffers and the pixel primitives effects are built from.
//!
//! Everything here operates on straight-alpha RGBA8 data:
//! - [`RasterBuffer`] owns the pixels and the physical resolution
//! - [`box_blur`] is the edge-clamped box filter used by blur and shadows
//! - [`overlay`] composites one buffer onto another at a signed offset
//! - [`resize`] resamples to new dimensions through the `image` crate
//! - [`paint`] fills and strokes vector shapes through `vello_cpu`

mod blur;
mod composite;
pub mod paint;
mod resize;
mod types;

pub use blur::box_blur;
pub use composite::overlay;
pub use resize::resize;
pub use types::{
    FilterType, RasterBuffer, RasterError, Resolution, Rgba8, CHANNELS, TRANSPARENT,
};
