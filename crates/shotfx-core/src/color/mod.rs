//! Per-pixel color remapping.
//!
//! Color-matrix effects (adjust, grayscale, invert) are expressed as a
//! [`ColorMatrix`] and applied with [`apply_color_matrix`]. Gamma is a
//! separate non-linear pass, [`apply_gamma`].

mod luma;
mod matrix;

pub use luma::{average_brightness, GRAY_B, GRAY_G, GRAY_R};
pub use matrix::{apply_color_matrix, apply_gamma, ColorMatrix};
