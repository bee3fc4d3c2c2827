//! 5x5 color matrices in row-vector form.
//!
//! A pixel is treated as the row vector `[r, g, b, a, 1]` with channels
//! normalized to 0.0..=1.0, and multiplied by the matrix:
//!
//! ```text
//! out[j] = r*m[0][j] + g*m[1][j] + b*m[2][j] + a*m[3][j] + m[4][j]
//! ```
//!
//! Row 4 is therefore the translate row.

use serde::{Deserialize, Serialize};

use super::luma::{GRAY_B, GRAY_G, GRAY_R};
use crate::raster::{RasterBuffer, CHANNELS};

/// A 5x5 color transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorMatrix(pub [[f32; 5]; 5]);

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorMatrix {
    /// The matrix that leaves every channel unchanged.
    pub const fn identity() -> Self {
        Self([
            [1.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Luma weights copied into each of R, G and B; alpha untouched.
    pub const fn grayscale() -> Self {
        Self([
            [GRAY_R, GRAY_R, GRAY_R, 0.0, 0.0],
            [GRAY_G, GRAY_G, GRAY_G, 0.0, 0.0],
            [GRAY_B, GRAY_B, GRAY_B, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// `1 - c` for R, G and B; alpha untouched.
    pub const fn invert() -> Self {
        Self([
            [-1.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, -1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, -1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
            [1.0, 1.0, 1.0, 0.0, 1.0],
        ])
    }

    /// Contrast on the diagonal, `brightness - 1` on the translate row.
    pub fn adjust(contrast: f32, brightness: f32) -> Self {
        let shift = brightness - 1.0;
        Self([
            [contrast, 0.0, 0.0, 0.0, 0.0],
            [0.0, contrast, 0.0, 0.0, 0.0],
            [0.0, 0.0, contrast, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
            [shift, shift, shift, 0.0, 1.0],
        ])
    }

    /// Compose: applying the result equals applying `self`, then `next`.
    pub fn then(&self, next: &ColorMatrix) -> ColorMatrix {
        let mut out = [[0.0f32; 5]; 5];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..5).map(|k| self.0[i][k] * next.0[k][j]).sum();
            }
        }
        ColorMatrix(out)
    }

    /// Check if this matrix is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Transform one normalized pixel.
    #[inline]
    pub fn transform(&self, px: [f32; 4]) -> [f32; 4] {
        let m = &self.0;
        let mut out = [0.0f32; 4];
        for (j, o) in out.iter_mut().enumerate() {
            *o = px[0] * m[0][j] + px[1] * m[1][j] + px[2] * m[2][j] + px[3] * m[3][j] + m[4][j];
        }
        out
    }
}

/// Apply a color matrix to every pixel of the buffer in place.
///
/// Results are clamped to the valid range and rounded to the nearest byte.
pub fn apply_color_matrix(buffer: &mut RasterBuffer, matrix: &ColorMatrix) {
    // Early exit for identity
    if matrix.is_identity() {
        return;
    }

    for chunk in buffer.pixels.chunks_exact_mut(CHANNELS) {
        let px = [
            chunk[0] as f32 / 255.0,
            chunk[1] as f32 / 255.0,
            chunk[2] as f32 / 255.0,
            chunk[3] as f32 / 255.0,
        ];
        let out = matrix.transform(px);
        for (dst, v) in chunk.iter_mut().zip(out) {
            *dst = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
}

/// Apply the gamma correction `out = in^gamma` to R, G and B in place.
///
/// Values above 1.0 darken the midtones, values below 1.0 lighten them.
/// A gamma of exactly 1.0 (or a non-positive/non-finite gamma) is a no-op.
pub fn apply_gamma(buffer: &mut RasterBuffer, gamma: f32) {
    if gamma == 1.0 || !gamma.is_finite() || gamma <= 0.0 {
        return;
    }

    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        let x = i as f32 / 255.0;
        *v = (x.powf(gamma) * 255.0).clamp(0.0, 255.0).round() as u8;
    }

    for chunk in buffer.pixels.chunks_exact_mut(CHANNELS) {
        chunk[0] = lut[chunk[0] as usize];
        chunk[1] = lut[chunk[1] as usize];
        chunk[2] = lut[chunk[2] as usize];
    }
}
