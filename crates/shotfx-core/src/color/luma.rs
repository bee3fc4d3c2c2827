//! Luma weights and brightness helpers shared by the gray-level effects.

/// Red weight of the classic NTSC luma used by the grayscale matrix.
pub const GRAY_R: f32 = 0.3;

/// Green weight of the classic NTSC luma used by the grayscale matrix.
pub const GRAY_G: f32 = 0.59;

/// Blue weight of the classic NTSC luma used by the grayscale matrix.
pub const GRAY_B: f32 = 0.11;

/// Unweighted channel mean with integer truncation, as used by the
/// monochrome threshold.
#[inline]
pub fn average_brightness(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 + g as u32 + b as u32) / 3) as u8
}
