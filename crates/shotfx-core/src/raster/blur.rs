//! Box blur primitive.
//!
//! A separable box filter over all four channels. The horizontal pass keeps
//! unnormalized window sums so the vertical pass divides exactly once, which
//! makes the result the true mean of the `(2r+1)²` neighborhood with edge
//! pixels clamped.

use super::{RasterBuffer, CHANNELS};

/// Blur `buffer` in place with a box of the given radius.
///
/// A radius of 0 leaves the buffer untouched.
pub fn box_blur(buffer: &mut RasterBuffer, radius: u32) {
    if radius == 0 || buffer.is_empty() {
        return;
    }

    let w = buffer.width as usize;
    let h = buffer.height as usize;
    let r = radius as i64;
    let stride = w * CHANNELS;

    // Horizontal pass: running window sums per row.
    let mut horizontal = vec![0u64; w * h * CHANNELS];
    for y in 0..h {
        let row = &buffer.pixels[y * stride..(y + 1) * stride];
        let out = &mut horizontal[y * stride..(y + 1) * stride];

        let mut sums = [0u64; CHANNELS];
        for k in -r..=r {
            let sx = clamp_index(k, w);
            for c in 0..CHANNELS {
                sums[c] += row[sx * CHANNELS + c] as u64;
            }
        }

        for x in 0..w {
            out[x * CHANNELS..(x + 1) * CHANNELS].copy_from_slice(&sums);
            let leaving = clamp_index(x as i64 - r, w);
            let entering = clamp_index(x as i64 + r + 1, w);
            for c in 0..CHANNELS {
                sums[c] = sums[c] - row[leaving * CHANNELS + c] as u64
                    + row[entering * CHANNELS + c] as u64;
            }
        }
    }

    // Vertical pass: running column sums over the horizontal sums.
    let area = ((2 * r + 1) * (2 * r + 1)) as u64;
    let mut columns = vec![0u64; stride];
    for k in -r..=r {
        let sy = clamp_index(k, h);
        let src = &horizontal[sy * stride..(sy + 1) * stride];
        for (acc, v) in columns.iter_mut().zip(src) {
            *acc += v;
        }
    }

    for y in 0..h {
        let out = &mut buffer.pixels[y * stride..(y + 1) * stride];
        for (dst, sum) in out.iter_mut().zip(&columns) {
            *dst = ((sum + area / 2) / area).min(255) as u8;
        }

        let leaving = clamp_index(y as i64 - r, h);
        let entering = clamp_index(y as i64 + r + 1, h);
        let (old, new) = (leaving * stride, entering * stride);
        for (i, acc) in columns.iter_mut().enumerate() {
            *acc = *acc - horizontal[old + i] + horizontal[new + i];
        }
    }
}

#[inline]
fn clamp_index(i: i64, len: usize) -> usize {
    i.clamp(0, len as i64 - 1) as usize
}
