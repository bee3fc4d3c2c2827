//! Weighted median-cut quantizer.
//!
//! # Algorithm
//!
//! 1. Histogram the distinct RGBA colors.
//! 2. Start with one box holding every color. Repeatedly take the box with
//!    the widest channel span and split it at the weighted median of that
//!    channel, until the palette size is reached or no box can be split.
//! 3. Each box contributes its pixel-weighted mean color to the palette.
//! 4. Every distinct color is mapped once to its nearest palette entry.

use std::collections::HashMap;

use image::imageops::ColorMap;
use image::Rgba;

use super::{QuantizeError, Quantizer, MAX_PALETTE_SIZE};
use crate::raster::{RasterBuffer, Rgba8, CHANNELS};

/// Median-cut palette reduction.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianCutQuantizer;

/// A fixed set of colors with nearest-color lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba8>,
}

impl Palette {
    pub fn new(colors: Vec<Rgba8>) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &[Rgba8] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Index of the closest entry by squared RGBA distance.
    fn nearest(&self, color: Rgba8) -> usize {
        self.colors
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| distance_sq(**entry, color))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

impl ColorMap for Palette {
    type Color = Rgba<u8>;

    fn index_of(&self, color: &Rgba<u8>) -> usize {
        self.nearest(color.0)
    }

    fn lookup(&self, index: usize) -> Option<Rgba<u8>> {
        self.colors.get(index).map(|c| Rgba(*c))
    }

    fn has_lookup(&self) -> bool {
        true
    }

    fn map_color(&self, color: &mut Rgba<u8>) {
        if let Some(&entry) = self.colors.get(self.nearest(color.0)) {
            color.0 = entry;
        }
    }
}

fn distance_sq(a: Rgba8, b: Rgba8) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}

/// A histogram entry: one distinct color and how many pixels use it.
#[derive(Debug, Clone, Copy)]
struct Entry {
    color: Rgba8,
    count: u64,
}

/// A run of histogram entries being split.
struct ColorBox {
    entries: Vec<Entry>,
}

impl ColorBox {
    /// Widest channel and its span.
    fn widest_channel(&self) -> (usize, u8) {
        (0..CHANNELS)
            .map(|c| {
                let (lo, hi) = self
                    .entries
                    .iter()
                    .fold((u8::MAX, u8::MIN), |(lo, hi), e| {
                        (lo.min(e.color[c]), hi.max(e.color[c]))
                    });
                (c, hi.saturating_sub(lo))
            })
            .max_by_key(|&(_, span)| span)
            .unwrap_or((0, 0))
    }

    /// Split at the weighted median of the widest channel.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let (channel, _) = self.widest_channel();
        self.entries.sort_by_key(|e| e.color[channel]);

        let total: u64 = self.entries.iter().map(|e| e.count).sum();
        let mut running = 0;
        let mut at = self.entries.len() / 2;
        for (i, e) in self.entries.iter().enumerate() {
            running += e.count;
            if running * 2 >= total {
                at = i + 1;
                break;
            }
        }
        // Both halves must be non-empty
        let at = at.clamp(1, self.entries.len() - 1);
        let rest = self.entries.split_off(at);
        (self, ColorBox { entries: rest })
    }

    fn mean(&self) -> Rgba8 {
        let total: u64 = self.entries.iter().map(|e| e.count).sum::<u64>().max(1);
        let mut mean = [0u8; 4];
        for (c, out) in mean.iter_mut().enumerate() {
            let sum: u64 = self
                .entries
                .iter()
                .map(|e| e.color[c] as u64 * e.count)
                .sum();
            *out = ((sum + total / 2) / total) as u8;
        }
        mean
    }
}

impl MedianCutQuantizer {
    /// Build a palette of at most `max_colors` entries for `buffer`.
    pub fn palette(
        &self,
        buffer: &RasterBuffer,
        max_colors: usize,
    ) -> Result<Palette, QuantizeError> {
        if max_colors == 0 || max_colors > MAX_PALETTE_SIZE {
            return Err(QuantizeError::UnsupportedPaletteSize(max_colors));
        }
        if buffer.is_empty() {
            return Err(QuantizeError::EmptyImage);
        }

        let entries = histogram(buffer);
        if entries.len() <= max_colors {
            return Ok(Palette::new(entries.into_iter().map(|e| e.color).collect()));
        }

        let mut boxes = vec![ColorBox { entries }];
        while boxes.len() < max_colors {
            let candidate = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.entries.len() > 1)
                .max_by_key(|(_, b)| b.widest_channel().1)
                .map(|(i, _)| i);
            let Some(index) = candidate else {
                break;
            };
            let (a, b) = boxes.swap_remove(index).split();
            boxes.push(a);
            boxes.push(b);
        }

        Ok(Palette::new(boxes.iter().map(ColorBox::mean).collect()))
    }
}

fn histogram(buffer: &RasterBuffer) -> Vec<Entry> {
    let mut counts: HashMap<Rgba8, u64> = HashMap::new();
    for px in buffer.pixels.chunks_exact(CHANNELS) {
        *counts.entry([px[0], px[1], px[2], px[3]]).or_insert(0) += 1;
    }
    let mut entries: Vec<Entry> = counts
        .into_iter()
        .map(|(color, count)| Entry { color, count })
        .collect();
    // HashMap order is random; sort so palettes are deterministic
    entries.sort_unstable_by_key(|e| e.color);
    entries
}

impl Quantizer for MedianCutQuantizer {
    fn quantize(
        &self,
        buffer: &RasterBuffer,
        max_colors: usize,
    ) -> Result<RasterBuffer, QuantizeError> {
        let palette = self.palette(buffer, max_colors)?;

        let mut mapping: HashMap<Rgba8, Rgba8> = HashMap::new();
        let mut output = buffer.clone();
        for px in output.pixels.chunks_exact_mut(CHANNELS) {
            let color = [px[0], px[1], px[2], px[3]];
            let mapped = *mapping.entry(color).or_insert_with(|| {
                let mut c = Rgba(color);
                palette.map_color(&mut c);
                c.0
            });
            px.copy_from_slice(&mapped);
        }

        tracing::trace!(
            palette = palette.len(),
            width = buffer.width,
            height = buffer.height,
            "quantized"
        );
        Ok(output)
    }
}
