//! Torn-paper edge effect.
//!
//! # Algorithm
//!
//! Each edge is split into `ceil(length / tooth_range)` regions. A torn edge
//! gets one point per region boundary, pushed inwards by a random amount in
//! `1..=tooth_height`. A straight edge runs corner to corner, and the point
//! before it is snapped to the exact corner so the outline stays continuous
//! where torn and straight edges meet. The outline is always closed.
//!
//! The outline is then filled on a transparent canvas using the source image
//! as the paint, so edge anti-aliasing follows the pixel content.

use kurbo::{Affine, Point};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::shadow::{create_shadow, DropShadowEffect};
use super::{Effect, EffectError, EffectOutput};
use crate::raster::{paint, RasterBuffer};

/// Jagged torn-paper outline, optionally with a drop shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TornEdgeEffect {
    /// Shadow parameters, used when `generate_shadow` is set.
    pub shadow: DropShadowEffect,
    pub generate_shadow: bool,
    /// Maximum inward displacement of a tooth, in pixels.
    pub tooth_height: u32,
    /// Tooth spacing along the top and bottom edges.
    pub horizontal_tooth_range: u32,
    /// Tooth spacing along the left and right edges.
    pub vertical_tooth_range: u32,
    /// Which edges are torn: top, right, bottom, left.
    pub edges: [bool; 4],
}

impl Default for TornEdgeEffect {
    fn default() -> Self {
        Self {
            shadow: DropShadowEffect::default(),
            generate_shadow: true,
            tooth_height: 12,
            horizontal_tooth_range: 20,
            vertical_tooth_range: 20,
            edges: [true; 4],
        }
    }
}

impl TornEdgeEffect {
    /// Index of each side in [`TornEdgeEffect::edges`].
    pub const TOP: usize = 0;
    pub const RIGHT: usize = 1;
    pub const BOTTOM: usize = 2;
    pub const LEFT: usize = 3;

    /// Apply with a caller-supplied random source.
    pub fn apply_with_rng<R: Rng + ?Sized>(
        &self,
        source: &RasterBuffer,
        transform: &mut Affine,
        rng: &mut R,
    ) -> Result<EffectOutput, EffectError> {
        let torn = if self.edges.iter().any(|&torn| torn) {
            let outline = paint::polygon_path(&self.outline(source.width, source.height, rng));
            let texture = paint::image_paint(source)?;
            paint::render(source.width, source.height, source.resolution, |ctx| {
                ctx.set_paint(texture);
                ctx.fill_path(&outline);
            })?
        } else {
            // The outline is the bounding rectangle
            source.clone()
        };

        if !self.generate_shadow {
            return Ok(EffectOutput::Buffer(torn));
        }

        let shadow = &self.shadow;
        let output = create_shadow(
            &torn,
            shadow.darkness,
            shadow.shadow_size,
            shadow.offset,
            transform,
        )?;
        Ok(EffectOutput::Buffer(output))
    }

    /// Build the closed torn-paper outline for a `width x height` image.
    ///
    /// The first and last points are always identical.
    pub fn outline<R: Rng + ?Sized>(&self, width: u32, height: u32, rng: &mut R) -> Vec<Point> {
        let (w, h) = (width as f64, height as f64);
        let max_tooth = self.tooth_height.max(1);
        let mut tooth = || rng.gen_range(1..=max_tooth) as f64;

        let h_range = self.horizontal_tooth_range.max(1);
        let v_range = self.vertical_tooth_range.max(1);
        let h_regions = width.div_ceil(h_range);
        let v_regions = height.div_ceil(v_range);
        let (h_step, v_step) = (h_range as f64, v_range as f64);

        let top_left = Point::new(0.0, 0.0);
        let top_right = Point::new(w, 0.0);
        let bottom_right = Point::new(w, h);
        let bottom_left = Point::new(0.0, h);

        let mut points = Vec::new();

        if self.edges[Self::TOP] {
            // Only jitter the start if the left edge is torn too
            if self.edges[Self::LEFT] {
                points.push(Point::new(tooth(), tooth()));
            } else {
                points.push(top_left);
            }
            for i in 1..h_regions {
                points.push(Point::new(i as f64 * h_step, tooth()));
            }
            points.push(Point::new(w - tooth(), tooth()));
        } else {
            points.push(top_left);
            points.push(top_right);
        }

        if self.edges[Self::RIGHT] {
            for i in 1..v_regions {
                points.push(Point::new(w - tooth(), i as f64 * v_step));
            }
            points.push(Point::new(w - tooth(), h - tooth()));
        } else {
            snap_last(&mut points, top_right);
            points.push(bottom_right);
        }

        if self.edges[Self::BOTTOM] {
            for i in 1..h_regions {
                points.push(Point::new(w - i as f64 * h_step, h - tooth()));
            }
            points.push(Point::new(tooth(), h - tooth()));
        } else {
            snap_last(&mut points, bottom_right);
            points.push(bottom_left);
        }

        if self.edges[Self::LEFT] {
            for i in 1..v_regions {
                points.push(Point::new(tooth(), h - i as f64 * v_step));
            }
            points.push(points[0]);
        } else {
            snap_last(&mut points, bottom_left);
            points.push(top_left);
        }

        let first = points[0];
        if let Some(last) = points.last_mut() {
            *last = first;
        }
        points
    }
}

/// Replace the previous edge's end point with the exact corner.
fn snap_last(points: &mut [Point], corner: Point) {
    if let Some(last) = points.last_mut() {
        *last = corner;
    }
}

impl Effect for TornEdgeEffect {
    fn apply(
        &self,
        source: &RasterBuffer,
        transform: &mut Affine,
    ) -> Result<EffectOutput, EffectError> {
        self.apply_with_rng(source, transform, &mut rand::thread_rng())
    }
}
