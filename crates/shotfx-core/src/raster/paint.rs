//! Vector drawing onto raster buffers through `vello_cpu`.
//!
//! `vello_cpu` works on premultiplied RGBA8 pixmaps while [`RasterBuffer`]
//! stores straight alpha, so buffers are converted on the way in and out.

use std::sync::Arc;

use vello_cpu::kurbo::{BezPath, Point};
use vello_cpu::peniko::color::PremulRgba8;
use vello_cpu::peniko::ImageSampler;
use vello_cpu::{Image, ImageSource, Pixmap, RenderContext};

use super::{RasterBuffer, RasterError, Resolution, CHANNELS};

fn pixmap_size(width: u32, height: u32) -> Result<(u16, u16), RasterError> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        (Ok(_), Ok(_)) => Err(RasterError::InvalidDimensions { width, height }),
        _ => Err(RasterError::PixmapTooLarge { width, height }),
    }
}

/// Convert to a premultiplied pixmap.
pub fn to_pixmap(buffer: &RasterBuffer) -> Result<Pixmap, RasterError> {
    let (w, h) = pixmap_size(buffer.width, buffer.height)?;

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(buffer.pixels.len() / CHANNELS);
    for px in buffer.pixels.chunks_exact(CHANNELS) {
        let a = px[3];
        may_have_opacities |= a != 255;
        let premul = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
        pixels.push(PremulRgba8::from_u8_array([
            premul(px[0]),
            premul(px[1]),
            premul(px[2]),
            a,
        ]));
    }
    Ok(Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Convert a premultiplied pixmap back to straight alpha.
pub fn from_pixmap(pixmap: &Pixmap, resolution: Resolution) -> RasterBuffer {
    let mut pixels = pixmap.data_as_u8_slice().to_vec();
    for px in pixels.chunks_exact_mut(CHANNELS) {
        let a = px[3] as u32;
        if a == 0 {
            px.fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
    RasterBuffer {
        width: pixmap.width() as u32,
        height: pixmap.height() as u32,
        pixels,
        resolution,
    }
}

/// Wrap a buffer as an image paint, for filling shapes with its pixels.
pub fn image_paint(buffer: &RasterBuffer) -> Result<Image, RasterError> {
    Ok(Image {
        image: ImageSource::Pixmap(Arc::new(to_pixmap(buffer)?)),
        sampler: ImageSampler::default(),
    })
}

/// Closed polygon through `points`.
pub fn polygon_path(points: &[kurbo::Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter().map(|p| Point::new(p.x, p.y));
    if let Some(first) = iter.next() {
        path.move_to(first);
        for p in iter {
            path.line_to(p);
        }
        path.close_path();
    }
    path
}

/// Run `draw` on a transparent `width x height` canvas and return the result.
pub fn render(
    width: u32,
    height: u32,
    resolution: Resolution,
    draw: impl FnOnce(&mut RenderContext),
) -> Result<RasterBuffer, RasterError> {
    let (w, h) = pixmap_size(width, height)?;
    let mut ctx = RenderContext::new(w, h);
    draw(&mut ctx);
    ctx.flush();

    let mut pixmap = Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(from_pixmap(&pixmap, resolution))
}
