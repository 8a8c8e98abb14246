//! Projective resampling of a composited frame into an output raster.
//!
//! Every destination pixel center is mapped back through the inverse homography and sampled
//! bilinearly from the source. Rows are processed in parallel.

use rayon::prelude::*;

use crate::foundation::core::Color;
use crate::foundation::error::{GrailError, GrailResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::frame::Frame;
use crate::scene::display::MAX_SIZE;
use crate::transform::homography::Homography;

/// Warp `src` through `transform` into a `width` x `height` frame over `background`.
///
/// `transform` maps source pixel coordinates to destination pixel coordinates. Destination pixels
/// whose preimage falls outside the source keep the background.
#[tracing::instrument(skip(src, transform), fields(src_w = src.width, src_h = src.height))]
pub fn warp_frame(
    src: &Frame,
    transform: &Homography,
    width: u32,
    height: u32,
    background: Color,
) -> GrailResult<Frame> {
    if !src.premultiplied {
        return Err(GrailError::render("warp expects a premultiplied source frame"));
    }
    let mut out = Frame::try_filled(width, height, MAX_SIZE, background)?;
    if src.is_empty() || out.is_empty() {
        return Ok(out);
    }
    let inverse = transform
        .inverse()
        .ok_or_else(|| GrailError::render("output transform is not invertible"))?;
    let m = inverse.coeffs();
    let sampler = Sampler {
        data: &src.data,
        width: src.width as usize,
        height: src.height as usize,
    };

    let stride = width as usize * 4;
    out.data
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let py = y as f64 + 0.5;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let px_x = x as f64 + 0.5;
                let w = m[6] * px_x + m[7] * py + m[8];
                if w.abs() < 1e-12 {
                    continue;
                }
                let sx = (m[0] * px_x + m[1] * py + m[2]) / w;
                let sy = (m[3] * px_x + m[4] * py + m[5]) / w;
                let Some(sample) = sampler.sample(sx - 0.5, sy - 0.5) else {
                    continue;
                };
                over(px, sample);
            }
        });
    Ok(out)
}

struct Sampler<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl Sampler<'_> {
    // `x`, `y` are in pixel-index space; the valid footprint is half a pixel past each edge.
    fn sample(&self, x: f64, y: f64) -> Option<[u8; 4]> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        if x < -0.5 || y < -0.5 || x > max_x + 0.5 || y > max_y + 0.5 {
            return None;
        }
        let x = x.clamp(0.0, max_x);
        let y = y.clamp(0.0, max_y);

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as f64;
        let fy = y - y0 as f64;

        let at = |xx: usize, yy: usize, c: usize| -> f64 {
            f64::from(
                self.data
                    .get((yy * self.width + xx) * 4 + c)
                    .copied()
                    .unwrap_or(0),
            )
        };

        let mut out = [0u8; 4];
        for (c, slot) in out.iter_mut().enumerate() {
            let v = at(x0, y0, c) * (1.0 - fx) * (1.0 - fy)
                + at(x1, y0, c) * fx * (1.0 - fy)
                + at(x0, y1, c) * (1.0 - fx) * fy
                + at(x1, y1, c) * fx * fy;
            *slot = v.round().clamp(0.0, 255.0) as u8;
        }
        Some(out)
    }
}

// Premultiplied source-over.
fn over(dst: &mut [u8], src: [u8; 4]) {
    let inv = 255 - u16::from(src[3]);
    for c in 0..4 {
        let d = mul_div255_u8(u16::from(dst[c]), inv);
        dst[c] = src[c].saturating_add(d);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/warp.rs"]
mod tests;
