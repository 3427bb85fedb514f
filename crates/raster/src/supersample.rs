//! The supersampling rasterizer: a 4× mask, downsampled and composited.

use crate::compositor::{Coverage, Precision, StrideCompositor, SurfaceCompositor};
use crate::operator::Operator;
use crate::pattern::Source;
use crate::pixel::Format;
use crate::polygon::Polygon;
use crate::surface::Surface;
use crate::FillRule;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

const FACTOR: i32 = 4;

pub(crate) struct SupersampleRasterizer<'l> {
    pub source: &'l Source<'l>,
    pub fill_rule: FillRule,
    pub operator: Operator,
    pub precision: Precision,
}

impl<'l> SupersampleRasterizer<'l> {
    /// Rasterizes the polygon (scale 4) through an `Alpha8` mask:
    /// every sub-scanline is painted at full opacity into the mask, the
    /// mask is downsampled by averaging 4×4 blocks, and the result gates
    /// the pattern when compositing onto the target.
    pub fn rasterize(&self, surface: &mut Surface, polygon: &Polygon) {
        debug_assert!(polygon.scale() == FACTOR as u32);

        let width = surface.width() as i32;
        let height = surface.height() as i32;

        let extents = match polygon.extents() {
            Some(e) => e,
            None => return,
        };

        // The destination rectangle touched by the polygon, clamped to the
        // target.
        let x0 = ((extents.min.x / FACTOR as f32).floor() as i32).max(0);
        let y0 = ((extents.min.y / FACTOR as f32).floor() as i32).max(0);
        let x1 = ((extents.max.x / FACTOR as f32).ceil() as i32).min(width);
        let y1 = ((extents.max.y / FACTOR as f32).ceil() as i32).min(height);
        if x0 >= x1 || y0 >= y1 {
            if !self.operator.is_bounded() {
                self.composite_rows(surface, 0, height, &empty_mask(), 0, 0);
            }
            return;
        }

        let mask_w = ((x1 - x0) * FACTOR) as u32;
        let mask_h = ((y1 - y0) * FACTOR) as u32;
        let mut mask = Surface::new(Format::Alpha8, mask_w, mask_h);

        let mut crossings = Vec::new();
        let mut spans = Vec::new();

        for sub_y in 0..mask_h as i32 {
            let sample_y = (y0 * FACTOR + sub_y) as f32 + 0.5;
            polygon.spans(sample_y, self.fill_rule, &mut crossings, &mut spans);
            if spans.is_empty() {
                continue;
            }

            let row = mask.alpha8_row_mut(sub_y as u32);
            for &(sx0, sx1) in spans.iter() {
                let a = ((sx0 - x0 * FACTOR).max(0) as usize).min(row.len());
                let b = ((sx1 - x0 * FACTOR).max(0) as usize).min(row.len());
                for byte in &mut row[a..b] {
                    *byte = 255;
                }
            }
        }

        let downsampled = downsample(&mask, (x1 - x0) as u32, (y1 - y0) as u32);

        if self.operator.is_bounded() {
            SurfaceCompositor::run(
                surface,
                x0,
                y0,
                (x1 - x0) as u32,
                (y1 - y0) as u32,
                self.source,
                self.operator,
                &downsampled,
                self.precision,
            );
        } else {
            // Unbounded operators must touch every pixel; anchoring the
            // mask offset makes out-of-mask reads come back as zero
            // coverage, which clears.
            self.composite_rows(surface, 0, height, &downsampled, x0, y0);
        }
    }

    fn composite_rows(
        &self,
        surface: &mut Surface,
        y_start: i32,
        y_end: i32,
        mask: &Surface,
        x0: i32,
        y0: i32,
    ) {
        let width = surface.width();
        for y in y_start..y_end {
            StrideCompositor::run(
                surface,
                0,
                y,
                width,
                self.source,
                self.operator,
                Coverage::Mask {
                    mask,
                    x: -x0,
                    y: y - y0,
                },
                self.precision,
            );
        }
    }
}

fn empty_mask() -> Surface {
    Surface::new(Format::Alpha8, 0, 0)
}

/// Averages each 4×4 block of the mask into one destination alpha.
fn downsample(mask: &Surface, out_w: u32, out_h: u32) -> Surface {
    let mut out = Surface::new(Format::Alpha8, out_w, out_h);

    for y in 0..out_h as i32 {
        for x in 0..out_w as i32 {
            let mut total: u32 = 0;
            for sy in 0..FACTOR {
                for sx in 0..FACTOR {
                    total += mask.get_alpha(x * FACTOR + sx, y * FACTOR + sy) as u32;
                }
            }
            out.put_alpha(x, y, (total / (FACTOR * FACTOR) as u32) as u8);
        }
    }

    out
}
