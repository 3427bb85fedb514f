//! The multisampling rasterizer, the default anti-aliased pipeline.
//!
//! The polygon arrives at scale 2 and every destination scanline is
//! sampled on four sub-scanlines per scaled row. With two scaled columns
//! per destination pixel that makes 16 subsamples, accumulated into a
//! sparse run-length coverage buffer and quantized to an 8 bit alpha per
//! run when compositing.

use crate::compositor::{Coverage, Precision, StrideCompositor};
use crate::coverage::SparseCoverageBuffer;
use crate::error::{InternalError, PaintResult};
use crate::operator::Operator;
use crate::pattern::Source;
use crate::polygon::Polygon;
use crate::surface::Surface;
use crate::FillRule;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

const SCALE: i32 = 2;
const SUB_SCANLINES: i32 = 4;
/// Full coverage of a destination pixel: scale² · sub-scanlines.
const FULL_COVERAGE: u16 = (SCALE * SCALE * SUB_SCANLINES) as u16;

pub(crate) struct MultisampleRasterizer<'l> {
    pub source: &'l Source<'l>,
    pub fill_rule: FillRule,
    pub operator: Operator,
    pub precision: Precision,
}

impl<'l> MultisampleRasterizer<'l> {
    pub fn rasterize(&self, surface: &mut Surface, polygon: &Polygon) -> PaintResult {
        debug_assert!(polygon.scale() == SCALE as u32);

        let width = surface.width() as i32;
        let height = surface.height() as i32;
        let bounded = self.operator.is_bounded();

        let (x0, x1, y_range) = match polygon.extents() {
            Some(extents) => {
                let x0 = ((extents.min.x / SCALE as f32).floor() as i32).max(0);
                let x1 = ((extents.max.x / SCALE as f32).ceil() as i32).min(width);
                let y0 = ((extents.min.y / SCALE as f32).floor() as i32).max(0);
                let y1 = ((extents.max.y / SCALE as f32).ceil() as i32).min(height);
                (x0, x1, y0..y1)
            }
            None => (0, 0, 0..0),
        };

        let mut buffer = SparseCoverageBuffer::new();
        let mut crossings = Vec::new();
        let mut spans = Vec::new();

        let rows = if bounded { y_range.clone() } else { 0..height };
        for y in rows {
            let in_extents = y_range.contains(&y) && x0 < x1;

            if in_extents {
                buffer.reset((x1 - x0) as u32);

                // Two scaled rows per destination row, four sub-scanlines
                // each.
                for r in 0..SCALE {
                    let row_base = (y * SCALE + r) as f32;
                    for k in 0..SUB_SCANLINES {
                        let sample_y = row_base + (2 * k + 1) as f32 / (2 * SUB_SCANLINES) as f32;
                        polygon.spans(sample_y, self.fill_rule, &mut crossings, &mut spans);
                        for &(sx0, sx1) in spans.iter() {
                            add_scaled_span(&mut buffer, x0, sx0, sx1);
                        }
                    }
                }
            } else if bounded {
                continue;
            } else {
                buffer.reset(0);
            }

            if !bounded {
                // Everything left of the extents, and whole rows outside
                // them.
                let lead = if in_extents { x0 } else { width };
                if lead > 0 {
                    self.composite(surface, 0, y, lead as u32, Coverage::Uniform(0));
                }
            }

            let mut run_cursor = x0;
            let mut overflow = false;
            buffer.for_each_run(|run_x, len, cover| {
                let x = x0 + run_x as i32;
                run_cursor = x + len as i32;
                overflow |= cover > FULL_COVERAGE;
                if cover == 0 {
                    if !bounded {
                        self.composite(surface, x, y, len, Coverage::Uniform(0));
                    }
                    return;
                }

                let coverage = if cover >= FULL_COVERAGE {
                    Coverage::Full
                } else {
                    // a = cov · (256 / 16) − 1
                    let alpha = (cover as u32 * 256 / FULL_COVERAGE as u32).saturating_sub(1);
                    Coverage::Uniform(alpha.min(255) as u8)
                };
                self.composite(surface, x, y, len, coverage);
            });

            // The fill rule keeps spans disjoint within a sub-scanline, so
            // no pixel can collect more than one unit per subsample.
            if overflow {
                return Err(InternalError::CoverageOverflow.into());
            }

            if !bounded && in_extents && run_cursor < width {
                self.composite(
                    surface,
                    run_cursor,
                    y,
                    (width - run_cursor) as u32,
                    Coverage::Uniform(0),
                );
            }
        }

        Ok(())
    }

    #[inline]
    fn composite(&self, surface: &mut Surface, x: i32, y: i32, len: u32, coverage: Coverage) {
        StrideCompositor::run(
            surface,
            x,
            y,
            len,
            self.source,
            self.operator,
            coverage,
            self.precision,
        );
    }
}

/// Adds a span given in scaled (2×) x coordinates to a destination-indexed
/// coverage buffer: each covered scaled cell contributes one unit to the
/// destination pixel containing it.
fn add_scaled_span(buffer: &mut SparseCoverageBuffer, dest_x0: i32, sx0: i32, sx1: i32) {
    let origin = dest_x0 * SCALE;
    let mut s = sx0.max(origin) - origin;
    let mut e = (sx1 - origin).min(buffer.capacity() as i32 * SCALE);
    if s >= e {
        return;
    }

    if s % 2 != 0 {
        buffer.add_span(s / 2, 1);
        s += 1;
    }
    if e % 2 != 0 {
        e -= 1;
        buffer.add_span(e / 2, 1);
    }
    if s < e {
        let len = ((e - s) / 2) as u32;
        buffer.add_span(s / 2, len);
        buffer.add_span(s / 2, len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::FillPlotter;
    use crate::pixel::{Format, PremulColor};
    use stipple_path::math::point;
    use stipple_path::Path;

    fn red() -> PremulColor {
        PremulColor::new(255, 0, 0, 255)
    }

    fn rasterize(path: &Path, operator: Operator, surface: &mut Surface) {
        let polygon = FillPlotter::new(0.1).plot(path.iter(), SCALE as u32).unwrap();
        let source = Source::Pixel(red());
        MultisampleRasterizer {
            source: &source,
            fill_rule: FillRule::NonZero,
            operator,
            precision: Precision::Integer,
        }
        .rasterize(surface, &polygon)
        .unwrap();
    }

    #[test]
    fn scaled_span_accumulates_to_full() {
        let mut buffer = SparseCoverageBuffer::new();
        buffer.reset(4);
        // 16 walks over a fully covered pixel row: 8 sub-scanlines adding
        // both scaled cells of each pixel.
        for _ in 0..8 {
            add_scaled_span(&mut buffer, 0, 0, 8);
        }
        buffer.for_each_run(|_, _, cover| assert_eq!(cover, FULL_COVERAGE));
    }

    #[test]
    fn scaled_span_partial_cells() {
        let mut buffer = SparseCoverageBuffer::new();
        buffer.reset(4);
        // Scaled span [1, 6): half of pixel 0, all of pixels 1 and 2.
        add_scaled_span(&mut buffer, 0, 1, 6);

        let mut runs = Vec::new();
        buffer.for_each_run(|x, len, cover| runs.push((x, len, cover)));
        assert_eq!(runs, [(0, 1, 1), (1, 2, 2), (3, 1, 0)]);
    }

    #[test]
    fn aligned_rectangle_is_opaque_inside() {
        let mut builder = Path::builder();
        builder.begin(point(2.0, 2.0));
        builder.line_to(point(8.0, 2.0));
        builder.line_to(point(8.0, 6.0));
        builder.line_to(point(2.0, 6.0));
        builder.close();

        let mut surface = Surface::new(Format::Rgba8, 10, 10);
        rasterize(&builder.build(), Operator::SrcOver, &mut surface);

        assert_eq!(surface.get_pixel(4, 4), red());
        assert_eq!(surface.get_pixel(2, 5), red());
        assert_eq!(surface.get_pixel(1, 4), PremulColor::TRANSPARENT);
        assert_eq!(surface.get_pixel(4, 6), PremulColor::TRANSPARENT);
    }

    #[test]
    fn edge_pixels_get_partial_coverage() {
        let mut builder = Path::builder();
        builder.begin(point(0.0, 0.0));
        builder.line_to(point(8.0, 0.0));
        builder.line_to(point(0.0, 8.0));
        builder.close();

        let mut surface = Surface::new(Format::Rgba8, 8, 8);
        rasterize(&builder.build(), Operator::SrcOver, &mut surface);

        assert_eq!(surface.get_pixel(1, 1), red());
        assert_eq!(surface.get_pixel(7, 7), PremulColor::TRANSPARENT);
        let edge = surface.get_pixel(3, 4);
        assert!(edge.a > 0 && edge.a < 255, "alpha {}", edge.a);
    }

    #[test]
    fn unbounded_operator_touches_whole_surface() {
        let blue = PremulColor::new(0, 0, 255, 255);
        let mut builder = Path::builder();
        builder.begin(point(2.0, 2.0));
        builder.line_to(point(6.0, 2.0));
        builder.line_to(point(6.0, 6.0));
        builder.line_to(point(2.0, 6.0));
        builder.close();

        let mut surface = Surface::new(Format::Rgba8, 10, 10);
        surface.fill(blue);
        rasterize(&builder.build(), Operator::Src, &mut surface);

        assert_eq!(surface.get_pixel(4, 4), red());
        assert_eq!(surface.get_pixel(0, 0), PremulColor::TRANSPARENT);
        assert_eq!(surface.get_pixel(9, 9), PremulColor::TRANSPARENT);
        assert_eq!(surface.get_pixel(8, 4), PremulColor::TRANSPARENT);
    }
}
