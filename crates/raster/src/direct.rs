//! The aliased rasterizer: one mid-line sample per scanline, no coverage.

use crate::compositor::{Coverage, Precision, StrideCompositor};
use crate::operator::Operator;
use crate::pattern::Source;
use crate::polygon::Polygon;
use crate::surface::Surface;
use crate::FillRule;

use alloc::vec::Vec;

pub(crate) struct DirectRasterizer<'l> {
    pub source: &'l Source<'l>,
    pub fill_rule: FillRule,
    pub operator: Operator,
    pub precision: Precision,
}

impl<'l> DirectRasterizer<'l> {
    /// Fills the polygon (scale 1) span by span. Unbounded operators paint
    /// the whole surface, clearing everything outside the spans.
    pub fn rasterize(&self, surface: &mut Surface, polygon: &Polygon) {
        debug_assert!(polygon.scale() == 1);

        let width = surface.width() as i32;
        let height = surface.height() as i32;
        let bounded = self.operator.is_bounded();

        let range = polygon.scanline_range();
        let (y_start, y_end) = if bounded {
            (range.start.max(0), range.end.min(height))
        } else {
            (0, height)
        };

        let mut crossings = Vec::new();
        let mut spans = Vec::new();

        for y in y_start..y_end {
            polygon.spans(y as f32 + 0.5, self.fill_rule, &mut crossings, &mut spans);

            let mut cursor = 0;
            for &(x0, x1) in spans.iter() {
                let x0 = x0.max(0).min(width);
                let x1 = x1.max(0).min(width);

                if !bounded && x0 > cursor {
                    self.clear_run(surface, cursor, y, x0);
                }
                if x1 > x0 {
                    StrideCompositor::run(
                        surface,
                        x0,
                        y,
                        (x1 - x0) as u32,
                        self.source,
                        self.operator,
                        Coverage::Full,
                        self.precision,
                    );
                }
                cursor = cursor.max(x1);
            }

            if !bounded && cursor < width {
                self.clear_run(surface, cursor, y, width);
            }
        }
    }

    /// An unbounded operator applied with a fully transparent source; for
    /// every unbounded operator this resolves to clearing the pixels.
    fn clear_run(&self, surface: &mut Surface, x0: i32, y: i32, x1: i32) {
        StrideCompositor::run(
            surface,
            x0,
            y,
            (x1 - x0) as u32,
            self.source,
            self.operator,
            Coverage::Uniform(0),
            self.precision,
        );
    }
}
