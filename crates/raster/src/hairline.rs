//! Single-pixel-wide strokes, written straight to the surface.
//!
//! Hairlines skip the face/join/cap machinery and the polygon rasterizers
//! entirely: each flattened (and possibly dashed) polyline segment becomes
//! pixel runs along its major axis. With anti-aliasing enabled the runs
//! split their coverage between the two nearest pixels, Wu style.

use crate::compositor::{Coverage, Precision, StrideCompositor};
use crate::operator::Operator;
use crate::pattern::Source;
use crate::stroke::Contour;
use crate::surface::Surface;

use stipple_path::math::{Point, Transform};

#[cfg(not(feature = "std"))]
use num_traits::Float;

pub(crate) struct HairlineRasterizer<'l> {
    pub source: &'l Source<'l>,
    pub operator: Operator,
    pub precision: Precision,
    pub anti_alias: bool,
}

impl<'l> HairlineRasterizer<'l> {
    pub fn rasterize(
        &self,
        surface: &mut Surface,
        contours: &[Contour],
        ctm: &Transform,
        identity: bool,
    ) {
        for contour in contours {
            let n = contour.points.len();
            if n == 0 {
                continue;
            }

            let segments = if contour.closed { n } else { n - 1 };
            for s in 0..segments {
                let mut p0 = contour.points[s];
                let mut p1 = contour.points[(s + 1) % n];
                if !identity {
                    p0 = ctm.transform_point(p0);
                    p1 = ctm.transform_point(p1);
                }
                self.line(surface, p0, p1);
            }

            // An isolated point paints its single pixel.
            if segments == 0 {
                let p = if identity {
                    contour.points[0]
                } else {
                    ctm.transform_point(contour.points[0])
                };
                self.line(surface, p, p);
            }
        }
    }

    fn line(&self, surface: &mut Surface, p0: Point, p1: Point) {
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;

        if dx.abs() >= dy.abs() {
            // Mostly horizontal; walk x left to right and batch pixels
            // sharing a row into runs.
            let (a, b) = if p0.x <= p1.x { (p0, p1) } else { (p1, p0) };
            let x0 = a.x.round() as i32;
            let x1 = b.x.round() as i32;
            let slope = if dx == 0.0 { 0.0 } else { dy / dx };

            if self.anti_alias {
                for x in x0..=x1 {
                    let y = a.y + slope * (x as f32 - a.x);
                    self.coverage_pair(surface, x, y, false);
                }
                return;
            }

            let mut run_start = x0;
            let mut run_y = (a.y + slope * (x0 as f32 - a.x)).round() as i32;
            for x in (x0 + 1)..=x1 {
                let y = (a.y + slope * (x as f32 - a.x)).round() as i32;
                if y != run_y {
                    self.run(surface, run_start, run_y, x - run_start);
                    run_start = x;
                    run_y = y;
                }
            }
            self.run(surface, run_start, run_y, x1 - run_start + 1);
        } else {
            // Mostly vertical; walk y top to bottom.
            let (a, b) = if p0.y <= p1.y { (p0, p1) } else { (p1, p0) };
            let y0 = a.y.round() as i32;
            let y1 = b.y.round() as i32;
            let slope = dx / dy;

            for y in y0..=y1 {
                let x = a.x + slope * (y as f32 - a.y);
                if self.anti_alias {
                    self.coverage_pair(surface, y, x, true);
                } else {
                    self.run(surface, x.round() as i32, y, 1);
                }
            }
        }
    }

    /// Splits full coverage between the two pixels nearest to a fractional
    /// minor-axis position.
    fn coverage_pair(&self, surface: &mut Surface, major: i32, minor: f32, vertical: bool) {
        let base = minor.floor();
        let frac = minor - base;
        let near = ((1.0 - frac) * 255.0 + 0.5) as u8;
        let far = 255 - near;

        let lo = base as i32;
        for (m, alpha) in [(lo, near), (lo + 1, far)] {
            if alpha == 0 {
                continue;
            }
            let (x, y) = if vertical { (m, major) } else { (major, m) };
            StrideCompositor::run(
                surface,
                x,
                y,
                1,
                self.source,
                self.operator,
                Coverage::Uniform(alpha),
                self.precision,
            );
        }
    }

    fn run(&self, surface: &mut Surface, x: i32, y: i32, len: i32) {
        if len <= 0 || y < 0 || y >= surface.height() as i32 {
            return;
        }
        let x0 = x.max(0);
        let x1 = (x + len).min(surface.width() as i32);
        if x0 >= x1 {
            return;
        }

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
}
