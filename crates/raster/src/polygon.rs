//! The flat edge-set representation filled by the scanline rasterizers.

use crate::FillRule;

use stipple_path::math::{point, Box2D, Point};

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// A non-horizontal polygon edge in scaled device space.
///
/// `top < bottom` holds strictly; horizontal segments are dropped at ingest.
/// `dir` records the direction of the source segment: `+1` going down, `-1`
/// going up. The winding accumulation of the non-zero fill rule sums it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub top: f32,
    pub bottom: f32,
    /// The x position at `top`.
    pub x: f32,
    /// How much x moves per unit of y.
    pub dxdy: f32,
    pub dir: i16,
}

impl Edge {
    /// The x position at a given scanline sample, clamped into the edge's
    /// horizontal range to keep float error from leaking outside it.
    #[inline]
    fn x_at(&self, y: f32) -> f32 {
        let x = self.x + self.dxdy * (y - self.top);
        let x_end = self.x + self.dxdy * (self.bottom - self.top);
        x.max(self.x.min(x_end)).min(self.x.max(x_end))
    }
}

/// An unordered set of edges with an axis-aligned extent rectangle.
///
/// Coordinates are stored already multiplied by the sampling `scale` of the
/// rasterizer that will consume the polygon (1 for aliased output, 2 for
/// multisampling, 4 for supersampling).
#[derive(Clone, Debug, Default)]
pub struct Polygon {
    edges: Vec<Edge>,
    scale: u32,
    extents: Option<Box2D>,
}

impl Polygon {
    pub fn new(scale: u32) -> Self {
        debug_assert!(scale >= 1);
        Polygon {
            edges: Vec::new(),
            scale,
            extents: None,
        }
    }

    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale.max(1)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The extents of the edge set, in scaled space.
    pub fn extents(&self) -> Option<Box2D> {
        self.extents
    }

    /// Adds the edge between two unscaled device-space points, dropping
    /// horizontal segments.
    pub fn add_edge(&mut self, from: Point, to: Point) {
        debug_assert!(from.x.is_finite() && from.y.is_finite());
        debug_assert!(to.x.is_finite() && to.y.is_finite());

        let s = self.scale.max(1) as f32;
        let from = point(from.x * s, from.y * s);
        let to = point(to.x * s, to.y * s);

        match self.extents {
            Some(ref mut extents) => {
                extents.min.x = extents.min.x.min(from.x).min(to.x);
                extents.min.y = extents.min.y.min(from.y).min(to.y);
                extents.max.x = extents.max.x.max(from.x).max(to.x);
                extents.max.y = extents.max.y.max(from.y).max(to.y);
            }
            None => {
                self.extents = Some(Box2D {
                    min: point(from.x.min(to.x), from.y.min(to.y)),
                    max: point(from.x.max(to.x), from.y.max(to.y)),
                });
            }
        }

        if from.y == to.y {
            return;
        }

        let (top_p, bottom_p, dir) = if from.y < to.y {
            (from, to, 1)
        } else {
            (to, from, -1)
        };

        self.edges.push(Edge {
            top: top_p.y,
            bottom: bottom_p.y,
            x: top_p.x,
            dxdy: (bottom_p.x - top_p.x) / (bottom_p.y - top_p.y),
            dir,
        });
    }

    /// Whether the polygon would produce at least one pixel on a `width` ×
    /// `height` destination surface.
    pub fn in_box(&self, width: u32, height: u32) -> bool {
        let extents = match self.extents {
            Some(e) => e,
            None => return false,
        };
        if self.edges.is_empty() {
            return false;
        }

        let s = self.scale.max(1) as f32;
        let left = extents.min.x / s;
        let right = extents.max.x / s;
        let top = extents.min.y / s;
        let bottom = extents.max.y / s;

        if right <= 0.0 || bottom <= 0.0 || left >= width as f32 || top >= height as f32 {
            return false;
        }

        // With one sample per pixel a sub-pixel sliver can miss every
        // sample; the anti-aliased lattices always catch some coverage.
        if self.scale() == 1 {
            // Every crossing of a degenerate column rounds to the same x,
            // so no span can open.
            if left.round() == right.round() {
                return false;
            }

            // No mid-line sample falls between top and bottom.
            let first_sample = (top - 0.5).ceil() + 0.5;
            if first_sample >= bottom {
                return false;
            }
        }

        true
    }

    /// The scanline range to walk, in scaled space.
    pub fn scanline_range(&self) -> core::ops::Range<i32> {
        match self.extents {
            Some(e) => (e.min.y.floor() as i32).max(0)..(e.max.y.ceil() as i32),
            None => 0..0,
        }
    }

    /// Collects the x crossings of the scanline sampled at `sample_y` into
    /// `crossings`, sorted by x. Each crossing carries the direction of its
    /// edge for winding accumulation.
    pub fn x_crossings(&self, sample_y: f32, crossings: &mut Vec<(i32, i16)>) {
        crossings.clear();

        for edge in &self.edges {
            if edge.top <= sample_y && sample_y < edge.bottom {
                let x = edge.x_at(sample_y).round() as i32;
                crossings.push((x, edge.dir));
            }
        }

        crossings.sort_unstable_by_key(|&(x, _)| x);
    }

    /// Produces the filled spans `[start, end)` of a scanline under a fill
    /// rule. `crossings` is caller-provided scratch, reused across
    /// scanlines.
    pub fn spans(
        &self,
        sample_y: f32,
        fill_rule: FillRule,
        crossings: &mut Vec<(i32, i16)>,
        spans: &mut Vec<(i32, i32)>,
    ) {
        spans.clear();
        self.x_crossings(sample_y, crossings);

        match fill_rule {
            FillRule::EvenOdd => {
                let mut i = 0;
                while i + 1 < crossings.len() {
                    let (x0, _) = crossings[i];
                    let (x1, _) = crossings[i + 1];
                    if x0 != x1 {
                        spans.push((x0, x1));
                    }
                    i += 2;
                }
            }
            FillRule::NonZero => {
                let mut winding: i16 = 0;
                let mut span_start = 0;
                for &(x, dir) in crossings.iter() {
                    let was_in = winding != 0;
                    winding += dir;
                    let is_in = winding != 0;

                    if !was_in && is_in {
                        span_start = x;
                    } else if was_in && !is_in && span_start != x {
                        spans.push((span_start, x));
                    }
                }
            }
        }
    }
}
