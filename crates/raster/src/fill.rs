//! Turns a closed path into a polygon of scanline edges.

use crate::error::PaintError;
use crate::polygon::Polygon;
use crate::MIN_TOLERANCE;

use stipple_path::geom::{CubicBezierSegment, QuadraticBezierSegment};
use stipple_path::math::Point;
use stipple_path::PathEvent;

/// Plots a path into a [Polygon] for filling.
///
/// Every subpath must be closed; curves are flattened to the plotter's
/// tolerance. The polygon's edges end up in the coordinate space of the
/// rasterizer that will consume it (`scale` of 1, 2 or 4).
pub struct FillPlotter {
    tolerance: f32,
}

impl FillPlotter {
    pub fn new(tolerance: f32) -> Self {
        FillPlotter {
            tolerance: tolerance.max(MIN_TOLERANCE),
        }
    }

    pub fn plot(
        &self,
        path: impl IntoIterator<Item = PathEvent>,
        scale: u32,
    ) -> Result<Polygon, PaintError> {
        let mut polygon = Polygon::new(scale);

        for event in path {
            match event {
                PathEvent::Begin { .. } => {}
                PathEvent::Line { from, to } => {
                    polygon.add_edge(from, to);
                }
                PathEvent::Quadratic { from, ctrl, to } => {
                    let curve = QuadraticBezierSegment { from, ctrl, to };
                    curve.for_each_flattened(self.tolerance, &mut |segment| {
                        polygon.add_edge(segment.from, segment.to);
                    });
                }
                PathEvent::Cubic {
                    from,
                    ctrl1,
                    ctrl2,
                    to,
                } => {
                    let curve = CubicBezierSegment {
                        from,
                        ctrl1,
                        ctrl2,
                        to,
                    };
                    curve.for_each_flattened(self.tolerance, &mut |segment| {
                        polygon.add_edge(segment.from, segment.to);
                    });
                }
                PathEvent::End { last, first, close } => {
                    if close {
                        add_closing_edge(&mut polygon, last, first);
                    } else if last != first {
                        return Err(PaintError::PathNotClosed);
                    }
                }
            }
        }

        Ok(polygon)
    }
}

fn add_closing_edge(polygon: &mut Polygon, last: Point, first: Point) {
    if last != first {
        polygon.add_edge(last, first);
    }
}
