//! The stroke plotter: expands a path into the polygon of its stroked
//! outline.
//!
//! The plotter works in three stages. The path is first flattened into
//! contours (polylines in user space, with the join mode recorded per
//! vertex). A dash pattern, when present, then cuts the contours into open
//! pieces. Finally every contour is expanded: each segment gets a
//! [Face](crate::face::Face) carrying its offset edges, joins are emitted
//! between consecutive faces, and caps close the open ends. The resulting
//! rings fill to the stroked shape under the non-zero rule.

use crate::dasher::Dasher;
use crate::error::PaintError;
use crate::face::Face;
use crate::pen::Pen;
use crate::polygon::Polygon;
use crate::{StrokeOptions, MIN_STROKE_WIDTH, MIN_TOLERANCE};

use stipple_path::geom::{CubicBezierSegment, QuadraticBezierSegment};
use stipple_path::math::{vector, Point, Transform, Vector};
use stipple_path::{LineCap, LineJoin, PathEvent};

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// A flattened subpath in user space.
///
/// `joins[i]` is the join mode applied at vertex `i`; vertices introduced
/// by curve flattening always join rounded.
#[derive(Clone, Debug)]
pub(crate) struct Contour {
    pub points: Vec<Point>,
    pub joins: Vec<LineJoin>,
    pub closed: bool,
}

impl Contour {
    fn new() -> Self {
        Contour {
            points: Vec::new(),
            joins: Vec::new(),
            closed: false,
        }
    }

    fn push(&mut self, point: Point, join: LineJoin) {
        // Zero-length segments are dropped at ingest.
        if self.points.last() == Some(&point) {
            return;
        }
        self.points.push(point);
        self.joins.push(join);
    }
}

/// Flattens a path into contours, forcing round joins at the vertices
/// curve flattening introduces.
pub(crate) fn flatten_contours(
    path: impl IntoIterator<Item = PathEvent>,
    line_join: LineJoin,
    tolerance: f32,
) -> Vec<Contour> {
    let tolerance = tolerance.max(MIN_TOLERANCE);
    let mut contours = Vec::new();
    let mut current = Contour::new();

    for event in path {
        match event {
            PathEvent::Begin { at } => {
                current.push(at, line_join);
            }
            PathEvent::Line { to, .. } => {
                current.push(to, line_join);
            }
            PathEvent::Quadratic { from, ctrl, to } => {
                round_current_join(&mut current);
                let curve = QuadraticBezierSegment { from, ctrl, to };
                curve.for_each_flattened(tolerance, &mut |segment| {
                    current.push(segment.to, LineJoin::Round);
                });
            }
            PathEvent::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                round_current_join(&mut current);
                let curve = CubicBezierSegment {
                    from,
                    ctrl1,
                    ctrl2,
                    to,
                };
                curve.for_each_flattened(tolerance, &mut |segment| {
                    current.push(segment.to, LineJoin::Round);
                });
            }
            PathEvent::End { first, close, .. } => {
                let mut contour = core::mem::replace(&mut current, Contour::new());
                if close {
                    // The closing edge back to the first point is implicit;
                    // drop a duplicated end point.
                    if contour.points.last() == Some(&first) && contour.points.len() > 1 {
                        contour.points.pop();
                        contour.joins.pop();
                    }
                    contour.closed = true;
                }
                if !contour.points.is_empty() {
                    contours.push(contour);
                }
            }
        }
    }

    contours
}

/// A curve joins its incoming neighbor with a round join.
fn round_current_join(contour: &mut Contour) {
    if let Some(join) = contour.joins.last_mut() {
        *join = LineJoin::Round;
    }
}

/// Cuts contours into open on-pieces following the dash pattern. The
/// dasher state carries over from one contour to the next only through
/// `reset`, so every subpath starts at the configured offset.
pub(crate) fn dash_contours(contours: &[Contour], dasher: &mut Dasher) -> Vec<Contour> {
    let mut out = Vec::new();

    for contour in contours {
        dasher.reset();
        let mut current: Option<Contour> = None;

        let n = contour.points.len();
        let segments = if contour.closed { n } else { n.saturating_sub(1) };

        for s in 0..segments {
            let a = contour.points[s];
            let b = contour.points[(s + 1) % n];
            let join_at_b = contour.joins[(s + 1) % n];
            let seg = b - a;
            let len = seg.length();
            if len == 0.0 {
                continue;
            }
            let dir = seg / len;

            let mut pos = 0.0f32;
            while pos < len {
                if dasher.remaining() == 0.0 {
                    // A zero-length stop; an "on" one is a dot.
                    if dasher.on() {
                        let mut dot = Contour::new();
                        dot.push(a + dir * pos, LineJoin::Round);
                        out.push(dot);
                    }
                    dasher.step(0.0);
                    continue;
                }

                let d = (len - pos).min(dasher.remaining());
                let was_on = dasher.on();

                if was_on {
                    let piece = current.get_or_insert_with(|| {
                        let mut piece = Contour::new();
                        piece.push(a + dir * pos, join_at_b);
                        piece
                    });
                    piece.push(a + dir * (pos + d), join_at_b);
                }

                let crossed = dasher.step(d);
                pos += d;

                if crossed && was_on {
                    if let Some(piece) = current.take() {
                        out.push(piece);
                    }
                }
            }

            // A pending zero-length "on" stop lands exactly on the segment
            // end.
            if dasher.remaining() == 0.0 && dasher.on() {
                let mut dot = Contour::new();
                dot.push(b, LineJoin::Round);
                out.push(dot);
                dasher.step(0.0);
            }
        }

        if let Some(piece) = current.take() {
            out.push(piece);
        }
    }

    out
}

/// Expands a path into a stroked-outline polygon.
pub struct StrokePlotter {
    line_cap: LineCap,
    line_join: LineJoin,
    line_width: f32,
    miter_limit: f32,
    tolerance: f32,
    ctm: Transform,
    identity: bool,
    det_flip: bool,
    dashes: Vec<f32>,
    dash_offset: f32,
    pen: Pen,
    log: bool,
}

impl StrokePlotter {
    pub fn new(options: &StrokeOptions) -> Result<Self, PaintError> {
        let identity = options.transformation == Transform::identity();
        if !identity && options.transformation.inverse().is_none() {
            return Err(PaintError::InvalidMatrix);
        }

        let line_width = options.line_width.max(MIN_STROKE_WIDTH);
        let tolerance = options.tolerance.max(MIN_TOLERANCE);

        // Thin strokes degrade to the simplest cap and join to avoid
        // self-intersection artifacts in the offset rings.
        let (line_cap, line_join, miter_limit) = if options.line_width < 2.0 {
            (LineCap::Butt, LineJoin::Miter, 10.0)
        } else {
            (options.line_cap, options.line_join, options.miter_limit)
        };

        Ok(StrokePlotter {
            line_cap,
            line_join,
            line_width,
            miter_limit,
            tolerance,
            ctm: options.transformation,
            identity,
            det_flip: !identity && options.transformation.determinant() < 0.0,
            dashes: options.dashes.clone(),
            dash_offset: options.dash_offset,
            pen: Pen::new(line_width / 2.0, tolerance),
            log: false,
        })
    }

    /// Enable verbose debugging output (debug builds only).
    pub fn set_logging(&mut self, is_enabled: bool) {
        self.log = is_enabled;
    }

    /// Plots the stroked outline of `path` into a polygon scaled for the
    /// consuming rasterizer.
    pub fn plot(
        &self,
        path: impl IntoIterator<Item = PathEvent>,
        scale: u32,
    ) -> Result<Polygon, PaintError> {
        let mut polygon = Polygon::new(scale);

        let mut contours = flatten_contours(path, self.line_join, self.tolerance);

        if Dasher::validate(&self.dashes) {
            let mut dasher = Dasher::new(&self.dashes, self.dash_offset);
            contours = dash_contours(&contours, &mut dasher);
        }

        raster_log!(self, "stroke: {} contours", contours.len());

        for contour in &contours {
            raster_log!(
                self,
                "  contour: {} points, closed: {}",
                contour.points.len(),
                contour.closed
            );
            self.stroke_contour(contour, &mut polygon);
        }

        Ok(polygon)
    }

    fn stroke_contour(&self, contour: &Contour, polygon: &mut Polygon) {
        let points = &contour.points;

        if points.len() < 2 {
            if let Some(&center) = points.first() {
                self.plot_dot(center, polygon);
            }
            return;
        }

        let closed = contour.closed && points.len() >= 3;

        let mut faces = Vec::with_capacity(points.len());
        let n = points.len();
        let segments = if closed { n } else { n - 1 };
        for s in 0..segments {
            if let Some(face) = Face::new(
                points[s],
                points[(s + 1) % n],
                self.line_width,
                &self.ctm,
                self.identity,
            ) {
                faces.push(face);
            }
        }

        if faces.is_empty() {
            self.plot_dot(points[0], polygon);
            return;
        }

        let mut cw_chain: Vec<Point> = Vec::new();
        let mut ccw_chain: Vec<Point> = Vec::new();

        if closed {
            let m = faces.len();
            for k in 0..m {
                let in_face = &faces[(k + m - 1) % m];
                let out_face = &faces[k];
                self.join(
                    in_face,
                    out_face,
                    contour.joins[k % contour.joins.len()],
                    &mut cw_chain,
                    &mut ccw_chain,
                );
            }

            add_ring(polygon, &cw_chain);
            ccw_chain.reverse();
            add_ring(polygon, &ccw_chain);
            return;
        }

        let first = &faces[0];
        cw_chain.push(first.p0_cw());
        ccw_chain.push(first.p0_ccw());

        for k in 1..faces.len() {
            self.join(
                &faces[k - 1],
                &faces[k],
                contour.joins[k],
                &mut cw_chain,
                &mut ccw_chain,
            );
        }

        let last = &faces[faces.len() - 1];
        cw_chain.push(last.p1_cw());
        ccw_chain.push(last.p1_ccw());

        // Assemble the outline ring: down the cw side, around the end cap,
        // back up the ccw side and around the start cap.
        let mut ring = cw_chain;
        self.cap(last, true, &mut ring);
        ring.extend(ccw_chain.iter().rev());
        self.cap(first, false, &mut ring);

        add_ring(polygon, &ring);
    }

    /// Emits the join at the vertex between two faces into both side
    /// chains.
    fn join(
        &self,
        in_face: &Face,
        out_face: &Face,
        mode: LineJoin,
        cw_chain: &mut Vec<Point>,
        ccw_chain: &mut Vec<Point>,
    ) {
        let cross = in_face.user_slope.cross(out_face.user_slope);
        let dot = in_face.user_slope.dot(out_face.user_slope);

        if cross.abs() < 1e-6 {
            if dot > 0.0 {
                // Colinear; elide the join.
                cw_chain.push(in_face.p1_cw());
                ccw_chain.push(in_face.p1_ccw());
            } else {
                // A full reversal has no intersection point on either side;
                // bevel both.
                cw_chain.push(in_face.p1_cw());
                cw_chain.push(out_face.p0_cw());
                ccw_chain.push(in_face.p1_ccw());
                ccw_chain.push(out_face.p0_ccw());
            }
            return;
        }

        let outer_is_cw = cross > 0.0;
        let inner_point = in_face.intersect(out_face, !outer_is_cw);
        let (outer_chain, inner_chain) = if outer_is_cw {
            (cw_chain, ccw_chain)
        } else {
            (ccw_chain, cw_chain)
        };
        inner_chain.push(inner_point);

        match mode {
            LineJoin::Miter => {
                let apex = in_face.intersect(out_face, outer_is_cw);
                let ratio = (apex - inner_point).length() / self.line_width;
                if ratio <= self.miter_limit {
                    outer_chain.push(apex);
                } else {
                    outer_chain.push(in_face.end_on_side(outer_is_cw));
                    outer_chain.push(out_face.start_on_side(outer_is_cw));
                }
            }
            LineJoin::Bevel => {
                outer_chain.push(in_face.end_on_side(outer_is_cw));
                outer_chain.push(out_face.start_on_side(outer_is_cw));
            }
            LineJoin::Round => {
                outer_chain.push(in_face.end_on_side(outer_is_cw));

                // An arc narrower than the pen's vertex spacing emits no
                // vertices and leaves the surrounding bevel in place.
                let center = in_face.p1;
                let from = radial(in_face.user_slope, outer_is_cw);
                let to = radial(out_face.user_slope, outer_is_cw);
                self.pen.arc_between(from, to, cross > 0.0, &mut |offset| {
                    outer_chain.push(center + self.warp(offset));
                });

                outer_chain.push(out_face.start_on_side(outer_is_cw));
            }
        }
    }

    /// Emits the cap points closing the outline at a face end. For the end
    /// cap the ring arrives on the cw side and leaves on the ccw side; the
    /// start cap is the mirror image.
    fn cap(&self, face: &Face, at_end: bool, ring: &mut Vec<Point>) {
        match self.line_cap {
            LineCap::Butt => {}
            LineCap::Square => {
                if at_end {
                    ring.push(face.p1_cw() + face.extend);
                    ring.push(face.p1_ccw() + face.extend);
                } else {
                    ring.push(face.p0_ccw() - face.extend);
                    ring.push(face.p0_cw() - face.extend);
                }
            }
            LineCap::Round => {
                let slope = face.user_slope;
                let (center, from, to) = if at_end {
                    (face.p1, radial(slope, true), radial(slope, false))
                } else {
                    (face.p0, radial(slope, false), radial(slope, true))
                };
                self.pen.arc_between(from, to, true, &mut |offset| {
                    ring.push(center + self.warp(offset));
                });
            }
        }
    }

    /// A full pen disc for an isolated point; only round caps make a
    /// degenerate subpath visible.
    fn plot_dot(&self, center: Point, polygon: &mut Polygon) {
        if self.line_cap != LineCap::Round {
            return;
        }

        let center = if self.identity {
            center
        } else {
            self.ctm.transform_point(center)
        };

        let mut ring = Vec::with_capacity(self.pen.num_vertices());
        for &offset in self.pen.offsets() {
            ring.push(center + self.warp(offset));
        }
        add_ring(polygon, &ring);
    }

    /// Warps a pen offset into device space, keeping the side convention
    /// under reflection.
    #[inline]
    fn warp(&self, offset: Vector) -> Vector {
        if self.identity {
            return offset;
        }
        let v = self.ctm.transform_vector(offset);
        if self.det_flip {
            -v
        } else {
            v
        }
    }
}

/// The radial direction of the offset point on one side of a face.
#[inline]
fn radial(slope: Vector, clockwise: bool) -> Vector {
    if clockwise {
        vector(slope.y, -slope.x)
    } else {
        vector(-slope.y, slope.x)
    }
}

fn add_ring(polygon: &mut Polygon, points: &[Point]) {
    if points.len() < 3 {
        return;
    }
    for i in 0..points.len() {
        polygon.add_edge(points[i], points[(i + 1) % points.len()]);
    }
}
