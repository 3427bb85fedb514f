use crate::quadratic_bezier::MAX_SPLIT_DEPTH;
use crate::scalar::Scalar;
use crate::{LineSegment, Point};

/// A cubic bézier curve segment: two endpoints and two control points.
///
/// Position along the curve follows the Bernstein form
/// `P(t) = (1-t)³·from + 3t(1-t)²·ctrl1 + 3t²(1-t)·ctrl2 + t³·to` for `t`
/// in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl1: Point<S>,
    pub ctrl2: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> CubicBezierSegment<S> {
    /// Samples the curve position at `t`, expected in `[0, 1]`.
    pub fn sample(&self, t: S) -> Point<S> {
        let u = S::ONE - t;
        let uu = u * u;
        let tt = t * t;

        self.from * (uu * u)
            + self.ctrl1.to_vector() * (S::THREE * uu * t)
            + self.ctrl2.to_vector() * (S::THREE * u * tt)
            + self.to.to_vector() * (tt * t)
    }

    /// The chord between this curve's endpoints.
    #[inline]
    pub fn baseline(&self) -> LineSegment<S> {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Splits the curve at its parametric midpoint.
    ///
    /// The two halves connect exactly: the first half ends on the point the
    /// second half starts with.
    pub fn split_in_half(&self) -> (Self, Self) {
        let ab = self.from.lerp(self.ctrl1, S::HALF);
        let bc = self.ctrl1.lerp(self.ctrl2, S::HALF);
        let cd = self.ctrl2.lerp(self.to, S::HALF);
        let abc = ab.lerp(bc, S::HALF);
        let bcd = bc.lerp(cd, S::HALF);
        let mid = abc.lerp(bcd, S::HALF);

        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ab,
                ctrl2: abc,
                to: mid,
            },
            CubicBezierSegment {
                from: mid,
                ctrl1: bcd,
                ctrl2: cd,
                to: self.to,
            },
        )
    }

    /// Whether replacing the curve with its chord stays within `tolerance`.
    ///
    /// The curve lies in the convex hull of its four points, so its
    /// deviation from the chord is bounded by the control points' distances
    /// to it. The test is conservative; it never reports a curve flat that
    /// strays further than the tolerance.
    pub fn is_flat(&self, tolerance: S) -> bool {
        let chord = self.baseline();
        let limit = tolerance * tolerance;

        chord.square_distance_to_point(self.ctrl1) <= limit
            && chord.square_distance_to_point(self.ctrl2) <= limit
    }

    /// Approximates the curve with a sequence of line segments.
    ///
    /// The `tolerance` parameter defines the maximum distance between the
    /// curve and its approximation. Segments are emitted in order and chain
    /// exactly from `from` to `to`.
    pub fn for_each_flattened<F: FnMut(&LineSegment<S>)>(&self, tolerance: S, callback: &mut F) {
        debug_assert!(tolerance > S::ZERO);
        flatten_recursive(self, tolerance, 0, callback);
    }
}

/// Subdivide until the chord is a good enough stand-in for the curve.
fn flatten_recursive<S: Scalar, F>(
    curve: &CubicBezierSegment<S>,
    tolerance: S,
    depth: u32,
    callback: &mut F,
) where
    F: FnMut(&LineSegment<S>),
{
    if depth >= MAX_SPLIT_DEPTH || curve.is_flat(tolerance) {
        callback(&curve.baseline());
        return;
    }

    let (head, tail) = curve.split_in_half();
    flatten_recursive(&head, tolerance, depth + 1, callback);
    flatten_recursive(&tail, tolerance, depth + 1, callback);
}
