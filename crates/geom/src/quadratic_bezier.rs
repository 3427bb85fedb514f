use crate::scalar::Scalar;
use crate::{LineSegment, Point};

/// How far a curve may be subdivided before flattening gives up and emits
/// the chord. Each split at least quarters the deviation, so this is a
/// backstop for degenerate inputs, not a quality limit.
pub(crate) const MAX_SPLIT_DEPTH: u32 = 16;

/// A quadratic bézier curve segment: two endpoints and one control point.
///
/// Position along the curve follows the Bernstein form
/// `P(t) = (1-t)²·from + 2t(1-t)·ctrl + t²·to` for `t` in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct QuadraticBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> QuadraticBezierSegment<S> {
    /// Samples the curve position at `t`, expected in `[0, 1]`.
    pub fn sample(&self, t: S) -> Point<S> {
        let u = S::ONE - t;

        self.from * (u * u)
            + self.ctrl.to_vector() * (S::TWO * u * t)
            + self.to.to_vector() * (t * t)
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
        let ctrl_a = self.from.lerp(self.ctrl, S::HALF);
        let ctrl_b = self.ctrl.lerp(self.to, S::HALF);
        let mid = ctrl_a.lerp(ctrl_b, S::HALF);

        (
            QuadraticBezierSegment {
                from: self.from,
                ctrl: ctrl_a,
                to: mid,
            },
            QuadraticBezierSegment {
                from: mid,
                ctrl: ctrl_b,
                to: self.to,
            },
        )
    }

    /// Whether replacing the curve with its chord stays within `tolerance`.
    ///
    /// The curve lies in the triangle of its three points, so its deviation
    /// from the chord is bounded by the control point's distance to it.
    /// The test is conservative; it never reports a curve flat that strays
    /// further than the tolerance.
    pub fn is_flat(&self, tolerance: S) -> bool {
        self.baseline().square_distance_to_point(self.ctrl) <= tolerance * tolerance
    }

    /// Approximates the curve with a sequence of line segments.
    ///
    /// The `tolerance` parameter defines the maximum distance between the
    /// curve and its approximation. Segments are emitted in order and chain
    /// exactly from `from` to `to`.
    pub fn for_each_flattened<F>(&self, tolerance: S, callback: &mut F)
    where
        F: FnMut(&LineSegment<S>),
    {
        debug_assert!(tolerance > S::ZERO);
        flatten_recursive(self, tolerance, 0, callback);
    }
}

/// Subdivide until the chord is a good enough stand-in for the curve.
fn flatten_recursive<S: Scalar, F>(
    curve: &QuadraticBezierSegment<S>,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point;
    use std::vec::Vec;

    #[test]
    fn split_halves_connect() {
        let curve = QuadraticBezierSegment {
            from: point(0.0f32, 0.0),
            ctrl: point(50.0, 100.0),
            to: point(100.0, 0.0),
        };

        let (head, tail) = curve.split_in_half();
        assert_eq!(head.from, curve.from);
        assert_eq!(head.to, tail.from);
        assert_eq!(tail.to, curve.to);
        assert!((head.to - curve.sample(0.5)).length() < 1e-4);
    }

    #[test]
    fn flatten_within_tolerance() {
        let curve = QuadraticBezierSegment {
            from: point(0.0f32, 0.0),
            ctrl: point(50.0, 100.0),
            to: point(100.0, 0.0),
        };

        for tolerance in [1.0f32, 0.1, 0.01] {
            let mut segments: Vec<LineSegment<f32>> = Vec::new();
            curve.for_each_flattened(tolerance, &mut |s| segments.push(*s));

            assert_eq!(segments.first().unwrap().from, curve.from);
            assert_eq!(segments.last().unwrap().to, curve.to);
            for pair in segments.windows(2) {
                assert_eq!(pair[0].to, pair[1].from);
            }

            // Every point of the curve stays within tolerance of the
            // polyline.
            for i in 0..=64 {
                let p = curve.sample(i as f32 / 64.0);
                let d = segments
                    .iter()
                    .map(|s| s.distance_to_point(p))
                    .fold(f32::MAX, f32::min);
                assert!(d <= tolerance * 1.01, "d = {} at tolerance {}", d, tolerance);
            }
        }
    }

    #[test]
    fn tighter_tolerance_means_more_segments() {
        let curve = QuadraticBezierSegment {
            from: point(0.0f32, 0.0),
            ctrl: point(10.0, 20.0),
            to: point(20.0, 0.0),
        };

        let mut coarse = 0;
        curve.for_each_flattened(1.0, &mut |_| coarse += 1);
        let mut fine = 0;
        curve.for_each_flattened(0.01, &mut |_| fine += 1);

        assert!(fine > coarse);
    }

    #[test]
    fn flatten_degenerate() {
        let curve = QuadraticBezierSegment {
            from: point(10.0f32, 10.0),
            ctrl: point(10.0, 10.0),
            to: point(10.0, 10.0),
        };

        let mut count = 0;
        curve.for_each_flattened(0.1, &mut |_| count += 1);
        assert_eq!(count, 1);
    }
}
