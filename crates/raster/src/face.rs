//! The pair of thickness-offset edges of a directed line segment.

use stipple_path::math::{Point, Transform, Vector};

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// A directed segment of the stroked path, with its endpoints offset by half
/// the stroke width on both sides.
///
/// Offsets are computed perpendicular to the segment in user space and
/// warped into device space through the stroke transformation, so a scaling
/// transform widens the stroke accordingly. The perpendicular flips sign
/// under a reflecting transform so that the cw and ccw sides keep their
/// meaning.
#[derive(Copy, Clone, Debug)]
pub struct Face {
    /// Device-space start point.
    pub p0: Point,
    /// Device-space end point.
    pub p1: Point,
    /// Normalized device-space direction.
    pub dev_slope: Vector,
    /// Normalized user-space direction.
    pub user_slope: Vector,
    /// Device-space offset from the spine to the ccw side.
    pub offset: Vector,
    /// Device-space extension of half a stroke width along the segment, for
    /// square caps.
    pub extend: Vector,
    pub half_width: f32,
}

impl Face {
    /// Builds the face of the segment `p0` → `p1` (user space). Returns
    /// `None` for a zero-length segment.
    pub fn new(p0: Point, p1: Point, thickness: f32, ctm: &Transform, identity: bool) -> Option<Face> {
        let user_vec = p1 - p0;
        let user_len = user_vec.length();
        if user_len == 0.0 {
            return None;
        }
        let user_slope = user_vec / user_len;
        let half_width = thickness / 2.0;

        // Counter-clockwise perpendicular in user space.
        let perp = Vector::new(-user_slope.y, user_slope.x) * half_width;

        let (dev_p0, dev_p1, mut offset, extend) = if identity {
            (p0, p1, perp, user_slope * half_width)
        } else {
            (
                ctm.transform_point(p0),
                ctm.transform_point(p1),
                ctm.transform_vector(perp),
                ctm.transform_vector(user_slope * half_width),
            )
        };

        if !identity && ctm.determinant() < 0.0 {
            offset = -offset;
        }

        let dev_vec = dev_p1 - dev_p0;
        let dev_len = dev_vec.length();
        if dev_len == 0.0 {
            return None;
        }

        Some(Face {
            p0: dev_p0,
            p1: dev_p1,
            dev_slope: dev_vec / dev_len,
            user_slope,
            offset,
            extend,
            half_width,
        })
    }

    #[inline]
    pub fn p0_ccw(&self) -> Point {
        self.p0 + self.offset
    }

    #[inline]
    pub fn p0_cw(&self) -> Point {
        self.p0 - self.offset
    }

    #[inline]
    pub fn p1_ccw(&self) -> Point {
        self.p1 + self.offset
    }

    #[inline]
    pub fn p1_cw(&self) -> Point {
        self.p1 - self.offset
    }

    /// The offset endpoint at the join, on the chosen side.
    #[inline]
    pub fn end_on_side(&self, clockwise: bool) -> Point {
        if clockwise {
            self.p1_cw()
        } else {
            self.p1_ccw()
        }
    }

    /// The offset start point at the join, on the chosen side.
    #[inline]
    pub fn start_on_side(&self, clockwise: bool) -> Point {
        if clockwise {
            self.p0_cw()
        } else {
            self.p0_ccw()
        }
    }

    /// Solves the intersection of this face's offset line with the next
    /// face's, on one side of the joint.
    ///
    /// The two offset lines run through the side endpoints with the faces'
    /// device slopes. Callers must ensure the slopes are not parallel.
    pub fn intersect(&self, other: &Face, clockwise: bool) -> Point {
        let i = self.end_on_side(clockwise);
        let o = other.start_on_side(clockwise);
        let is = self.dev_slope;
        let os = other.dev_slope;

        let y = ((o.x - i.x) * is.y * os.y - o.y * os.x * is.y + i.y * is.x * os.y)
            / (is.x * os.y - os.x * is.y);

        let x = if is.y.abs() >= os.y.abs() {
            (y - i.y) * is.x / is.y + i.x
        } else {
            (y - o.y) * os.x / os.y + o.x
        };

        Point::new(x, y)
    }
}
