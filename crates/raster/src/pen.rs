//! The discretized circle producing round joins and round caps.

use crate::MIN_TOLERANCE;

use stipple_path::math::{vector, Vector};

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use core::f32::consts::PI;

/// A fixed fan of vertices on a circle of the stroke's half width.
///
/// The vertex count is chosen so that the sagitta of each arc step stays
/// within the flattening tolerance. Vertices are stored by increasing
/// angle, which is what the directional range query binary-searches.
#[derive(Clone, Debug)]
pub struct Pen {
    offsets: Vec<Vector>,
    angles: Vec<f32>,
    radius: f32,
}

impl Pen {
    pub fn new(radius: f32, tolerance: f32) -> Self {
        let radius = radius.abs();
        let tolerance = tolerance.max(MIN_TOLERANCE);
        let count = vertices_needed(radius, tolerance);

        let mut offsets = Vec::with_capacity(count);
        let mut angles = Vec::with_capacity(count);
        for k in 0..count {
            let theta = 2.0 * PI * k as f32 / count as f32;
            offsets.push(vector(radius * theta.cos(), radius * theta.sin()));
            angles.push(theta);
        }

        Pen {
            offsets,
            angles,
            radius,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.offsets.len()
    }

    /// All vertex offsets in angle order, for plotting a full disc.
    #[inline]
    pub fn offsets(&self) -> &[Vector] {
        &self.offsets
    }

    /// Invokes the callback for every vertex offset strictly between the
    /// `from` and `to` radial directions, walking the circle in the
    /// direction of increasing angle when `positive` is set and decreasing
    /// otherwise.
    ///
    /// An acute arc narrower than one vertex step invokes the callback zero
    /// times; the caller is expected to fall back to a bevel.
    pub fn arc_between<F>(&self, from: Vector, to: Vector, positive: bool, f: &mut F)
    where
        F: FnMut(Vector),
    {
        let from_a = normalize_angle(from.y.atan2(from.x));
        let to_a = normalize_angle(to.y.atan2(to.x));
        let n = self.angles.len();

        // The arc length walked in the requested direction.
        let sweep = if positive {
            normalize_angle(to_a - from_a)
        } else {
            normalize_angle(from_a - to_a)
        };

        // First vertex strictly past `from_a` in the walk direction, found
        // by binary search in the sorted angle array.
        let start = if positive {
            self.angles.partition_point(|&a| a <= from_a + ANGLE_EPSILON) % n
        } else {
            let i = self.angles.partition_point(|&a| a < from_a - ANGLE_EPSILON);
            (i + n - 1) % n
        };

        let mut index = start;
        loop {
            let covered = if positive {
                normalize_angle(self.angles[index] - from_a)
            } else {
                normalize_angle(from_a - self.angles[index])
            };
            if covered + ANGLE_EPSILON >= sweep || covered < ANGLE_EPSILON {
                break;
            }

            f(self.offsets[index]);

            index = if positive {
                (index + 1) % n
            } else {
                (index + n - 1) % n
            };
            if index == start {
                break;
            }
        }
    }
}

const ANGLE_EPSILON: f32 = 1e-5;

#[inline]
fn normalize_angle(a: f32) -> f32 {
    let two_pi = 2.0 * PI;
    let mut a = a % two_pi;
    if a < 0.0 {
        a += two_pi;
    }
    a
}

/// How many vertices keep the sagitta of each step within the tolerance,
/// rounded up to even with a floor of four.
fn vertices_needed(radius: f32, tolerance: f32) -> usize {
    let ratio = (1.0 - tolerance / radius.max(MIN_TOLERANCE)).max(-1.0).min(1.0);
    let step = ratio.acos();

    let mut count = if step > 0.0 {
        (2.0 * PI / step).ceil() as usize
    } else {
        0
    };

    if count % 2 == 1 {
        count += 1;
    }

    count.max(4)
}
