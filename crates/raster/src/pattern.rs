//! Pixel sources sampled by the compositors.
//!
//! Sources are a tagged enum rather than trait objects so that the span
//! loops stay monomorphic. Only the sampling contract lives here; richer
//! pattern types belong to the host.

use crate::pixel::{mul_255, PremulColor};
use crate::surface::Surface;

use stipple_path::math::Point;

/// Where the color of each composited pixel comes from.
#[derive(Clone, Debug)]
pub enum Source<'l> {
    /// Every pixel samples the same color.
    Pixel(PremulColor),
    /// A two-stop linear gradient.
    Gradient(LinearGradient),
    /// An ordered 4×4 dither of an underlying gradient.
    Dither(Dither),
    /// Samples the alpha channel of another surface as a black mask.
    Surface(&'l Surface),
}

impl<'l> Source<'l> {
    /// Samples the source at a surface-space position.
    pub fn sample(&self, x: i32, y: i32) -> PremulColor {
        match self {
            Source::Pixel(pixel) => *pixel,
            Source::Gradient(gradient) => gradient.sample(x, y),
            Source::Dither(dither) => dither.sample(x, y),
            Source::Surface(surface) => PremulColor::new(0, 0, 0, surface.get_alpha(x, y)),
        }
    }

    /// Whether every pixel this source can produce is pre-multiplied.
    pub fn is_premultiplied(&self) -> bool {
        match self {
            Source::Pixel(pixel) => pixel.is_premultiplied(),
            Source::Gradient(gradient) => {
                gradient.start_color.is_premultiplied() && gradient.end_color.is_premultiplied()
            }
            Source::Dither(dither) => {
                dither.gradient.start_color.is_premultiplied()
                    && dither.gradient.end_color.is_premultiplied()
            }
            Source::Surface(_) => true,
        }
    }

    /// Whether the source samples the same value everywhere, which lets span
    /// loops hoist the sample out.
    pub fn is_uniform(&self) -> bool {
        match self {
            Source::Pixel(_) => true,
            _ => false,
        }
    }
}

/// A linear gradient between two anchor points.
///
/// Sampling projects the pixel position onto the gradient axis and
/// interpolates the two pre-multiplied stops, clamping at the ends.
#[derive(Clone, Debug)]
pub struct LinearGradient {
    pub from: Point,
    pub to: Point,
    pub start_color: PremulColor,
    pub end_color: PremulColor,
}

impl LinearGradient {
    fn offset(&self, x: i32, y: i32) -> f32 {
        let axis = self.to - self.from;
        let len2 = axis.square_length();
        if len2 == 0.0 {
            return 0.0;
        }

        let v = Point::new(x as f32 + 0.5, y as f32 + 0.5) - self.from;
        let t = v.dot(axis) / len2;

        t.max(0.0).min(1.0)
    }

    pub fn sample(&self, x: i32, y: i32) -> PremulColor {
        let t = self.offset(x, y);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t + 0.5) as u8;

        PremulColor::new(
            lerp(self.start_color.r, self.end_color.r),
            lerp(self.start_color.g, self.end_color.g),
            lerp(self.start_color.b, self.end_color.b),
            lerp(self.start_color.a, self.end_color.a),
        )
    }
}

/// Bayer 4×4 threshold matrix, scaled to `0..=255`.
const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 128, 32, 160],
    [192, 64, 224, 96],
    [48, 176, 16, 144],
    [240, 112, 80, 208],
];

/// An ordered dither over a gradient: each pixel snaps to the start or end
/// stop depending on the local threshold.
#[derive(Clone, Debug)]
pub struct Dither {
    pub gradient: LinearGradient,
}

impl Dither {
    pub fn sample(&self, x: i32, y: i32) -> PremulColor {
        let t = self.gradient.offset(x, y);
        let threshold = BAYER_4X4[(y.rem_euclid(4)) as usize][(x.rem_euclid(4)) as usize];

        if (t * 255.0) as u8 > threshold {
            self.gradient.end_color
        } else {
            self.gradient.start_color
        }
    }
}

/// A source value scaled by a coverage mask, the `dst-in` composition the
/// rasterizers apply before the paint operator.
#[inline]
pub(crate) fn masked_sample(source: &Source, x: i32, y: i32, coverage: u8) -> PremulColor {
    let px = source.sample(x, y);
    if coverage == 255 {
        px
    } else {
        PremulColor::new(
            mul_255(px.r, coverage),
            mul_255(px.g, coverage),
            mul_255(px.b, coverage),
            mul_255(px.a, coverage),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stipple_path::math::point;

    #[test]
    fn gradient_clamps_at_ends() {
        let g = LinearGradient {
            from: point(0.0, 0.0),
            to: point(10.0, 0.0),
            start_color: PremulColor::new(0, 0, 0, 0),
            end_color: PremulColor::new(255, 255, 255, 255),
        };

        assert_eq!(g.sample(-5, 0), g.start_color);
        assert_eq!(g.sample(20, 0), g.end_color);
        let mid = g.sample(4, 0);
        assert!(mid.a > 0 && mid.a < 255);
    }

    #[test]
    fn pixel_source_is_uniform() {
        let source = Source::Pixel(PremulColor::new(1, 2, 3, 4));
        assert!(source.is_uniform());
        assert_eq!(source.sample(100, -3), PremulColor::new(1, 2, 3, 4));
    }

    #[test]
    fn dither_snaps_to_stops() {
        let g = LinearGradient {
            from: point(0.0, 0.0),
            to: point(4.0, 0.0),
            start_color: PremulColor::new(0, 0, 0, 255),
            end_color: PremulColor::new(255, 255, 255, 255),
        };
        let d = Dither { gradient: g };

        for x in 0..4 {
            for y in 0..4 {
                let px = d.sample(x, y);
                assert!(px == d.gradient.start_color || px == d.gradient.end_color);
            }
        }
    }
}
