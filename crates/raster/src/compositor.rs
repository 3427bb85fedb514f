//! Span and area composition: the glue between coverage and the surface.

use crate::operator::Operator;
use crate::pattern::{masked_sample, Source};
use crate::pixel::PremulColor;
use crate::surface::Surface;

/// The numeric pipeline used when compositing.
///
/// `Integer` is the fast path; operators that divide by alpha upgrade the
/// run to `Float` regardless.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Precision {
    Integer,
    Float,
}

impl Default for Precision {
    fn default() -> Self {
        Precision::Integer
    }
}

/// Per-pixel coverage applied to the source before the paint operator, the
/// `(pattern dst-in mask)` stage of the pipeline.
#[derive(Copy, Clone)]
pub enum Coverage<'l> {
    /// The source is taken as is.
    Full,
    /// A single alpha value for the whole run.
    Uniform(u8),
    /// Per-pixel alpha from a mask surface; `x`/`y` anchor the run in mask
    /// space.
    Mask {
        mask: &'l Surface,
        x: i32,
        y: i32,
    },
}

impl<'l> Coverage<'l> {
    #[inline]
    fn at(&self, i: i32) -> u8 {
        match self {
            Coverage::Full => 255,
            Coverage::Uniform(a) => *a,
            Coverage::Mask { mask, x, y } => mask.get_alpha(*x + i, *y),
        }
    }
}

/// Composites a horizontal run of pixels.
///
/// Samples the source at each destination position, scales it by the
/// coverage and applies the operator onto the surface.
pub struct StrideCompositor;

impl StrideCompositor {
    pub fn run(
        surface: &mut Surface,
        x: i32,
        y: i32,
        len: u32,
        source: &Source,
        operator: Operator,
        coverage: Coverage,
        precision: Precision,
    ) {
        let use_float = operator.requires_float() || precision == Precision::Float;

        // Uniform source and coverage let the span loop skip re-sampling.
        let uniform: Option<PremulColor> = match (&coverage, source.is_uniform()) {
            (Coverage::Full, true) => Some(source.sample(x, y)),
            (Coverage::Uniform(a), true) => Some(masked_sample(source, x, y, *a)),
            _ => None,
        };

        for i in 0..len as i32 {
            let px = x + i;
            let src = match uniform {
                Some(s) => s,
                None => {
                    let cov = coverage.at(i);
                    masked_sample(source, px, y, cov)
                }
            };

            let dst = surface.get_pixel(px, y);
            let out = if use_float {
                operator.apply_f32(src.to_f32(), dst.to_f32()).to_u8()
            } else {
                operator.apply_u8(src, dst)
            };
            surface.put_pixel(px, y, out);
        }
    }
}

/// The 2D analogue of [StrideCompositor], compositing a rectangular area
/// through a mask surface. Used by the supersampling rasterizer once the
/// mask has been downsampled.
pub struct SurfaceCompositor;

impl SurfaceCompositor {
    pub fn run(
        surface: &mut Surface,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        source: &Source,
        operator: Operator,
        mask: &Surface,
        precision: Precision,
    ) {
        for row in 0..height as i32 {
            StrideCompositor::run(
                surface,
                x,
                y + row,
                width,
                source,
                operator,
                Coverage::Mask {
                    mask,
                    x: 0,
                    y: row,
                },
                precision,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Format;

    #[test]
    fn stride_composites_solid_color() {
        let mut surface = Surface::new(Format::Rgba8, 8, 1);
        let red = PremulColor::new(255, 0, 0, 255);

        StrideCompositor::run(
            &mut surface,
            2,
            0,
            4,
            &Source::Pixel(red),
            Operator::SrcOver,
            Coverage::Full,
            Precision::Integer,
        );

        assert_eq!(surface.get_pixel(1, 0), PremulColor::TRANSPARENT);
        assert_eq!(surface.get_pixel(2, 0), red);
        assert_eq!(surface.get_pixel(5, 0), red);
        assert_eq!(surface.get_pixel(6, 0), PremulColor::TRANSPARENT);
    }

    #[test]
    fn uniform_coverage_scales_source() {
        let mut surface = Surface::new(Format::Rgba8, 2, 1);
        let red = PremulColor::new(255, 0, 0, 255);

        StrideCompositor::run(
            &mut surface,
            0,
            0,
            2,
            &Source::Pixel(red),
            Operator::SrcOver,
            Coverage::Uniform(127),
            Precision::Integer,
        );

        let out = surface.get_pixel(0, 0);
        assert!((out.a as i32 - 127).abs() <= 1);
    }

    #[test]
    fn mask_coverage_follows_mask() {
        let mut mask = Surface::new(Format::Alpha8, 4, 1);
        mask.put_alpha(1, 0, 255);

        let mut surface = Surface::new(Format::Rgba8, 4, 1);
        let red = PremulColor::new(255, 0, 0, 255);

        StrideCompositor::run(
            &mut surface,
            0,
            0,
            4,
            &Source::Pixel(red),
            Operator::SrcOver,
            Coverage::Mask {
                mask: &mask,
                x: 0,
                y: 0,
            },
            Precision::Integer,
        );

        assert_eq!(surface.get_pixel(0, 0), PremulColor::TRANSPARENT);
        assert_eq!(surface.get_pixel(1, 0), red);
        assert_eq!(surface.get_pixel(2, 0), PremulColor::TRANSPARENT);
    }
}
