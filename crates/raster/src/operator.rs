//! The Porter-Duff and PDF compositing operators.

use crate::pixel::{mul_255, PremulColor, PremulColorF};

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// A compositing operator, combining a pre-multiplied source pixel with a
/// pre-multiplied destination pixel.
///
/// The first twelve variants and the additive ones are the Porter-Duff
/// operators; the rest are the PDF blend modes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Operator {
    Clear,
    Src,
    Dst,
    SrcOver,
    DstOver,
    SrcIn,
    DstIn,
    SrcOut,
    DstOut,
    SrcAtop,
    DstAtop,
    Xor,
    Plus,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    PlusLighter,
}

impl Default for Operator {
    fn default() -> Self {
        Operator::SrcOver
    }
}

impl Operator {
    /// Whether the operator only writes where the source or destination has
    /// coverage. Unbounded operators affect the entire surface, including
    /// pixels the shape never touches.
    pub fn is_bounded(&self) -> bool {
        match self {
            Operator::Clear
            | Operator::Src
            | Operator::SrcIn
            | Operator::SrcOut
            | Operator::DstIn
            | Operator::DstAtop => false,
            _ => true,
        }
    }

    /// Whether the operator needs the float pipeline. The PDF blend modes
    /// divide by alpha and therefore lose too much in 8 bit arithmetic.
    pub fn requires_float(&self) -> bool {
        match self {
            Operator::Multiply
            | Operator::Screen
            | Operator::Overlay
            | Operator::Darken
            | Operator::Lighten
            | Operator::ColorDodge
            | Operator::ColorBurn
            | Operator::HardLight
            | Operator::SoftLight
            | Operator::Difference
            | Operator::Exclusion
            | Operator::Hue
            | Operator::Saturation
            | Operator::Color
            | Operator::Luminosity => true,
            _ => false,
        }
    }

    /// Porter-Duff source and destination factors, as fractions of 255.
    ///
    /// Only meaningful for the non-blend-mode operators.
    fn factors_u8(&self, src_a: u8, dst_a: u8) -> (u8, u8) {
        match self {
            Operator::Clear => (0, 0),
            Operator::Src => (255, 0),
            Operator::Dst => (0, 255),
            Operator::SrcOver => (255, 255 - src_a),
            Operator::DstOver => (255 - dst_a, 255),
            Operator::SrcIn => (dst_a, 0),
            Operator::DstIn => (0, src_a),
            Operator::SrcOut => (255 - dst_a, 0),
            Operator::DstOut => (0, 255 - src_a),
            Operator::SrcAtop => (dst_a, 255 - src_a),
            Operator::DstAtop => (255 - dst_a, src_a),
            Operator::Xor => (255 - dst_a, 255 - src_a),
            Operator::Plus | Operator::PlusLighter => (255, 255),
            _ => unreachable!("blend modes take the float path"),
        }
    }

    /// Composites in 8 bit arithmetic. Callers must route operators with
    /// `requires_float()` through [Operator::apply_f32] instead.
    pub fn apply_u8(&self, src: PremulColor, dst: PremulColor) -> PremulColor {
        debug_assert!(!self.requires_float());

        let (fa, fb) = self.factors_u8(src.a, dst.a);
        let channel = |s: u8, d: u8| {
            let v = mul_255(s, fa) as u16 + mul_255(d, fb) as u16;
            if v > 255 {
                255
            } else {
                v as u8
            }
        };

        PremulColor {
            r: channel(src.r, dst.r),
            g: channel(src.g, dst.g),
            b: channel(src.b, dst.b),
            a: channel(src.a, dst.a),
        }
    }

    /// Composites in float arithmetic. Handles every operator.
    pub fn apply_f32(&self, src: PremulColorF, dst: PremulColorF) -> PremulColorF {
        if !self.requires_float() {
            let (fa, fb) = self.factors_f32(src.a, dst.a);
            return PremulColorF {
                r: src.r * fa + dst.r * fb,
                g: src.g * fa + dst.g * fb,
                b: src.b * fa + dst.b * fb,
                a: (src.a * fa + dst.a * fb).min(1.0),
            };
        }

        self.blend_f32(src, dst)
    }

    fn factors_f32(&self, src_a: f32, dst_a: f32) -> (f32, f32) {
        match self {
            Operator::Clear => (0.0, 0.0),
            Operator::Src => (1.0, 0.0),
            Operator::Dst => (0.0, 1.0),
            Operator::SrcOver => (1.0, 1.0 - src_a),
            Operator::DstOver => (1.0 - dst_a, 1.0),
            Operator::SrcIn => (dst_a, 0.0),
            Operator::DstIn => (0.0, src_a),
            Operator::SrcOut => (1.0 - dst_a, 0.0),
            Operator::DstOut => (0.0, 1.0 - src_a),
            Operator::SrcAtop => (dst_a, 1.0 - src_a),
            Operator::DstAtop => (1.0 - dst_a, src_a),
            Operator::Xor => (1.0 - dst_a, 1.0 - src_a),
            Operator::Plus | Operator::PlusLighter => (1.0, 1.0),
            _ => unreachable!("blend modes take the blend path"),
        }
    }

    /// The PDF blend equation over pre-multiplied inputs:
    ///
    /// `co = (1 − αb)·cs + (1 − αs)·cb + αs·αb·B(Cb, Cs)`
    /// `αo = αs + αb·(1 − αs)`
    ///
    /// where upper case channels are un-premultiplied.
    fn blend_f32(&self, src: PremulColorF, dst: PremulColorF) -> PremulColorF {
        let un = |c: f32, a: f32| if a == 0.0 { 0.0 } else { c / a };
        let cs = [un(src.r, src.a), un(src.g, src.a), un(src.b, src.a)];
        let cb = [un(dst.r, dst.a), un(dst.g, dst.a), un(dst.b, dst.a)];

        let blended = match self {
            Operator::Hue => set_lum(&set_sat(&cs, sat(&cb)), lum(&cb)),
            Operator::Saturation => set_lum(&set_sat(&cb, sat(&cs)), lum(&cb)),
            Operator::Color => set_lum(&cs, lum(&cb)),
            Operator::Luminosity => set_lum(&cb, lum(&cs)),
            _ => {
                let mut out = [0.0f32; 3];
                for i in 0..3 {
                    out[i] = self.blend_channel(cb[i], cs[i]);
                }
                out
            }
        };

        let alpha = src.a + dst.a * (1.0 - src.a);
        let combine = |cs_p: f32, cb_p: f32, b: f32| {
            (1.0 - dst.a) * cs_p + (1.0 - src.a) * cb_p + src.a * dst.a * b
        };

        PremulColorF {
            r: combine(src.r, dst.r, blended[0]),
            g: combine(src.g, dst.g, blended[1]),
            b: combine(src.b, dst.b, blended[2]),
            a: alpha,
        }
    }

    /// The separable blend functions `B(Cb, Cs)`.
    fn blend_channel(&self, cb: f32, cs: f32) -> f32 {
        match self {
            Operator::Multiply => cb * cs,
            Operator::Screen => cb + cs - cb * cs,
            Operator::Overlay => hard_light(cs, cb),
            Operator::Darken => cb.min(cs),
            Operator::Lighten => cb.max(cs),
            Operator::ColorDodge => {
                if cb == 0.0 {
                    0.0
                } else if cs >= 1.0 {
                    1.0
                } else {
                    (cb / (1.0 - cs)).min(1.0)
                }
            }
            Operator::ColorBurn => {
                if cb >= 1.0 {
                    1.0
                } else if cs == 0.0 {
                    0.0
                } else {
                    1.0 - ((1.0 - cb) / cs).min(1.0)
                }
            }
            Operator::HardLight => hard_light(cb, cs),
            Operator::SoftLight => {
                if cs <= 0.5 {
                    cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
                } else {
                    let d = if cb <= 0.25 {
                        ((16.0 * cb - 12.0) * cb + 4.0) * cb
                    } else {
                        cb.sqrt()
                    };
                    cb + (2.0 * cs - 1.0) * (d - cb)
                }
            }
            Operator::Difference => (cb - cs).abs(),
            Operator::Exclusion => cb + cs - 2.0 * cb * cs,
            _ => unreachable!("non-separable modes are handled by the caller"),
        }
    }
}

#[inline]
fn hard_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        2.0 * cs * cb
    } else {
        1.0 - 2.0 * (1.0 - cs) * (1.0 - cb)
    }
}

fn lum(c: &[f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(&c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);

    let mut out = c;
    if n < 0.0 {
        for v in out.iter_mut() {
            *v = l + (*v - l) * l / (l - n);
        }
    }
    if x > 1.0 {
        for v in out.iter_mut() {
            *v = l + (*v - l) * (1.0 - l) / (x - l);
        }
    }

    out
}

fn set_lum(c: &[f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color([c[0] + d, c[1] + d, c[2] + d])
}

fn sat(c: &[f32; 3]) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn set_sat(c: &[f32; 3], s: f32) -> [f32; 3] {
    // Order the channels, stretch the middle one proportionally.
    let mut idx = [0usize, 1, 2];
    idx.sort_by(|&a, &b| c[a].partial_cmp(&c[b]).unwrap_or(core::cmp::Ordering::Equal));
    let (min, mid, max) = (idx[0], idx[1], idx[2]);

    let mut out = [0.0f32; 3];
    if c[max] > c[min] {
        out[mid] = (c[mid] - c[min]) * s / (c[max] - c[min]);
        out[max] = s;
    }

    out
}
