#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]
#![no_std]

//! Scanline rasterization of 2D vector paths.
//!
//! This crate is reexported in [stipple](https://docs.rs/stipple/).
//!
//! ## Overview
//!
//! The pipeline turns a path of moves, lines and cubic bézier curves into
//! composited pixels on a [Surface]:
//!
//! * [fill](painter::fill) plots a closed path straight into a
//!   [Polygon](polygon::Polygon) of scanline edges.
//! * [stroke](painter::stroke) expands a path into its stroked outline
//!   first, applying joins, caps and dashes, then fills the outline.
//! * A rasterizer walks the polygon scanline by scanline and composites
//!   the resulting spans through a [Porter-Duff/PDF
//!   operator](operator::Operator): aliased ([AntiAliasing::None]),
//!   multisampled with sparse coverage runs (the default), or
//!   supersampled through a 4× mask.
//!
//! Everything composites with pre-multiplied alpha; sources that are not
//! pre-multiplied are rejected at the painter boundary.
//!
//! ## Example
//!
//! ```
//! use stipple_raster::painter;
//! use stipple_raster::{FillOptions, PremulColor, Source, Surface, Format};
//! use stipple_raster::path::Path;
//! use stipple_raster::path::math::point;
//!
//! let mut surface = Surface::new(Format::Rgba8, 64, 64);
//! let source = Source::Pixel(PremulColor::new(255, 0, 0, 255));
//!
//! let mut builder = Path::builder();
//! builder.begin(point(8.0, 8.0));
//! builder.line_to(point(56.0, 16.0));
//! builder.line_to(point(32.0, 56.0));
//! builder.close();
//!
//! painter::fill(&mut surface, &source, builder.build().iter(), &FillOptions::default())
//!     .unwrap();
//! ```

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub use stipple_path as path;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

use alloc::vec::Vec;

#[cfg(all(debug_assertions, feature = "std"))]
macro_rules! raster_log {
    ($obj:ident, $fmt:expr) => (
        if $obj.log {
            std::println!($fmt);
        }
    );
    ($obj:ident, $fmt:expr, $($arg:tt)*) => (
        if $obj.log {
            std::println!($fmt, $($arg)*);
        }
    );
}

#[cfg(not(all(debug_assertions, feature = "std")))]
macro_rules! raster_log {
    ($obj:ident, $fmt:expr) => {};
    ($obj:ident, $fmt:expr, $($arg:tt)*) => {};
}

mod compositor;
pub mod coverage;
mod dasher;
mod direct;
mod error;
mod face;
mod fill;
mod hairline;
mod multisample;
mod operator;
pub mod painter;
mod pattern;
mod pen;
mod pixel;
pub mod polygon;
mod stroke;
mod supersample;
mod surface;

#[cfg(test)]
mod painter_tests;

#[doc(inline)]
pub use crate::compositor::{Coverage, Precision, StrideCompositor, SurfaceCompositor};
#[doc(inline)]
pub use crate::coverage::SparseCoverageBuffer;
#[doc(inline)]
pub use crate::dasher::Dasher;
#[doc(inline)]
pub use crate::error::{InternalError, PaintError, PaintResult};
#[doc(inline)]
pub use crate::face::Face;
#[doc(inline)]
pub use crate::fill::FillPlotter;
#[doc(inline)]
pub use crate::operator::Operator;
#[doc(inline)]
pub use crate::painter::{fill, stroke};
#[doc(inline)]
pub use crate::pattern::{Dither, LinearGradient, Source};
#[doc(inline)]
pub use crate::pen::Pen;
#[doc(inline)]
pub use crate::pixel::{Format, PremulColor, PremulColorF};
#[doc(inline)]
pub use crate::polygon::{Edge, Polygon};
#[doc(inline)]
pub use crate::stroke::StrokePlotter;
#[doc(inline)]
pub use crate::surface::Surface;

pub use crate::path::{FillRule, LineCap, LineJoin};

/// The tolerance floor: curve flattening never subdivides below a
/// thousandth of a device unit.
pub const MIN_TOLERANCE: f32 = 0.001;

/// Stroke widths clamp here instead of degenerating to nothing.
pub const MIN_STROKE_WIDTH: f32 = 1.0 / 256.0;

/// How the rasterizer samples pixel coverage.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum AntiAliasing {
    /// One sample per pixel, no coverage blending.
    None,
    /// 16 subsamples per pixel accumulated in sparse coverage runs.
    Multisample4x,
    /// A full 4× mask, downsampled by block averaging.
    Supersample4x,
}

impl AntiAliasing {
    /// The factor the plotters scale their polygons by for this mode.
    pub fn scale(&self) -> u32 {
        match self {
            AntiAliasing::None => 1,
            AntiAliasing::Multisample4x => 2,
            AntiAliasing::Supersample4x => 4,
        }
    }
}

impl Default for AntiAliasing {
    fn default() -> Self {
        AntiAliasing::Multisample4x
    }
}

/// Parameters for [painter::fill].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct FillOptions {
    /// Maximum allowed distance to the path when flattening curves.
    ///
    /// Default value: `FillOptions::DEFAULT_TOLERANCE`.
    pub tolerance: f32,

    /// See the SVG specification.
    ///
    /// Default value: `FillRule::NonZero`.
    pub fill_rule: FillRule,

    /// Default value: `AntiAliasing::Multisample4x`.
    pub anti_aliasing: AntiAliasing,

    /// Default value: `Operator::SrcOver`.
    pub operator: Operator,

    /// Default value: `Precision::Integer`.
    pub precision: Precision,
}

impl FillOptions {
    pub const DEFAULT_TOLERANCE: f32 = 0.1;

    pub const DEFAULT: Self = FillOptions {
        tolerance: Self::DEFAULT_TOLERANCE,
        fill_rule: FillRule::NonZero,
        anti_aliasing: AntiAliasing::Multisample4x,
        operator: Operator::SrcOver,
        precision: Precision::Integer,
    };

    #[inline]
    pub fn tolerance(tolerance: f32) -> Self {
        Self::DEFAULT.with_tolerance(tolerance)
    }

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub const fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    #[inline]
    pub const fn with_anti_aliasing(mut self, mode: AntiAliasing) -> Self {
        self.anti_aliasing = mode;
        self
    }

    #[inline]
    pub const fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    #[inline]
    pub const fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}

impl Default for FillOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters for [painter::stroke].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct StrokeOptions {
    /// What cap to use at the ends of each open subpath or dash segment.
    ///
    /// Default value: `LineCap::Butt`.
    pub line_cap: LineCap,

    /// See the SVG specification.
    ///
    /// Default value: `LineJoin::Miter`.
    pub line_join: LineJoin,

    /// Line width.
    ///
    /// Default value: `StrokeOptions::DEFAULT_LINE_WIDTH`.
    pub line_width: f32,

    /// When a miter join's length exceeds this many line widths it
    /// degrades to a bevel.
    ///
    /// Default value: `StrokeOptions::DEFAULT_MITER_LIMIT`.
    pub miter_limit: f32,

    /// Maximum allowed distance to the path when flattening curves.
    ///
    /// Default value: `StrokeOptions::DEFAULT_TOLERANCE`.
    pub tolerance: f32,

    /// Alternating on/off dash lengths; empty means no dashing. See
    /// [Dasher::validate] for the constraints.
    ///
    /// Default value: empty.
    pub dashes: Vec<f32>,

    /// Where along the dash pattern the stroke starts.
    ///
    /// Default value: `0.0`.
    pub dash_offset: f32,

    /// The transformation applied to the path while stroking. Offsets are
    /// computed in user space and warped through it, so scaling widens
    /// the stroke.
    ///
    /// Default value: identity.
    pub transformation: path::math::Transform,

    /// Skip stroke expansion entirely and draw one-pixel-wide runs.
    ///
    /// Default value: `false`.
    pub hairline: bool,

    /// Default value: `AntiAliasing::Multisample4x`.
    pub anti_aliasing: AntiAliasing,

    /// Default value: `Operator::SrcOver`.
    pub operator: Operator,

    /// Default value: `Precision::Integer`.
    pub precision: Precision,
}

impl StrokeOptions {
    pub const DEFAULT_LINE_WIDTH: f32 = 2.0;
    pub const DEFAULT_MITER_LIMIT: f32 = 10.0;
    pub const DEFAULT_TOLERANCE: f32 = 0.1;

    #[inline]
    pub fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = cap;
        self
    }

    #[inline]
    pub fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    #[inline]
    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    #[inline]
    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        self.miter_limit = limit;
        self
    }

    #[inline]
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_dashes(mut self, dashes: &[f32], offset: f32) -> Self {
        self.dashes = dashes.into();
        self.dash_offset = offset;
        self
    }

    #[inline]
    pub fn with_transformation(mut self, transformation: path::math::Transform) -> Self {
        self.transformation = transformation;
        self
    }

    #[inline]
    pub fn with_hairline(mut self, hairline: bool) -> Self {
        self.hairline = hairline;
        self
    }

    #[inline]
    pub fn with_anti_aliasing(mut self, mode: AntiAliasing) -> Self {
        self.anti_aliasing = mode;
        self
    }

    #[inline]
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    #[inline]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}

impl Default for StrokeOptions {
    fn default() -> Self {
        StrokeOptions {
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            line_width: Self::DEFAULT_LINE_WIDTH,
            miter_limit: Self::DEFAULT_MITER_LIMIT,
            tolerance: Self::DEFAULT_TOLERANCE,
            dashes: Vec::new(),
            dash_offset: 0.0,
            transformation: path::math::Transform::identity(),
            hairline: false,
            anti_aliasing: AntiAliasing::Multisample4x,
            operator: Operator::SrcOver,
            precision: Precision::Integer,
        }
    }
}

#[test]
fn default_options() {
    let fill = FillOptions::default();
    assert_eq!(fill.fill_rule, FillRule::NonZero);
    assert_eq!(fill.anti_aliasing, AntiAliasing::Multisample4x);

    let stroke = StrokeOptions::default();
    assert_eq!(stroke.line_width, 2.0);
    assert_eq!(stroke.miter_limit, 10.0);
    assert!(stroke.dashes.is_empty());
}

#[test]
fn anti_aliasing_scales() {
    assert_eq!(AntiAliasing::None.scale(), 1);
    assert_eq!(AntiAliasing::Multisample4x.scale(), 2);
    assert_eq!(AntiAliasing::Supersample4x.scale(), 4);
}
