#![deny(bare_trait_objects)]

//! A CPU rasterizer for 2D vector graphics.
//!
//! # Crates
//!
//! This meta-crate (`stipple`) reexports the following sub-crates for
//! convenience:
//!
//! * **stipple_raster** - Stroke and fill plotting, scanline rasterization
//!   and compositing.
//! * **stipple_path** - Tools to build and iterate over paths.
//! * **stipple_geom** - 2d utilities for line segments and bézier curves.
//!
//! Each `stipple_<name>` crate is reexported as a `<name>` module in
//! `stipple`. For example:
//!
//! ```ignore
//! use stipple_raster::painter;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! use stipple::raster::painter;
//! ```
//!
//! # Feature flags
//!
//! Serialization using serde can be enabled on each crate with the
//! `serialization` feature flag (disabled by default).
//!
//! # Example
//!
//! ```
//! use stipple::raster::painter;
//! use stipple::raster::{FillOptions, PremulColor, Source, Surface, Format};
//! use stipple::path::Path;
//! use stipple::math::point;
//!
//! let mut surface = Surface::new(Format::Rgba8, 32, 32);
//! let source = Source::Pixel(PremulColor::new(0, 0, 0, 255));
//!
//! let mut builder = Path::builder();
//! builder.begin(point(4.0, 4.0));
//! builder.line_to(point(28.0, 8.0));
//! builder.line_to(point(16.0, 28.0));
//! builder.close();
//!
//! painter::fill(&mut surface, &source, builder.build().iter(), &FillOptions::default())
//!     .unwrap();
//! ```

pub use stipple_raster as raster;

pub use crate::raster::path;

pub use crate::path::geom;

pub use crate::path::math;

#[doc(inline)]
pub use crate::path::Path;

#[doc(inline)]
pub use crate::raster::{
    painter, AntiAliasing, FillOptions, FillRule, LineCap, LineJoin, Operator, PaintError,
    Precision, PremulColor, Source, StrokeOptions, Surface,
};
