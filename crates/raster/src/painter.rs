//! The public fill and stroke operations.

use crate::direct::DirectRasterizer;
use crate::error::{PaintError, PaintResult};
use crate::fill::FillPlotter;
use crate::hairline::HairlineRasterizer;
use crate::multisample::MultisampleRasterizer;
use crate::pattern::Source;
use crate::polygon::Polygon;
use crate::stroke::{dash_contours, flatten_contours, StrokePlotter};
use crate::supersample::SupersampleRasterizer;
use crate::surface::Surface;
use crate::{AntiAliasing, Dasher, FillOptions, StrokeOptions};

use stipple_path::math::Transform;
use stipple_path::PathEvent;

/// Fills a path onto a surface.
///
/// Every subpath must be closed. The pattern must produce pre-multiplied
/// pixels.
pub fn fill(
    surface: &mut Surface,
    source: &Source,
    path: impl IntoIterator<Item = PathEvent>,
    options: &FillOptions,
) -> PaintResult {
    validate_source(source)?;

    let plotter = FillPlotter::new(options.tolerance);
    let polygon = plotter.plot(path, options.anti_aliasing.scale())?;

    rasterize_polygon(
        surface,
        source,
        &polygon,
        options.fill_rule,
        options.anti_aliasing,
        options.operator,
        options.precision,
    )
}

/// Strokes a path onto a surface.
///
/// The path may contain open subpaths; dashing, joins and caps follow the
/// options. The pattern must produce pre-multiplied pixels.
pub fn stroke(
    surface: &mut Surface,
    source: &Source,
    path: impl IntoIterator<Item = PathEvent>,
    options: &StrokeOptions,
) -> PaintResult {
    validate_source(source)?;

    if options.hairline {
        return stroke_hairline(surface, source, path, options);
    }

    let plotter = StrokePlotter::new(options)?;
    let polygon = plotter.plot(path, options.anti_aliasing.scale())?;

    // Stroked outlines always fill under the non-zero rule: the inner ring
    // runs opposite the outer so the hole cancels out.
    rasterize_polygon(
        surface,
        source,
        &polygon,
        crate::FillRule::NonZero,
        options.anti_aliasing,
        options.operator,
        options.precision,
    )
}

/// Sources must be pre-multiplied, and mask sources must actually be
/// masks.
fn validate_source(source: &Source) -> PaintResult {
    if !source.is_premultiplied() {
        return Err(PaintError::PixelSourceNotPreMultiplied);
    }

    if let Source::Surface(mask) = source {
        if !mask.format().is_alpha_only() {
            return Err(PaintError::InvalidPixelFormat);
        }
    }

    Ok(())
}

fn rasterize_polygon(
    surface: &mut Surface,
    source: &Source,
    polygon: &Polygon,
    fill_rule: crate::FillRule,
    anti_aliasing: AntiAliasing,
    operator: crate::Operator,
    precision: crate::Precision,
) -> PaintResult {
    if !polygon.in_box(surface.width(), surface.height()) {
        if !operator.is_bounded() {
            // The shape writes no pixel, but an unbounded operator still
            // repaints the whole surface.
            DirectRasterizer {
                source,
                fill_rule,
                operator,
                precision,
            }
            .rasterize(surface, &Polygon::new(1));
        }
        return Ok(());
    }

    match anti_aliasing {
        AntiAliasing::None => {
            DirectRasterizer {
                source,
                fill_rule,
                operator,
                precision,
            }
            .rasterize(surface, polygon);
        }
        AntiAliasing::Multisample4x => {
            MultisampleRasterizer {
                source,
                fill_rule,
                operator,
                precision,
            }
            .rasterize(surface, polygon)?;
        }
        AntiAliasing::Supersample4x => {
            SupersampleRasterizer {
                source,
                fill_rule,
                operator,
                precision,
            }
            .rasterize(surface, polygon);
        }
    }

    Ok(())
}

/// The hairline fast path: no faces, no joins, no polygon. The flattened
/// and dashed polylines go straight to pixel runs.
fn stroke_hairline(
    surface: &mut Surface,
    source: &Source,
    path: impl IntoIterator<Item = PathEvent>,
    options: &StrokeOptions,
) -> PaintResult {
    let identity = options.transformation == Transform::identity();
    if !identity && options.transformation.inverse().is_none() {
        return Err(PaintError::InvalidMatrix);
    }

    let mut contours = flatten_contours(path, options.line_join, options.tolerance);
    if Dasher::validate(&options.dashes) {
        let mut dasher = Dasher::new(&options.dashes, options.dash_offset);
        contours = dash_contours(&contours, &mut dasher);
    }

    HairlineRasterizer {
        source,
        operator: options.operator,
        precision: options.precision,
        anti_alias: options.anti_aliasing != AntiAliasing::None,
    }
    .rasterize(surface, &contours, &options.transformation, identity);

    Ok(())
}
