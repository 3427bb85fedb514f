//! End-to-end scenarios for the painter operations.

use crate::painter::{fill, stroke};
use crate::pixel::{Format, PremulColor};
use crate::pattern::Source;
use crate::surface::Surface;
use crate::{AntiAliasing, FillOptions, FillRule, LineCap, LineJoin, Operator, StrokeOptions};

use stipple_path::math::{point, Transform};
use stipple_path::Path;

use alloc::vec::Vec;

fn red() -> PremulColor {
    PremulColor::new(255, 0, 0, 255)
}

fn red_source() -> Source<'static> {
    Source::Pixel(red())
}

fn aliased_fill() -> FillOptions {
    FillOptions::default().with_anti_aliasing(AntiAliasing::None)
}

fn aliased_stroke() -> StrokeOptions {
    StrokeOptions::default().with_anti_aliasing(AntiAliasing::None)
}

fn count_red(surface: &Surface) -> i32 {
    let mut count = 0;
    for y in 0..surface.height() as i32 {
        for x in 0..surface.width() as i32 {
            if surface.get_pixel(x, y) == red() {
                count += 1;
            }
        }
    }
    count
}

fn is_red(surface: &Surface, x: i32, y: i32) -> bool {
    surface.get_pixel(x, y) == red()
}

#[test]
fn fill_triangle_aliased() {
    // Half of a 10×10 bounding box.
    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(10.0, 0.0));
    builder.line_to(point(5.0, 10.0));
    builder.close();

    let mut surface = Surface::new(Format::Rgba8, 10, 10);
    fill(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_fill().with_fill_rule(FillRule::EvenOdd),
    )
    .unwrap();

    assert!(is_red(&surface, 5, 5));
    assert!(!is_red(&surface, 0, 9));
    assert!((count_red(&surface) - 50).abs() <= 1);
}

#[test]
fn stroke_butt_segment_aliased() {
    let mut builder = Path::builder();
    builder.begin(point(0.0, 5.0));
    builder.line_to(point(10.0, 5.0));
    builder.end(false);

    let mut surface = Surface::new(Format::Rgba8, 16, 16);
    stroke(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_stroke(),
    )
    .unwrap();

    for x in 0..10 {
        assert!(is_red(&surface, x, 4), "({}, 4)", x);
        assert!(is_red(&surface, x, 5), "({}, 5)", x);
        assert!(!is_red(&surface, x, 3));
        assert!(!is_red(&surface, x, 6));
    }
    assert!(!is_red(&surface, 10, 5));
}

#[test]
fn stroke_square_cap_extends() {
    let mut builder = Path::builder();
    builder.begin(point(2.0, 5.0));
    builder.line_to(point(12.0, 5.0));
    builder.end(false);

    let mut surface = Surface::new(Format::Rgba8, 16, 16);
    stroke(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_stroke().with_line_cap(LineCap::Square),
    )
    .unwrap();

    // One extra column on both ends.
    assert!(is_red(&surface, 1, 4));
    assert!(is_red(&surface, 1, 5));
    assert!(is_red(&surface, 12, 4));
    assert!(is_red(&surface, 12, 5));
    assert!(!is_red(&surface, 0, 5));
    assert!(!is_red(&surface, 13, 5));
}

#[test]
fn stroke_dashed_segment() {
    let mut builder = Path::builder();
    builder.begin(point(0.0, 1.0));
    builder.line_to(point(20.0, 1.0));
    builder.end(false);

    let mut surface = Surface::new(Format::Rgba8, 24, 4);
    stroke(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_stroke().with_dashes(&[4.0, 4.0], 0.0),
    )
    .unwrap();

    for x in 0..20 {
        let on = (x / 4) % 2 == 0;
        assert_eq!(is_red(&surface, x, 1), on, "x = {}", x);
    }
}

#[test]
fn stroke_miter_square_corners() {
    let mut builder = Path::builder();
    builder.begin(point(4.0, 4.0));
    builder.line_to(point(14.0, 4.0));
    builder.line_to(point(14.0, 14.0));
    builder.line_to(point(4.0, 14.0));
    builder.close();

    let mut surface = Surface::new(Format::Rgba8, 20, 20);
    stroke(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_stroke().with_line_width(4.0),
    )
    .unwrap();

    // Sharp outer corners at (2,2) .. (15,15).
    assert!(is_red(&surface, 2, 2));
    assert!(is_red(&surface, 15, 2));
    assert!(is_red(&surface, 15, 15));
    assert!(is_red(&surface, 2, 15));
    // Inner corners leave the middle empty.
    assert!(!is_red(&surface, 9, 9));
    assert!(is_red(&surface, 6, 5));
}

#[test]
fn stroke_miter_limit_one_bevels() {
    let mut builder = Path::builder();
    builder.begin(point(4.0, 4.0));
    builder.line_to(point(14.0, 4.0));
    builder.line_to(point(14.0, 14.0));
    builder.line_to(point(4.0, 14.0));
    builder.close();

    let mut surface = Surface::new(Format::Rgba8, 20, 20);
    stroke(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_stroke().with_line_width(4.0).with_miter_limit(1.0),
    )
    .unwrap();

    // The chamfer removes the sharp corner pixels.
    assert!(!is_red(&surface, 2, 2));
    assert!(!is_red(&surface, 15, 15));
    // The flat sides are still there.
    assert!(is_red(&surface, 9, 2));
    assert!(is_red(&surface, 2, 9));
}

#[test]
fn fill_figure_eight_fill_rules() {
    fn figure_eight() -> Path {
        let mut builder = Path::builder();
        builder.begin(point(0.0, 0.0));
        builder.line_to(point(6.0, 0.0));
        builder.line_to(point(6.0, 6.0));
        builder.line_to(point(0.0, 6.0));
        builder.close();
        builder.begin(point(4.0, 4.0));
        builder.line_to(point(10.0, 4.0));
        builder.line_to(point(10.0, 10.0));
        builder.line_to(point(4.0, 10.0));
        builder.close();
        builder.build()
    }

    let mut non_zero = Surface::new(Format::Rgba8, 12, 12);
    fill(
        &mut non_zero,
        &red_source(),
        figure_eight().iter(),
        &aliased_fill().with_fill_rule(FillRule::NonZero),
    )
    .unwrap();

    let mut even_odd = Surface::new(Format::Rgba8, 12, 12);
    fill(
        &mut even_odd,
        &red_source(),
        figure_eight().iter(),
        &aliased_fill().with_fill_rule(FillRule::EvenOdd),
    )
    .unwrap();

    // The overlap (4..6)×(4..6) is filled under non-zero, a hole under
    // even-odd.
    assert!(is_red(&non_zero, 5, 5));
    assert!(!is_red(&even_odd, 5, 5));
    // Both rules fill the non-overlapping parts.
    for surface in [&non_zero, &even_odd] {
        assert!(is_red(surface, 1, 1));
        assert!(is_red(surface, 8, 8));
        assert!(!is_red(surface, 11, 1));
    }
}

#[test]
fn zero_width_stroke_writes_nothing() {
    let mut builder = Path::builder();
    builder.begin(point(2.0, 5.0));
    builder.line_to(point(12.0, 5.0));
    builder.end(false);

    let mut surface = Surface::new(Format::Rgba8, 16, 16);
    stroke(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_stroke().with_line_width(0.0),
    )
    .unwrap();

    assert_eq!(count_red(&surface), 0);
}

#[test]
fn dash_dot_pattern_round_caps() {
    let mut builder = Path::builder();
    builder.begin(point(3.0, 6.0));
    builder.line_to(point(19.0, 6.0));
    builder.end(false);

    let mut surface = Surface::new(Format::Rgba8, 24, 12);
    stroke(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_stroke()
            .with_line_width(4.0)
            .with_line_cap(LineCap::Round)
            .with_dashes(&[0.0, 8.0], 0.0),
    )
    .unwrap();

    // Dots of radius 2 at x = 3, 11, 19.
    assert!(is_red(&surface, 3, 6));
    assert!(is_red(&surface, 11, 6));
    assert!(is_red(&surface, 18, 6));
    assert!(!is_red(&surface, 7, 6));
    assert!(!is_red(&surface, 15, 6));
}

#[test]
fn stroke_respects_transformation() {
    let mut builder = Path::builder();
    builder.begin(point(0.0, 2.0));
    builder.line_to(point(5.0, 2.0));
    builder.end(false);

    let mut surface = Surface::new(Format::Rgba8, 16, 16);
    stroke(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_stroke()
            .with_line_width(2.0)
            .with_transformation(Transform::scale(2.0, 2.0)),
    )
    .unwrap();

    // The segment lands at y = 4 scaled by 2, with the width warped to 4
    // device units.
    assert!(is_red(&surface, 5, 3));
    assert!(is_red(&surface, 5, 5));
    assert!(!is_red(&surface, 5, 7));
    assert!(is_red(&surface, 9, 4));
    assert!(!is_red(&surface, 11, 4));
}

#[test]
fn singular_transformation_fails() {
    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(5.0, 5.0));
    builder.end(false);
    let path = builder.build();

    let mut surface = Surface::new(Format::Rgba8, 8, 8);
    let options = aliased_stroke().with_transformation(Transform::new(1.0, 0.0, 2.0, 0.0, 0.0, 0.0));
    assert_eq!(
        stroke(&mut surface, &red_source(), path.iter(), &options),
        Err(crate::PaintError::InvalidMatrix)
    );
    assert_eq!(count_red(&surface), 0);
}

#[test]
fn hairline_stroke() {
    let mut builder = Path::builder();
    builder.begin(point(1.0, 2.0));
    builder.line_to(point(10.0, 2.0));
    builder.end(false);

    let mut surface = Surface::new(Format::Rgba8, 16, 16);
    stroke(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_stroke().with_hairline(true),
    )
    .unwrap();

    for x in 1..=10 {
        assert!(is_red(&surface, x, 2));
    }
    assert!(!is_red(&surface, 5, 1));
    assert!(!is_red(&surface, 5, 3));
}

#[test]
fn multisample_fill_antialiases_edges() {
    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(9.0, 0.0));
    builder.line_to(point(0.0, 9.0));
    builder.close();

    let mut surface = Surface::new(Format::Rgba8, 10, 10);
    fill(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &FillOptions::default(),
    )
    .unwrap();

    assert!(is_red(&surface, 1, 1));
    assert_eq!(surface.get_pixel(9, 9), PremulColor::TRANSPARENT);

    let mut partial = 0;
    for y in 0..10 {
        for x in 0..10 {
            let a = surface.get_pixel(x, y).a;
            if a > 0 && a < 255 {
                partial += 1;
            }
        }
    }
    assert!(partial >= 5, "{} partially covered pixels", partial);
}

#[test]
fn supersample_matches_multisample_roughly() {
    let mut triangle = Path::builder();
    triangle.begin(point(0.5, 0.5));
    triangle.line_to(point(11.0, 3.0));
    triangle.line_to(point(4.0, 11.0));
    triangle.close();
    let path = triangle.build();

    let mut multi = Surface::new(Format::Rgba8, 12, 12);
    fill(
        &mut multi,
        &red_source(),
        path.iter(),
        &FillOptions::default().with_anti_aliasing(AntiAliasing::Multisample4x),
    )
    .unwrap();

    let mut sup = Surface::new(Format::Rgba8, 12, 12);
    fill(
        &mut sup,
        &red_source(),
        path.iter(),
        &FillOptions::default().with_anti_aliasing(AntiAliasing::Supersample4x),
    )
    .unwrap();

    let mut max_diff = 0i32;
    for y in 0..12 {
        for x in 0..12 {
            let a = multi.get_pixel(x, y).a as i32;
            let b = sup.get_pixel(x, y).a as i32;
            max_diff = max_diff.max((a - b).abs());
        }
    }
    // The two sampling lattices disagree only within a couple of
    // quantization steps.
    assert!(max_diff <= 96, "max alpha difference {}", max_diff);
}

#[test]
fn fill_requires_closed_subpaths() {
    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(5.0, 0.0));
    builder.line_to(point(5.0, 5.0));
    builder.end(false);

    let mut surface = Surface::new(Format::Rgba8, 8, 8);
    assert_eq!(
        fill(
            &mut surface,
            &red_source(),
            builder.build().iter(),
            &aliased_fill()
        ),
        Err(crate::PaintError::PathNotClosed)
    );
}

#[test]
fn fill_works_on_every_color_format() {
    let mut builder = Path::builder();
    builder.begin(point(1.0, 1.0));
    builder.line_to(point(7.0, 1.0));
    builder.line_to(point(7.0, 7.0));
    builder.line_to(point(1.0, 7.0));
    builder.close();
    let path = builder.build();

    for format in [Format::Rgba8, Format::Argb8, Format::Rgb8, Format::Alpha8] {
        let mut surface = Surface::new(format, 8, 8);
        fill(&mut surface, &red_source(), path.iter(), &aliased_fill()).unwrap();
        assert_eq!(surface.get_pixel(4, 4).a, 255, "{:?}", format);
        let outside = surface.get_pixel(0, 0);
        if format == Format::Rgb8 {
            // No alpha channel; the untouched background reads opaque
            // black.
            assert_eq!(outside, PremulColor::new(0, 0, 0, 255));
        } else {
            assert_eq!(outside.a, 0, "{:?}", format);
        }
    }
}

#[test]
fn mask_sources_must_be_alpha_only() {
    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(4.0, 0.0));
    builder.line_to(point(4.0, 4.0));
    builder.close();
    let path = builder.build();

    let color_mask = Surface::new(Format::Rgba8, 4, 4);
    let mut surface = Surface::new(Format::Rgba8, 8, 8);
    assert_eq!(
        fill(
            &mut surface,
            &Source::Surface(&color_mask),
            path.iter(),
            &aliased_fill()
        ),
        Err(crate::PaintError::InvalidPixelFormat)
    );

    // A real alpha mask samples through.
    let mut alpha_mask = Surface::new(Format::Alpha8, 8, 8);
    for y in 0..8 {
        for x in 0..8 {
            alpha_mask.put_alpha(x, y, 255);
        }
    }
    fill(
        &mut surface,
        &Source::Surface(&alpha_mask),
        path.iter(),
        &aliased_fill(),
    )
    .unwrap();
    assert_eq!(surface.get_pixel(3, 1).a, 255);
    assert_eq!(surface.get_pixel(0, 3).a, 0);
}

#[test]
fn transformation_inverse_roundtrip() {
    let transforms = [
        Transform::identity(),
        Transform::scale(2.0, 3.0),
        Transform::new(0.5, 0.25, -0.25, 0.75, 10.0, -3.0),
    ];

    for t in transforms {
        let inv = t.inverse().unwrap();
        let roundtrip = t.then(&inv);
        let p = roundtrip.transform_point(point(3.25, -7.5));
        assert!((p.x - 3.25).abs() < 1e-4);
        assert!((p.y + 7.5).abs() < 1e-4);
    }

    assert!(Transform::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0).inverse().is_none());
}

#[test]
fn gradient_source_fills() {
    let gradient = crate::LinearGradient {
        from: point(0.0, 0.0),
        to: point(8.0, 0.0),
        start_color: PremulColor::new(0, 0, 0, 255),
        end_color: PremulColor::new(255, 255, 255, 255),
    };
    let source = Source::Gradient(gradient);

    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(8.0, 0.0));
    builder.line_to(point(8.0, 4.0));
    builder.line_to(point(0.0, 4.0));
    builder.close();

    let mut surface = Surface::new(Format::Rgba8, 8, 4);
    fill(&mut surface, &source, builder.build().iter(), &aliased_fill()).unwrap();

    let left = surface.get_pixel(0, 2);
    let right = surface.get_pixel(7, 2);
    assert!(left.r < 64);
    assert!(right.r > 192);
    assert_eq!(left.a, 255);
}

#[test]
fn pdf_blend_mode_end_to_end() {
    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(8.0, 0.0));
    builder.line_to(point(8.0, 8.0));
    builder.line_to(point(0.0, 8.0));
    builder.close();

    let mut surface = Surface::new(Format::Rgba8, 8, 8);
    surface.fill(PremulColor::new(128, 128, 128, 255));

    fill(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_fill().with_operator(Operator::Multiply),
    )
    .unwrap();

    let px = surface.get_pixel(4, 4);
    // Red multiplied with mid grey: the red channel halves, the others go
    // to zero.
    assert!((px.r as i32 - 128).abs() <= 2, "r = {}", px.r);
    assert_eq!(px.g, 0);
    assert_eq!(px.a, 255);
}

#[test]
fn fill_polygon_edges_stay_inside_surface() {
    // Extents exactly on the surface edge must not write past it; the
    // surface guards writes, so all we check is sane coverage at the rim.
    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(8.0, 0.0));
    builder.line_to(point(8.0, 8.0));
    builder.line_to(point(0.0, 8.0));
    builder.close();

    let mut surface = Surface::new(Format::Rgba8, 8, 8);
    fill(&mut surface, &red_source(), builder.build().iter(), &aliased_fill()).unwrap();

    assert_eq!(count_red(&surface), 64);
}

#[test]
fn curves_render_smoothly() {
    let mut builder = Path::builder();
    builder.begin(point(1.0, 8.0));
    builder.cubic_bezier_to(point(1.0, 1.0), point(15.0, 1.0), point(15.0, 8.0));
    builder.close();

    let mut surface = Surface::new(Format::Rgba8, 16, 10);
    fill(&mut surface, &red_source(), builder.build().iter(), &aliased_fill()).unwrap();

    // The arch covers its apex region.
    assert!(is_red(&surface, 8, 4));
    assert!(is_red(&surface, 8, 7));
    assert!(!is_red(&surface, 1, 1));
    assert!(!is_red(&surface, 15, 1));
}

#[test]
fn stroke_round_join_produces_arc() {
    let mut builder = Path::builder();
    builder.begin(point(2.0, 2.0));
    builder.line_to(point(12.0, 2.0));
    builder.line_to(point(12.0, 12.0));
    builder.end(false);

    let mut surface = Surface::new(Format::Rgba8, 20, 20);
    stroke(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_stroke()
            .with_line_width(6.0)
            .with_line_join(LineJoin::Round),
    )
    .unwrap();

    // A point on the rounded outer corner, inside the arc radius.
    assert!(is_red(&surface, 14, 1));
    // The sharp miter apex corner stays outside the arc.
    assert!(!is_red(&surface, 15, 0));
}

#[test]
fn stroke_closed_square_produces_annulus() {
    let mut builder = Path::builder();
    builder.begin(point(4.0, 4.0));
    builder.line_to(point(12.0, 4.0));
    builder.line_to(point(12.0, 12.0));
    builder.line_to(point(4.0, 12.0));
    builder.close();

    let mut surface = Surface::new(Format::Rgba8, 16, 16);
    stroke(
        &mut surface,
        &red_source(),
        builder.build().iter(),
        &aliased_stroke().with_line_width(2.0),
    )
    .unwrap();

    // The band covers the outline.
    assert!(is_red(&surface, 8, 3));
    assert!(is_red(&surface, 8, 4));
    assert!(is_red(&surface, 3, 8));
    assert!(is_red(&surface, 12, 8));
    // Inside and outside stay clear.
    assert!(!is_red(&surface, 8, 8));
    assert!(!is_red(&surface, 1, 1));
}

#[test]
fn unused_scratch_collects_no_garbage_between_calls() {
    // Two fills back to back on the same surface reuse nothing mutable
    // between them; the second must not see state from the first.
    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(4.0, 0.0));
    builder.line_to(point(4.0, 4.0));
    builder.line_to(point(0.0, 4.0));
    builder.close();
    let path = builder.build();

    let mut surface = Surface::new(Format::Rgba8, 8, 8);
    fill(&mut surface, &red_source(), path.iter(), &aliased_fill()).unwrap();
    let after_first = count_red(&surface);
    fill(&mut surface, &red_source(), path.iter(), &aliased_fill()).unwrap();
    assert_eq!(count_red(&surface), after_first);

    let mut pixels: Vec<(i32, i32)> = Vec::new();
    for y in 0..8 {
        for x in 0..8 {
            if is_red(&surface, x, y) {
                pixels.push((x, y));
            }
        }
    }
    assert_eq!(pixels.len(), 16);
}
