// Raster surface: compositing, clipping and argument validation.

use radiolume::engine::surface::{ClipRect, Point, Raster, Rgb, Surface};

const RED: Rgb = Rgb::new(255, 0, 0);

// ── Colors ───────────────────────────────────────────────────────────────────

#[test]
fn test_hsl_primaries() {
    assert_eq!(Rgb::from_hsl(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
    assert_eq!(Rgb::from_hsl(120.0, 1.0, 0.5), Rgb::new(0, 255, 0));
    assert_eq!(Rgb::from_hsl(240.0, 1.0, 0.5), Rgb::new(0, 0, 255));
    assert_eq!(Rgb::from_hsl(-240.0, 1.0, 0.5), Rgb::new(0, 255, 0));
    assert_eq!(Rgb::from_hsl(90.0, 0.0, 1.0), Rgb::WHITE);
}

#[test]
fn test_lerp_clamps() {
    assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 2.0), Rgb::WHITE);
    assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, -1.0), Rgb::BLACK);
    assert_eq!(Rgb::BLACK.lerp(Rgb::new(200, 100, 0), 0.5), Rgb::new(100, 50, 0));
}

// ── Drawing ──────────────────────────────────────────────────────────────────

#[test]
fn test_new_raster_is_black() {
    let raster = Raster::new(8, 4);
    assert_eq!(raster.pixel_width(), 8);
    assert_eq!(raster.pixel_height(), 4);
    assert!(raster.is_uniform(Rgb::BLACK));
    assert_eq!(raster.pixel(8, 0), None);
}

#[test]
fn test_fill_rect_covers_pixels() {
    let mut raster = Raster::new(10, 10);
    raster.fill_rect(2.0, 2.0, 3.0, 3.0, Rgb::WHITE, 1.0).unwrap();
    assert_eq!(raster.pixel(2, 2), Some(Rgb::WHITE));
    assert_eq!(raster.pixel(4, 4), Some(Rgb::WHITE));
    assert_eq!(raster.pixel(5, 5), Some(Rgb::BLACK));
    assert_eq!(raster.pixel(1, 2), Some(Rgb::BLACK));
}

#[test]
fn test_fill_circle_marks_center() {
    let mut raster = Raster::new(20, 20);
    raster.fill_circle(Point::new(10.0, 10.0), 4.0, RED, 1.0).unwrap();
    assert_eq!(raster.pixel(10, 10), Some(RED));
    assert_eq!(raster.pixel(0, 0), Some(Rgb::BLACK));
}

#[test]
fn test_fill_polygon_square() {
    let mut raster = Raster::new(10, 10);
    let square = [
        Point::new(1.0, 1.0),
        Point::new(6.0, 1.0),
        Point::new(6.0, 6.0),
        Point::new(1.0, 6.0),
    ];
    raster.fill_polygon(&square, Rgb::WHITE, 1.0).unwrap();
    assert_eq!(raster.pixel(3, 3), Some(Rgb::WHITE));
    assert_eq!(raster.pixel(8, 8), Some(Rgb::BLACK));
}

#[test]
fn test_degenerate_polygon_is_noop() {
    let mut raster = Raster::new(4, 4);
    let line = [Point::new(0.0, 0.0), Point::new(3.0, 3.0)];
    raster.fill_polygon(&line, Rgb::WHITE, 1.0).unwrap();
    assert!(raster.is_uniform(Rgb::BLACK));
}

#[test]
fn test_stroke_line_horizontal() {
    let mut raster = Raster::new(20, 5);
    raster
        .stroke_line(Point::new(2.0, 2.5), Point::new(17.0, 2.5), 1.0, Rgb::WHITE, 1.0)
        .unwrap();
    for x in 3..16 {
        assert_eq!(raster.pixel(x, 2), Some(Rgb::WHITE), "gap at x={x}");
    }
    assert_eq!(raster.pixel(10, 0), Some(Rgb::BLACK));
}

#[test]
fn test_glow_is_brightest_in_center() {
    let mut raster = Raster::new(21, 21);
    raster.glow(Point::new(10.5, 10.5), 8.0, Rgb::WHITE, 1.0).unwrap();
    let center = raster.pixel(10, 10).unwrap();
    let edge = raster.pixel(10, 16).unwrap();
    assert!(center.r > edge.r);
    assert_eq!(raster.pixel(0, 0), Some(Rgb::BLACK));
}

// ── Validation ───────────────────────────────────────────────────────────────

#[test]
fn test_negative_radius_is_an_error() {
    let mut raster = Raster::new(10, 10);
    assert!(raster.fill_circle(Point::new(5.0, 5.0), -1.0, RED, 1.0).is_err());
    assert!(raster.stroke_circle(Point::new(5.0, 5.0), -0.5, 1.0, RED, 1.0).is_err());
    assert!(raster
        .stroke_arc(Point::new(5.0, 5.0), -2.0, 0.0, 1.0, 1.0, RED, 1.0)
        .is_err());
    assert!(raster.glow(Point::new(5.0, 5.0), f32::NAN, RED, 1.0).is_err());
}

#[test]
fn test_non_finite_geometry_is_an_error() {
    let mut raster = Raster::new(10, 10);
    assert!(raster.fill_circle(Point::new(f32::NAN, 5.0), 1.0, RED, 1.0).is_err());
    assert!(raster.fill_rect(0.0, 0.0, f32::INFINITY, 1.0, RED, 1.0).is_err());
    assert!(raster
        .stroke_line(Point::new(0.0, 0.0), Point::new(f32::NAN, 1.0), 1.0, RED, 1.0)
        .is_err());
    let bad = [Point::new(0.0, 0.0), Point::new(1.0, f32::NAN), Point::new(2.0, 2.0)];
    assert!(raster.fill_polygon(&bad, RED, 1.0).is_err());
    // Nothing was drawn by the failed calls.
    assert!(raster.is_uniform(Rgb::BLACK));
}

// ── Clip, fade, resize ───────────────────────────────────────────────────────

#[test]
fn test_clip_restricts_drawing() {
    let mut raster = Raster::new(10, 10);
    raster.set_clip(Some(ClipRect {
        x: 0.0,
        y: 5.0,
        width: 10.0,
        height: 5.0,
    }));
    raster.fill_rect(0.0, 0.0, 10.0, 10.0, Rgb::WHITE, 1.0).unwrap();
    assert_eq!(raster.pixel(3, 4), Some(Rgb::BLACK));
    assert_eq!(raster.pixel(3, 5), Some(Rgb::WHITE));

    raster.set_clip(None);
    raster.fill_rect(0.0, 0.0, 10.0, 10.0, RED, 1.0).unwrap();
    assert!(raster.is_uniform(RED));
}

#[test]
fn test_fade_converges_on_target() {
    let mut raster = Raster::new(6, 6);
    raster.clear(Rgb::WHITE);
    let background = Rgb::new(6, 6, 14);
    for _ in 0..300 {
        raster.fade(background, 0.05);
    }
    assert!(raster.is_uniform(background));
}

#[test]
fn test_resize_discards_contents() {
    let mut raster = Raster::new(4, 4);
    raster.clear(RED);
    raster.resize(7, 3);
    assert_eq!(raster.width(), 7.0);
    assert_eq!(raster.height(), 3.0);
    assert!(raster.is_uniform(Rgb::BLACK));
    assert_eq!(raster.center(), Point::new(3.5, 1.5));
}

#[test]
fn test_zero_area_raster_is_empty() {
    let mut raster = Raster::new(0, 0);
    assert!(raster.is_empty());
    raster.clear(RED);
    raster.fade(RED, 0.5);
    raster.fill_rect(0.0, 0.0, 5.0, 5.0, RED, 1.0).unwrap();
    assert!(raster.pixels().is_empty());
}
