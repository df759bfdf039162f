//! Shape primitives on top of tiny-skia
//!
//! Thin helpers shared by the frame renderer and the realm content
//! renderers. All coordinates are surface pixels; colors are taken as
//! [`Rgb`] plus an alpha in `[0, 1]`.

use tiny_skia::{
    Color, FillRule, GradientStop, Paint, PathBuilder, Pixmap, Point, RadialGradient,
    Rect as SkiaRect,
    SpreadMode, Stroke, Transform,
};

use crate::domain::core::Rect;
use crate::domain::presentation::Rgb;

pub fn color(rgb: Rgb, alpha: f32) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn paint(rgb: Rgb, alpha: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgb, alpha));
    paint.anti_alias = true;
    paint
}

pub fn fill_rect(pixmap: &mut Pixmap, rect: Rect, rgb: Rgb, alpha: f32) {
    if let Some(r) = SkiaRect::from_xywh(rect.x, rect.y, rect.w, rect.h) {
        pixmap.fill_rect(r, &paint(rgb, alpha), Transform::identity(), None);
    }
}

fn rounded_path(rect: Rect, radius: f32) -> Option<tiny_skia::Path> {
    let r = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
    let (x, y, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.quad_to(right, y, right, y + r);
    pb.line_to(right, bottom - r);
    pb.quad_to(right, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.quad_to(x, bottom, x, bottom - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

pub fn fill_rounded(pixmap: &mut Pixmap, rect: Rect, radius: f32, rgb: Rgb, alpha: f32) {
    if let Some(path) = rounded_path(rect, radius) {
        pixmap.fill_path(&path, &paint(rgb, alpha), FillRule::Winding, Transform::identity(), None);
    }
}

pub fn stroke_rounded(
    pixmap: &mut Pixmap,
    rect: Rect,
    radius: f32,
    width: f32,
    rgb: Rgb,
    alpha: f32,
) {
    if let Some(path) = rounded_path(rect, radius) {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint(rgb, alpha), &stroke, Transform::identity(), None);
    }
}

pub fn fill_circle(pixmap: &mut Pixmap, cx: f32, cy: f32, radius: f32, rgb: Rgb, alpha: f32) {
    if radius <= 0.0 {
        return;
    }
    if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
        pixmap.fill_path(&path, &paint(rgb, alpha), FillRule::Winding, Transform::identity(), None);
    }
}

pub fn stroke_circle(
    pixmap: &mut Pixmap,
    cx: f32,
    cy: f32,
    radius: f32,
    width: f32,
    rgb: Rgb,
    alpha: f32,
) {
    if radius <= 0.0 {
        return;
    }
    if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint(rgb, alpha), &stroke, Transform::identity(), None);
    }
}

/// Soft radial halo fading from `alpha` at the center to transparent
pub fn radial_glow(pixmap: &mut Pixmap, cx: f32, cy: f32, radius: f32, rgb: Rgb, alpha: f32) {
    if radius <= 0.0 || alpha <= 0.0 {
        return;
    }
    let center = Point::from_xy(cx, cy);
    let shader = RadialGradient::new(
        center,
        center,
        radius,
        vec![
            GradientStop::new(0.0, color(rgb, alpha)),
            GradientStop::new(1.0, color(rgb, 0.0)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    );

    match (shader, PathBuilder::from_circle(cx, cy, radius)) {
        (Some(shader), Some(path)) => {
            let paint = Paint {
                shader,
                anti_alias: true,
                ..Paint::default()
            };
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
        _ => fill_circle(pixmap, cx, cy, radius, rgb, alpha * 0.5),
    }
}

pub fn line(
    pixmap: &mut Pixmap,
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    rgb: Rgb,
    alpha: f32,
) {
    polyline(pixmap, &[from, to], width, rgb, alpha);
}

pub fn polyline(pixmap: &mut Pixmap, points: &[(f32, f32)], width: f32, rgb: Rgb, alpha: f32) {
    let Some((&(x0, y0), rest)) = points.split_first() else {
        return;
    };
    let mut pb = PathBuilder::new();
    pb.move_to(x0, y0);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint(rgb, alpha), &stroke, Transform::identity(), None);
    }
}
