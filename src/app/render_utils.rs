use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use super::constants::{DEPTH_COLORS, EDGE_SEGMENTS};
use super::geometry::EdgeCurve;
use super::scene::{StrokeLayer, StrokeSegment};

pub(super) fn lerp_color(from: Color32, to: Color32, t: f32) -> Color32 {
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color32::from_rgb(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
    )
}

pub(super) fn depth_color(depth: usize) -> Color32 {
    DEPTH_COLORS[depth % DEPTH_COLORS.len()]
}

pub(super) fn card_fill(depth: usize, highlighted: bool) -> Color32 {
    let toward_white = if highlighted { 0.35 } else { 0.7 };
    lerp_color(depth_color(depth), Color32::WHITE, toward_white)
}

/// Appends the first `progress` share of `curve` as straight gradient segments.
/// A progress of 1 yields the full edge in `EDGE_SEGMENTS` pieces.
pub(super) fn push_gradient_curve(
    layer: &mut StrokeLayer,
    curve: &EdgeCurve,
    from_color: Color32,
    to_color: Color32,
    width: f32,
    progress: f32,
) {
    let progress = progress.clamp(0.0, 1.0);
    let segments = ((EDGE_SEGMENTS as f32 * progress).floor() as usize).max(1);
    for index in 0..segments {
        let t0 = (index as f32 / segments as f32) * progress;
        let t1 = ((index + 1) as f32 / segments as f32) * progress;
        layer.push(StrokeSegment {
            from: curve.point_at(t0),
            to: curve.point_at(t1),
            color: lerp_color(from_color, to_color, (t0 + t1) / 2.0),
            width,
        });
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, offset: Vec2, scale: f32) {
    painter.rect_filled(rect, 0.0, super::constants::BACKGROUND);

    let step = (80.0 * scale.clamp(0.5, 2.0)).max(24.0);
    let origin = rect.min + offset;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(123, 60, 255, 26));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}
