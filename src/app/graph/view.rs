use std::time::Duration;

use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, vec2,
};

use crate::util::truncate_label;

use super::super::ViewModel;
use super::super::constants::{
    CARD_HEIGHT, CARD_RADIUS, CARD_STROKE_WIDTH, CARD_WIDTH, COLLAPSED_CONNECTOR_FILL,
    CONNECTOR_FILL, CONNECTOR_OFFSET, CONNECTOR_RADIUS, SEARCH_MATCH_OUTLINE, TEXT_PRIMARY,
    TEXT_SECONDARY,
};
use super::super::render_utils::{card_fill, depth_color, draw_background, segment_visible};
use super::super::scene::{NodeVisual, StrokeLayer};
use super::super::viewport::Viewport;
use super::PointerEvent;

const PRIMARY_LABEL_CHARS: usize = 14;
const SECONDARY_LABEL_CHARS: usize = 22;

/// Screen placement of the world layer for one frame.
#[derive(Clone, Copy)]
struct Projection {
    canvas: Rect,
    viewport: Viewport,
}

impl Projection {
    fn point(&self, world: Pos2) -> Pos2 {
        self.canvas.min + self.viewport.world_to_screen(world).to_vec2()
    }
}

fn paint_strokes(painter: &Painter, projection: Projection, layer: &StrokeLayer) {
    if layer.is_empty() {
        return;
    }
    for segment in layer.segments() {
        let from = projection.point(segment.from);
        let to = projection.point(segment.to);
        let width = segment.width * projection.viewport.scale;
        if !segment_visible(projection.canvas, from, to, width) {
            continue;
        }
        painter.line_segment([from, to], Stroke::new(width, segment.color));
    }
}

fn paint_card(painter: &Painter, projection: Projection, visual: &NodeVisual, search_match: bool) {
    let zoom = projection.viewport.scale * visual.scale;
    let center = projection.point(visual.position);
    let card = Rect::from_center_size(center, vec2(CARD_WIDTH, CARD_HEIGHT) * zoom);
    if !projection
        .canvas
        .expand((CONNECTOR_RADIUS + CONNECTOR_OFFSET) * zoom + 4.0)
        .intersects(card)
    {
        return;
    }

    let alpha = visual.opacity.clamp(0.0, 1.0);
    let fade = |color: Color32| color.gamma_multiply(alpha);
    let accent = depth_color(visual.depth);
    let radius = CARD_RADIUS * zoom;

    painter.rect_filled(card, radius, fade(card_fill(visual.depth, visual.highlighted)));
    painter.rect_stroke(
        card,
        radius,
        Stroke::new(CARD_STROKE_WIDTH * zoom, fade(accent)),
        StrokeKind::Inside,
    );
    if search_match {
        painter.rect_stroke(
            card.expand(4.0 * zoom),
            radius + 4.0 * zoom,
            Stroke::new(2.0 * zoom, fade(SEARCH_MATCH_OUTLINE)),
            StrokeKind::Outside,
        );
    }

    let connector_offset = vec2(0.0, (CARD_HEIGHT / 2.0 + CONNECTOR_OFFSET) * zoom);
    let connector_radius = CONNECTOR_RADIUS * zoom;
    let bottom_fill = if visual.collapsed {
        COLLAPSED_CONNECTOR_FILL
    } else {
        CONNECTOR_FILL
    };
    painter.circle_filled(center - connector_offset, connector_radius, fade(CONNECTOR_FILL));
    painter.circle_filled(center + connector_offset, connector_radius, fade(bottom_fill));

    // Text is unreadable below this size and costs layout time.
    if zoom < 0.3 {
        return;
    }
    painter.text(
        center - vec2(0.0, 10.0 * zoom),
        Align2::CENTER_CENTER,
        truncate_label(&visual.primary, PRIMARY_LABEL_CHARS),
        FontId::proportional(20.0 * zoom),
        fade(TEXT_PRIMARY),
    );
    if !visual.secondary.is_empty() {
        painter.text(
            center + vec2(0.0, 16.0 * zoom),
            Align2::CENTER_CENTER,
            truncate_label(&visual.secondary, SECONDARY_LABEL_CHARS),
            FontId::proportional(13.0 * zoom),
            fade(TEXT_SECONDARY),
        );
    }
}

/// One zoom step per wheel notch delivered this frame. Positive values zoom out.
fn wheel_steps(events: &[egui::Event]) -> impl Iterator<Item = f32> + '_ {
    events.iter().filter_map(|event| match event {
        egui::Event::MouseWheel { delta, .. } if delta.y != 0.0 => Some(-delta.y),
        _ => None,
    })
}

impl ViewModel {
    /// Translates this frame's raw egui pointer input into gesture events.
    fn collect_pointer_events(&self, ui: &Ui, canvas: Rect, hovered: bool) -> Vec<PointerEvent> {
        let gesture_active = self.gesture_active();
        ui.input(|input| {
            let mut events = Vec::new();
            let local = input
                .pointer
                .latest_pos()
                .map(|pos| pos - canvas.min.to_vec2());

            if input.pointer.primary_pressed()
                && hovered
                && let Some(pos) = local
            {
                events.push(PointerEvent::Down { pos });
            }
            if (gesture_active || !events.is_empty())
                && input.pointer.is_moving()
                && let Some(pos) = local
            {
                events.push(PointerEvent::Move { pos });
            }
            if input.pointer.primary_released() {
                match input.pointer.latest_pos() {
                    Some(pos) if canvas.contains(pos) => events.push(PointerEvent::Up {
                        pos: pos - canvas.min.to_vec2(),
                    }),
                    _ => events.push(PointerEvent::UpOutside),
                }
            }

            if hovered && let Some(pos) = local {
                events.extend(
                    wheel_steps(&input.events).map(|delta_y| PointerEvent::Wheel { delta_y, pos }),
                );
            }

            events
        })
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (canvas, response) =
            ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.set_viewport_size(canvas.size());

        let now = ui.input(|input| input.time);
        let origin = *self.time_origin.get_or_insert(now);
        self.clock = Duration::from_secs_f64((now - origin).max(0.0));

        for event in self.collect_pointer_events(ui, canvas, response.hovered()) {
            self.handle_pointer(event);
        }
        self.tick_animations();

        let painter = ui.painter_at(canvas);
        let projection = Projection {
            canvas,
            viewport: self.viewport,
        };
        draw_background(&painter, canvas, self.viewport.offset, self.viewport.scale);

        paint_strokes(&painter, projection, &self.scene.edges);
        paint_strokes(&painter, projection, &self.scene.animated_edges);
        paint_strokes(&painter, projection, &self.scene.highlight);

        let matches = self.cached_search_matches();
        for visual in self.scene.nodes.values() {
            let search_match = matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&visual.id));
            paint_card(&painter, projection, visual, search_match);
        }
        for visual in self.scene.exiting() {
            paint_card(&painter, projection, visual, false);
        }

        if let Some(pointer) = response.hover_pos() {
            let world = self.viewport.screen_to_world(pointer - canvas.min.to_vec2());
            let expandable = self
                .scene
                .node_at(world)
                .and_then(|id| self.scene.nodes.get(&id))
                .is_some_and(|visual| visual.expandable);
            if expandable {
                ui.output_mut(|output| {
                    output.cursor_icon = egui::CursorIcon::PointingHand;
                });
            }
        }

        if self.is_animating() || self.gesture_active() {
            ui.ctx().request_repaint();
        }
    }
}
