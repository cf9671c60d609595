use eframe::egui::{Pos2, Vec2, vec2};

use super::constants::{MAX_SCALE, MIN_SCALE};

/// Transform of the world layer relative to the canvas origin:
/// `screen = offset + world * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Viewport {
    pub(in crate::app) offset: Vec2,
    pub(in crate::app) scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub(in crate::app) fn world_to_screen(&self, world: Pos2) -> Pos2 {
        (self.offset + world.to_vec2() * self.scale).to_pos2()
    }

    pub(in crate::app) fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.offset) / self.scale).to_pos2()
    }

    /// Rescales by `factor` (clamped to the zoom range) while keeping the
    /// world point under `anchor` fixed on screen.
    pub(in crate::app) fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        let world = self.screen_to_world(anchor);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.offset = anchor.to_vec2() - world.to_vec2() * self.scale;
    }

    /// Scales `tree` to fit `available` minus `padding` and centers it.
    /// Returns false when the canvas has no area yet.
    pub(in crate::app) fn fit(&mut self, available: Vec2, tree: Vec2, padding: f32) -> bool {
        if available.x <= 0.0 || available.y <= 0.0 {
            return false;
        }

        let scale_x = (available.x - padding) / tree.x.max(1.0);
        let scale_y = (available.y - padding) / tree.y.max(1.0);
        self.scale = scale_x.min(scale_y).clamp(MIN_SCALE, MAX_SCALE);
        self.offset = vec2(
            (available.x - tree.x * self.scale) / 2.0,
            (available.y - tree.y * self.scale) / 2.0,
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::super::constants::{ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
    use super::*;

    #[test]
    fn screen_world_round_trip() {
        let viewport = Viewport {
            offset: vec2(30.0, -12.0),
            scale: 1.5,
        };
        let world = pos2(100.0, 40.0);
        let screen = viewport.world_to_screen(world);
        assert_eq!(screen, pos2(180.0, 48.0));
        assert_eq!(viewport.screen_to_world(screen), world);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut viewport = Viewport {
            offset: vec2(50.0, 20.0),
            scale: 1.0,
        };
        let anchor = pos2(300.0, 200.0);
        let world_before = viewport.screen_to_world(anchor);

        viewport.zoom_at(anchor, ZOOM_IN_FACTOR);
        assert!((viewport.scale - 1.04).abs() < 1e-6);
        let screen_after = viewport.world_to_screen(world_before);
        assert!((screen_after.x - anchor.x).abs() < 1e-3);
        assert!((screen_after.y - anchor.y).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut viewport = Viewport::default();
        for _ in 0..200 {
            viewport.zoom_at(pos2(10.0, 10.0), ZOOM_IN_FACTOR);
        }
        assert_eq!(viewport.scale, MAX_SCALE);

        for _ in 0..400 {
            viewport.zoom_at(pos2(10.0, 10.0), ZOOM_OUT_FACTOR);
        }
        assert_eq!(viewport.scale, MIN_SCALE);
    }

    #[test]
    fn fit_centers_tree() {
        let mut viewport = Viewport::default();
        assert!(viewport.fit(vec2(1000.0, 600.0), vec2(880.0, 240.0), 120.0));

        assert_eq!(viewport.scale, 1.0);
        assert_eq!(viewport.offset, vec2(60.0, 180.0));
    }

    #[test]
    fn fit_uses_tighter_axis_and_clamps() {
        let mut viewport = Viewport::default();
        assert!(viewport.fit(vec2(520.0, 1000.0), vec2(800.0, 100.0), 120.0));
        assert_eq!(viewport.scale, 0.5);

        assert!(viewport.fit(vec2(1000.0, 1000.0), vec2(1.0, 1.0), 120.0));
        assert_eq!(viewport.scale, MAX_SCALE);
    }

    #[test]
    fn fit_skips_empty_canvas() {
        let mut viewport = Viewport::default();
        assert!(!viewport.fit(Vec2::ZERO, vec2(100.0, 100.0), 120.0));
        assert_eq!(viewport, Viewport::default());
    }
}
