use eframe::egui::{Pos2, pos2, vec2};

use super::constants::{CARD_HEIGHT, CONNECTOR_OFFSET};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ConnectorSide {
    Top,
    Bottom,
}

/// Center of the connector dot on the given side of a card centered at `center`.
pub(in crate::app) fn connector(center: Pos2, side: ConnectorSide) -> Pos2 {
    let offset = CARD_HEIGHT / 2.0 + CONNECTOR_OFFSET;
    match side {
        ConnectorSide::Top => center - vec2(0.0, offset),
        ConnectorSide::Bottom => center + vec2(0.0, offset),
    }
}

pub(in crate::app) fn bezier_point(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;
    let a = uu * u;
    let b = 3.0 * uu * t;
    let c = 3.0 * u * tt;
    let d = tt * t;
    pos2(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Vertical S-curve from a parent's bottom connector to a child's top connector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct EdgeCurve {
    pub(in crate::app) start: Pos2,
    pub(in crate::app) control_start: Pos2,
    pub(in crate::app) control_end: Pos2,
    pub(in crate::app) end: Pos2,
}

impl EdgeCurve {
    pub(in crate::app) fn between(parent: Pos2, child: Pos2) -> Self {
        let start = connector(parent, ConnectorSide::Bottom);
        let end = connector(child, ConnectorSide::Top);
        let mid_y = (start.y + end.y) / 2.0;
        Self {
            start,
            control_start: pos2(start.x, mid_y),
            control_end: pos2(end.x, mid_y),
            end,
        }
    }

    pub(in crate::app) fn point_at(&self, t: f32) -> Pos2 {
        bezier_point(self.start, self.control_start, self.control_end, self.end, t)
    }
}
