use std::time::Duration;

use eframe::egui::Color32;

pub(in crate::app) const CARD_WIDTH: f32 = 150.0;
pub(in crate::app) const CARD_HEIGHT: f32 = 90.0;
pub(in crate::app) const CARD_RADIUS: f32 = 16.0;
pub(in crate::app) const CARD_STROKE_WIDTH: f32 = 2.5;
pub(in crate::app) const CONNECTOR_RADIUS: f32 = 6.0;
pub(in crate::app) const CONNECTOR_OFFSET: f32 = 2.0;

pub(in crate::app) const EDGE_SEGMENTS: usize = 14;
pub(in crate::app) const EDGE_WIDTH: f32 = 4.0;
pub(in crate::app) const HIGHLIGHT_EDGE_WIDTH: f32 = 6.0;

pub(in crate::app) const DEPTH_COLORS: [Color32; 6] = [
    Color32::from_rgb(0xff, 0x4f, 0xd8),
    Color32::from_rgb(0x7c, 0x4d, 0xff),
    Color32::from_rgb(0x33, 0xf0, 0xff),
    Color32::from_rgb(0x00, 0xff, 0xa3),
    Color32::from_rgb(0xff, 0xb3, 0x47),
    Color32::from_rgb(0xff, 0x6b, 0x6b),
];
pub(in crate::app) const BACKGROUND: Color32 = Color32::from_rgb(0x0b, 0x06, 0x16);
pub(in crate::app) const CONNECTOR_FILL: Color32 = Color32::from_rgb(0x9e, 0xe7, 0xff);
pub(in crate::app) const COLLAPSED_CONNECTOR_FILL: Color32 = Color32::from_rgb(0xff, 0x5a, 0xd6);
pub(in crate::app) const SEARCH_MATCH_OUTLINE: Color32 = Color32::from_rgb(0x55, 0xf0, 0xff);
pub(in crate::app) const TEXT_PRIMARY: Color32 = Color32::from_rgb(0x0b, 0x06, 0x16);
pub(in crate::app) const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x35, 0x22, 0x4a);

pub(in crate::app) const ENTER_DURATION: Duration = Duration::from_millis(420);
pub(in crate::app) const ENTER_STAGGER: Duration = Duration::from_millis(20);
pub(in crate::app) const ENTER_START_SCALE: f32 = 0.5;
pub(in crate::app) const EXIT_DURATION: Duration = Duration::from_millis(260);
pub(in crate::app) const EXIT_END_SCALE: f32 = 0.7;

pub(in crate::app) const MIN_SCALE: f32 = 0.2;
pub(in crate::app) const MAX_SCALE: f32 = 3.5;
pub(in crate::app) const ZOOM_IN_FACTOR: f32 = 1.04;
pub(in crate::app) const ZOOM_OUT_FACTOR: f32 = 0.96;

/// World units a node may travel before a press stops counting as a tap.
pub(in crate::app) const DRAG_THRESHOLD: f32 = 6.0;
/// Screen pixels a canvas pan must cover to count as manual framing.
pub(in crate::app) const PAN_THRESHOLD: f32 = 3.0;

pub(in crate::app) const DEFAULT_FIT_PADDING: f32 = 120.0;
