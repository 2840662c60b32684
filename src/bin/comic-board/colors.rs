//! Color constants for panel zones and drop feedback.

use eframe::egui::Color32;

// Panel zone outlines
pub const ZONE_STROKE: Color32 = Color32::from_rgb(70, 130, 180);

// Highlight while artwork is dragged over a zone
pub const ZONE_HOVER_STROKE: Color32 = Color32::from_rgb(255, 165, 0);
pub const ZONE_HOVER_FILL: Color32 = Color32::from_rgba_premultiplied(40, 26, 0, 40);
