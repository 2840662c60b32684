//! Coordinate math for mapping panels between template pixel space and
//! screen space, and for constraining placed artwork to its panel.

use crate::constants::EDGE_MARGIN;
use comic_board::PanelRect;
use eframe::egui;

/// Scale factor between the template's natural size and its displayed size.
///
/// Returns `None` when the natural width is not positive (the template failed
/// to decode, or is degenerate); callers must surface an error instead of
/// converting coordinates.
pub fn scale_factor(displayed_width: f32, natural_width: f32) -> Option<f32> {
    if natural_width <= 0.0 {
        return None;
    }
    Some(displayed_width / natural_width)
}

/// Converts a length from template pixel space to screen space.
pub fn to_screen(original: f32, scale: f32) -> f32 {
    original * scale
}

/// Converts a length from screen space back to template pixel space.
pub fn to_original(screen: f32, scale: f32) -> f32 {
    screen / scale
}

/// Screen-space rectangle of a panel, relative to the template's top-left
/// corner.
pub fn panel_to_screen(panel: &PanelRect, scale: f32) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(
            to_screen(panel.x as f32, scale),
            to_screen(panel.y as f32, scale),
        ),
        egui::vec2(
            to_screen(panel.width as f32, scale),
            to_screen(panel.height as f32, scale),
        ),
    )
}

/// Clamps a placed image's offset so at least [`EDGE_MARGIN`] pixels of it
/// stay inside the zone on each axis.
///
/// Written as `min` then `max` so a degenerate range (zone or image smaller
/// than the margins) resolves to the lower bound rather than panicking.
pub fn clamp_offset(
    left: f32,
    top: f32,
    image_size: egui::Vec2,
    zone_size: egui::Vec2,
) -> (f32, f32) {
    let min_left = EDGE_MARGIN - image_size.x;
    let max_left = zone_size.x - EDGE_MARGIN;
    let min_top = EDGE_MARGIN - image_size.y;
    let max_top = zone_size.y - EDGE_MARGIN;

    (
        left.min(max_left).max(min_left),
        top.min(max_top).max(min_top),
    )
}

/// Resizes a placed image around the pointer so the image point under the
/// cursor stays fixed on screen.
///
/// `pointer` is the cursor position relative to the image's top-left corner
/// and `factor` the width multiplier. Returns the new `(left, top, width)`.
pub fn zoom_about(
    left: f32,
    top: f32,
    width: f32,
    pointer: egui::Vec2,
    factor: f32,
) -> (f32, f32, f32) {
    let new_width = width * factor;
    let ratio = new_width / width;

    (
        left + pointer.x - pointer.x * ratio,
        top + pointer.y - pointer.y * ratio,
        new_width,
    )
}

/// Initial geometry for artwork dropped into a zone: span the zone's full
/// width at proportional height, vertically centered when shorter than the
/// zone. Returns `(left, top, width)`.
pub fn initial_placement(zone_size: egui::Vec2, natural_size: egui::Vec2) -> (f32, f32, f32) {
    let width = zone_size.x;
    let height = width * natural_size.y / natural_size.x;
    let top = if height < zone_size.y {
        (zone_size.y - height) / 2.0
    } else {
        0.0
    };

    (0.0, top, width)
}
