//! Drop zones: one interactive region per panel, derived from the panel
//! geometry at the current displayed scale and rebuilt wholesale whenever
//! that scale changes.

use crate::geometry;
use comic_board::PanelRect;
use eframe::egui;
use std::path::PathBuf;

/// Artwork placed inside a drop zone.
///
/// `left`/`top`/`width` are screen pixels relative to the zone's top-left
/// corner; the height is always derived from the natural aspect ratio.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    pub source: PathBuf,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    /// Decoded pixel size of the artwork (always positive)
    pub natural_size: egui::Vec2,
}

impl PlacedImage {
    pub fn height(&self) -> f32 {
        self.width * self.natural_size.y / self.natural_size.x
    }

    pub fn size(&self) -> egui::Vec2 {
        egui::vec2(self.width, self.height())
    }
}

/// A screen-space drop target derived from one panel rectangle.
#[derive(Debug, Clone)]
pub struct DropZone {
    /// Source rectangle in template pixel space, kept for converting
    /// placements back when composing
    pub panel: PanelRect,
    /// On-screen rectangle relative to the template's top-left corner
    pub rect: egui::Rect,
    /// At most one placed image per zone
    pub placed: Option<PlacedImage>,
}

/// Derives one zone per panel at the given scale.
///
/// The previous zone list is replaced wholesale, so repeated calls never
/// accumulate duplicates; any existing placements are discarded with it.
pub fn rebuild_zones(panels: &[PanelRect], scale: f32) -> Vec<DropZone> {
    panels
        .iter()
        .map(|panel| DropZone {
            panel: *panel,
            rect: geometry::panel_to_screen(panel, scale),
            placed: None,
        })
        .collect()
}

/// Replaces whatever the zone holds with freshly dropped artwork at its
/// initial placement.
pub fn place_image(zone: &mut DropZone, source: PathBuf, natural_size: egui::Vec2) {
    let (left, top, width) = geometry::initial_placement(zone.rect.size(), natural_size);
    zone.placed = Some(PlacedImage {
        source,
        left,
        top,
        width,
        natural_size,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    fn sample_panels() -> Vec<PanelRect> {
        vec![
            PanelRect {
                x: 100,
                y: 100,
                width: 200,
                height: 300,
            },
            PanelRect {
                x: 400,
                y: 100,
                width: 300,
                height: 300,
            },
        ]
    }

    #[test]
    fn rebuild_is_idempotent() {
        let panels = sample_panels();

        let first = rebuild_zones(&panels, 0.5);
        let second = rebuild_zones(&panels, 0.5);

        assert_eq!(first.len(), panels.len());
        assert_eq!(second.len(), panels.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.panel, b.panel);
            assert_eq!(a.rect, b.rect);
        }
    }

    #[test]
    fn rebuild_discards_placements() {
        let panels = sample_panels();
        let mut zones = rebuild_zones(&panels, 0.5);
        place_image(
            &mut zones[0],
            PathBuf::from("artwork/panel_1.png"),
            vec2(400.0, 200.0),
        );

        let zones = rebuild_zones(&panels, 0.25);
        assert!(zones.iter().all(|zone| zone.placed.is_none()));
    }

    #[test]
    fn zones_scale_with_the_template() {
        let panels = sample_panels();
        let zones = rebuild_zones(&panels, 0.5);

        assert_eq!(zones[0].rect.min, eframe::egui::pos2(50.0, 50.0));
        assert_eq!(zones[0].rect.size(), vec2(100.0, 150.0));
        // Original rect kept alongside for the reverse conversion
        assert_eq!(zones[0].panel, panels[0]);
    }

    #[test]
    fn dropping_replaces_existing_artwork() {
        let mut zones = rebuild_zones(&sample_panels(), 0.5);

        place_image(&mut zones[0], PathBuf::from("a.png"), vec2(400.0, 200.0));
        place_image(&mut zones[0], PathBuf::from("b.png"), vec2(300.0, 300.0));

        let placed = zones[0].placed.as_ref().unwrap();
        assert_eq!(placed.source, PathBuf::from("b.png"));
    }

    #[test]
    fn placement_spans_zone_width_at_aspect_height() {
        // 400x200 artwork in the 100x150 zone: width 100, height 50, centered
        let mut zones = rebuild_zones(&sample_panels(), 0.5);
        place_image(&mut zones[0], PathBuf::from("a.png"), vec2(400.0, 200.0));

        let placed = zones[0].placed.as_ref().unwrap();
        assert_eq!(placed.left, 0.0);
        assert_eq!(placed.width, 100.0);
        assert_eq!(placed.height(), 50.0);
        assert_eq!(placed.top, 50.0);
    }
}
