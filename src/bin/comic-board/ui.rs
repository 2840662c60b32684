//! UI rendering methods for the board editor.

use crate::BoardApp;
use crate::assets::AssetLoadState;
use crate::colors;
use crate::constants::{SCALE_REBUILD_EPSILON, SIDEBAR_WIDTH, THUMBNAIL_SIZE, ZOOM_STEP};
use crate::geometry;
use crate::zones::{self, PlacedImage};
use eframe::egui;
use std::path::PathBuf;

impl BoardApp {
    /// Renders the bottom status bar with the controls hint and board info.
    pub fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Drag artwork onto a panel | Drag: reposition | Scroll: zoom");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(board) = &self.board {
                        ui.label(format!("{} panels", board.panels.len()));
                        if let Some(name) = board.template.file_name().and_then(|n| n.to_str()) {
                            ui.label(name);
                        }
                    }
                });
            });
        });
    }

    /// Renders the left sidebar: compose button and draggable artwork.
    pub fn show_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("artwork_panel")
            .exact_width(SIDEBAR_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.strong("Artwork");
                ui.separator();

                ui.horizontal(|ui| {
                    let clicked = ui.button("Generate page").clicked();
                    if self.save.in_flight() {
                        ui.spinner();
                    }
                    if clicked {
                        let ctx = ui.ctx().clone();
                        self.trigger_save(&ctx);
                    }
                });
                ui.separator();

                if self.artwork.is_empty() {
                    ui.label(format!("No artwork in {}", self.artwork_dir.display()));
                } else {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        self.show_thumbnails(ui);
                    });
                }
            });
    }

    fn show_thumbnails(&mut self, ui: &mut egui::Ui) {
        for path in self.artwork.clone() {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_owned();

            match self.asset_cache.get(&path) {
                Some(AssetLoadState::Ready(_)) => {
                    let Some(texture) = self.texture_cache.get(&path).cloned() else {
                        continue;
                    };
                    let tex_size = texture.size_vec2();
                    let shrink = (THUMBNAIL_SIZE / tex_size.x)
                        .min(THUMBNAIL_SIZE / tex_size.y)
                        .min(1.0);
                    let thumb_size = tex_size * shrink;

                    let id = egui::Id::new(("artwork", &path));
                    let response = ui
                        .dnd_drag_source(id, path.clone(), |ui| {
                            let (rect, _) =
                                ui.allocate_exact_size(thumb_size, egui::Sense::hover());
                            ui.painter().image(
                                texture.id(),
                                rect,
                                egui::Rect::from_min_max(
                                    egui::pos2(0.0, 0.0),
                                    egui::pos2(1.0, 1.0),
                                ),
                                egui::Color32::WHITE,
                            );
                        })
                        .response;

                    if response.drag_started() {
                        self.drag_source.start(path.clone());
                    }
                    response
                        .on_hover_text(&name)
                        .on_hover_cursor(egui::CursorIcon::Grab);
                }
                Some(AssetLoadState::Loading(_)) | None => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(&name);
                    });
                }
                // Failures were toasted by the asset poll; leave the slot out
                Some(AssetLoadState::Error(_)) => {}
            }
            ui.add_space(6.0);
        }
    }

    /// Renders the central panel: template, drop zones and placed artwork.
    pub fn show_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some((template, panels)) = self
                .board
                .as_ref()
                .map(|board| (board.template.clone(), board.panels.clone()))
            else {
                ui.centered_and_justified(|ui| {
                    ui.label("No board loaded.\nPass a board file on the command line.");
                });
                return;
            };

            match self.asset_cache.get(&template) {
                Some(AssetLoadState::Loading(_)) | None => {
                    ui.centered_and_justified(|ui| ui.spinner());
                    return;
                }
                Some(AssetLoadState::Error(msg)) => {
                    let msg = msg.clone();
                    ui.centered_and_justified(|ui| {
                        ui.label(format!("Failed to load template: {msg}"));
                    });
                    return;
                }
                Some(AssetLoadState::Ready(_)) => {}
            }

            let Some(natural) = self.natural_size(&template) else {
                return;
            };
            let Some(texture_id) = self.texture_cache.get(&template).map(|t| t.id()) else {
                ui.label("Failed to create texture");
                return;
            };

            let viewport = ui.available_rect_before_wrap();
            let fit = (viewport.width() / natural.x).min(viewport.height() / natural.y);
            let displayed = natural * fit;

            let Some(scale) = geometry::scale_factor(displayed.x, natural.x) else {
                ui.centered_and_justified(|ui| {
                    ui.label("Template has no usable dimensions");
                });
                return;
            };

            // Any change in displayed scale (resize, first layout) rebuilds
            // the zones and discards placements with them
            if self
                .zone_scale
                .is_none_or(|s| (s - scale).abs() > SCALE_REBUILD_EPSILON)
            {
                self.zones = zones::rebuild_zones(&panels, scale);
                self.zone_scale = Some(scale);
            }

            let template_rect = egui::Rect::from_min_size(viewport.min, displayed);
            ui.painter().image(
                texture_id,
                template_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            for idx in 0..self.zones.len() {
                self.show_zone(ui, idx, template_rect.min);
            }
        });
    }

    fn show_zone(&mut self, ui: &mut egui::Ui, idx: usize, origin: egui::Pos2) {
        let zone_rect = self.zones[idx].rect.translate(origin.to_vec2());
        let zone_id = egui::Id::new(("panel_zone", idx));
        let zone_response = ui.interact(zone_rect, zone_id, egui::Sense::hover());

        if let Some(placed) = self.zones[idx].placed.clone() {
            self.show_placed_image(ui, idx, zone_rect, placed);
        }

        // Drop resolution: the released payload wins, the tracker covers a
        // payload that went missing in transit
        let payload = zone_response.dnd_release_payload::<PathBuf>();
        let fallback_release = self.drag_source.is_dragging()
            && zone_response.contains_pointer()
            && ui.input(|i| i.pointer.any_released());
        if payload.is_some() || fallback_release {
            if let Some(source) = self.drag_source.resolve(payload) {
                match self.natural_size(&source) {
                    Some(natural) => zones::place_image(&mut self.zones[idx], source, natural),
                    None => log::warn!(
                        "dropped artwork {} has no decoded size yet",
                        source.display()
                    ),
                }
            }
            self.drag_source.clear();
        }

        // Zone outline, highlighted while artwork is dragged over it
        let hovering = zone_response.dnd_hover_payload::<PathBuf>().is_some();
        if hovering {
            ui.painter()
                .rect_filled(zone_rect, 2.0, colors::ZONE_HOVER_FILL);
        }
        let stroke_color = if hovering {
            colors::ZONE_HOVER_STROKE
        } else {
            colors::ZONE_STROKE
        };
        ui.painter().rect_stroke(
            zone_rect,
            2.0,
            egui::Stroke::new(2.0, stroke_color),
            egui::StrokeKind::Inside,
        );
    }

    /// Draws one placed image clipped to its zone and applies pan and zoom.
    fn show_placed_image(
        &mut self,
        ui: &mut egui::Ui,
        idx: usize,
        zone_rect: egui::Rect,
        placed: PlacedImage,
    ) {
        let image_rect = egui::Rect::from_min_size(
            zone_rect.min + egui::vec2(placed.left, placed.top),
            placed.size(),
        );

        if let Some(texture) = self.texture_cache.get(&placed.source) {
            let painter = ui.painter().with_clip_rect(zone_rect);
            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        // Only the visible part reacts, so a pan can't start from under a
        // neighbouring zone
        let visible = image_rect.intersect(zone_rect);
        let response = ui
            .interact(visible, egui::Id::new(("placed", idx)), egui::Sense::drag())
            .on_hover_cursor(egui::CursorIcon::Grab);

        let mut left = placed.left;
        let mut top = placed.top;
        let mut width = placed.width;

        if response.dragged() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
            let delta = response.drag_delta();
            left += delta.x;
            top += delta.y;
            (left, top) = geometry::clamp_offset(left, top, placed.size(), zone_rect.size());
        }

        if response.hovered() {
            let (hover_pos, scroll_delta) =
                ui.input(|i| (i.pointer.hover_pos(), i.raw_scroll_delta.y));
            if scroll_delta != 0.0
                && let Some(hover) = hover_pos
            {
                let factor = if scroll_delta > 0.0 {
                    ZOOM_STEP
                } else {
                    1.0 / ZOOM_STEP
                };
                // Pivot on the pointer's offset within the image
                let pointer = hover - (zone_rect.min + egui::vec2(left, top));
                (left, top, width) = geometry::zoom_about(left, top, width, pointer, factor);

                let height = width * placed.natural_size.y / placed.natural_size.x;
                (left, top) = geometry::clamp_offset(
                    left,
                    top,
                    egui::vec2(width, height),
                    zone_rect.size(),
                );
            }
        }

        if let Some(current) = &mut self.zones[idx].placed {
            current.left = left;
            current.top = top;
            current.width = width;
        }
    }
}
