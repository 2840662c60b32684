#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod assets;
mod colors;
mod constants;
mod drag;
mod geometry;
mod save;
mod thumbnails;
mod ui;
mod zones;

use assets::{AssetLoadState, load_and_decode_image, load_board};
use clap::Parser;
use comic_board::{Board, ComposeRequest};
use drag::DragSource;
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use save::SaveCoordinator;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thumbnails::ArtworkWatcher;
use zones::DropZone;

/// Assemble artwork onto a comic page template and send the layout to a
/// composition service.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Board file (RON) describing the template image and its panels
    board: PathBuf,

    /// Artwork directory for the sidebar (defaults to the board's
    /// artwork_dir, then the board file's directory)
    #[arg(long)]
    artwork: Option<PathBuf>,

    /// Composition service endpoint
    #[arg(long, default_value = "http://localhost:5000/generate")]
    endpoint: String,

    /// Where to write the composed page (defaults to the downloads folder)
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Main application state for the board editor.
pub struct BoardApp {
    board: Option<Board>,
    endpoint: String,
    output_path: PathBuf,

    artwork_dir: PathBuf,
    artwork: Vec<PathBuf>,
    artwork_watcher: Option<ArtworkWatcher>,

    drag_source: DragSource,
    zones: Vec<DropZone>,
    /// Displayed scale the zones were last derived from
    zone_scale: Option<f32>,

    asset_cache: HashMap<PathBuf, AssetLoadState>,
    texture_cache: HashMap<PathBuf, TextureHandle>,

    save: SaveCoordinator,
    toasts: Toasts,
    runtime: tokio::runtime::Runtime,
}

impl BoardApp {
    fn new(cc: &eframe::CreationContext<'_>, args: Args) -> Self {
        let mut toasts = Toasts::new()
            .anchor(egui::Align2::RIGHT_TOP, (-10.0, 10.0))
            .direction(egui::Direction::TopDown);

        let board = match load_board(&args.board) {
            Ok(board) => Some(board),
            Err(err) => {
                toasts.add(Toast {
                    kind: ToastKind::Error,
                    text: err.to_string().into(),
                    options: ToastOptions::default()
                        .duration_in_seconds(10.0)
                        .show_icon(true),
                    ..Default::default()
                });
                None
            }
        };

        let artwork_dir = args
            .artwork
            .or_else(|| board.as_ref().and_then(|board| board.artwork_dir.clone()))
            .or_else(|| {
                args.board
                    .parent()
                    .map(Path::to_path_buf)
                    .filter(|dir| !dir.as_os_str().is_empty())
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let artwork_watcher = ArtworkWatcher::new(cc.egui_ctx.clone(), &artwork_dir);
        if artwork_watcher.is_none() {
            log::info!("Artwork watcher not available; the sidebar will not refresh on its own");
        }

        let runtime = tokio::runtime::Runtime::new().expect("create tokio runtime");

        let mut app = Self {
            board,
            endpoint: args.endpoint,
            output_path: args.output.unwrap_or_else(save::download_path),
            artwork_dir,
            artwork: Vec::new(),
            artwork_watcher,
            drag_source: DragSource::default(),
            zones: Vec::new(),
            zone_scale: None,
            asset_cache: HashMap::new(),
            texture_cache: HashMap::new(),
            save: SaveCoordinator::new(),
            toasts,
            runtime,
        };

        if let Some(template) = app.board.as_ref().map(|board| board.template.clone()) {
            app.request_asset(&cc.egui_ctx, &template);
        }
        app.refresh_artwork(&cc.egui_ctx);

        app
    }

    /// Requests an asynchronous load of an image unless already cached.
    fn request_asset(&mut self, ctx: &egui::Context, path: &Path) {
        if self.asset_cache.contains_key(path) {
            return;
        }

        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();
        let asset_path = path.to_path_buf();

        self.runtime.spawn(async move {
            let result = load_and_decode_image(&asset_path).await;
            let _ = tx.send(result);
            ctx.request_repaint();
        });

        self.asset_cache
            .insert(path.to_path_buf(), AssetLoadState::Loading(rx));
    }

    /// Polls all loading assets and creates textures for ready ones.
    fn poll_all_assets(&mut self, ctx: &egui::Context) {
        let mut updates: Vec<(PathBuf, AssetLoadState)> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        for (path, state) in &mut self.asset_cache {
            if let AssetLoadState::Loading(rx) = state {
                match rx.try_recv() {
                    Ok(Ok(decoded)) => {
                        updates.push((path.clone(), AssetLoadState::Ready(decoded)));
                    }
                    Ok(Err(err)) => {
                        let msg = err.to_string();
                        errors.push(msg.clone());
                        updates.push((path.clone(), AssetLoadState::Error(msg)));
                    }
                    Err(mpsc::TryRecvError::Disconnected) => {
                        let msg = format!("{}: load interrupted", path.display());
                        errors.push(msg.clone());
                        updates.push((path.clone(), AssetLoadState::Error(msg)));
                    }
                    Err(mpsc::TryRecvError::Empty) => {}
                }
            }
        }

        for (path, new_state) in updates {
            self.asset_cache.insert(path, new_state);
        }

        for err in errors {
            self.toast_error(err);
        }

        // Create textures for freshly decoded assets
        let ready_paths: Vec<_> = self
            .asset_cache
            .iter()
            .filter(|(path, state)| {
                matches!(state, AssetLoadState::Ready(_)) && !self.texture_cache.contains_key(*path)
            })
            .map(|(path, _)| path.clone())
            .collect();

        for path in ready_paths {
            if let Some(AssetLoadState::Ready(decoded)) = self.asset_cache.get(&path) {
                let image = ColorImage::from_rgba_unmultiplied(
                    [decoded.width as usize, decoded.height as usize],
                    &decoded.pixels,
                );
                let texture =
                    ctx.load_texture(path.display().to_string(), image, TextureOptions::LINEAR);
                self.texture_cache.insert(path, texture);
            }
        }
    }

    /// Natural pixel size of a decoded image, if known yet.
    fn natural_size(&self, path: &Path) -> Option<egui::Vec2> {
        match self.asset_cache.get(path) {
            Some(AssetLoadState::Ready(decoded)) => {
                Some(egui::vec2(decoded.width as f32, decoded.height as f32))
            }
            _ => None,
        }
    }

    /// Re-lists the artwork directory and requests decodes for new entries.
    fn refresh_artwork(&mut self, ctx: &egui::Context) {
        self.artwork = thumbnails::scan_artwork_dir(&self.artwork_dir);
        for path in self.artwork.clone() {
            self.request_asset(ctx, &path);
        }
    }

    fn poll_artwork_watcher(&mut self, ctx: &egui::Context) {
        let changed = self
            .artwork_watcher
            .as_mut()
            .is_some_and(|watcher| watcher.poll());
        if changed {
            self.refresh_artwork(ctx);
        }
    }

    /// Builds the compose request from the current placements and submits it.
    fn trigger_save(&mut self, ctx: &egui::Context) {
        let Some(template) = self.board.as_ref().map(|board| board.template.clone()) else {
            self.toast_error("No board loaded".to_owned());
            return;
        };

        // The reverse conversion needs the template's natural dimensions
        if self.natural_size(&template).is_none() {
            self.toast_error("Template dimensions are not available".to_owned());
            return;
        }
        let Some(scale) = self.zone_scale else {
            self.toast_error("The board has not been laid out yet".to_owned());
            return;
        };

        let request = ComposeRequest {
            images: save::collect_placements(&self.zones, scale),
        };
        log::info!(
            "Submitting {} placement(s) to {}",
            request.images.len(),
            self.endpoint
        );

        self.save.submit(
            &self.runtime,
            ctx.clone(),
            self.endpoint.clone(),
            request,
            self.output_path.clone(),
        );
    }

    fn toast_error(&mut self, message: String) {
        self.toasts.add(Toast {
            kind: ToastKind::Error,
            text: message.into(),
            options: ToastOptions::default()
                .duration_in_seconds(8.0)
                .show_icon(true),
            ..Default::default()
        });
    }
}

impl eframe::App for BoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_all_assets(ctx);
        self.poll_artwork_watcher(ctx);
        self.save.poll(&mut self.toasts);

        self.show_status_bar(ctx);
        self.show_sidebar(ctx);
        self.show_central_panel(ctx);

        // Whatever became of a drag (placed, or released over nothing), the
        // tracker returns to idle once the pointer is up
        if ctx.input(|i| i.pointer.any_released()) {
            self.drag_source.clear();
        }

        self.toasts.show(ctx);
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Comic Board",
        options,
        Box::new(move |cc| Ok(Box::new(BoardApp::new(cc, args)))),
    )
}
