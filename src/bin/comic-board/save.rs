//! Builds the compose request from the current placements and submits it to
//! the composition service, writing the returned page to disk.

use crate::constants::OUTPUT_FILENAME;
use crate::geometry;
use crate::zones::DropZone;
use comic_board::{ComposeImage, ComposeRequest};
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("compose request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("composition service returned {0}")]
    Status(reqwest::StatusCode),
    #[error("write composed page {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug)]
enum SaveEvent {
    Finished { path: PathBuf },
    Failed { message: String },
}

/// Submits compose requests on the app runtime and reports the outcome as
/// toasts. Overlapping submissions are not guarded; the output file is
/// last-write-wins.
pub struct SaveCoordinator {
    event_tx: Sender<SaveEvent>,
    event_rx: Receiver<SaveEvent>,
    pending: usize,
}

impl SaveCoordinator {
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            event_tx,
            event_rx,
            pending: 0,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.pending > 0
    }

    /// Fires one compose request. The result arrives through [`Self::poll`].
    pub fn submit(
        &mut self,
        runtime: &tokio::runtime::Runtime,
        ctx: egui::Context,
        endpoint: String,
        request: ComposeRequest,
        output: PathBuf,
    ) {
        self.pending += 1;
        let event_tx = self.event_tx.clone();

        runtime.spawn(async move {
            let event = match compose(&endpoint, &request, &output).await {
                Ok(()) => SaveEvent::Finished { path: output },
                Err(err) => SaveEvent::Failed {
                    message: err.to_string(),
                },
            };
            let _ = event_tx.send(event);
            ctx.request_repaint();
        });
    }

    /// Drains finished submissions, toasting the outcome and opening the
    /// composed page on success.
    pub fn poll(&mut self, toasts: &mut Toasts) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            match event {
                SaveEvent::Finished { path } => {
                    log::info!("Composed page written to {}", path.display());
                    toasts.add(Toast {
                        kind: ToastKind::Success,
                        text: format!("Page saved to {}", path.display()).into(),
                        options: ToastOptions::default()
                            .duration_in_seconds(6.0)
                            .show_icon(true),
                        ..Default::default()
                    });
                    if let Err(err) = open::that(&path) {
                        log::warn!("open {}: {err}", path.display());
                    }
                }
                SaveEvent::Failed { message } => {
                    log::warn!("Compose failed: {message}");
                    toasts.add(Toast {
                        kind: ToastKind::Error,
                        text: message.into(),
                        options: ToastOptions::default()
                            .duration_in_seconds(10.0)
                            .show_icon(true),
                        ..Default::default()
                    });
                }
            }
        }
    }
}

/// Collects every placed image, in zone order, converting its screen-space
/// geometry back to template pixel space.
pub fn collect_placements(zones: &[DropZone], scale: f32) -> Vec<ComposeImage> {
    zones
        .iter()
        .filter_map(|zone| {
            let placed = zone.placed.as_ref()?;
            Some(ComposeImage {
                src: source_basename(&placed.source),
                panel_x: zone.panel.x,
                panel_y: zone.panel.y,
                panel_w: zone.panel.width,
                panel_h: zone.panel.height,
                img_left: geometry::to_original(placed.left, scale) as f64,
                img_top: geometry::to_original(placed.top, scale) as f64,
                img_w: geometry::to_original(placed.width, scale) as f64,
            })
        })
        .collect()
}

/// File name of the artwork with any leading path stripped.
pub fn source_basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Default output path: the downloads folder, falling back to the current
/// directory.
pub fn download_path() -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(OUTPUT_FILENAME)
}

async fn compose(
    endpoint: &str,
    request: &ComposeRequest,
    output: &Path,
) -> Result<(), SaveError> {
    let client = reqwest::Client::new();
    let response = client.post(endpoint).json(request).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SaveError::Status(status));
    }

    let bytes = response.bytes().await?;
    tokio::fs::write(output, &bytes)
        .await
        .map_err(|source| SaveError::Write {
            path: output.to_path_buf(),
            source,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::{place_image, rebuild_zones};
    use comic_board::PanelRect;
    use eframe::egui::vec2;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn placements_convert_back_to_template_space() {
        let panels = vec![
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
        ];
        let mut zones = rebuild_zones(&panels, 0.5);

        // Only the second zone holds artwork; the empty one is skipped
        place_image(
            &mut zones[1],
            PathBuf::from("/uploads/panel_2.png"),
            vec2(300.0, 300.0),
        );
        if let Some(placed) = &mut zones[1].placed {
            placed.left = 10.0;
            placed.top = -4.0;
            placed.width = 180.0;
        }

        let images = collect_placements(&zones, 0.5);
        assert_eq!(images.len(), 1);

        let image = &images[0];
        assert_eq!(image.src, "panel_2.png");
        assert_eq!(
            (image.panel_x, image.panel_y, image.panel_w, image.panel_h),
            (400, 100, 300, 300)
        );
        assert_eq!(image.img_left, 20.0);
        assert_eq!(image.img_top, -8.0);
        assert_eq!(image.img_w, 360.0);
    }

    #[test]
    fn basename_strips_the_leading_path() {
        assert_eq!(source_basename(Path::new("/a/b/panel.png")), "panel.png");
        assert_eq!(source_basename(Path::new("panel.png")), "panel.png");
    }

    async fn serve_once(response: &'static str) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        });
        addr
    }

    #[tokio::test]
    async fn compose_writes_the_response_bytes() {
        let addr = serve_once("HTTP/1.1 200 OK\r\ncontent-length: 4\r\n\r\nPNG!").await;
        let output = std::env::temp_dir().join(format!("comic-board-ok-{}", std::process::id()));
        let _ = std::fs::remove_file(&output);

        let request = ComposeRequest { images: Vec::new() };
        compose(&format!("http://{addr}/generate"), &request, &output)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"PNG!");
        let _ = std::fs::remove_file(&output);
    }

    #[tokio::test]
    async fn error_status_writes_nothing() {
        let addr =
            serve_once("HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\n\r\n").await;
        let output = std::env::temp_dir().join(format!("comic-board-err-{}", std::process::id()));
        let _ = std::fs::remove_file(&output);

        let request = ComposeRequest { images: Vec::new() };
        let err = compose(&format!("http://{addr}/generate"), &request, &output)
            .await
            .unwrap_err();

        assert!(
            matches!(err, SaveError::Status(status) if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR)
        );
        assert!(!output.exists());
    }
}
