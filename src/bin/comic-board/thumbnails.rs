//! Artwork directory listing and watching.
//!
//! The sidebar lists image files from the artwork directory; a filesystem
//! watcher re-scans it so artwork exported while the editor is open shows up
//! without a restart.

use eframe::egui;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// File extensions accepted as artwork.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Lists the image files in the artwork directory, sorted by name.
pub fn scan_artwork_dir(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("read artwork dir {}: {err}", dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_artwork(path))
        .collect();
    files.sort();
    files
}

fn is_artwork(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Watches the artwork directory and reports when its contents change.
pub struct ArtworkWatcher {
    changed_rx: Receiver<()>,
    /// The watcher must be kept alive for events to fire
    _watcher: RecommendedWatcher,
}

impl ArtworkWatcher {
    /// Creates a watcher for the artwork directory.
    ///
    /// Returns `None` if the directory doesn't exist or watching fails; the
    /// sidebar then keeps its startup listing.
    pub fn new(ctx: egui::Context, dir: &Path) -> Option<Self> {
        if !dir.exists() {
            log::warn!("artwork directory does not exist: {}", dir.display());
            return None;
        }

        let (changed_tx, changed_rx) = mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res
                && matches!(
                    event.kind,
                    EventKind::Create(_)
                        | EventKind::Remove(_)
                        | EventKind::Modify(ModifyKind::Name(_))
                )
            {
                let _ = changed_tx.send(());
                ctx.request_repaint();
            }
        })
        .ok()?;

        watcher.watch(dir, RecursiveMode::NonRecursive).ok()?;

        log::info!("Watching artwork directory: {}", dir.display());

        Some(Self {
            changed_rx,
            _watcher: watcher,
        })
    }

    /// True when the directory changed since the last poll.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.changed_rx.try_recv() {
                Ok(()) => changed = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("artwork watcher channel disconnected");
                    break;
                }
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_keeps_only_image_files_sorted() {
        let dir = std::env::temp_dir().join(format!("comic-board-scan-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        for name in ["b.png", "a.JPG", "notes.txt", "c.gif", "no_extension"] {
            fs::write(dir.join(name), b"x").unwrap();
        }

        let files = scan_artwork_dir(&dir);
        let names: Vec<_> = files
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png", "c.gif"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn scan_of_missing_directory_is_empty() {
        let dir = std::env::temp_dir().join("comic-board-scan-missing");
        let _ = fs::remove_dir_all(&dir);
        assert!(scan_artwork_dir(&dir).is_empty());
    }
}
