//! Board file parsing and asynchronous image loading.

use comic_board::Board;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;

/// Errors that can occur when loading the board file.
#[derive(Error, Debug)]
pub enum BoardLoadError {
    #[error("read board file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse board file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::de::SpannedError,
    },
    #[error("board file {path} lists no panels")]
    NoPanels { path: PathBuf },
}

/// Errors that can occur when loading and decoding images.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("read image {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Decoded image data ready for texture creation. `width`/`height` are the
/// image's natural pixel dimensions.
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// State of an image being loaded on the runtime.
pub enum AssetLoadState {
    /// Load and decode still running on the runtime.
    Loading(mpsc::Receiver<Result<DecodedImage, ImageLoadError>>),
    /// Decoded and ready for texture creation.
    Ready(DecodedImage),
    /// Loading failed; stores the message (already surfaced via toast).
    Error(String),
}

/// Loads the board file and resolves its paths relative to the file's
/// directory.
pub fn load_board(path: &Path) -> Result<Board, BoardLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| BoardLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut board: Board = ron::from_str(&text).map_err(|source| BoardLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if board.panels.is_empty() {
        return Err(BoardLoadError::NoPanels {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        board.template = resolve_relative(parent, &board.template);
        board.artwork_dir = board
            .artwork_dir
            .map(|dir| resolve_relative(parent, &dir));
    }

    Ok(board)
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Reads and decodes an image file into RGBA pixels.
pub async fn load_and_decode_image(path: &Path) -> Result<DecodedImage, ImageLoadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ImageLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let img = image::load_from_memory(&bytes).map_err(|source| ImageLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}
