use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A rectangular panel on the page template, in template pixel space.
///
/// Panels are supplied by the board file and never change at runtime; the
/// editor only derives screen-space drop zones from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A board project: the page template plus its panel geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Path to the template image, relative to the board file
    pub template: PathBuf,
    /// Panel rectangles in template pixel space, in reading order
    pub panels: Vec<PanelRect>,
    /// Directory holding candidate artwork for the sidebar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_dir: Option<PathBuf>,
}

/// One placed artwork entry of the compose request.
///
/// `panel_*` is the panel rectangle the artwork was dropped into and
/// `img_left`/`img_top`/`img_w` describe the artwork's offset and width
/// within that panel. All values are in template pixel space; the service
/// derives the height from the artwork's aspect ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeImage {
    /// Artwork file name with any leading path stripped
    pub src: String,
    pub panel_x: i32,
    pub panel_y: i32,
    pub panel_w: i32,
    pub panel_h: i32,
    pub img_left: f64,
    pub img_top: f64,
    pub img_w: f64,
}

/// Body of the POST to the composition service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeRequest {
    pub images: Vec<ComposeImage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compose_request_matches_wire_format() {
        let request = ComposeRequest {
            images: vec![ComposeImage {
                src: "panel_1.png".to_owned(),
                panel_x: 100,
                panel_y: 100,
                panel_w: 200,
                panel_h: 300,
                img_left: 10.0,
                img_top: -4.5,
                img_w: 220.0,
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "images": [{
                    "src": "panel_1.png",
                    "panel_x": 100,
                    "panel_y": 100,
                    "panel_w": 200,
                    "panel_h": 300,
                    "img_left": 10.0,
                    "img_top": -4.5,
                    "img_w": 220.0,
                }]
            })
        );
    }

    #[test]
    fn board_file_round_trips_through_ron() {
        let board = Board {
            template: PathBuf::from("planche.png"),
            panels: vec![PanelRect {
                x: 0,
                y: 0,
                width: 400,
                height: 600,
            }],
            artwork_dir: Some(PathBuf::from("artwork")),
        };

        let text = ron::to_string(&board).unwrap();
        let parsed: Board = ron::from_str(&text).unwrap();
        assert_eq!(parsed.template, board.template);
        assert_eq!(parsed.panels, board.panels);
        assert_eq!(parsed.artwork_dir, board.artwork_dir);
    }
}
