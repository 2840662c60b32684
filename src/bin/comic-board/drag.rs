//! Tracks which artwork thumbnail is being dragged.
//!
//! egui's drag-and-drop payload is the primary channel; the tracker keeps a
//! copy of the source path because the payload does not reliably survive to
//! the release site on every backend. The payload wins when both are present.

use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragSource {
    #[default]
    Idle,
    Dragging(PathBuf),
}

impl DragSource {
    /// Records the artwork a drag just started from.
    pub fn start(&mut self, source: PathBuf) {
        *self = DragSource::Dragging(source);
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragSource::Dragging(_))
    }

    /// Resolves the artwork delivered by a drop: the released payload if one
    /// arrived, otherwise the tracked source.
    pub fn resolve(&self, payload: Option<Arc<PathBuf>>) -> Option<PathBuf> {
        match payload {
            Some(path) => Some(path.as_ref().clone()),
            None => match self {
                DragSource::Dragging(path) => Some(path.clone()),
                DragSource::Idle => None,
            },
        }
    }

    /// Returns to idle once the drag is over.
    pub fn clear(&mut self) {
        *self = DragSource::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_wins_over_tracked_source() {
        let mut tracker = DragSource::default();
        tracker.start(PathBuf::from("tracked.png"));

        let resolved = tracker.resolve(Some(Arc::new(PathBuf::from("payload.png"))));
        assert_eq!(resolved, Some(PathBuf::from("payload.png")));
    }

    #[test]
    fn tracker_recovers_a_missing_payload() {
        let mut tracker = DragSource::default();
        tracker.start(PathBuf::from("tracked.png"));

        assert_eq!(tracker.resolve(None), Some(PathBuf::from("tracked.png")));
    }

    #[test]
    fn idle_tracker_resolves_nothing() {
        let tracker = DragSource::default();
        assert_eq!(tracker.resolve(None), None);

        let mut tracker = DragSource::default();
        tracker.start(PathBuf::from("tracked.png"));
        tracker.clear();
        assert_eq!(tracker.resolve(None), None);
    }
}
