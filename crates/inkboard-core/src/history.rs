//! Undo/redo history of full scene snapshots.
//!
//! Every entry is a complete serialized scene, so restoring any entry is a
//! plain load. This costs O(scene size) per committed edit.

use crate::scene::Scene;
use std::sync::Arc;

/// One immutable serialized scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry(Arc<str>);

impl HistoryEntry {
    pub fn new(json: impl Into<Arc<str>>) -> Self {
        Self(json.into())
    }

    /// The serialized scene document.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Linear history with a pointer to the current entry.
///
/// Pushing after an undo drops the redo branch.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    /// Index of the current entry; `None` only while empty.
    pointer: Option<usize>,
    /// Maximum number of entries to keep (`None` = unbounded).
    limit: Option<usize>,
}

impl HistoryStore {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `limit` entries.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit: limit.map(|l| l.max(1)),
            ..Self::default()
        }
    }

    /// Append a snapshot after the current entry, discarding any redo branch.
    pub fn push(&mut self, entry: HistoryEntry) {
        let next = self.pointer.map_or(0, |p| p + 1);
        self.entries.truncate(next);
        self.entries.push(entry);
        self.pointer = Some(next);

        if let Some(limit) = self.limit {
            let excess = self.entries.len().saturating_sub(limit);
            if excess > 0 {
                self.entries.drain(..excess);
                self.pointer = Some(self.entries.len() - 1);
            }
        }
    }

    /// Serialize `scene` and push it. Returns false if the scene could not be
    /// serialized, in which case the history is unchanged.
    ///
    /// Eraser previews are transient and are recorded at full opacity.
    pub fn record(&mut self, scene: &Scene) -> bool {
        let json = if scene.objects.iter().any(|s| s.style().is_erase_preview()) {
            let mut settled = scene.clone();
            settled.clear_erase_previews();
            settled.to_json()
        } else {
            scene.to_json()
        };
        match json {
            Ok(json) => {
                self.push(HistoryEntry::new(json));
                true
            }
            Err(err) => {
                log::error!("Failed to snapshot scene: {err}");
                false
            }
        }
    }

    /// Step back one entry and return the entry now current.
    /// Returns `None` (and does nothing) at the earliest entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        match self.pointer {
            Some(p) if p > 0 => {
                self.pointer = Some(p - 1);
                self.entries.get(p - 1)
            }
            _ => None,
        }
    }

    /// Step forward one entry and return the entry now current.
    /// Returns `None` (and does nothing) at the latest entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        match self.pointer {
            Some(p) if p + 1 < self.entries.len() => {
                self.pointer = Some(p + 1);
                self.entries.get(p + 1)
            }
            _ => None,
        }
    }

    /// The current entry.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.pointer.and_then(|p| self.entries.get(p))
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.pointer, Some(p) if p > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.pointer, Some(p) if p + 1 < self.entries.len())
    }

    /// Index of the current entry.
    pub fn pointer(&self) -> Option<usize> {
        self.pointer
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ERASE_PREVIEW_OPACITY, Rectangle, Shape};
    use kurbo::Point;

    fn entry(s: &str) -> HistoryEntry {
        HistoryEntry::new(s)
    }

    #[test]
    fn test_push_moves_pointer() {
        let mut history = HistoryStore::new();
        assert_eq!(history.pointer(), None);
        history.push(entry("a"));
        history.push(entry("b"));
        assert_eq!(history.pointer(), Some(1));
        assert_eq!(history.current().unwrap().as_str(), "b");
    }

    #[test]
    fn test_undo_redo() {
        let mut history = HistoryStore::new();
        history.push(entry("a"));
        history.push(entry("b"));
        assert_eq!(history.undo().unwrap().as_str(), "a");
        assert_eq!(history.redo().unwrap().as_str(), "b");
    }

    #[test]
    fn test_undo_at_earliest_is_noop() {
        let mut history = HistoryStore::new();
        assert!(history.undo().is_none());
        history.push(entry("a"));
        assert!(history.undo().is_none());
        assert_eq!(history.pointer(), Some(0));
    }

    #[test]
    fn test_redo_at_latest_is_noop() {
        let mut history = HistoryStore::new();
        assert!(history.redo().is_none());
        history.push(entry("a"));
        assert!(history.redo().is_none());
        assert_eq!(history.pointer(), Some(0));
    }

    #[test]
    fn test_push_after_undo_discards_redo_branch() {
        let mut history = HistoryStore::new();
        history.push(entry("a"));
        history.push(entry("b"));
        history.undo();
        history.push(entry("c"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.pointer(), Some(1));
        assert!(!history.can_redo());
        assert_eq!(history.current().unwrap().as_str(), "c");
    }

    #[test]
    fn test_push_push_undo_push_on_seeded_history() {
        let mut history = HistoryStore::new();
        history.push(entry("seed"));
        history.push(entry("a"));
        history.push(entry("b"));
        history.undo();
        history.push(entry("c"));
        assert_eq!(history.len(), 3);
        assert_eq!(history.pointer(), Some(2));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = HistoryStore::with_limit(Some(2));
        history.push(entry("a"));
        history.push(entry("b"));
        history.push(entry("c"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.pointer(), Some(1));
        assert_eq!(history.undo().unwrap().as_str(), "b");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_record_scene() {
        let mut history = HistoryStore::new();
        let scene = Scene::new();
        assert!(history.record(&scene));
        let restored = Scene::from_json(history.current().unwrap().as_str()).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_record_settles_erase_preview() {
        let mut history = HistoryStore::new();
        let mut scene = Scene::new();
        let mut faded = Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0);
        faded.style.opacity = ERASE_PREVIEW_OPACITY;
        let id = scene.add(Shape::Rectangle(faded));

        assert!(history.record(&scene));
        let restored = Scene::from_json(history.current().unwrap().as_str()).unwrap();
        assert!((restored.get(id).unwrap().style().opacity - 1.0).abs() < f64::EPSILON);
        // The live object keeps its preview.
        assert!(scene.get(id).unwrap().style().is_erase_preview());
    }
}
