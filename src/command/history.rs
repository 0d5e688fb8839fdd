use super::StrokeEdit;
use crate::snapshot::StrokeSnapshot;

/// Undo/redo availability, recomputed after every history change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Linear undo/redo log over stroke snapshots.
///
/// Invariant: once initialized, `cursor < snapshots.len()`.
#[derive(Debug, Default)]
pub struct StrokeHistory {
    /// Every snapshot reachable by undo/redo, oldest first
    snapshots: Vec<StrokeSnapshot>,
    /// Index of the visible snapshot, `None` until the first load or commit
    cursor: Option<usize>,
}

impl StrokeHistory {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.cursor.is_some()
    }

    /// Seeds the history with the strokes loaded from storage.
    ///
    /// If the history already has entries, they are kept and the snapshot at the
    /// current cursor is returned instead, so a reload never clobbers edits.
    pub fn initialize(&mut self, initial: StrokeSnapshot) -> StrokeSnapshot {
        match self.cursor {
            Some(cursor) => {
                log::debug!(
                    "History already holds {} snapshots, keeping cursor {}",
                    self.snapshots.len(),
                    cursor
                );
                self.snapshots[cursor].clone()
            }
            None => {
                self.snapshots.clear();
                self.snapshots.push(initial.clone());
                self.cursor = Some(0);
                initial
            }
        }
    }

    /// Makes `snapshot` current, discarding everything that was undone.
    pub fn commit(&mut self, snapshot: StrokeSnapshot) {
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        let discarded = self.snapshots.len().saturating_sub(keep);
        self.snapshots.truncate(keep);
        self.snapshots.push(snapshot);
        self.cursor = Some(self.snapshots.len() - 1);
        log::debug!(
            "Committed snapshot {} ({} strokes, {} redo entries discarded)",
            self.snapshots.len() - 1,
            self.snapshots[self.snapshots.len() - 1].len(),
            discarded
        );
    }

    /// Applies `edit` to the current snapshot and commits the result.
    ///
    /// Returns `false` without touching the history when the edit is a no-op.
    pub fn apply(&mut self, edit: &StrokeEdit) -> bool {
        match edit.apply(&self.current()) {
            Some(snapshot) => {
                self.commit(snapshot);
                true
            }
            None => {
                log::debug!("Skipping no-op edit: {}", edit.name());
                false
            }
        }
    }

    /// Steps back one snapshot. `None` if there is nothing to undo.
    pub fn undo(&mut self) -> Option<StrokeSnapshot> {
        let cursor = self.cursor.filter(|&cursor| cursor > 0)? - 1;
        self.cursor = Some(cursor);
        log::debug!("Undo to snapshot {}", cursor);
        Some(self.snapshots[cursor].clone())
    }

    /// Steps forward one snapshot. `None` if there is nothing to redo.
    pub fn redo(&mut self) -> Option<StrokeSnapshot> {
        let cursor = self
            .cursor
            .filter(|&cursor| cursor + 1 < self.snapshots.len())?
            + 1;
        self.cursor = Some(cursor);
        log::debug!("Redo to snapshot {}", cursor);
        Some(self.snapshots[cursor].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor
            .is_some_and(|cursor| cursor + 1 < self.snapshots.len())
    }

    pub fn state(&self) -> HistoryState {
        HistoryState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// The visible snapshot, empty before initialization.
    pub fn current(&self) -> StrokeSnapshot {
        self.cursor
            .and_then(|cursor| self.snapshots.get(cursor))
            .cloned()
            .unwrap_or_default()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
