mod history;

pub use history::{HistoryState, StrokeHistory};

use crate::snapshot::StrokeSnapshot;
use crate::stroke::StrokeRef;

/// Edits that produce a new snapshot from the current one.
#[derive(Debug, Clone)]
pub enum StrokeEdit {
    /// Strokes the drawing surface just finished, appended in order.
    AddStrokes(Vec<StrokeRef>),
    /// Strokes hit by the eraser. Every stroke equal to one of these is removed.
    EraseStrokes(Vec<StrokeRef>),
    /// Remove everything.
    Clear,
}

impl StrokeEdit {
    /// The snapshot after this edit, or `None` if the edit changes nothing.
    pub fn apply(&self, current: &StrokeSnapshot) -> Option<StrokeSnapshot> {
        match self {
            StrokeEdit::AddStrokes(added) => {
                if added.is_empty() {
                    None
                } else {
                    Some(current.with_added(added.iter().cloned()))
                }
            }
            StrokeEdit::EraseStrokes(removed) => {
                if removed.is_empty() {
                    return None;
                }
                let remaining = current.without(removed);
                (remaining.len() != current.len()).then_some(remaining)
            }
            StrokeEdit::Clear => (!current.is_empty()).then(StrokeSnapshot::empty),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrokeEdit::AddStrokes(_) => "add strokes",
            StrokeEdit::EraseStrokes(_) => "erase strokes",
            StrokeEdit::Clear => "clear",
        }
    }
}
