use crate::brush::Brush;
use crate::command::HistoryState;

/// Notifications a drawing session pushes to its observers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Undo/redo availability after any history change.
    HistoryChanged(HistoryState),
    /// The visible stroke set was replaced.
    StrokesChanged { stroke_count: usize },
    BrushChanged(Brush),
    ToolModeChanged { eraser: bool },
    /// A save of the visible strokes was handed to the executor.
    FlushScheduled { sequence: u64 },
    /// Title, favorite flag or images changed locally.
    NoteChanged,
}
