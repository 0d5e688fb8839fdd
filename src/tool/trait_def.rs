use crate::input::PointerEvent;
use crate::snapshot::StrokeSnapshot;
use crate::stroke::StrokeRef;

/// What a tool asks the session to do after handling a pointer event
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Nothing,
    /// The pen lifted; the stroke is ready to be committed.
    StrokeFinished(StrokeRef),
    /// The eraser hit something mid-gesture. Commit, don't flush yet.
    Erased(StrokeSnapshot),
    /// The erase gesture ended, possibly with a last hit. Commit it if any, then flush.
    EraseFinished(Option<StrokeSnapshot>),
}

pub trait Tool: Send {
    fn name(&self) -> &'static str;

    /// Handle one pointer event against the currently visible strokes
    fn handle_pointer(&mut self, event: &PointerEvent, visible: &StrokeSnapshot) -> ToolOutcome;

    /// Abandon any gesture in progress, e.g. when another tool is selected
    fn on_deactivate(&mut self) -> ToolOutcome;

    fn is_active(&self) -> bool;
}
