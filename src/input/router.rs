use crate::snapshot::StrokeSnapshot;
use crate::tool::{EraserTool, PenTool, Tool, ToolOutcome};

use super::PointerEvent;

/// Which tool pointer events currently go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTool {
    #[default]
    Pen,
    Eraser,
}

/// Routes a pointer event to the active tool
pub fn route_event(
    event: &PointerEvent,
    active: ActiveTool,
    pen: &mut PenTool,
    eraser: &mut EraserTool,
    visible: &StrokeSnapshot,
) -> ToolOutcome {
    let tool: &mut dyn Tool = match active {
        ActiveTool::Pen => pen,
        ActiveTool::Eraser => eraser,
    };
    log::trace!("Routing {:?} to {}", event.phase, tool.name());
    tool.handle_pointer(event, visible)
}
