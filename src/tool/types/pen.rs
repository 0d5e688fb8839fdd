use crate::brush::Brush;
use crate::input::{PointerEvent, PointerPhase};
use crate::snapshot::StrokeSnapshot;
use crate::stroke::MutableStroke;
use super::super::trait_def::{Tool, ToolOutcome};

/// State for the pen tool's current drawing operation
#[derive(Debug, Clone)]
struct PenState {
    pointer_id: u64,
    stroke: MutableStroke,
}

/// Freehand drawing with the session's current brush.
///
/// Only one pointer draws at a time; other pointers are ignored until it lifts.
#[derive(Debug, Clone)]
pub struct PenTool {
    brush: Brush,
    current_state: Option<PenState>,
}

impl PenTool {
    pub fn new(brush: Brush) -> Self {
        Self {
            brush,
            current_state: None,
        }
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Takes effect from the next stroke; a stroke in progress keeps its brush.
    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    /// The stroke being drawn, for live preview
    pub fn in_progress(&self) -> Option<&MutableStroke> {
        self.current_state.as_ref().map(|state| &state.stroke)
    }

    fn start_stroke(&mut self, event: &PointerEvent) {
        if let Some(state) = &self.current_state {
            if state.pointer_id != event.pointer_id {
                log::debug!(
                    "Ignoring pointer {} while pointer {} is drawing",
                    event.pointer_id,
                    state.pointer_id
                );
                return;
            }
            log::warn!("Pointer {} went down twice, restarting stroke", event.pointer_id);
        }
        let mut stroke = MutableStroke::new(self.brush.clone(), event.tool_type);
        stroke.add_input(event.to_stroke_input());
        self.current_state = Some(PenState {
            pointer_id: event.pointer_id,
            stroke,
        });
    }

    fn state_for(&mut self, pointer_id: u64) -> Option<&mut PenState> {
        self.current_state
            .as_mut()
            .filter(|state| state.pointer_id == pointer_id)
    }
}

impl Tool for PenTool {
    fn name(&self) -> &'static str {
        "pen"
    }

    fn handle_pointer(&mut self, event: &PointerEvent, _visible: &StrokeSnapshot) -> ToolOutcome {
        match event.phase {
            PointerPhase::Down => {
                self.start_stroke(event);
                ToolOutcome::Nothing
            }
            PointerPhase::Move => {
                if let Some(state) = self.state_for(event.pointer_id) {
                    state.stroke.add_input(event.to_stroke_input());
                }
                ToolOutcome::Nothing
            }
            PointerPhase::Up => {
                let Some(state) = self.state_for(event.pointer_id) else {
                    return ToolOutcome::Nothing;
                };
                state.stroke.add_input(event.to_stroke_input());
                match self.current_state.take() {
                    Some(state) if !state.stroke.is_empty() => {
                        ToolOutcome::StrokeFinished(state.stroke.to_stroke_ref())
                    }
                    _ => ToolOutcome::Nothing,
                }
            }
            PointerPhase::Cancel => {
                if self.state_for(event.pointer_id).is_some() {
                    log::debug!("Stroke from pointer {} cancelled", event.pointer_id);
                    self.current_state = None;
                }
                ToolOutcome::Nothing
            }
        }
    }

    fn on_deactivate(&mut self) -> ToolOutcome {
        if self.current_state.take().is_some() {
            log::debug!("Discarding unfinished stroke on tool switch");
        }
        ToolOutcome::Nothing
    }

    fn is_active(&self) -> bool {
        self.current_state.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::BrushFamily;
    use crate::stroke::ToolType;
    use egui::Color32;

    fn pen() -> PenTool {
        PenTool::new(Brush::with_color32(BrushFamily::PressurePen, Color32::GRAY, 5.0, 0.1).unwrap())
    }

    #[test]
    fn test_down_move_up_finishes_stroke() {
        let mut pen = pen();
        let visible = StrokeSnapshot::empty();
        assert_eq!(pen.handle_pointer(&PointerEvent::down(1, 0.0, 0.0, 0.0), &visible), ToolOutcome::Nothing);
        pen.handle_pointer(&PointerEvent::moved(1, 5.0, 5.0, 8.0), &visible);
        let outcome = pen.handle_pointer(&PointerEvent::up(1, 10.0, 10.0, 16.0), &visible);

        let ToolOutcome::StrokeFinished(stroke) = outcome else {
            panic!("expected a finished stroke, got {outcome:?}");
        };
        assert_eq!(stroke.inputs().len(), 3);
        assert_eq!(stroke.brush().family(), &BrushFamily::PressurePen);
        assert!(!pen.is_active());
    }

    #[test]
    fn test_second_pointer_is_ignored() {
        let mut pen = pen();
        let visible = StrokeSnapshot::empty();
        pen.handle_pointer(&PointerEvent::down(1, 0.0, 0.0, 0.0), &visible);
        pen.handle_pointer(&PointerEvent::down(2, 50.0, 50.0, 1.0), &visible);
        pen.handle_pointer(&PointerEvent::moved(2, 60.0, 60.0, 2.0), &visible);
        assert_eq!(pen.handle_pointer(&PointerEvent::up(2, 60.0, 60.0, 3.0), &visible), ToolOutcome::Nothing);

        let outcome = pen.handle_pointer(&PointerEvent::up(1, 1.0, 1.0, 4.0), &visible);
        let ToolOutcome::StrokeFinished(stroke) = outcome else {
            panic!("expected a finished stroke, got {outcome:?}");
        };
        assert_eq!(stroke.inputs().len(), 2);
    }

    #[test]
    fn test_in_progress_stroke_keeps_tool_type() {
        let mut pen = pen();
        let visible = StrokeSnapshot::empty();
        assert!(pen.in_progress().is_none());

        let down = PointerEvent::down(1, 0.0, 0.0, 0.0).with_tool_type(ToolType::Stylus);
        pen.handle_pointer(&down, &visible);
        pen.handle_pointer(&PointerEvent::moved(1, 5.0, 0.0, 8.0), &visible);
        assert_eq!(pen.in_progress().map(|stroke| stroke.inputs().len()), Some(2));

        let outcome = pen.handle_pointer(&PointerEvent::up(1, 10.0, 0.0, 16.0), &visible);
        let ToolOutcome::StrokeFinished(stroke) = outcome else {
            panic!("expected a finished stroke, got {outcome:?}");
        };
        assert_eq!(stroke.inputs().tool_type(), ToolType::Stylus);
        assert!(pen.in_progress().is_none());
    }

    #[test]
    fn test_cancel_discards_stroke() {
        let mut pen = pen();
        let visible = StrokeSnapshot::empty();
        pen.handle_pointer(&PointerEvent::down(1, 0.0, 0.0, 0.0), &visible);
        pen.handle_pointer(&PointerEvent::cancel(1, 0.0, 0.0, 1.0), &visible);
        assert!(!pen.is_active());
        assert_eq!(pen.handle_pointer(&PointerEvent::up(1, 0.0, 0.0, 2.0), &visible), ToolOutcome::Nothing);
    }
}
