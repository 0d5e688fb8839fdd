use egui::Pos2;
use egui::emath::TSTransform;

use crate::command::StrokeEdit;
use crate::geometry::{Parallelogram, Segment, stroke_intersects};
use crate::input::{PointerEvent, PointerPhase};
use crate::snapshot::StrokeSnapshot;
use crate::stroke::StrokeRef;
use super::super::trait_def::{Tool, ToolOutcome};

/// Half the thickness of the swept eraser region, in canvas units.
pub const DEFAULT_ERASER_PADDING: f32 = 50.0;

/// Turns a drag gesture into stroke removals.
///
/// Each pair of consecutive pointer positions sweeps a padded region; every stroke
/// touching it is removed at once. Only one pointer erases at a time.
#[derive(Debug, Clone)]
pub struct EraserTool {
    padding: f32,
    previous_point: Option<Pos2>,
    /// Pointer that owns the gesture, `None` when driven through `start_erase`
    pointer_id: Option<u64>,
    erasing: bool,
}

impl Default for EraserTool {
    fn default() -> Self {
        Self::new(DEFAULT_ERASER_PADDING)
    }
}

impl EraserTool {
    pub fn new(padding: f32) -> Self {
        Self {
            padding,
            previous_point: None,
            pointer_id: None,
            erasing: false,
        }
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Forget the previous point; the next `erase` starts a new swept path.
    pub fn start_erase(&mut self) {
        self.previous_point = None;
        self.erasing = true;
    }

    /// Sweeps from the previous point to `position` and returns the snapshot without
    /// the strokes it touched.
    ///
    /// Returns `None` when nothing was hit, including on the first point of a
    /// gesture, which cannot define a region on its own.
    pub fn erase(&mut self, position: Pos2, visible: &StrokeSnapshot) -> Option<StrokeSnapshot> {
        let previous = self.previous_point.replace(position)?;
        let region =
            Parallelogram::from_segment_and_padding(Segment::new(previous, position), self.padding);

        let hits: Vec<StrokeRef> = visible
            .iter()
            .filter(|stroke| stroke_intersects(stroke, &region, &TSTransform::IDENTITY))
            .cloned()
            .collect();
        if hits.is_empty() {
            return None;
        }

        let remaining = StrokeEdit::EraseStrokes(hits).apply(visible)?;
        log::debug!(
            "Eraser removed {} strokes between {:?} and {:?}",
            visible.len() - remaining.len(),
            previous,
            position
        );
        Some(remaining)
    }

    pub fn end_erase(&mut self) {
        self.previous_point = None;
        self.pointer_id = None;
        self.erasing = false;
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    /// Whether events from `pointer_id` belong to the current gesture.
    fn owns(&self, pointer_id: u64) -> bool {
        self.erasing && self.pointer_id.is_none_or(|owner| owner == pointer_id)
    }
}

impl Tool for EraserTool {
    fn name(&self) -> &'static str {
        "eraser"
    }

    fn handle_pointer(&mut self, event: &PointerEvent, visible: &StrokeSnapshot) -> ToolOutcome {
        if self.erasing && !self.owns(event.pointer_id) {
            log::debug!(
                "Ignoring pointer {} while pointer {:?} is erasing",
                event.pointer_id,
                self.pointer_id
            );
            return ToolOutcome::Nothing;
        }
        match event.phase {
            PointerPhase::Down => {
                self.start_erase();
                self.pointer_id = Some(event.pointer_id);
                self.erase(event.position, visible)
                    .map_or(ToolOutcome::Nothing, ToolOutcome::Erased)
            }
            PointerPhase::Move if self.erasing => self
                .erase(event.position, visible)
                .map_or(ToolOutcome::Nothing, ToolOutcome::Erased),
            PointerPhase::Move => ToolOutcome::Nothing,
            PointerPhase::Up if self.erasing => {
                let hit = self.erase(event.position, visible);
                self.end_erase();
                ToolOutcome::EraseFinished(hit)
            }
            PointerPhase::Up => ToolOutcome::Nothing,
            PointerPhase::Cancel => self.on_deactivate(),
        }
    }

    fn on_deactivate(&mut self) -> ToolOutcome {
        if self.erasing {
            self.end_erase();
            ToolOutcome::EraseFinished(None)
        } else {
            ToolOutcome::Nothing
        }
    }

    fn is_active(&self) -> bool {
        self.erasing
    }
}
