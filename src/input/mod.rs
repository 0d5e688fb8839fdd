use egui::Pos2;

use crate::stroke::{StrokeInput, ToolType};

mod router;
pub use router::{ActiveTool, route_event};

/// Phase of a pointer event, as classified by the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The platform took the pointer away; the gesture must be abandoned.
    Cancel,
}

/// One raw pointer callback from the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Identifies the finger or stylus across one gesture
    pub pointer_id: u64,
    pub phase: PointerPhase,
    /// Position in canvas coordinates
    pub position: Pos2,
    /// Milliseconds, monotonic across one gesture
    pub time_millis: f32,
    /// Pressure value between 0.0 and 1.0, or None if pressure is not supported
    pub pressure: Option<f32>,
    pub tilt_radians: Option<f32>,
    pub orientation_radians: Option<f32>,
    pub tool_type: ToolType,
}

impl PointerEvent {
    pub fn new(pointer_id: u64, phase: PointerPhase, position: Pos2, time_millis: f32) -> Self {
        Self {
            pointer_id,
            phase,
            position,
            time_millis,
            pressure: None,
            tilt_radians: None,
            orientation_radians: None,
            tool_type: ToolType::Unknown,
        }
    }

    pub fn down(pointer_id: u64, x: f32, y: f32, time_millis: f32) -> Self {
        Self::new(pointer_id, PointerPhase::Down, Pos2::new(x, y), time_millis)
    }

    pub fn moved(pointer_id: u64, x: f32, y: f32, time_millis: f32) -> Self {
        Self::new(pointer_id, PointerPhase::Move, Pos2::new(x, y), time_millis)
    }

    pub fn up(pointer_id: u64, x: f32, y: f32, time_millis: f32) -> Self {
        Self::new(pointer_id, PointerPhase::Up, Pos2::new(x, y), time_millis)
    }

    pub fn cancel(pointer_id: u64, x: f32, y: f32, time_millis: f32) -> Self {
        Self::new(pointer_id, PointerPhase::Cancel, Pos2::new(x, y), time_millis)
    }

    pub fn with_tool_type(self, tool_type: ToolType) -> Self {
        Self { tool_type, ..self }
    }

    pub fn with_pressure(self, pressure: f32) -> Self {
        Self {
            pressure: Some(pressure),
            ..self
        }
    }

    /// The stroke sample carried by this event, with sentinels for missing axes.
    pub fn to_stroke_input(&self) -> StrokeInput {
        let mut input = StrokeInput::new(self.position.x, self.position.y, self.time_millis);
        if let Some(pressure) = self.pressure {
            input = input.with_pressure(pressure.clamp(0.0, 1.0));
        }
        if let Some(tilt) = self.tilt_radians {
            input = input.with_tilt(tilt);
        }
        if let Some(orientation) = self.orientation_radians {
            input = input.with_orientation(orientation);
        }
        input
    }
}
