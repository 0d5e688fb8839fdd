use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::brush::Brush;
use crate::error::BatchError;
use crate::geometry;

/// The device that produced a batch of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolType {
    Stylus,
    Touch,
    Mouse,
    #[default]
    Unknown,
}

impl ToolType {
    pub fn tag(self) -> u8 {
        match self {
            ToolType::Stylus => 0,
            ToolType::Touch => 1,
            ToolType::Mouse => 2,
            ToolType::Unknown => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ToolType::Stylus),
            1 => Some(ToolType::Touch),
            2 => Some(ToolType::Mouse),
            3 => Some(ToolType::Unknown),
            _ => None,
        }
    }
}

/// One timestamped pointer sample.
#[derive(Debug, Clone, Copy)]
pub struct StrokeInput {
    pub position: Pos2,
    /// Milliseconds since the start of the stroke.
    pub time_millis: f32,
    pub pressure: f32,
    pub tilt_radians: f32,
    pub orientation_radians: f32,
    pub stroke_unit_length_cm: f32,
}

impl StrokeInput {
    pub const NO_PRESSURE: f32 = -1.0;
    pub const NO_TILT: f32 = -1.0;
    pub const NO_ORIENTATION: f32 = -1.0;
    pub const NO_STROKE_UNIT_LENGTH: f32 = 0.0;

    /// A sample with position and time only.
    pub fn new(x: f32, y: f32, time_millis: f32) -> Self {
        Self {
            position: Pos2::new(x, y),
            time_millis,
            pressure: Self::NO_PRESSURE,
            tilt_radians: Self::NO_TILT,
            orientation_radians: Self::NO_ORIENTATION,
            stroke_unit_length_cm: Self::NO_STROKE_UNIT_LENGTH,
        }
    }

    pub fn with_pressure(self, pressure: f32) -> Self {
        Self { pressure, ..self }
    }

    pub fn with_tilt(self, tilt_radians: f32) -> Self {
        Self {
            tilt_radians,
            ..self
        }
    }

    pub fn with_orientation(self, orientation_radians: f32) -> Self {
        Self {
            orientation_radians,
            ..self
        }
    }

    fn bits(&self) -> [u32; 7] {
        [
            self.position.x.to_bits(),
            self.position.y.to_bits(),
            self.time_millis.to_bits(),
            self.pressure.to_bits(),
            self.tilt_radians.to_bits(),
            self.orientation_radians.to_bits(),
            self.stroke_unit_length_cm.to_bits(),
        ]
    }
}

// Bitwise, so that a decoded sample equals its source exactly.
impl PartialEq for StrokeInput {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for StrokeInput {}

impl Hash for StrokeInput {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

/// Ordered samples of one gesture.
///
/// Invariant: positions and timestamps are finite and timestamps never decrease.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StrokeInputBatch {
    tool_type: ToolType,
    inputs: Vec<StrokeInput>,
}

impl StrokeInputBatch {
    pub fn new(tool_type: ToolType, inputs: Vec<StrokeInput>) -> Result<Self, BatchError> {
        validate_inputs(&inputs)?;
        Ok(Self { tool_type, inputs })
    }

    pub fn tool_type(&self) -> ToolType {
        self.tool_type
    }

    pub fn inputs(&self) -> &[StrokeInput] {
        &self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.inputs.iter().map(|input| input.position)
    }
}

fn validate_inputs(inputs: &[StrokeInput]) -> Result<(), BatchError> {
    let mut previous: Option<f32> = None;
    for (index, input) in inputs.iter().enumerate() {
        if !input.position.is_finite() || !input.time_millis.is_finite() {
            return Err(BatchError::NotFinite { index });
        }
        if let Some(previous_millis) = previous {
            if input.time_millis < previous_millis {
                return Err(BatchError::TimeReversed {
                    index,
                    time_millis: input.time_millis,
                    previous_millis,
                });
            }
        }
        previous = Some(input.time_millis);
    }
    Ok(())
}

/// One finished pen gesture. Identity is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stroke {
    brush: Brush,
    inputs: StrokeInputBatch,
}

// Strokes are shared between snapshots
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    pub fn new(brush: Brush, inputs: StrokeInputBatch) -> Self {
        Self { brush, inputs }
    }

    pub fn new_ref(brush: Brush, inputs: StrokeInputBatch) -> StrokeRef {
        Arc::new(Self::new(brush, inputs))
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn inputs(&self) -> &StrokeInputBatch {
        &self.inputs
    }

    /// Axis-aligned bounds of the inked area, `Rect::NOTHING` when there are no samples.
    pub fn bounds(&self) -> Rect {
        let points: Vec<Pos2> = self.inputs.positions().collect();
        geometry::calculate_bounds(&points, self.brush.size() / 2.0)
    }
}

/// Stroke under construction while the pointer is still down.
#[derive(Debug, Clone)]
pub struct MutableStroke {
    brush: Brush,
    tool_type: ToolType,
    inputs: Vec<StrokeInput>,
}

impl MutableStroke {
    pub fn new(brush: Brush, tool_type: ToolType) -> Self {
        Self {
            brush,
            tool_type,
            inputs: Vec::new(),
        }
    }

    /// Append a sample. Non-finite samples are dropped and samples that go back in
    /// time are clamped to the previous timestamp.
    pub fn add_input(&mut self, mut input: StrokeInput) {
        if !input.position.is_finite() || !input.time_millis.is_finite() {
            log::warn!("Dropping non-finite stroke sample {:?}", input);
            return;
        }
        if let Some(last) = self.inputs.last() {
            input.time_millis = input.time_millis.max(last.time_millis);
        }
        self.inputs.push(input);
    }

    pub fn inputs(&self) -> &[StrokeInput] {
        &self.inputs
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn to_stroke(&self) -> Stroke {
        // add_input upholds the batch invariants
        Stroke::new(
            self.brush.clone(),
            StrokeInputBatch {
                tool_type: self.tool_type,
                inputs: self.inputs.clone(),
            },
        )
    }

    pub fn to_stroke_ref(&self) -> StrokeRef {
        Arc::new(self.to_stroke())
    }
}
