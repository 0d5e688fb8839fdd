//! # Stroke codec
//!
//! A note's drawing is stored as a JSON array of strings, one per stroke. Each
//! string is a JSON [`SerializedStroke`]: the brush descriptor plus the input
//! samples packed by [`inputs::encode_inputs`].

pub mod inputs;
pub mod serialized;

pub use serialized::{SerializedBrush, SerializedStockBrush, SerializedStroke};

use crate::brush::Brush;
use crate::error::CodecError;
use crate::stroke::{Stroke, StrokeRef};

pub fn encode_stroke(stroke: &Stroke) -> Result<String, CodecError> {
    let serialized = SerializedStroke {
        inputs: inputs::encode_inputs(stroke.inputs())?,
        brush: SerializedBrush::from(stroke.brush()),
    };
    Ok(serde_json::to_string(&serialized)?)
}

pub fn decode_stroke(data: &str) -> Result<Stroke, CodecError> {
    let serialized: SerializedStroke = serde_json::from_str(data)?;
    let inputs = inputs::decode_inputs(&serialized.inputs)?;
    let brush = Brush::try_from(&serialized.brush)?;
    Ok(Stroke::new(brush, inputs))
}

/// Encodes a whole drawing as a JSON array of per-stroke strings.
pub fn encode_strokes<'a>(
    strokes: impl IntoIterator<Item = &'a StrokeRef>,
) -> Result<String, CodecError> {
    let encoded = strokes
        .into_iter()
        .map(|stroke| encode_stroke(stroke))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::to_string(&encoded)?)
}

/// Decodes a whole drawing.
///
/// Strokes that fail to decode are skipped with a warning. Only a malformed outer
/// array is an error.
pub fn decode_strokes(data: &str) -> Result<Vec<Stroke>, CodecError> {
    let encoded: Vec<String> = serde_json::from_str(data)?;
    let total = encoded.len();
    let strokes: Vec<Stroke> = encoded
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match decode_stroke(item) {
            Ok(stroke) => Some(stroke),
            Err(err) => {
                log::warn!("Skipping stroke {} of {}: {}", index, total, err);
                None
            }
        })
        .collect();
    if strokes.len() < total {
        log::warn!("Recovered {} of {} strokes", strokes.len(), total);
    }
    Ok(strokes)
}

pub fn encode_string_list(list: &[String]) -> String {
    // A list of strings always serializes
    serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string())
}

/// `None` and malformed input both give an empty list.
pub fn decode_string_list(data: Option<&str>) -> Vec<String> {
    let Some(data) = data else {
        return Vec::new();
    };
    match serde_json::from_str::<Option<Vec<String>>>(data) {
        Ok(list) => list.unwrap_or_default(),
        Err(err) => {
            log::error!("Error decoding string list from JSON {:?}: {}", data, err);
            Vec::new()
        }
    }
}
