//! Binary payload for a stroke's input samples.
//!
//! Layout, all little-endian:
//!
//! | offset | size | field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 4    | magic `INKB`                            |
//! | 4      | 1    | version, currently `1`                  |
//! | 5      | 1    | tool type tag                           |
//! | 6      | 2    | reserved, zero                          |
//! | 8      | 4    | sample count `n`                        |
//! | 12     | 28·n | samples: x, y, time, pressure, tilt, orientation, unit length (`f32`) |

use bytemuck::{Pod, Zeroable};

use crate::error::CodecError;
use crate::stroke::{StrokeInput, StrokeInputBatch, ToolType};

#[cfg(not(target_endian = "little"))]
compile_error!("The input payload is read and written in host byte order, which must be little-endian.");

pub const MAGIC: [u8; 4] = *b"INKB";
pub const VERSION: u8 = 1;

#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct RawHeader {
    magic: [u8; 4],
    version: u8,
    tool_type: u8,
    reserved: [u8; 2],
    count: u32,
}

#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct RawInput {
    x: f32,
    y: f32,
    time_millis: f32,
    pressure: f32,
    tilt_radians: f32,
    orientation_radians: f32,
    stroke_unit_length_cm: f32,
}

const HEADER_LEN: usize = std::mem::size_of::<RawHeader>();
const INPUT_LEN: usize = std::mem::size_of::<RawInput>();

impl From<&StrokeInput> for RawInput {
    fn from(input: &StrokeInput) -> Self {
        Self {
            x: input.position.x,
            y: input.position.y,
            time_millis: input.time_millis,
            pressure: input.pressure,
            tilt_radians: input.tilt_radians,
            orientation_radians: input.orientation_radians,
            stroke_unit_length_cm: input.stroke_unit_length_cm,
        }
    }
}

impl From<RawInput> for StrokeInput {
    fn from(raw: RawInput) -> Self {
        StrokeInput {
            stroke_unit_length_cm: raw.stroke_unit_length_cm,
            ..StrokeInput::new(raw.x, raw.y, raw.time_millis)
                .with_pressure(raw.pressure)
                .with_tilt(raw.tilt_radians)
                .with_orientation(raw.orientation_radians)
        }
    }
}

pub fn encode_inputs(batch: &StrokeInputBatch) -> Result<Vec<u8>, CodecError> {
    let count = u32::try_from(batch.len()).map_err(|_| CodecError::TooLong(batch.len()))?;
    let header = RawHeader {
        magic: MAGIC,
        version: VERSION,
        tool_type: batch.tool_type().tag(),
        reserved: [0; 2],
        count,
    };
    let raw: Vec<RawInput> = batch.inputs().iter().map(RawInput::from).collect();

    let mut bytes = Vec::with_capacity(HEADER_LEN + raw.len() * INPUT_LEN);
    bytes.extend_from_slice(bytemuck::bytes_of(&header));
    bytes.extend_from_slice(bytemuck::cast_slice(&raw));
    Ok(bytes)
}

/// Decodes and validates a payload. Trailing or missing sample bytes are errors.
pub fn decode_inputs(bytes: &[u8]) -> Result<StrokeInputBatch, CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }
    let (header_bytes, body) = bytes.split_at(HEADER_LEN);
    let header: RawHeader = bytemuck::pod_read_unaligned(header_bytes);
    if header.magic != MAGIC {
        return Err(CodecError::BadMagic);
    }
    if header.version != VERSION {
        return Err(CodecError::UnsupportedVersion(header.version));
    }
    let tool_type =
        ToolType::from_tag(header.tool_type).ok_or(CodecError::UnknownToolType(header.tool_type))?;

    let declared = header.count as usize;
    if declared.checked_mul(INPUT_LEN) != Some(body.len()) {
        return Err(CodecError::LengthMismatch {
            declared,
            actual: body.len(),
        });
    }

    let inputs = body
        .chunks_exact(INPUT_LEN)
        .map(|chunk| StrokeInput::from(bytemuck::pod_read_unaligned::<RawInput>(chunk)))
        .collect();
    Ok(StrokeInputBatch::new(tool_type, inputs)?)
}
