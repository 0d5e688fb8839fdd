use thiserror::Error;

use crate::note::NoteId;

/// Errors produced while encoding or decoding strokes.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed stroke JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input payload too short: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Input payload has an unrecognized header")]
    BadMagic,

    #[error("Unsupported input payload version {0}")]
    UnsupportedVersion(u8),

    #[error("Unknown tool type tag {0}")]
    UnknownToolType(u8),

    #[error("Input payload declares {declared} samples but carries {actual} bytes of sample data")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("Byte value {0} is outside the signed/unsigned byte range")]
    ByteOutOfRange(i64),

    #[error("Invalid input batch: {0}")]
    InvalidBatch(#[from] BatchError),

    #[error("Invalid brush: {0}")]
    InvalidBrush(#[from] BrushError),

    #[error("Too many samples to encode: {0}")]
    TooLong(usize),
}

/// Violations of the input batch invariants.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BatchError {
    #[error("sample {index} has a non-finite position or timestamp")]
    NotFinite { index: usize },

    #[error("sample {index} goes back in time ({time_millis} ms after {previous_millis} ms)")]
    TimeReversed {
        index: usize,
        time_millis: f32,
        previous_millis: f32,
    },
}

/// Invalid brush parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BrushError {
    #[error("brush size must be finite and positive, got {0}")]
    InvalidSize(f32),

    #[error("brush epsilon must be finite and positive, got {0}")]
    InvalidEpsilon(f32),
}

/// Errors reported by a notes repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Note {0} does not exist")]
    NoteNotFound(NoteId),

    #[error("Failed to encode strokes: {0}")]
    Codec(#[from] CodecError),

    #[error("Failed to serialize notes: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to access notes file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that prevent an editing session from existing.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid note id {0}")]
    InvalidNoteId(NoteId),

    #[error("Note {0} does not exist")]
    NoteNotFound(NoteId),

    #[error("Repository failure: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid session config: {0}")]
    Config(#[from] ConfigError),
}

/// Errors while loading a session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid value in config: {0}")]
    Invalid(#[from] BrushError),

    #[error("Eraser padding must be finite and non-negative, got {0}")]
    InvalidPadding(f32),
}
