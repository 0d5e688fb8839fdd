#![warn(clippy::all, rust_2018_idioms)]

pub mod brush;
pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod note;
pub mod repository;
pub mod session;
pub mod snapshot;
pub mod stroke;
pub mod tool;
pub mod util;

pub use brush::{Brush, BrushFamily, ColorLong};
pub use command::{HistoryState, StrokeEdit, StrokeHistory};
pub use config::SessionConfig;
pub use event::SessionEvent;
pub use input::{PointerEvent, PointerPhase};
pub use note::{Note, NoteId, NoteType};
pub use repository::{FileNotesRepository, InMemoryNotesRepository, NotesRepository};
pub use session::{DrawingSession, TextNoteSession};
pub use snapshot::StrokeSnapshot;
pub use stroke::{Stroke, StrokeInput, StrokeInputBatch, StrokeRef, ToolType};
pub use tool::EraserTool;
