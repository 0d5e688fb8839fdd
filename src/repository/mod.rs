//! # Notes repository
//!
//! Storage for notes with push-style change notification. Every stream yields
//! the current value as soon as it is polled and again after every change.

mod file;
mod memory;
mod table;

pub use file::FileNotesRepository;
pub use memory::InMemoryNotesRepository;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::note::{Note, NoteId, NoteType};
use crate::stroke::{Stroke, StrokeRef};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Orders stroke saves coming from one editing session.
///
/// Sequences grow by one per flush. A save whose sequence is not above the last
/// accepted one from the same session is stale and gets dropped, so a slow early
/// flush cannot overwrite a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlushTicket {
    pub session: Uuid,
    pub sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// A newer save from the same session already landed.
    Stale,
}

pub trait NotesRepository: Send + Sync {
    /// All notes, in id order
    fn all_notes_stream(&self) -> BoxStream<'static, Vec<Note>>;

    /// One note; `None` while it does not exist
    fn note_stream(&self, id: NoteId) -> BoxStream<'static, Option<Note>>;

    fn get_note(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<Option<Note>>>;

    /// Stores `note` and returns its id. An id of 0 asks for a fresh one.
    fn add_note(&self, note: Note) -> BoxFuture<'_, RepositoryResult<NoteId>>;

    fn add_note_of_type(&self, note_type: NoteType) -> BoxFuture<'_, RepositoryResult<NoteId>> {
        self.add_note(Note::of_type(note_type))
    }

    fn delete_note(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<()>>;

    fn update_note(&self, note: Note) -> BoxFuture<'_, RepositoryResult<()>>;

    /// Encodes and stores the visible strokes of a drawing.
    fn update_note_strokes(
        &self,
        id: NoteId,
        ticket: FlushTicket,
        strokes: Vec<StrokeRef>,
    ) -> BoxFuture<'_, RepositoryResult<SaveOutcome>>;

    /// Decoded strokes of a note. Unreadable strokes are skipped.
    fn note_strokes(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<Vec<Stroke>>>;

    fn toggle_favorite(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<()>>;

    fn update_note_image_uri_list(
        &self,
        id: NoteId,
        image_uri_list: Vec<String>,
    ) -> BoxFuture<'_, RepositoryResult<()>>;
}
