use futures::future::{BoxFuture, FutureExt};
use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;

use super::table::NoteTable;
use super::{FlushTicket, NotesRepository, RepositoryResult, SaveOutcome};
use crate::codec;
use crate::error::RepositoryError;
use crate::note::{Note, NoteId};
use crate::stroke::{Stroke, StrokeRef};

/// Notes held in process memory. Shared between tasks behind a mutex.
#[derive(Debug)]
pub struct InMemoryNotesRepository {
    table: Mutex<NoteTable>,
}

impl Default for InMemoryNotesRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNotesRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(NoteTable::new()),
        }
    }

    pub fn with_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        Self {
            table: Mutex::new(NoteTable::from_notes(notes)),
        }
    }

    /// Copy of every stored note, in id order
    pub fn notes(&self) -> Vec<Note> {
        self.table.lock().notes()
    }

    pub(crate) fn store_strokes(
        &self,
        id: NoteId,
        ticket: FlushTicket,
        strokes: &[StrokeRef],
    ) -> RepositoryResult<SaveOutcome> {
        let encoded = codec::encode_strokes(strokes)?;

        let mut table = self.table.lock();
        if table.get(id).is_none() {
            return Err(RepositoryError::NoteNotFound(id));
        }
        if !table.accept_ticket(ticket) {
            log::debug!(
                "Dropping stale flush {} for note {} (session {})",
                ticket.sequence,
                id,
                ticket.session
            );
            return Ok(SaveOutcome::Stale);
        }
        table.modify(id, |note| note.strokes_data = Some(encoded))?;
        log::debug!("Saved {} strokes for note {}", strokes.len(), id);
        Ok(SaveOutcome::Saved)
    }

    pub(crate) fn load_strokes(&self, id: NoteId) -> RepositoryResult<Vec<Stroke>> {
        let data = match self.table.lock().get(id) {
            Some(note) => note.strokes_data.clone(),
            None => return Ok(Vec::new()),
        };
        let Some(data) = data else {
            return Ok(Vec::new());
        };
        match codec::decode_strokes(&data) {
            Ok(strokes) => Ok(strokes),
            Err(err) => {
                log::error!("Strokes of note {} are unreadable: {}", id, err);
                Ok(Vec::new())
            }
        }
    }
}

impl NotesRepository for InMemoryNotesRepository {
    fn all_notes_stream(&self) -> BoxStream<'static, Vec<Note>> {
        self.table.lock().subscribe_all().boxed()
    }

    fn note_stream(&self, id: NoteId) -> BoxStream<'static, Option<Note>> {
        self.table.lock().subscribe_note(id).boxed()
    }

    fn get_note(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<Option<Note>>> {
        async move { Ok(self.table.lock().get(id).cloned()) }.boxed()
    }

    fn add_note(&self, note: Note) -> BoxFuture<'_, RepositoryResult<NoteId>> {
        async move {
            let id = self.table.lock().insert(note);
            log::info!("Added note {}", id);
            Ok(id)
        }
        .boxed()
    }

    fn delete_note(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<()>> {
        async move {
            if self.table.lock().remove(id).is_some() {
                log::info!("Deleted note {}", id);
            }
            Ok(())
        }
        .boxed()
    }

    fn update_note(&self, note: Note) -> BoxFuture<'_, RepositoryResult<()>> {
        async move { self.table.lock().replace(note) }.boxed()
    }

    fn update_note_strokes(
        &self,
        id: NoteId,
        ticket: FlushTicket,
        strokes: Vec<StrokeRef>,
    ) -> BoxFuture<'_, RepositoryResult<SaveOutcome>> {
        async move { self.store_strokes(id, ticket, &strokes) }.boxed()
    }

    fn note_strokes(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<Vec<Stroke>>> {
        async move { self.load_strokes(id) }.boxed()
    }

    fn toggle_favorite(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<()>> {
        async move {
            self.table
                .lock()
                .modify(id, |note| note.is_favorite = !note.is_favorite)
        }
        .boxed()
    }

    fn update_note_image_uri_list(
        &self,
        id: NoteId,
        image_uri_list: Vec<String>,
    ) -> BoxFuture<'_, RepositoryResult<()>> {
        async move {
            self.table
                .lock()
                .modify(id, |note| note.image_uri_list = image_uri_list)
        }
        .boxed()
    }
}
