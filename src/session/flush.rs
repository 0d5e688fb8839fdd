use std::future::Future;
use std::sync::Arc;

use futures::task::{Spawn, SpawnExt};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::note::NoteId;
use crate::repository::{FlushTicket, NotesRepository, SaveOutcome};
use crate::stroke::StrokeRef;

/// Hands repository writes to the executor without waiting for them.
///
/// Stroke saves are numbered so the repository can drop one that arrives after a
/// newer save from this session.
pub(crate) struct Flusher {
    note_id: NoteId,
    repository: Arc<dyn NotesRepository>,
    spawner: Box<dyn Spawn>,
    session: Uuid,
    last_sequence: u64,
}

impl Flusher {
    pub fn new(note_id: NoteId, repository: Arc<dyn NotesRepository>, spawner: Box<dyn Spawn>) -> Self {
        Self {
            note_id,
            repository,
            spawner,
            session: Uuid::new_v4(),
            last_sequence: 0,
        }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn repository(&self) -> &Arc<dyn NotesRepository> {
        &self.repository
    }

    /// Schedules a save of `strokes` and returns its sequence number.
    pub fn flush_strokes(&mut self, strokes: Vec<StrokeRef>) -> u64 {
        self.last_sequence += 1;
        let ticket = FlushTicket {
            session: self.session,
            sequence: self.last_sequence,
        };
        let repository = self.repository.clone();
        let note_id = self.note_id;
        let count = strokes.len();

        let task = async move {
            match repository.update_note_strokes(note_id, ticket, strokes).await {
                Ok(SaveOutcome::Saved) => {
                    log::debug!("Flush {} saved {} strokes", ticket.sequence, count)
                }
                Ok(SaveOutcome::Stale) => {
                    log::debug!("Flush {} superseded by a newer save", ticket.sequence)
                }
                Err(err) => {
                    log::error!("Failed to save strokes of note {}: {}", note_id, err)
                }
            }
        };
        if let Err(err) = self.spawner.spawn(task) {
            log::error!("Could not schedule flush {}: {}", ticket.sequence, err);
        }
        ticket.sequence
    }

    /// Runs a note field update in the background, logging failure.
    pub fn spawn_update<F, Fut>(&self, what: &'static str, update: F)
    where
        F: FnOnce(Arc<dyn NotesRepository>, NoteId) -> Fut,
        Fut: Future<Output = Result<(), RepositoryError>> + Send + 'static,
    {
        let note_id = self.note_id;
        let pending = update(self.repository.clone(), note_id);
        let task = async move {
            if let Err(err) = pending.await {
                log::error!("Failed to {} of note {}: {}", what, note_id, err);
            }
        };
        if let Err(err) = self.spawner.spawn(task) {
            log::error!("Could not schedule {} of note {}: {}", what, note_id, err);
        }
    }
}

impl std::fmt::Debug for Flusher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flusher")
            .field("note_id", &self.note_id)
            .field("session", &self.session)
            .field("last_sequence", &self.last_sequence)
            .finish()
    }
}
