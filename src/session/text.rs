use std::sync::Arc;

use crate::error::SessionError;
use crate::note::{Note, NoteId, NoteType};
use crate::repository::NotesRepository;

/// Editing session for a text note.
///
/// Edits apply to the local copy first and are then written through. A session
/// opened without an id edits an unsaved note and writes nothing.
pub struct TextNoteSession {
    repository: Arc<dyn NotesRepository>,
    note: Note,
    stored: bool,
}

impl std::fmt::Debug for TextNoteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNoteSession")
            .field("note", &self.note)
            .field("stored", &self.stored)
            .finish()
    }
}

impl TextNoteSession {
    /// Opens `note_id`, or a blank unsaved note for `None` or 0.
    pub async fn open(
        repository: Arc<dyn NotesRepository>,
        note_id: Option<NoteId>,
    ) -> Result<Self, SessionError> {
        let (note, stored) = match note_id.filter(|&id| id != 0) {
            Some(id) if id < 0 => return Err(SessionError::InvalidNoteId(id)),
            Some(id) => {
                let note = repository
                    .get_note(id)
                    .await?
                    .ok_or(SessionError::NoteNotFound(id))?;
                (note, true)
            }
            None => (Note::of_type(NoteType::Text), false),
        };
        log::info!("Opened text note {} (stored: {})", note.id, stored);
        Ok(Self {
            repository,
            note,
            stored,
        })
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn is_stored(&self) -> bool {
        self.stored
    }

    pub async fn update_title(&mut self, title: impl Into<String>) -> Result<(), SessionError> {
        self.note.title = title.into();
        self.write_note().await
    }

    pub async fn update_text(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.note.text = Some(text.into());
        self.write_note().await
    }

    /// Text notes can hold any number of images; this appends one.
    pub async fn add_image(&mut self, uri: impl Into<String>) -> Result<(), SessionError> {
        self.note.image_uri_list.push(uri.into());
        if self.stored {
            self.repository
                .update_note_image_uri_list(self.note.id, self.note.image_uri_list.clone())
                .await?;
        }
        Ok(())
    }

    pub async fn toggle_favorite(&mut self) -> Result<(), SessionError> {
        self.note.is_favorite = !self.note.is_favorite;
        if self.stored {
            self.repository.toggle_favorite(self.note.id).await?;
        }
        Ok(())
    }

    async fn write_note(&self) -> Result<(), SessionError> {
        if self.stored {
            self.repository.update_note(self.note.clone()).await?;
        }
        Ok(())
    }
}
