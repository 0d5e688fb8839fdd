use std::fs;
use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, FutureExt};
use futures::stream::BoxStream;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{FlushTicket, InMemoryNotesRepository, NotesRepository, RepositoryResult, SaveOutcome};
use crate::codec;
use crate::note::{Note, NoteId, NoteType};
use crate::stroke::{Stroke, StrokeRef};
use crate::util::time;

/// One stored note. The image list is kept as a JSON string column.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NoteRow {
    id: NoteId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(rename = "type", default)]
    note_type: NoteType,
    #[serde(default)]
    strokes_data: Option<String>,
    #[serde(default)]
    is_favorite: bool,
    #[serde(default)]
    image_uri: Option<String>,
}

impl From<Note> for NoteRow {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            text: note.text,
            note_type: note.note_type,
            strokes_data: note.strokes_data,
            is_favorite: note.is_favorite,
            image_uri: Some(codec::encode_string_list(&note.image_uri_list)),
        }
    }
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            image_uri_list: codec::decode_string_list(row.image_uri.as_deref()),
            id: row.id,
            title: row.title,
            text: row.text,
            note_type: row.note_type,
            strokes_data: row.strokes_data,
            is_favorite: row.is_favorite,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NotesFile {
    version: String,
    /// Seconds since the UNIX epoch
    saved_at: u64,
    notes: Vec<NoteRow>,
}

/// Notes kept in one pretty-printed JSON file, rewritten after every change.
///
/// Reads and subscriptions are served from memory.
#[derive(Debug)]
pub struct FileNotesRepository {
    path: PathBuf,
    inner: InMemoryNotesRepository,
    /// Serializes whole-file writes so the last write carries the latest table
    write_lock: Mutex<()>,
}

impl FileNotesRepository {
    /// Opens `path`, starting empty if it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let json = fs::read_to_string(&path)?;
            let file: NotesFile = serde_json::from_str(&json)?;
            if file.version != env!("CARGO_PKG_VERSION") {
                log::warn!(
                    "Notes file {} was written by version {}, current version is {}",
                    path.display(),
                    file.version,
                    env!("CARGO_PKG_VERSION")
                );
            }
            log::info!("Loaded {} notes from {}", file.notes.len(), path.display());
            InMemoryNotesRepository::with_notes(file.notes.into_iter().map(Note::from))
        } else {
            log::info!("No notes file at {}, starting empty", path.display());
            InMemoryNotesRepository::new()
        };
        Ok(Self {
            path,
            inner,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> RepositoryResult<()> {
        let _guard = self.write_lock.lock();
        let file = NotesFile {
            version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: time::timestamp_secs(),
            notes: self.inner.notes().into_iter().map(NoteRow::from).collect(),
        };
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, json)?;
        log::debug!("Wrote {} notes to {}", file.notes.len(), self.path.display());
        Ok(())
    }
}

impl NotesRepository for FileNotesRepository {
    fn all_notes_stream(&self) -> BoxStream<'static, Vec<Note>> {
        self.inner.all_notes_stream()
    }

    fn note_stream(&self, id: NoteId) -> BoxStream<'static, Option<Note>> {
        self.inner.note_stream(id)
    }

    fn get_note(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<Option<Note>>> {
        self.inner.get_note(id)
    }

    fn add_note(&self, note: Note) -> BoxFuture<'_, RepositoryResult<NoteId>> {
        async move {
            let id = self.inner.add_note(note).await?;
            self.save()?;
            Ok(id)
        }
        .boxed()
    }

    fn delete_note(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<()>> {
        async move {
            self.inner.delete_note(id).await?;
            self.save()
        }
        .boxed()
    }

    fn update_note(&self, note: Note) -> BoxFuture<'_, RepositoryResult<()>> {
        async move {
            self.inner.update_note(note).await?;
            self.save()
        }
        .boxed()
    }

    fn update_note_strokes(
        &self,
        id: NoteId,
        ticket: FlushTicket,
        strokes: Vec<StrokeRef>,
    ) -> BoxFuture<'_, RepositoryResult<SaveOutcome>> {
        async move {
            let outcome = self.inner.store_strokes(id, ticket, &strokes)?;
            if outcome == SaveOutcome::Saved {
                self.save()?;
            }
            Ok(outcome)
        }
        .boxed()
    }

    fn note_strokes(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<Vec<Stroke>>> {
        self.inner.note_strokes(id)
    }

    fn toggle_favorite(&self, id: NoteId) -> BoxFuture<'_, RepositoryResult<()>> {
        async move {
            self.inner.toggle_favorite(id).await?;
            self.save()
        }
        .boxed()
    }

    fn update_note_image_uri_list(
        &self,
        id: NoteId,
        image_uri_list: Vec<String>,
    ) -> BoxFuture<'_, RepositoryResult<()>> {
        async move {
            self.inner.update_note_image_uri_list(id, image_uri_list).await?;
            self.save()
        }
        .boxed()
    }
}
