use std::sync::Arc;

use egui::Color32;
use futures::StreamExt;
use futures::executor::block_on;
use uuid::Uuid;

use ink_notes::brush::{Brush, BrushFamily};
use ink_notes::error::RepositoryError;
use ink_notes::note::{Note, NoteType};
use ink_notes::repository::{
    FileNotesRepository, FlushTicket, InMemoryNotesRepository, NotesRepository, SaveOutcome,
};
use ink_notes::session::TextNoteSession;
use ink_notes::stroke::{Stroke, StrokeInput, StrokeInputBatch, StrokeRef, ToolType};

fn strokes(count: usize) -> Vec<StrokeRef> {
    let brush = Brush::with_color32(BrushFamily::Marker, Color32::RED, 10.0, 0.1).unwrap();
    (0..count)
        .map(|i| {
            let y = i as f32 * 20.0;
            let inputs = vec![StrokeInput::new(0.0, y, 0.0), StrokeInput::new(50.0, y, 12.0)];
            Stroke::new_ref(brush.clone(), StrokeInputBatch::new(ToolType::Touch, inputs).unwrap())
        })
        .collect()
}

fn ticket(session: Uuid, sequence: u64) -> FlushTicket {
    FlushTicket { session, sequence }
}

// Unique path under the system temp dir
fn temp_notes_path() -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("ink_notes_test_{}", Uuid::new_v4()))
        .join("notes.json")
}

#[test]
fn test_add_note_of_type() {
    let repository = InMemoryNotesRepository::new();
    block_on(async {
        let text = repository.add_note_of_type(NoteType::Text).await.unwrap();
        let drawing = repository.add_note_of_type(NoteType::Drawing).await.unwrap();
        assert!(drawing > text);

        let text = repository.get_note(text).await.unwrap().unwrap();
        assert_eq!(text.text.as_deref(), Some(""));
        let drawing = repository.get_note(drawing).await.unwrap().unwrap();
        assert_eq!(drawing.note_type, NoteType::Drawing);
        assert_eq!(drawing.text, None);
    });
}

#[test]
fn test_update_delete_and_missing_notes() {
    let repository = InMemoryNotesRepository::new();
    block_on(async {
        let id = repository.add_note(Note::default()).await.unwrap();
        let mut note = repository.get_note(id).await.unwrap().unwrap();
        note.title = "Groceries".to_string();
        repository.update_note(note).await.unwrap();
        assert_eq!(repository.get_note(id).await.unwrap().unwrap().title, "Groceries");

        repository.toggle_favorite(id).await.unwrap();
        assert!(repository.get_note(id).await.unwrap().unwrap().is_favorite);

        repository.delete_note(id).await.unwrap();
        assert!(repository.get_note(id).await.unwrap().is_none());
        repository.delete_note(id).await.unwrap();

        assert!(matches!(
            repository.toggle_favorite(id).await,
            Err(RepositoryError::NoteNotFound(missing)) if missing == id
        ));
        assert!(repository.note_strokes(id).await.unwrap().is_empty());
    });
}

#[test]
fn test_streams_push_current_value_then_changes() {
    let repository = InMemoryNotesRepository::new();
    let mut all = repository.all_notes_stream();
    let mut watched = repository.note_stream(1);

    block_on(async {
        assert_eq!(all.next().await, Some(Vec::new()));
        assert_eq!(watched.next().await, Some(None));

        let id = repository.add_note_of_type(NoteType::Drawing).await.unwrap();
        assert_eq!(id, 1);
        assert_eq!(all.next().await.map(|notes| notes.len()), Some(1));
        assert_eq!(watched.next().await.flatten().map(|note| note.id), Some(1));

        repository.toggle_favorite(id).await.unwrap();
        assert!(watched.next().await.flatten().unwrap().is_favorite);

        repository.delete_note(id).await.unwrap();
        assert_eq!(watched.next().await, Some(None));
    });
}

#[test]
fn test_stale_flush_is_rejected() {
    let repository = InMemoryNotesRepository::new();
    let session = Uuid::new_v4();
    block_on(async {
        let id = repository.add_note_of_type(NoteType::Drawing).await.unwrap();

        // Flush 2 lands before the slower flush 1
        let newer = repository.update_note_strokes(id, ticket(session, 2), strokes(2)).await;
        let older = repository.update_note_strokes(id, ticket(session, 1), strokes(5)).await;

        assert_eq!(newer.unwrap(), SaveOutcome::Saved);
        assert_eq!(older.unwrap(), SaveOutcome::Stale);
        assert_eq!(repository.note_strokes(id).await.unwrap().len(), 2);

        // Another session starts its own sequence
        let other = repository
            .update_note_strokes(id, ticket(Uuid::new_v4(), 1), strokes(1))
            .await;
        assert_eq!(other.unwrap(), SaveOutcome::Saved);
        assert_eq!(repository.note_strokes(id).await.unwrap().len(), 1);
    });
}

#[test]
fn test_stroke_save_to_missing_note_fails() {
    let repository = InMemoryNotesRepository::new();
    let result = block_on(repository.update_note_strokes(42, ticket(Uuid::new_v4(), 1), strokes(1)));
    assert!(matches!(result, Err(RepositoryError::NoteNotFound(42))));
}

#[test]
fn test_unreadable_stroke_column_loads_empty() {
    let note = Note {
        id: 3,
        note_type: NoteType::Drawing,
        strokes_data: Some("definitely not json".to_string()),
        ..Note::default()
    };
    let repository = InMemoryNotesRepository::with_notes([note]);
    assert!(block_on(repository.note_strokes(3)).unwrap().is_empty());
    assert_eq!(block_on(repository.add_note(Note::default())).unwrap(), 4);
}

#[test]
fn test_file_repository_survives_reopen() {
    let path = temp_notes_path();
    let session = Uuid::new_v4();
    let id = {
        let repository = FileNotesRepository::open(&path).unwrap();
        block_on(async {
            let id = repository.add_note_of_type(NoteType::Drawing).await.unwrap();
            repository
                .update_note_strokes(id, ticket(session, 1), strokes(3))
                .await
                .unwrap();
            repository
                .update_note_image_uri_list(id, vec!["content://a".into(), "content://b".into()])
                .await
                .unwrap();
            repository.toggle_favorite(id).await.unwrap();
            id
        })
    };
    assert!(path.exists());

    let reopened = FileNotesRepository::open(&path).unwrap();
    let note = block_on(reopened.get_note(id)).unwrap().unwrap();
    assert_eq!(note.note_type, NoteType::Drawing);
    assert!(note.is_favorite);
    assert_eq!(note.image_uri_list, vec!["content://a".to_string(), "content://b".to_string()]);
    assert_eq!(block_on(reopened.note_strokes(id)).unwrap(), strokes(3).iter().map(|s| (**s).clone()).collect::<Vec<_>>());

    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"image_uri\""));
    assert!(json.contains("\"DRAWING\""));

    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

#[test]
fn test_file_repository_rejects_corrupt_file() {
    let path = temp_notes_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ broken").unwrap();

    assert!(matches!(
        FileNotesRepository::open(&path),
        Err(RepositoryError::Serialization(_))
    ));
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_text_note_session_writes_through() {
    let repository = Arc::new(InMemoryNotesRepository::new());
    block_on(async {
        let id = repository.add_note_of_type(NoteType::Text).await.unwrap();
        let mut session = TextNoteSession::open(repository.clone(), Some(id)).await.unwrap();

        session.update_title("Trip").await.unwrap();
        session.update_text("Pack light").await.unwrap();
        session.add_image("content://1").await.unwrap();
        session.add_image("content://2").await.unwrap();
        session.toggle_favorite().await.unwrap();

        let stored = repository.get_note(id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Trip");
        assert_eq!(stored.text.as_deref(), Some("Pack light"));
        assert_eq!(stored.image_uri_list.len(), 2);
        assert!(stored.is_favorite);
        assert_eq!(&stored, session.note());
    });
}

#[test]
fn test_unsaved_text_note_session_stays_local() {
    let repository = Arc::new(InMemoryNotesRepository::new());
    block_on(async {
        let mut session = TextNoteSession::open(repository.clone(), None).await.unwrap();
        assert!(!session.is_stored());
        session.update_title("Draft").await.unwrap();
        assert_eq!(session.note().title, "Draft");
        assert!(repository.notes().is_empty());

        let missing = TextNoteSession::open(repository.clone(), Some(9)).await;
        assert!(matches!(missing, Err(ink_notes::error::SessionError::NoteNotFound(9))));
    });
}
