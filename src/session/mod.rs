//! Editing sessions, one per open note.
//!
//! A [`DrawingSession`] owns everything that changes while a drawing is on screen:
//! the undo/redo history, the pen and eraser, and the current brush. It lives on
//! one logical thread and never locks. Every edit is committed to the history
//! first and persisted afterwards by a fire-and-forget flush, so the visible
//! strokes can run ahead of storage.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use futures::executor::LocalPool;
//! use ink_notes::repository::{InMemoryNotesRepository, NotesRepository};
//! use ink_notes::note::NoteType;
//! use ink_notes::session::DrawingSession;
//! use ink_notes::config::SessionConfig;
//!
//! let mut pool = LocalPool::new();
//! let repository = Arc::new(InMemoryNotesRepository::new());
//! let id = pool.run_until(repository.add_note_of_type(NoteType::Drawing)).unwrap();
//!
//! let mut session =
//!     DrawingSession::new(id, repository, pool.spawner(), SessionConfig::default()).unwrap();
//! pool.run_until(session.load()).unwrap();
//! session.undo();
//! session.close();
//! pool.run_until_stalled();
//! ```

mod flush;
mod text;

pub use text::TextNoteSession;

use std::sync::Arc;

use egui::{Color32, Pos2};
use futures::future;
use futures::stream::{BoxStream, StreamExt};
use futures::task::Spawn;
use uuid::Uuid;

use crate::brush::{Brush, BrushFamily};
use crate::command::{HistoryState, StrokeEdit, StrokeHistory};
use crate::config::{BrushPreset, SessionConfig};
use crate::error::{BrushError, SessionError};
use crate::event::{EventBus, EventHandler, SessionEvent};
use crate::input::{ActiveTool, PointerEvent, route_event};
use crate::note::{Note, NoteId};
use crate::repository::NotesRepository;
use crate::snapshot::StrokeSnapshot;
use crate::stroke::StrokeRef;
use crate::tool::{EraserTool, PenTool, Tool, ToolOutcome};
use flush::Flusher;

/// The in-memory editing state of one drawing note.
#[derive(Debug)]
pub struct DrawingSession {
    note_id: NoteId,
    /// Latest note fields seen, with local edits applied
    note: Option<Note>,
    history: StrokeHistory,
    pen: PenTool,
    eraser: EraserTool,
    active_tool: ActiveTool,
    config: SessionConfig,
    flusher: Flusher,
    event_bus: EventBus,
}

impl DrawingSession {
    /// Creates a session for `note_id`. Nothing is read until [`DrawingSession::load`].
    ///
    /// # Errors
    ///
    /// `SessionError::InvalidNoteId` for a non-positive id, and
    /// `SessionError::Config` if the configured default brush is invalid.
    pub fn new(
        note_id: NoteId,
        repository: Arc<dyn NotesRepository>,
        spawner: impl Spawn + 'static,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        if note_id <= 0 {
            return Err(SessionError::InvalidNoteId(note_id));
        }
        let brush = config.default_brush()?;
        let flusher = Flusher::new(note_id, repository, Box::new(spawner));
        log::info!("Opened drawing session {} for note {}", flusher.session(), note_id);

        Ok(Self {
            note_id,
            note: None,
            history: StrokeHistory::new(),
            pen: PenTool::new(brush),
            eraser: EraserTool::new(config.eraser_padding),
            active_tool: ActiveTool::Pen,
            config,
            flusher,
            event_bus: EventBus::new(),
        })
    }

    /// Reads the note and its strokes and seeds the history.
    pub async fn load(&mut self) -> Result<(), SessionError> {
        let note = self
            .flusher
            .repository()
            .get_note(self.note_id)
            .await?
            .ok_or(SessionError::NoteNotFound(self.note_id))?;
        self.reload(note).await
    }

    /// Applies a pushed note update.
    ///
    /// Only the first load seeds the history; later ones keep it and show the
    /// snapshot at the cursor, so edits made since are never lost.
    pub async fn reload(&mut self, note: Note) -> Result<(), SessionError> {
        if note.id != self.note_id {
            return Err(SessionError::InvalidNoteId(note.id));
        }
        let strokes = if note.strokes_data.is_some() {
            self.flusher.repository().note_strokes(self.note_id).await?
        } else {
            Vec::new()
        };
        let first_load = !self.history.is_initialized();
        self.note = Some(note);
        let shown = self.history.initialize(StrokeSnapshot::from_strokes(strokes));
        if first_load {
            log::info!("Loaded note {} with {} strokes", self.note_id, shown.len());
        }
        self.event_bus.emit(SessionEvent::NoteChanged);
        self.publish_strokes();
        Ok(())
    }

    /// The note as the repository pushes it, skipping the moments it does not exist.
    pub fn note_updates(&self) -> BoxStream<'static, Note> {
        self.flusher
            .repository()
            .note_stream(self.note_id)
            .filter_map(future::ready)
            .boxed()
    }

    pub fn note_id(&self) -> NoteId {
        self.note_id
    }

    pub fn session_id(&self) -> Uuid {
        self.flusher.session()
    }

    pub fn note(&self) -> Option<&Note> {
        self.note.as_ref()
    }

    /// What should be rendered right now
    pub fn strokes(&self) -> StrokeSnapshot {
        self.history.current()
    }

    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.event_bus.subscribe(Box::new(handler));
    }

    // --- history ---

    /// Appends strokes the drawing surface just finished.
    pub fn on_strokes_finished(&mut self, strokes: Vec<StrokeRef>) {
        if self.history.apply(&StrokeEdit::AddStrokes(strokes)) {
            self.publish_strokes();
            self.flush();
        }
    }

    /// Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.history.undo().is_none() {
            return false;
        }
        self.publish_strokes();
        self.flush();
        true
    }

    /// Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        if self.history.redo().is_none() {
            return false;
        }
        self.publish_strokes();
        self.flush();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_state(&self) -> HistoryState {
        self.history.state()
    }

    // --- eraser ---

    pub fn start_erase(&mut self) {
        self.eraser.start_erase();
    }

    /// Erases along the path from the previous point. Commits on a hit but does
    /// not flush; [`DrawingSession::end_erase`] does.
    pub fn erase(&mut self, x: f32, y: f32) -> bool {
        let visible = self.history.current();
        match self.eraser.erase(Pos2::new(x, y), &visible) {
            Some(remaining) => {
                self.commit(remaining);
                true
            }
            None => false,
        }
    }

    pub fn end_erase(&mut self) {
        self.eraser.end_erase();
        self.flush();
    }

    // --- clearing ---

    /// Removes every stroke as one undoable step.
    pub fn clear_strokes(&mut self) {
        if self.history.apply(&StrokeEdit::Clear) {
            self.publish_strokes();
            self.flush();
        }
    }

    pub fn clear_images(&mut self) {
        if let Some(note) = &mut self.note {
            note.image_uri_list.clear();
        }
        self.event_bus.emit(SessionEvent::NoteChanged);
        self.flusher
            .spawn_update("clear images", |repository, id| async move {
                repository.update_note_image_uri_list(id, Vec::new()).await
            });
    }

    pub fn clear_screen(&mut self) {
        self.clear_strokes();
        self.clear_images();
    }

    // --- brush and tool ---

    pub fn current_brush(&self) -> &Brush {
        self.pen.brush()
    }

    pub fn brush_presets(&self) -> &[BrushPreset] {
        &self.config.brush_presets
    }

    /// Switches family and size, keeping the color.
    pub fn change_brush(&mut self, family: BrushFamily, size: f32) -> Result<(), BrushError> {
        let brush = self.pen.brush().with_family(family, size)?;
        self.set_brush(brush);
        Ok(())
    }

    pub fn change_brush_color(&mut self, color: Color32) {
        let brush = self.pen.brush().with_color(color);
        self.set_brush(brush);
    }

    fn set_brush(&mut self, brush: Brush) {
        self.pen.set_brush(brush.clone());
        self.event_bus.emit(SessionEvent::BrushChanged(brush));
    }

    /// Switching tools abandons the gesture of the tool being left.
    pub fn set_eraser_mode(&mut self, enabled: bool) {
        let next = if enabled {
            ActiveTool::Eraser
        } else {
            ActiveTool::Pen
        };
        if next == self.active_tool {
            return;
        }
        let outcome = match self.active_tool {
            ActiveTool::Pen => self.pen.on_deactivate(),
            ActiveTool::Eraser => self.eraser.on_deactivate(),
        };
        self.apply_outcome(outcome);
        self.active_tool = next;
        self.event_bus
            .emit(SessionEvent::ToolModeChanged { eraser: enabled });
    }

    pub fn is_eraser_mode(&self) -> bool {
        self.active_tool == ActiveTool::Eraser
    }

    /// Feeds one pointer event to the active tool. Returns `true` if the visible
    /// strokes changed.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> bool {
        let visible = self.history.current();
        let outcome = route_event(
            event,
            self.active_tool,
            &mut self.pen,
            &mut self.eraser,
            &visible,
        );
        self.apply_outcome(outcome)
    }

    fn apply_outcome(&mut self, outcome: ToolOutcome) -> bool {
        match outcome {
            ToolOutcome::Nothing => false,
            ToolOutcome::StrokeFinished(stroke) => {
                self.on_strokes_finished(vec![stroke]);
                true
            }
            ToolOutcome::Erased(remaining) => {
                self.commit(remaining);
                true
            }
            ToolOutcome::EraseFinished(last_hit) => {
                let changed = last_hit.is_some();
                if let Some(remaining) = last_hit {
                    self.commit(remaining);
                }
                self.flush();
                changed
            }
        }
    }

    // --- note fields ---

    pub fn update_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if let Some(note) = &mut self.note {
            note.title = title.clone();
        }
        self.event_bus.emit(SessionEvent::NoteChanged);
        // Read-modify-write so stroke data saved meanwhile is not overwritten
        self.flusher
            .spawn_update("update title", |repository, id| async move {
                if let Some(mut note) = repository.get_note(id).await? {
                    note.title = title;
                    repository.update_note(note).await?;
                }
                Ok(())
            });
    }

    pub fn toggle_favorite(&mut self) {
        if let Some(note) = &mut self.note {
            note.is_favorite = !note.is_favorite;
        }
        self.event_bus.emit(SessionEvent::NoteChanged);
        self.flusher
            .spawn_update("toggle favorite", |repository, id| async move {
                repository.toggle_favorite(id).await
            });
    }

    /// A drawing has at most one background image; this replaces it.
    pub fn set_image(&mut self, uri: impl Into<String>) {
        let images = vec![uri.into()];
        if let Some(note) = &mut self.note {
            note.image_uri_list = images.clone();
        }
        self.event_bus.emit(SessionEvent::NoteChanged);
        self.flusher
            .spawn_update("set image", |repository, id| async move {
                repository.update_note_image_uri_list(id, images).await
            });
    }

    /// Ends the session with a last flush of the visible strokes.
    ///
    /// A session that never loaded has nothing of its own to save and skips it.
    pub fn close(mut self) {
        if self.history.is_initialized() {
            self.flush();
        } else {
            log::warn!("Closing session for note {} before it loaded", self.note_id);
        }
        log::info!(
            "Closed drawing session {} for note {}",
            self.flusher.session(),
            self.note_id
        );
    }

    fn commit(&mut self, snapshot: StrokeSnapshot) {
        self.history.commit(snapshot);
        self.publish_strokes();
    }

    fn publish_strokes(&self) {
        self.event_bus.emit(SessionEvent::StrokesChanged {
            stroke_count: self.history.current().len(),
        });
        self.event_bus
            .emit(SessionEvent::HistoryChanged(self.history.state()));
    }

    fn flush(&mut self) {
        let sequence = self.flusher.flush_strokes(self.history.current().to_vec());
        self.event_bus
            .emit(SessionEvent::FlushScheduled { sequence });
    }
}
