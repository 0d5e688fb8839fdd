#![warn(clippy::all, rust_2018_idioms)]

use std::sync::Arc;

use futures::executor::LocalPool;
use ink_notes::event::LogEventHandler;
use ink_notes::{
    DrawingSession, InMemoryNotesRepository, NoteType, NotesRepository, PointerEvent,
    SessionConfig,
};

// Draws two strokes, erases one and undoes the erase, logging every step.
// Run with RUST_LOG=debug to see the history and flushes.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::default(),
    };

    let mut pool = LocalPool::new();
    let repository = Arc::new(InMemoryNotesRepository::new());
    let note_id = pool.run_until(repository.add_note_of_type(NoteType::Drawing))?;

    let mut session = DrawingSession::new(note_id, repository.clone(), pool.spawner(), config)?;
    session.subscribe(LogEventHandler::new("session: "));
    pool.run_until(session.load())?;

    for (pointer_id, y) in [(1, 100.0), (2, 400.0)] {
        session.handle_pointer_event(&PointerEvent::down(pointer_id, 0.0, y, 0.0));
        session.handle_pointer_event(&PointerEvent::moved(pointer_id, 150.0, y, 16.0));
        session.handle_pointer_event(&PointerEvent::up(pointer_id, 300.0, y, 32.0));
    }

    session.set_eraser_mode(true);
    session.handle_pointer_event(&PointerEvent::down(3, 150.0, 60.0, 0.0));
    session.handle_pointer_event(&PointerEvent::moved(3, 150.0, 140.0, 16.0));
    session.handle_pointer_event(&PointerEvent::up(3, 150.0, 160.0, 32.0));
    log::info!("{} strokes after erasing", session.strokes().len());

    session.undo();
    log::info!("{} strokes after undo", session.strokes().len());

    session.close();
    pool.run_until_stalled();

    let strokes = pool.run_until(repository.note_strokes(note_id))?;
    println!("Note {} holds {} strokes", note_id, strokes.len());
    Ok(())
}
