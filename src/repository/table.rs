use std::collections::{BTreeMap, HashMap};

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use uuid::Uuid;

use super::FlushTicket;
use crate::error::RepositoryError;
use crate::note::{Note, NoteId};

/// Notes keyed by id, plus everyone watching them.
///
/// Every mutation goes through a method that ends in [`NoteTable::notify`].
#[derive(Debug, Default)]
pub(crate) struct NoteTable {
    notes: BTreeMap<NoteId, Note>,
    next_id: NoteId,
    /// Highest accepted flush sequence per editing session
    last_flush: HashMap<Uuid, u64>,
    all_subscribers: Vec<UnboundedSender<Vec<Note>>>,
    note_subscribers: Vec<(NoteId, UnboundedSender<Option<Note>>)>,
}

impl NoteTable {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Table holding `notes` as stored. Ids must be positive and unique.
    pub fn from_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let notes: BTreeMap<NoteId, Note> = notes.into_iter().map(|note| (note.id, note)).collect();
        let next_id = notes.keys().next_back().map_or(1, |id| id + 1);
        Self {
            notes,
            next_id,
            ..Self::default()
        }
    }

    pub fn notes(&self) -> Vec<Note> {
        self.notes.values().cloned().collect()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    pub fn insert(&mut self, mut note: Note) -> NoteId {
        let id = if note.id > 0 && !self.notes.contains_key(&note.id) {
            note.id
        } else {
            self.next_id
        };
        self.next_id = self.next_id.max(id + 1);
        note.id = id;
        self.notes.insert(id, note);
        self.notify(id);
        id
    }

    pub fn replace(&mut self, note: Note) -> Result<(), RepositoryError> {
        let id = note.id;
        let slot = self
            .notes
            .get_mut(&id)
            .ok_or(RepositoryError::NoteNotFound(id))?;
        *slot = note;
        self.notify(id);
        Ok(())
    }

    /// Deleting a missing note is a no-op.
    pub fn remove(&mut self, id: NoteId) -> Option<Note> {
        let removed = self.notes.remove(&id);
        if removed.is_some() {
            self.notify(id);
        }
        removed
    }

    pub fn modify<T>(
        &mut self,
        id: NoteId,
        change: impl FnOnce(&mut Note) -> T,
    ) -> Result<T, RepositoryError> {
        let note = self
            .notes
            .get_mut(&id)
            .ok_or(RepositoryError::NoteNotFound(id))?;
        let result = change(note);
        self.notify(id);
        Ok(result)
    }

    /// Records `ticket` if it is newer than anything accepted from its session.
    pub fn accept_ticket(&mut self, ticket: FlushTicket) -> bool {
        match self.last_flush.get(&ticket.session) {
            Some(&last) if ticket.sequence <= last => false,
            _ => {
                self.last_flush.insert(ticket.session, ticket.sequence);
                true
            }
        }
    }

    pub fn subscribe_all(&mut self) -> UnboundedReceiver<Vec<Note>> {
        let (tx, rx) = unbounded();
        if tx.unbounded_send(self.notes()).is_ok() {
            self.all_subscribers.push(tx);
        }
        rx
    }

    pub fn subscribe_note(&mut self, id: NoteId) -> UnboundedReceiver<Option<Note>> {
        let (tx, rx) = unbounded();
        if tx.unbounded_send(self.notes.get(&id).cloned()).is_ok() {
            self.note_subscribers.push((id, tx));
        }
        rx
    }

    /// Pushes the new state to subscribers, dropping the ones that went away.
    fn notify(&mut self, id: NoteId) {
        let all = self.notes();
        self.all_subscribers
            .retain(|tx| tx.unbounded_send(all.clone()).is_ok());

        let note = self.notes.get(&id).cloned();
        self.note_subscribers.retain(|(watched, tx)| {
            *watched != id || tx.unbounded_send(note.clone()).is_ok()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteType;

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut table = NoteTable::new();
        let a = table.insert(Note::of_type(NoteType::Text));
        let b = table.insert(Note::of_type(NoteType::Drawing));
        assert_eq!((a, b), (1, 2));

        let mut loaded = NoteTable::from_notes(table.notes());
        assert_eq!(loaded.insert(Note::default()), 3);
    }

    #[test]
    fn test_ticket_ordering_is_per_session() {
        let mut table = NoteTable::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        assert!(table.accept_ticket(FlushTicket { session: first, sequence: 2 }));
        assert!(!table.accept_ticket(FlushTicket { session: first, sequence: 1 }));
        assert!(!table.accept_ticket(FlushTicket { session: first, sequence: 2 }));
        assert!(table.accept_ticket(FlushTicket { session: second, sequence: 1 }));
        assert!(table.accept_ticket(FlushTicket { session: first, sequence: 3 }));
    }
}
