//! Note lifecycle: id and timestamp assignment, partial-update merge.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::{NewNote, Note, NoteChanges};
use crate::storage::{MemoryNoteStore, NoteStore};

/// Business rules for notes on top of an injected [`NoteStore`].
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Service backed by a fresh, empty [`MemoryNoteStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryNoteStore::new()))
    }

    pub fn create_note(&self, input: NewNote) -> Result<Note> {
        let note = self.store.create(Note::new(input, Utc::now()))?;
        tracing::debug!(note_id = %note.id, "Created note");
        Ok(note)
    }

    pub fn get_note(&self, id: Uuid) -> Result<Option<Note>> {
        self.store.get(id)
    }

    pub fn get_all_notes(&self) -> Result<Vec<Note>> {
        self.store.get_all()
    }

    /// Apply `changes` to the note with `id`. Returns `None` if it does not exist.
    pub fn update_note(&self, id: Uuid, changes: NoteChanges) -> Result<Option<Note>> {
        let Some(existing) = self.store.get(id)? else {
            return Ok(None);
        };

        let now = next_update_time(existing.updated_at, Utc::now());
        let updated = self.store.update(id, changes.apply(existing, now))?;
        if updated.is_some() {
            tracing::debug!(note_id = %id, "Updated note");
        }
        Ok(updated)
    }

    pub fn delete_note(&self, id: Uuid) -> Result<bool> {
        let removed = self.store.delete(id)?;
        if removed {
            tracing::debug!(note_id = %id, "Deleted note");
        }
        Ok(removed)
    }
}

/// `updated_at` must move strictly forward even when the clock has not ticked
/// (or stepped backwards) since the previous write.
fn next_update_time(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
