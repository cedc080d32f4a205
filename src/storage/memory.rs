use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use uuid::Uuid;

use super::NoteStore;
use crate::models::Note;

/// In-memory note store. Iteration follows insertion order.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    notes: Arc<RwLock<IndexMap<Uuid, Note>>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IndexMap<Uuid, Note>>> {
        self.notes
            .read()
            .map_err(|_| anyhow!("note store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IndexMap<Uuid, Note>>> {
        self.notes
            .write()
            .map_err(|_| anyhow!("note store lock poisoned"))
    }
}

impl NoteStore for MemoryNoteStore {
    fn create(&self, note: Note) -> Result<Note> {
        self.write()?.insert(note.id, note.clone());
        Ok(note)
    }

    fn get(&self, id: Uuid) -> Result<Option<Note>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn get_all(&self) -> Result<Vec<Note>> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn update(&self, id: Uuid, note: Note) -> Result<Option<Note>> {
        let mut notes = self.write()?;
        match notes.get_mut(&id) {
            Some(slot) => {
                *slot = note.clone();
                Ok(Some(note))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.write()?.shift_remove(&id).is_some())
    }

    fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.read()?.contains_key(&id))
    }
}
