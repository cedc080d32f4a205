//! Note storage.
//!
//! [`NoteStore`] is the contract the service depends on. [`MemoryNoteStore`]
//! keeps notes in process memory and loses them on restart.

mod memory;

use anyhow::Result;
use uuid::Uuid;

use crate::models::Note;

pub use memory::MemoryNoteStore;

/// Keyed store of notes. Implementations must be safe to share across
/// request handlers; concurrent writes to the same id are last-writer-wins.
pub trait NoteStore: Send + Sync {
    /// Insert `note` under `note.id`, replacing any existing entry.
    fn create(&self, note: Note) -> Result<Note>;

    fn get(&self, id: Uuid) -> Result<Option<Note>>;

    /// Snapshot of every stored note.
    fn get_all(&self) -> Result<Vec<Note>>;

    /// Replace the note stored under `id`. Returns `None` if there is none.
    fn update(&self, id: Uuid, note: Note) -> Result<Option<Note>>;

    /// Returns whether a note was removed.
    fn delete(&self, id: Uuid) -> Result<bool>;

    fn exists(&self, id: Uuid) -> Result<bool>;
}
