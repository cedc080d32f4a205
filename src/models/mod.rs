//! Domain models for the notes service.
//!
//! - [`Note`]: the stored resource, owned by a [`NoteStore`](crate::storage::NoteStore).
//! - [`NewNote`] and [`NoteChanges`]: validated inputs produced by
//!   [`crate::validation`] and consumed by [`NoteService`](crate::service::NoteService).

mod note;

pub use note::*;
