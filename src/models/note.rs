use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A titled piece of content with a completion flag.
///
/// The service assigns `id` and both timestamps; clients never supply them.
/// `created_at` is fixed at creation and `updated_at` moves forward on every
/// successful update, so `created_at <= updated_at` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
}

impl Note {
    /// Build a fresh, not yet completed note stamped with `now`.
    pub fn new(input: NewNote, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
            completed: false,
        }
    }
}

/// Validated input for creating a note. Both fields are already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

/// Validated partial update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub completed: Option<bool>,
}

impl NoteChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.completed.is_none()
    }

    /// Merge the supplied fields into `note` and stamp it with `now`.
    pub fn apply(self, mut note: Note, now: DateTime<Utc>) -> Note {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(completed) = self.completed {
            note.completed = completed;
        }
        note.updated_at = now;
        note
    }
}
