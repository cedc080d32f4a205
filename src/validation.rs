//! Request validation for note payloads and path identifiers.
//!
//! Request structs keep every field as an optional raw JSON value so a wrong
//! type on one field is reported alongside problems on the others. A
//! validation pass then turns them into the typed inputs in [`crate::models`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{NewNote, NoteChanges};

pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MAX_CHARS: usize = 10_000;

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    StringType,
    BoolType,
    Empty,
    TooLong,
    NoFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: FieldErrorKind,
}

impl FieldError {
    fn new(field: &str, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            kind,
        }
    }
}

/// Every field violation found in one request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field error(s): {}", .0.len(), summarize(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A path identifier that is not a well-formed UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid UUID format: {0}")]
pub struct InvalidIdentifier(pub String);

/// Raw body of `POST /api/v1/notes`. Both fields are required.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    #[serde(default)]
    #[schema(value_type = String, max_length = 200)]
    pub title: Option<Value>,
    #[serde(default)]
    #[schema(value_type = String, max_length = 10000)]
    pub content: Option<Value>,
}

/// Raw body of `PUT /api/v1/notes/{id}`. Each field is optional but at least
/// one must be present.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>, max_length = 200)]
    pub title: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>, max_length = 10000)]
    pub content: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub completed: Option<Value>,
}

impl CreateNoteRequest {
    pub fn validate(&self) -> Result<NewNote, ValidationErrors> {
        let mut errors = Vec::new();

        let title = required_text("title", self.title.as_ref(), TITLE_MAX_CHARS, &mut errors);
        let content = required_text(
            "content",
            self.content.as_ref(),
            CONTENT_MAX_CHARS,
            &mut errors,
        );

        match (title, content) {
            (Some(title), Some(content)) if errors.is_empty() => Ok(NewNote { title, content }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

impl UpdateNoteRequest {
    pub fn validate(&self) -> Result<NoteChanges, ValidationErrors> {
        let mut errors = Vec::new();

        let changes = NoteChanges {
            title: optional_text("title", self.title.as_ref(), TITLE_MAX_CHARS, &mut errors),
            content: optional_text(
                "content",
                self.content.as_ref(),
                CONTENT_MAX_CHARS,
                &mut errors,
            ),
            completed: optional_bool("completed", self.completed.as_ref(), &mut errors),
        };

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        if changes.is_empty() {
            return Err(ValidationErrors(vec![FieldError::new(
                "body",
                FieldErrorKind::NoFields,
                "At least one field (title, content, or completed) must be provided",
            )]));
        }

        Ok(changes)
    }
}

fn required_text(
    field: &str,
    value: Option<&Value>,
    max_chars: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, FieldErrorKind::Missing, "Field required"));
            None
        }
        Some(value) => check_text(field, value, max_chars, errors),
    }
}

fn optional_text(
    field: &str,
    value: Option<&Value>,
    max_chars: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => check_text(field, value, max_chars, errors),
    }
}

fn optional_bool(field: &str, value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<bool> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            errors.push(FieldError::new(
                field,
                FieldErrorKind::BoolType,
                "Input should be a valid boolean",
            ));
            None
        }
    }
}

/// Trim and bound-check a text field. Length counts Unicode scalar values.
fn check_text(
    field: &str,
    value: &Value,
    max_chars: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let Value::String(raw) = value else {
        errors.push(FieldError::new(
            field,
            FieldErrorKind::StringType,
            "Input should be a valid string",
        ));
        return None;
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(
            field,
            FieldErrorKind::Empty,
            "Field cannot be empty or whitespace only",
        ));
        return None;
    }

    if trimmed.chars().count() > max_chars {
        errors.push(FieldError::new(
            field,
            FieldErrorKind::TooLong,
            format!("String should have at most {max_chars} characters"),
        ));
        return None;
    }

    Some(trimmed.to_string())
}

/// Parse a path-supplied note id.
///
/// Only the hyphenated 8-4-4-4-12 form is accepted. Hex digits may be in
/// either case; lookups use the parsed value, so case does not matter.
pub fn parse_note_id(raw: &str) -> Result<Uuid, InvalidIdentifier> {
    if raw.len() != 36 {
        return Err(InvalidIdentifier(raw.to_string()));
    }
    Uuid::try_parse(raw).map_err(|_| InvalidIdentifier(raw.to_string()))
}
