use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};

use serde_json::{Map, Value};

use super::extract::JsonBody;
use crate::error::{ApiError, ErrorBody};
use crate::models::Note;
use crate::service::NoteService;
use crate::validation::{parse_note_id, CreateNoteRequest, UpdateNoteRequest};
use crate::SERVICE_NAME;

// ============================================================
// Health
// ============================================================

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy", "service": SERVICE_NAME }))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Service name and version"))
)]
pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================
// Notes
// ============================================================

#[utoipa::path(
    get,
    path = "/api/v1/notes",
    tag = "Notes",
    responses(
        (status = 200, description = "All notes", body = Vec<Note>),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub async fn list_notes(State(notes): State<NoteService>) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(notes.get_all_notes()?))
}

/// An empty object is treated like a missing body.
#[utoipa::path(
    post,
    path = "/api/v1/notes",
    tag = "Notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = Note),
        (status = 400, description = "Missing body or invalid fields", body = ErrorBody),
        (status = 413, description = "Body too large", body = ErrorBody),
        (status = 415, description = "Body is not JSON", body = ErrorBody)
    )
)]
pub async fn create_note(
    State(notes): State<NoteService>,
    JsonBody(body): JsonBody<Map<String, Value>>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    if body.is_empty() {
        return Err(ApiError::BodyRequired);
    }
    let request: CreateNoteRequest = serde_json::from_value(Value::Object(body))
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let input = request.validate()?;
    let note = notes.create_note(input)?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[utoipa::path(
    get,
    path = "/api/v1/notes/{id}",
    tag = "Notes",
    params(("id" = String, Path, description = "Note UUID")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 400, description = "Invalid UUID", body = ErrorBody),
        (status = 404, description = "No such note", body = ErrorBody)
    )
)]
pub async fn get_note(
    State(notes): State<NoteService>,
    Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_note_id(&id)?;
    notes
        .get_note(id)?
        .map(Json)
        .ok_or(ApiError::NotFound("Note"))
}

/// The id is checked before the body so a malformed id is reported even when
/// the body is also bad.
#[utoipa::path(
    put,
    path = "/api/v1/notes/{id}",
    tag = "Notes",
    params(("id" = String, Path, description = "Note UUID")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 400, description = "Invalid UUID, missing body or invalid fields", body = ErrorBody),
        (status = 404, description = "No such note", body = ErrorBody),
        (status = 413, description = "Body too large", body = ErrorBody),
        (status = 415, description = "Body is not JSON", body = ErrorBody)
    )
)]
pub async fn update_note(
    State(notes): State<NoteService>,
    Path(id): Path<String>,
    body: Result<JsonBody<UpdateNoteRequest>, ApiError>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_note_id(&id)?;
    let JsonBody(request) = body?;
    let changes = request.validate()?;

    notes
        .update_note(id, changes)?
        .map(Json)
        .ok_or(ApiError::NotFound("Note"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/notes/{id}",
    tag = "Notes",
    params(("id" = String, Path, description = "Note UUID")),
    responses(
        (status = 200, description = "Note deleted"),
        (status = 400, description = "Invalid UUID", body = ErrorBody),
        (status = 404, description = "No such note", body = ErrorBody)
    )
)]
pub async fn delete_note(
    State(notes): State<NoteService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_note_id(&id)?;
    if notes.delete_note(id)? {
        Ok(Json(
            serde_json::json!({ "message": "Note deleted successfully" }),
        ))
    } else {
        Err(ApiError::NotFound("Note"))
    }
}

// ============================================================
// Fallbacks
// ============================================================

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
