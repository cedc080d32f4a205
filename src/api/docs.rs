//! OpenAPI document served at `/apispec.json` and rendered at `/api/docs`.

use utoipa::OpenApi;

use super::handlers;
use crate::error::ErrorBody;
use crate::models::Note;
use crate::validation::{CreateNoteRequest, FieldError, FieldErrorKind, UpdateNoteRequest};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notes API",
        description = "Create, read, update and delete notes"
    ),
    paths(
        handlers::health,
        handlers::index,
        handlers::list_notes,
        handlers::create_note,
        handlers::get_note,
        handlers::update_note,
        handlers::delete_note,
    ),
    components(schemas(
        Note,
        CreateNoteRequest,
        UpdateNoteRequest,
        ErrorBody,
        FieldError,
        FieldErrorKind
    )),
    tags(
        (name = "Notes", description = "Note lifecycle"),
        (name = "Health", description = "Liveness and service info")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_note_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for path in ["/", "/health", "/api/v1/notes", "/api/v1/notes/{id}"] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing {path} in {paths:?}"
            );
        }
    }

    #[test]
    fn note_item_path_has_three_operations() {
        let doc = ApiDoc::openapi();
        let item = doc
            .paths
            .paths
            .get("/api/v1/notes/{id}")
            .expect("missing note item path");

        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
        assert!(item.post.is_none());
    }
}
