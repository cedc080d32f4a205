mod docs;
mod extract;
mod handlers;
pub mod middleware;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::service::NoteService;

pub fn create_router(notes: NoteService, config: &Config) -> Router {
    let routes = Router::new()
        // Notes
        .route("/api/v1/notes", get(handlers::list_notes))
        .route("/api/v1/notes", post(handlers::create_note))
        .route("/api/v1/notes/{id}", get(handlers::get_note))
        .route("/api/v1/notes/{id}", put(handlers::update_note))
        .route("/api/v1/notes/{id}", delete(handlers::delete_note))
        // Health
        .route("/health", get(handlers::health))
        .route("/", get(handlers::index))
        // Docs
        .merge(SwaggerUi::new("/api/docs").url("/apispec.json", docs::ApiDoc::openapi()))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found);

    // Outermost first. CORS sits inside the trace layer because it needs a
    // response body with a `Default` impl.
    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer(config.cors_origins.as_deref()))
        .layer(axum_middleware::from_fn_with_state(
            middleware::LoggingConfig::from(config),
            middleware::log_requests,
        ))
        .layer(axum_middleware::from_fn(middleware::security_headers))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(DefaultBodyLimit::max(config.max_content_length));

    routes.layer(layers).with_state(notes)
}
