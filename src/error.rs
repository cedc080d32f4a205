//! HTTP error taxonomy.
//!
//! Every failure a handler can produce ends up as an [`ApiError`], which knows
//! its status code and JSON body. Internal errors are logged in full
//! server-side; clients only see a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use serde_json::Value;

use crate::validation::{InvalidIdentifier, ValidationErrors};

pub const INTERNAL_ERROR_DETAILS: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),

    #[error("Request body is required")]
    BodyRequired,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("No route for {0}")]
    RouteNotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Unsupported media type")]
    UnsupportedMediaType,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// JSON body shared by every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<Value>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidIdentifier(_)
            | Self::BodyRequired
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Validation(errors) => ErrorBody::with_details(
                "Validation error",
                serde_json::to_value(errors.errors()).unwrap_or(Value::Null),
            ),
            Self::InvalidIdentifier(err) => ErrorBody::new(err.to_string()),
            Self::BodyRequired => ErrorBody::new("Request body is required"),
            Self::BadRequest(details) => ErrorBody::with_details("Bad request", details.as_str()),
            Self::NotFound(what) => ErrorBody::new(format!("{what} not found")),
            Self::RouteNotFound(_) => ErrorBody::new("Not found"),
            Self::MethodNotAllowed => ErrorBody::with_details(
                "Method not allowed",
                "The method is not allowed for the requested URL.",
            ),
            Self::PayloadTooLarge => ErrorBody::with_details(
                "Payload too large",
                "Request payload exceeds maximum allowed size",
            ),
            Self::UnsupportedMediaType => ErrorBody::with_details(
                "Unsupported media type",
                "Content-Type must be application/json",
            ),
            Self::Internal(_) => {
                ErrorBody::with_details("Internal server error", INTERNAL_ERROR_DETAILS)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(err) => tracing::error!("Internal error: {:?}", err),
            Self::NotFound(_) | Self::RouteNotFound(_) => tracing::debug!("{}", self),
            _ => tracing::warn!("{}", self),
        }

        (self.status(), Json(self.body())).into_response()
    }
}
