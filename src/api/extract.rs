use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, StatusCode},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// JSON object body extractor with the service's error mapping.
///
/// Unlike `axum::Json`, every rejection is an [`ApiError`]: an empty body is
/// "Request body is required", a non-JSON content type is 415, syntax errors
/// and non-object payloads are 400, and bodies over the configured
/// `DefaultBodyLimit` are 413.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::PayloadTooLarge
                } else {
                    ApiError::BadRequest(rejection.body_text())
                }
            })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::BodyRequired);
        }

        if !content_type.as_deref().is_some_and(is_json_content_type) {
            return Err(ApiError::UnsupportedMediaType);
        }

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        if !value.is_object() {
            return Err(ApiError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

/// `application/json` or any `application/*+json`, parameters ignored.
fn is_json_content_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
