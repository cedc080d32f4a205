//! Request logging, security headers, CORS and panic handling.
//!
//! Each piece is an explicit layer composed in [`super::create_router`].

use std::{any::Any, net::SocketAddr, time::Instant};

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

use crate::config::Config;
use crate::error::ApiError;

/// Longest body preview written to the debug log.
const BODY_PREVIEW_CHARS: usize = 500;
/// Bodies larger than this are not buffered for logging.
const MAX_LOGGED_BODY_BYTES: u64 = 64 * 1024;

/// Settings for [`log_requests`].
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Log headers and body previews at DEBUG level.
    pub log_bodies: bool,
}

impl From<&Config> for LoggingConfig {
    fn from(config: &Config) -> Self {
        Self {
            log_bodies: config.log_level.logs_bodies(),
        }
    }
}

/// Log one line per request with status, duration and client IP.
///
/// 5xx responses are logged at ERROR, 4xx at WARN, everything else at INFO.
pub async fn log_requests(
    State(config): State<LoggingConfig>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let ip = extract_client_ip(&request);

    let request = if config.log_bodies {
        match log_request_details(request).await {
            Ok(request) => request,
            Err(err) => return err.into_response(),
        }
    } else {
        request
    };

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    let line = format!(
        "{} {} | Status: {} | Duration: {:.2}ms | IP: {}",
        method,
        path,
        status.as_u16(),
        duration_ms,
        ip
    );

    if status.is_server_error() {
        tracing::error!("{}", line);
    } else if status.is_client_error() {
        tracing::warn!("{}", line);
    } else {
        tracing::info!("{}", line);
    }

    if config.log_bodies {
        log_response_details(response).await
    } else {
        response
    }
}

async fn log_request_details(request: Request) -> Result<Request, ApiError> {
    let (parts, body) = request.into_parts();

    let Some(len) = declared_length(&parts.headers).filter(|&n| n <= MAX_LOGGED_BODY_BYTES) else {
        tracing::debug!(
            "Request: {} {} | Headers: {:?} | Body: <not captured>",
            parts.method,
            parts.uri,
            parts.headers
        );
        return Ok(Request::from_parts(parts, body));
    };

    let bytes = axum::body::to_bytes(body, len as usize)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::debug!(
        "Request: {} {} | Headers: {:?} | Body: {}",
        parts.method,
        parts.uri,
        parts.headers,
        preview(&bytes)
    );

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

async fn log_response_details(response: Response) -> Response {
    let fits = response
        .body()
        .size_hint()
        .upper()
        .is_some_and(|n| n <= MAX_LOGGED_BODY_BYTES);

    if !fits {
        tracing::debug!(
            "Response: Status {} | Headers: {:?} | Body: <streamed>",
            response.status().as_u16(),
            response.headers()
        );
        return response;
    }

    let (parts, body) = response.into_parts();
    match axum::body::to_bytes(body, MAX_LOGGED_BODY_BYTES as usize).await {
        Ok(bytes) => {
            tracing::debug!(
                "Response: Status {} | Headers: {:?} | Body: {}",
                parts.status.as_u16(),
                parts.headers,
                preview(&bytes)
            );
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(e) => ApiError::Internal(anyhow::anyhow!("failed to buffer response body: {e}"))
            .into_response(),
    }
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn preview(bytes: &Bytes) -> String {
    if bytes.is_empty() {
        return "None".to_string();
    }
    String::from_utf8_lossy(bytes)
        .chars()
        .take(BODY_PREVIEW_CHARS)
        .collect()
}

/// Extract client IP from request.
fn extract_client_ip(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    // Proxied requests
    if let Some(forwarded) = request.headers().get("X-Forwarded-For") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(ip) = value.split(',').next().map(str::trim) {
                if !ip.is_empty() {
                    return ip.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = request.headers().get("X-Real-IP") {
        if let Ok(value) = real_ip.to_str() {
            return value.trim().to_string();
        }
    }

    "-".to_string()
}

/// Add browser hardening headers to every response.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; script-src 'self' 'unsafe-inline'; \
             style-src 'self' 'unsafe-inline'; img-src 'self' data:;",
        ),
    );

    response
}

/// CORS policy. `None` allows any origin.
pub fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            layer.allow_origin(origins)
        }
        None => layer.allow_origin(AnyOrigin),
    }
}

/// Turn a handler panic into the generic 500 response.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn request_with(headers: &[(&str, &str)]) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/v1/notes");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn client_ip_prefers_connect_info() {
        let mut request = request_with(&[("X-Forwarded-For", "10.0.0.1")]);
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 7], 4000))));

        assert_eq!(extract_client_ip(&request), "192.168.1.7");
    }

    #[test]
    fn client_ip_uses_first_forwarded_address() {
        let request = request_with(&[("X-Forwarded-For", " 10.0.0.1, 10.0.0.2")]);
        assert_eq!(extract_client_ip(&request), "10.0.0.1");
    }

    #[test]
    fn client_ip_falls_back_to_real_ip_then_placeholder() {
        let request = request_with(&[("X-Real-IP", "172.16.0.9")]);
        assert_eq!(extract_client_ip(&request), "172.16.0.9");

        assert_eq!(extract_client_ip(&request_with(&[])), "-");
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let body = Bytes::from("x".repeat(BODY_PREVIEW_CHARS * 2));
        assert_eq!(preview(&body).len(), BODY_PREVIEW_CHARS);
        assert_eq!(preview(&Bytes::new()), "None");
    }

    #[test]
    fn panic_payload_becomes_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn logging_config_follows_log_level() {
        let mut config = Config::default();
        assert!(!LoggingConfig::from(&config).log_bodies);

        config.log_level = crate::config::LogLevel::Debug;
        assert!(LoggingConfig::from(&config).log_bodies);
    }
}
