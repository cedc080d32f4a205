pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod storage;
pub mod validation;

/// Service name reported by the health and index endpoints.
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");
