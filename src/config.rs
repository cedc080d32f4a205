//! Server configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

/// Default request body limit: 1 MiB.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Some(Self::Trace),
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARN" | "WARNING" => Some(Self::Warn),
            "ERROR" | "CRITICAL" => Some(Self::Error),
            _ => None,
        }
    }

    /// Whether request and response bodies should be logged.
    pub fn logs_bodies(&self) -> bool {
        matches!(self, Self::Trace | Self::Debug)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind (from SERVER_HOST)
    pub host: IpAddr,
    /// Port to bind (from SERVER_PORT)
    pub port: u16,
    /// Log verbosity (from LOG_LEVEL)
    pub log_level: LogLevel,
    /// Largest accepted request body in bytes (from MAX_CONTENT_LENGTH)
    pub max_content_length: usize,
    /// Allowed CORS origins (from CORS_ORIGINS, comma-separated). `None` allows any.
    pub cors_origins: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            log_level: LogLevel::Info,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            cors_origins: None,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for unset
    /// or empty variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let host = match get("SERVER_HOST") {
            Some(v) => parse_host(&v).ok_or_else(|| invalid("SERVER_HOST", &v, "not an IP address"))?,
            None => defaults.host,
        };

        let port = match get("SERVER_PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("SERVER_PORT", &v, e))?,
            None => defaults.port,
        };

        let log_level = match get("LOG_LEVEL") {
            Some(v) => LogLevel::parse(&v).ok_or_else(|| invalid("LOG_LEVEL", &v, "unknown level"))?,
            None => defaults.log_level,
        };

        let max_content_length = match get("MAX_CONTENT_LENGTH") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("MAX_CONTENT_LENGTH", &v, e))?,
            None => defaults.max_content_length,
        };

        let cors_origins = get("CORS_ORIGINS").map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(Self {
            host,
            port,
            log_level,
            max_content_length,
            cors_origins,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_host(value: &str) -> Option<IpAddr> {
    match value.trim() {
        "localhost" => Some(IpAddr::from([127, 0, 0, 1])),
        other => other.parse().ok(),
    }
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.max_content_length, 1024 * 1024);
        assert!(config.cors_origins.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = load(&[
            ("SERVER_HOST", "localhost"),
            ("SERVER_PORT", "8080"),
            ("LOG_LEVEL", "debug"),
            ("MAX_CONTENT_LENGTH", "2048"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.log_level.logs_bodies());
        assert_eq!(config.max_content_length, 2048);
        assert_eq!(
            config.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = load(&[("SERVER_PORT", ""), ("LOG_LEVEL", "  ")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn rejects_unparsable_values() {
        let err = load(&[("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SERVER_PORT", .. }));

        let err = load(&[("MAX_CONTENT_LENGTH", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "MAX_CONTENT_LENGTH", .. }));

        let err = load(&[("LOG_LEVEL", "chatty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LOG_LEVEL", .. }));

        let err = load(&[("SERVER_HOST", "example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SERVER_HOST", .. }));
    }
}
