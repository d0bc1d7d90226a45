//! Server configuration read from the environment.

use std::net::SocketAddr;

use axum::http::HeaderName;
use reportgen_core::task::REPORT_GENERATOR_TOPIC;

use crate::error::AppError;
use crate::namespace::DEFAULT_NAMESPACE_HEADER;

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `DATABASE_URL`: ledger database.
    pub database_url: String,
    /// `DATABASE_MAX_CONNECTIONS`: pool size (default 10).
    pub database_max_connections: u32,
    /// `REDIS_URL`: task bus.
    pub redis_url: String,
    /// `HOST` (default `0.0.0.0`).
    pub host: String,
    /// `PORT` (default 3000).
    pub port: u16,
    /// `NAMESPACE_HEADER` (default `x-namespace`).
    pub namespace_header: HeaderName,
    /// `REPORT_TASK_TOPIC` (default `report_generator`).
    pub report_topic: String,
    /// `REPORT_STREAM_MAXLEN`: approximate cap on the task stream, unset
    /// for unbounded.
    pub stream_max_len: Option<usize>,
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's
    /// value or `None` if unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
        };

        let database_url = required("DATABASE_URL")?;
        let redis_url = required("REDIS_URL")?;

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().map_err(|e| {
                AppError::Config(format!("DATABASE_MAX_CONNECTIONS must be a valid u32: {e}"))
            })?,
            None => 10,
        };

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };

        let namespace_header = lookup("NAMESPACE_HEADER")
            .unwrap_or_else(|| DEFAULT_NAMESPACE_HEADER.to_string());
        let namespace_header = HeaderName::try_from(namespace_header.to_ascii_lowercase())
            .map_err(|e| AppError::Config(format!("NAMESPACE_HEADER is not a header name: {e}")))?;

        let report_topic = lookup("REPORT_TASK_TOPIC")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| REPORT_GENERATOR_TOPIC.to_string());

        let stream_max_len = lookup("REPORT_STREAM_MAXLEN")
            .map(|raw| {
                raw.parse::<usize>().map_err(|e| {
                    AppError::Config(format!("REPORT_STREAM_MAXLEN must be a valid usize: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            database_url,
            database_max_connections,
            redis_url,
            host,
            port,
            namespace_header,
            report_topic,
            stream_max_len,
        })
    }

    /// Returns the socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn listen_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
