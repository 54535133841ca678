//! Unified error types for swcache.
//!
//! Strategies never surface `NetworkFailure` to callers; it is converted into
//! a fallback response. The remaining kinds reach the hosting surface.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the swcache engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The fetch could not complete (transport error, timeout, oversized body).
    #[error("NETWORK_FAILURE: {0}")]
    NetworkFailure(String),

    /// The persistence layer rejected a read or write.
    #[error("STORE_FAILURE: {0}")]
    StoreFailure(String),

    /// No entry or store exists for the given key or name.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("STORE_FAILURE: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_FAILURE: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid input parameters (e.g., unknown method or destination).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// A lifecycle operation was invoked out of order.
    #[error("INVALID_STATE: {0}")]
    InvalidState(String),
}

impl Error {
    /// Whether this error originated in the persistence layer.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Error::StoreFailure(_) | Error::Database(_) | Error::MigrationFailed(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::StoreFailure(format!("corrupt header set: {err}"))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::NetworkFailure(msg) => (-32000, msg.clone()),
            Error::NotFound(msg) => (-32001, msg.clone()),
            Error::StoreFailure(msg) => (-32002, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::InvalidState(msg) => (-32004, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
