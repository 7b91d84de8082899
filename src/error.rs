use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error type shared by every provider adapter and the service layer
#[derive(Error, Debug)]
pub enum StatsError {
    /// Bad or missing configuration. Never reaches the network.
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// Transport failure: DNS, refused connection, timeout, TLS.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The provider explicitly rejected the credentials (401/403).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Unexpected status or undecodable payload on a fatal sub-request.
    #[error("Unexpected response: {0}")]
    Protocol(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for dashstat
pub type Result<T> = std::result::Result<T, StatsError>;

/// Serializable error category, what callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Connection,
    Auth,
    Protocol,
    NotFound,
    Store,
    Internal,
}

impl ErrorKind {
    /// HTTP status a gateway in front of the aggregation layer should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Auth => 401,
            ErrorKind::NotFound => 404,
            ErrorKind::Connection | ErrorKind::Protocol => 502,
            ErrorKind::Store | ErrorKind::Internal => 500,
        }
    }
}

impl StatsError {
    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        StatsError::Validation(msg.into())
    }

    /// Create a connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        StatsError::Connection(msg.into())
    }

    /// Create an authentication error
    pub fn auth<S: Into<String>>(msg: S) -> Self {
        StatsError::Auth(msg.into())
    }

    /// Create a protocol error
    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        StatsError::Protocol(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        StatsError::NotFound(msg.into())
    }

    pub fn store<S: Into<String>>(msg: S) -> Self {
        StatsError::Store(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StatsError::Validation(_) => ErrorKind::Validation,
            StatsError::Connection(_) => ErrorKind::Connection,
            StatsError::Auth(_) => ErrorKind::Auth,
            StatsError::Protocol(_) => ErrorKind::Protocol,
            StatsError::NotFound(_) => ErrorKind::NotFound,
            StatsError::Store(_) => ErrorKind::Store,
            StatsError::Io(_) => ErrorKind::Internal,
        }
    }

    /// Prefix the message with the sub-request that failed, keeping the category
    pub fn during(self, what: &str) -> Self {
        match self {
            StatsError::Validation(m) => StatsError::Validation(format!("{}: {}", what, m)),
            StatsError::Connection(m) => StatsError::Connection(format!("{}: {}", what, m)),
            StatsError::Auth(m) => StatsError::Auth(format!("{}: {}", what, m)),
            StatsError::Protocol(m) => StatsError::Protocol(format!("{}: {}", what, m)),
            other => other,
        }
    }
}

impl From<rusqlite::Error> for StatsError {
    fn from(err: rusqlite::Error) -> Self {
        StatsError::Store(err.to_string())
    }
}
