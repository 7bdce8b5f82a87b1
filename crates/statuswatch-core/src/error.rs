//! Error types for the status monitor
//!
//! Fetch and parse failures are recoverable per endpoint and per cycle; the
//! monitor logs them and moves on. Only configuration errors are fatal.

use thiserror::Error;

/// Result type alias for status monitor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the status monitor
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (connection reset, DNS, TLS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered with a status code other than 200 or 304
    #[error("HTTP error: unexpected status {status}")]
    Http {
        /// Response status code
        status: u16,
    },

    /// The response body was not valid JSON
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Valid JSON, but a record is missing a required field or has the wrong shape
    #[error("Malformed payload at {record}: {message}")]
    MalformedPayload {
        /// Location of the offending record, e.g. `components[2] (id=abc)`
        record: String,
        /// What was wrong with it
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The event sink rejected an event
    #[error("Sink error: {0}")]
    Sink(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an HTTP status error
    pub fn http(status: u16) -> Self {
        Self::Http { status }
    }

    /// Create a malformed payload error
    pub fn malformed(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            record: record.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a sink error
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Whether the error is expected to clear up on a later cycle
    ///
    /// Network failures, server errors and rate limiting are transient.
    /// Decode and shape errors usually mean the upstream format changed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
