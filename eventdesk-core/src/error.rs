//! Error types for eventdesk.

use thiserror::Error;

/// Errors raised outside the controllers (configuration, files).
#[derive(Error, Debug)]
pub enum EventDeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for eventdesk operations.
pub type EventDeskResult<T> = Result<T, EventDeskError>;
