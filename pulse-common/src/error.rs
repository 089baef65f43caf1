//! Common error types for PULSE

use thiserror::Error;

/// Common result type for PULSE operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared across PULSE crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wire payload that could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
