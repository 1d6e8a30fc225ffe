//! Centralized error handling for ferrofetch

use std::io;
use thiserror::Error;

/// Custom error type for ferrofetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    /// I/O errors (file reading, cache access)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Parsing errors (invalid data format)
    #[error("parse error: {0}")]
    Parse(String),
    /// Configuration errors
    #[error("config error: {0}")]
    Config(String),
    /// System detection errors; the message is printed in place of the fact
    #[error("{0}")]
    Detection(String),
}

/// Type alias for Results in ferrofetch
pub type Result<T> = std::result::Result<T, FetchError>;
