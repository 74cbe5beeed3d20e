//! Error types for paperchunk.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, chunking, token encoding,
//! extraction, per-document session handling and serialization.

use thiserror::Error;

/// Unified error type for paperchunk.
///
/// All fallible operations outside the chunking engine return
/// `Result<T, AppError>`. We never panic; errors must be represented and
/// propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors, including invalid chunking settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chunking engine errors that are not configuration or encoding errors
    #[error("Chunking error: {0}")]
    Chunking(String),

    /// Tokenizer failed to encode or decode text
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The document partitioner produced no usable elements
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Invalid per-document workflow transition
    #[error("Session error: {0}")]
    Session(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
