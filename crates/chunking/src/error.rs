//! Error types for the chunking engine and tokenizer adapter.

use paperchunk_core::AppError;
use thiserror::Error;

/// Failure reported by a tokenizer adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizerError {
    #[error("Unknown encoding '{name}'. Supported encodings: {supported}")]
    UnknownEncoding { name: String, supported: String },

    #[error("Failed to load encoding '{encoding}': {message}")]
    Load { encoding: String, message: String },

    #[error("Failed to encode text: {0}")]
    Encode(String),

    #[error("Failed to decode {count} tokens: {message}")]
    Decode { count: usize, message: String },
}

/// Errors raised by the chunking engine.
///
/// There is no partial-success variant: a chunking call either returns the
/// complete record sequence or one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkingError {
    /// Rejected before any element is processed
    #[error("Invalid chunking configuration: {0}")]
    Configuration(String),

    /// Tokenizer failure, propagated unchanged
    #[error("Encoding failed: {0}")]
    Encoding(#[from] TokenizerError),
}

impl ChunkingError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result type for chunking operations
pub type Result<T> = std::result::Result<T, ChunkingError>;

impl From<ChunkingError> for AppError {
    fn from(err: ChunkingError) -> Self {
        match err {
            ChunkingError::Configuration(msg) => AppError::Config(msg),
            ChunkingError::Encoding(inner) => AppError::Encoding(inner.to_string()),
        }
    }
}

impl From<TokenizerError> for AppError {
    fn from(err: TokenizerError) -> Self {
        AppError::Encoding(err.to_string())
    }
}
