//! Paperchunk Core Library
//!
//! This crate provides the foundational utilities shared by the chunking
//! engine and the `paperchunk` CLI:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Layered configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, ChunkingSettings};
pub use error::{AppError, AppResult};
