//! Document chunking for retrieval pipelines.
//!
//! Turns the structural elements of an extracted document into
//! retrieval-sized chunk records, by section, by token windows, or both.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod jsonl;
pub mod progress;
pub mod session;
pub mod splitters;
pub mod tokenizer;
pub mod types;
pub mod window;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::{ChunkStrategy, ChunkingConfig};
pub use engine::{chunk, Chunker};
pub use error::{ChunkingError, Result, TokenizerError};
pub use extract::{JsonlPartitioner, Partitioner};
pub use progress::{ProgressEvent, ProgressPhase, ProgressReporter};
pub use session::{DocumentSession, DocumentState};
pub use tokenizer::{create_tokenizer, TiktokenTokenizer, Tokenizer};
pub use types::{ChunkRecord, Metadata, StructuralElement};
