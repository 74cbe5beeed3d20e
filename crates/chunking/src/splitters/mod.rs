//! Per-element splitting strategies.
//!
//! A splitter only decides the text pieces of one element. Chunk IDs and
//! provenance are the engine's job.

mod hybrid;
mod section;
mod tokens;

pub use hybrid::HybridSplitter;
pub use section::SectionSplitter;
pub use tokens::TokenWindowSplitter;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::types::StructuralElement;

/// Trait for element splitters.
pub trait ElementSplitter {
    /// Split one element into the text pieces to emit, in order.
    fn split(&self, element: &StructuralElement, config: &ChunkingConfig) -> Result<Vec<String>>;
}
