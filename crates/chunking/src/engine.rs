//! Chunking engine: ordered structural elements in, ordered chunk records out.

use crate::config::{ChunkStrategy, ChunkingConfig};
use crate::error::Result;
use crate::splitters::{ElementSplitter, HybridSplitter, SectionSplitter, TokenWindowSplitter};
use crate::tokenizer::Tokenizer;
use crate::types::{format_chunk_id, ChunkRecord, StructuralElement};
use std::fmt;
use std::sync::Arc;

/// A configuration paired with the tokenizer it runs against.
#[derive(Clone)]
pub struct Chunker {
    config: ChunkingConfig,
    tokenizer: Arc<dyn Tokenizer>,
}

impl Chunker {
    pub fn new(config: ChunkingConfig, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { config, tokenizer }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Same as the free function [`chunk()`](crate::engine::chunk).
    pub fn chunk(&self, elements: &[StructuralElement], base_name: &str) -> Result<Vec<ChunkRecord>> {
        chunk(elements, &self.config, base_name, self.tokenizer.as_ref())
    }
}

impl fmt::Debug for Chunker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunker")
            .field("config", &self.config)
            .field("encoding", &self.tokenizer.encoding_name())
            .finish()
    }
}

/// Chunk a document's elements under `config`.
///
/// Chunk IDs are `{base_name}-{n}` where `n` counts emitted records from 0
/// across the whole call, so IDs are unique and follow emission order.
/// Every record inherits `section`, `page_number` and `metadata` of the
/// element it was cut from.
///
/// The function is pure apart from calls into `tokenizer`. A tokenizer
/// error aborts the call and no records are returned.
pub fn chunk(
    elements: &[StructuralElement],
    config: &ChunkingConfig,
    base_name: &str,
    tokenizer: &dyn Tokenizer,
) -> Result<Vec<ChunkRecord>> {
    let splitter = dispatch_splitter(config.strategy(), tokenizer);
    let mut records = Vec::with_capacity(elements.len());

    for element in elements {
        for text in splitter.split(element, config)? {
            let chunk_id = format_chunk_id(base_name, records.len());
            records.push(ChunkRecord::from_element(chunk_id, text, element));
        }
    }

    tracing::info!(
        base_name,
        strategy = %config.strategy(),
        chunk_size = config.chunk_size(),
        overlap = config.overlap(),
        elements = elements.len(),
        chunks = records.len(),
        "Chunking complete"
    );

    Ok(records)
}

/// Select the splitter for a strategy.
fn dispatch_splitter<'a>(
    strategy: ChunkStrategy,
    tokenizer: &'a dyn Tokenizer,
) -> Box<dyn ElementSplitter + 'a> {
    match strategy {
        ChunkStrategy::BySection => Box::new(SectionSplitter),
        ChunkStrategy::ByTokens => Box::new(TokenWindowSplitter::new(tokenizer)),
        ChunkStrategy::Hybrid => Box::new(HybridSplitter::new(tokenizer)),
    }
}
