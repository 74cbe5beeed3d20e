//! Whole element when it fits, token windows when it does not.

use super::{ElementSplitter, TokenWindowSplitter};
use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::tokenizer::Tokenizer;
use crate::types::StructuralElement;

/// Keeps sections intact up to `chunk_size` tokens (empty ones included)
/// and falls back to token windowing for longer ones.
pub struct HybridSplitter<'a> {
    tokenizer: &'a dyn Tokenizer,
}

impl<'a> HybridSplitter<'a> {
    pub fn new(tokenizer: &'a dyn Tokenizer) -> Self {
        Self { tokenizer }
    }
}

impl ElementSplitter for HybridSplitter<'_> {
    fn split(&self, element: &StructuralElement, config: &ChunkingConfig) -> Result<Vec<String>> {
        let tokens = self.tokenizer.encode(&element.text)?;

        if tokens.len() <= config.chunk_size() {
            return Ok(vec![element.text.clone()]);
        }

        tracing::trace!(
            tokens = tokens.len(),
            chunk_size = config.chunk_size(),
            "Element exceeds chunk size, windowing"
        );

        TokenWindowSplitter::new(self.tokenizer).split_tokens(&tokens, config)
    }
}
