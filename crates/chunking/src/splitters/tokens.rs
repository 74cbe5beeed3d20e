//! Fixed-size token windows with overlap.

use super::ElementSplitter;
use crate::config::ChunkingConfig;
use crate::error::{ChunkingError, Result};
use crate::tokenizer::Tokenizer;
use crate::types::StructuralElement;
use crate::window::token_windows;

/// Encodes each element and emits its decoded token windows.
pub struct TokenWindowSplitter<'a> {
    tokenizer: &'a dyn Tokenizer,
}

impl<'a> TokenWindowSplitter<'a> {
    pub fn new(tokenizer: &'a dyn Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Decode every window of an already encoded element.
    pub fn split_tokens(&self, tokens: &[u32], config: &ChunkingConfig) -> Result<Vec<String>> {
        token_windows(tokens.len(), config)
            .map(|window| {
                self.tokenizer
                    .decode(&tokens[window])
                    .map_err(ChunkingError::from)
            })
            .collect()
    }
}

impl ElementSplitter for TokenWindowSplitter<'_> {
    fn split(&self, element: &StructuralElement, config: &ChunkingConfig) -> Result<Vec<String>> {
        let tokens = self.tokenizer.encode(&element.text)?;
        self.split_tokens(&tokens, config)
    }
}
