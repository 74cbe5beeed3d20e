//! One chunk per element.

use super::ElementSplitter;
use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::types::StructuralElement;

/// Emits every element verbatim, regardless of its token length.
pub struct SectionSplitter;

impl ElementSplitter for SectionSplitter {
    fn split(&self, element: &StructuralElement, _config: &ChunkingConfig) -> Result<Vec<String>> {
        Ok(vec![element.text.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_splitter_verbatim() {
        let config = ChunkingConfig::default();
        let element = StructuralElement::new("  Methods:\n keep  whitespace ");

        let pieces = SectionSplitter.split(&element, &config).unwrap();
        assert_eq!(pieces, vec!["  Methods:\n keep  whitespace ".to_string()]);
    }

    #[test]
    fn test_section_splitter_empty_text() {
        let config = ChunkingConfig::default();
        let pieces = SectionSplitter.split(&StructuralElement::new(""), &config).unwrap();
        assert_eq!(pieces, vec![String::new()]);
    }
}
