//! Extraction boundary: turning a source document into structural elements.
//!
//! Layout analysis (PDF parsing, section inference) is done by an external
//! partitioner. This crate only consumes its output.

use crate::jsonl;
use crate::types::StructuralElement;
use paperchunk_core::AppResult;
use std::path::Path;

/// Produces structural elements for a document, in reading order.
///
/// An implementation may return zero elements for unsupported input
/// (e.g., image-only scans); callers treat that as an extraction failure.
pub trait Partitioner: Send + Sync {
    /// Partitioner name for logging
    fn name(&self) -> &str;

    /// Extract the elements of the document at `path`.
    fn partition(&self, path: &Path) -> AppResult<Vec<StructuralElement>>;
}

/// Reads elements that were already extracted to JSONL, one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlPartitioner;

impl Partitioner for JsonlPartitioner {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn partition(&self, path: &Path) -> AppResult<Vec<StructuralElement>> {
        let elements = jsonl::read_elements(path)?;
        tracing::debug!("Read {} elements from {:?}", elements.len(), path);
        Ok(elements)
    }
}
