//! Structural elements (chunking input) and chunk records (chunking output).

use serde::{Deserialize, Serialize};

/// Opaque, order-preserving metadata mapping passed through untouched.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Section label used when the partitioner did not report one at all.
pub const UNKNOWN_SECTION: &str = "Unknown";

fn unknown_section() -> Option<String> {
    Some(UNKNOWN_SECTION.to_string())
}

/// One parsed unit of document text (paragraph, heading, table text)
/// produced by an upstream partitioner, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralElement {
    /// Element text; may be empty for degenerate input
    #[serde(default)]
    pub text: String,

    /// Section label. A missing key means "Unknown"; an explicit null stays absent.
    #[serde(default = "unknown_section")]
    pub section: Option<String>,

    /// 1-based page number, best effort
    #[serde(default)]
    pub page_number: Option<u32>,

    /// Partitioner element category (e.g., "NarrativeText", "Title")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Element type as written by some partitioners next to `category`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,

    /// Free-form partitioner metadata
    #[serde(default)]
    pub metadata: Metadata,
}

impl StructuralElement {
    /// Create an element with text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            section: None,
            page_number: None,
            category: None,
            element_type: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_page(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Category, falling back to the `type` key.
    pub fn kind(&self) -> Option<&str> {
        self.category.as_deref().or(self.element_type.as_deref())
    }
}

/// A retrievable unit of text with stable identity and provenance.
///
/// Records are only built by the chunking engine and are read-only
/// afterwards. Serialization keeps the field order
/// `chunk_id, text, section, page_number, metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    chunk_id: String,
    text: String,
    section: Option<String>,
    page_number: Option<u32>,
    metadata: Metadata,
}

impl ChunkRecord {
    /// Build a record for `text` carrying the provenance of `source`.
    pub(crate) fn from_element(chunk_id: String, text: String, source: &StructuralElement) -> Self {
        Self {
            chunk_id,
            text,
            section: source.section.clone(),
            page_number: source.page_number,
            metadata: source.metadata.clone(),
        }
    }

    pub fn chunk_id(&self) -> &str {
        &self.chunk_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn page_number(&self) -> Option<u32> {
        self.page_number
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Numeric suffix of the chunk ID.
    pub fn sequence(&self) -> Option<usize> {
        self.chunk_id
            .rsplit_once('-')
            .and_then(|(_, index)| index.parse().ok())
    }
}

/// Format a chunk ID as `{base_name}-{index}`.
pub fn format_chunk_id(base_name: &str, index: usize) -> String {
    format!("{}-{}", base_name, index)
}
