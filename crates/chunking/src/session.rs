//! Per-document workflow: extract once, chunk as often as needed, hand off.
//!
//! ```text
//! Idle --start_extraction--> Extracting --finish_extraction--> Done | Error
//! Done | Error --reprocess--> Idle
//! Done --chunk--> Done (replaces the previous chunk output)
//! Done --take_chunks--> Idle (extraction and chunk data discarded)
//! ```

use crate::config::ChunkingConfig;
use crate::engine;
use crate::extract::Partitioner;
use crate::jsonl;
use crate::tokenizer::Tokenizer;
use crate::types::{ChunkRecord, StructuralElement};
use paperchunk_core::{AppError, AppResult};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Workflow state of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentState {
    Idle,
    Extracting,
    Done,
    Error,
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Done => "done",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// State owned by the caller for one document.
#[derive(Debug, Clone)]
pub struct DocumentSession {
    file_name: String,
    base_name: String,
    state: DocumentState,
    elements: Option<Vec<StructuralElement>>,
    chunks: Option<Vec<ChunkRecord>>,
    error: Option<String>,
    config: ChunkingConfig,
}

impl DocumentSession {
    /// Start a session for the document at `path` using `config`.
    pub fn new(path: &Path, config: ChunkingConfig) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            file_name,
            base_name: jsonl::document_base_name(path),
            state: DocumentState::Idle,
            elements: None,
            chunks: None,
            error: None,
            config,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Prefix of this document's chunk IDs.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn elements(&self) -> Option<&[StructuralElement]> {
        self.elements.as_deref()
    }

    pub fn element_count(&self) -> usize {
        self.elements.as_ref().map_or(0, Vec::len)
    }

    pub fn chunks(&self) -> Option<&[ChunkRecord]> {
        self.chunks.as_deref()
    }

    /// Message of the last extraction failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Change this document's chunking settings. Takes effect on the next
    /// [`chunk`](Self::chunk); extraction output is kept.
    pub fn set_config(&mut self, config: ChunkingConfig) {
        self.config = config;
    }

    /// Whether this document's settings differ from the global ones.
    pub fn is_customized(&self, global: &ChunkingConfig) -> bool {
        &self.config != global
    }

    /// Idle -> Extracting.
    pub fn start_extraction(&mut self) -> AppResult<()> {
        self.expect_state(DocumentState::Idle, "start extraction")?;
        self.state = DocumentState::Extracting;
        Ok(())
    }

    /// Extracting -> Done (elements retained) or Error.
    ///
    /// Zero elements count as a failed extraction. Returns the element count.
    pub fn finish_extraction(
        &mut self,
        result: AppResult<Vec<StructuralElement>>,
    ) -> AppResult<usize> {
        self.expect_state(DocumentState::Extracting, "finish extraction")?;

        let outcome = result.and_then(|elements| {
            if elements.is_empty() {
                Err(AppError::Extraction(format!(
                    "No elements extracted from '{}'. It is likely a scanned (image-only) or corrupted document",
                    self.file_name
                )))
            } else {
                Ok(elements)
            }
        });

        match outcome {
            Ok(elements) => {
                let count = elements.len();
                self.elements = Some(elements);
                self.error = None;
                self.state = DocumentState::Done;
                tracing::info!("{} elements extracted from '{}'", count, self.file_name);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Extraction failed for '{}': {}", self.file_name, e);
                self.error = Some(e.to_string());
                self.state = DocumentState::Error;
                Err(e)
            }
        }
    }

    /// Run `partitioner` on `path` through the full extraction transition.
    pub fn extract(&mut self, partitioner: &dyn Partitioner, path: &Path) -> AppResult<usize> {
        self.start_extraction()?;
        tracing::debug!(
            "Extracting '{}' with partitioner '{}'",
            self.file_name,
            partitioner.name()
        );
        let result = partitioner.partition(path);
        self.finish_extraction(result)
    }

    /// Done | Error -> Idle, discarding extraction and chunk output.
    pub fn reprocess(&mut self) -> AppResult<()> {
        match self.state {
            DocumentState::Done | DocumentState::Error => {
                self.clear();
                Ok(())
            }
            other => Err(AppError::Session(format!(
                "Cannot reprocess '{}' while {}",
                self.file_name, other
            ))),
        }
    }

    /// Chunk the retained elements with this document's settings.
    ///
    /// Only valid in Done. Replaces any earlier chunk output; on failure the
    /// earlier output is discarded and the elements are kept.
    pub fn chunk(&mut self, tokenizer: &dyn Tokenizer) -> AppResult<&[ChunkRecord]> {
        self.expect_state(DocumentState::Done, "chunk")?;
        self.chunks = None;

        let elements = self.elements.as_deref().unwrap_or_default();
        let records = engine::chunk(elements, &self.config, &self.base_name, tokenizer)?;

        Ok(self.chunks.insert(records).as_slice())
    }

    /// Extraction output as JSONL.
    pub fn extracted_jsonl(&self) -> AppResult<String> {
        self.expect_state(DocumentState::Done, "export extracted elements")?;
        jsonl::to_jsonl(self.elements.as_deref().unwrap_or_default())
    }

    /// Hand off the chunk output and drop everything held for this document.
    pub fn take_chunks(&mut self) -> AppResult<Vec<ChunkRecord>> {
        self.expect_state(DocumentState::Done, "take chunks")?;
        let chunks = self.chunks.take().ok_or_else(|| {
            AppError::Session(format!("'{}' has not been chunked yet", self.file_name))
        })?;
        self.clear();
        Ok(chunks)
    }

    /// Chunk output as JSONL, dropping everything held for this document.
    pub fn take_chunked_jsonl(&mut self) -> AppResult<String> {
        let chunks = self.take_chunks()?;
        jsonl::to_jsonl(&chunks)
    }

    fn clear(&mut self) {
        self.elements = None;
        self.chunks = None;
        self.error = None;
        self.state = DocumentState::Idle;
    }

    fn expect_state(&self, expected: DocumentState, action: &str) -> AppResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(AppError::Session(format!(
                "Cannot {} for '{}': document is {}, expected {}",
                action, self.file_name, self.state, expected
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkStrategy;
    use crate::extract::JsonlPartitioner;
    use crate::tests::fake::{CharTokenizer, FailingTokenizer};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn done_session(texts: &[&str]) -> DocumentSession {
        let mut session = DocumentSession::new(Path::new("paper1.pdf"), ChunkingConfig::default());
        session.start_extraction().unwrap();
        let elements = texts.iter().map(|t| StructuralElement::new(*t)).collect();
        session.finish_extraction(Ok(elements)).unwrap();
        session
    }

    #[test]
    fn test_new_session() {
        let session = DocumentSession::new(Path::new("/tmp/paper1.pdf"), ChunkingConfig::default());
        assert_eq!(session.file_name(), "paper1.pdf");
        assert_eq!(session.base_name(), "paper1");
        assert_eq!(session.state(), DocumentState::Idle);
        assert_eq!(session.element_count(), 0);
    }

    #[test]
    fn test_extract_then_chunk() {
        let mut session = done_session(&["short intro", "methods body"]);
        assert_eq!(session.state(), DocumentState::Done);
        assert_eq!(session.element_count(), 2);

        let ids: Vec<String> = session
            .chunk(&CharTokenizer)
            .unwrap()
            .iter()
            .map(|r| r.chunk_id().to_string())
            .collect();
        assert_eq!(ids, vec!["paper1-0", "paper1-1"]);
    }

    #[test]
    fn test_rechunk_with_new_settings_keeps_elements() {
        let mut session = done_session(&["abcdefghij"]);
        assert_eq!(session.chunk(&CharTokenizer).unwrap().len(), 1);

        let global = *session.config();
        session.set_config(ChunkingConfig::new(ChunkStrategy::ByTokens, 4, 2).unwrap());
        assert!(session.is_customized(&global));

        let texts: Vec<&str> = session
            .chunk(&CharTokenizer)
            .unwrap()
            .iter()
            .map(|r| r.text())
            .collect();
        assert_eq!(texts, vec!["abcd", "cdef", "efgh", "ghij", "ij"]);
        assert_eq!(session.element_count(), 1);
    }

    #[test]
    fn test_chunk_before_extraction_is_rejected() {
        let mut session = DocumentSession::new(Path::new("a.pdf"), ChunkingConfig::default());
        let err = session.chunk(&CharTokenizer).unwrap_err();
        assert!(matches!(err, AppError::Session(_)));
    }

    #[test]
    fn test_zero_elements_is_extraction_error() {
        let mut session = DocumentSession::new(Path::new("scan.pdf"), ChunkingConfig::default());
        session.start_extraction().unwrap();

        let err = session.finish_extraction(Ok(Vec::new())).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
        assert_eq!(session.state(), DocumentState::Error);
        assert!(session.error().unwrap_or_default().contains("scanned"));
        assert!(session.chunk(&CharTokenizer).is_err());
    }

    #[test]
    fn test_partitioner_failure_is_error_state() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone.jsonl");
        let mut session = DocumentSession::new(&missing, ChunkingConfig::default());

        assert!(session.extract(&JsonlPartitioner, &missing).is_err());
        assert_eq!(session.state(), DocumentState::Error);

        session.reprocess().unwrap();
        assert_eq!(session.state(), DocumentState::Idle);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_double_start_is_rejected() {
        let mut session = DocumentSession::new(Path::new("a.pdf"), ChunkingConfig::default());
        session.start_extraction().unwrap();
        assert!(matches!(session.start_extraction(), Err(AppError::Session(_))));
        assert!(matches!(session.reprocess(), Err(AppError::Session(_))));
    }

    #[test]
    fn test_reprocess_discards_results() {
        let mut session = done_session(&["text"]);
        session.chunk(&CharTokenizer).unwrap();

        session.reprocess().unwrap();
        assert_eq!(session.state(), DocumentState::Idle);
        assert!(session.elements().is_none());
        assert!(session.chunks().is_none());
    }

    #[test]
    fn test_failed_chunk_keeps_elements() {
        let mut session = done_session(&["boom"]);
        session.set_config(ChunkingConfig::default().with_strategy(ChunkStrategy::ByTokens));

        let err = session.chunk(&FailingTokenizer).unwrap_err();
        assert!(matches!(err, AppError::Encoding(_)));
        assert_eq!(session.state(), DocumentState::Done);
        assert!(session.chunks().is_none());
        assert_eq!(session.element_count(), 1);
    }

    #[test]
    fn test_take_chunked_jsonl_clears_session() {
        let mut session = done_session(&["one", "two"]);
        assert!(matches!(session.take_chunks(), Err(AppError::Session(_))));

        session.chunk(&CharTokenizer).unwrap();
        let jsonl = session.take_chunked_jsonl().unwrap();
        assert_eq!(jsonl.lines().count(), 2);
        assert!(jsonl.starts_with(r#"{"chunk_id":"paper1-0","text":"one""#));

        assert_eq!(session.state(), DocumentState::Idle);
        assert!(session.elements().is_none());
        assert!(matches!(session.take_chunks(), Err(AppError::Session(_))));
    }

    #[test]
    fn test_extracted_jsonl() {
        let session = done_session(&["alpha"]);
        let jsonl = session.extracted_jsonl().unwrap();
        assert!(jsonl.contains(r#""text":"alpha""#));

        let idle = DocumentSession::new(&PathBuf::from("b.pdf"), ChunkingConfig::default());
        assert!(idle.extracted_jsonl().is_err());
    }
}
