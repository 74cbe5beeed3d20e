//! Chunk command handler.
//!
//! Chunks extracted-element JSONL documents into `{base}_chunked.jsonl`.

use clap::Args;
use futures::future::join_all;
use paperchunk_chunking::jsonl;
use paperchunk_chunking::{
    create_tokenizer, ChunkRecord, ChunkingConfig, DocumentSession, JsonlPartitioner,
    ProgressEvent, ProgressReporter, Tokenizer,
};
use paperchunk_core::{config::AppConfig, AppError, AppResult};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Chunk extracted documents for retrieval
#[derive(Args, Debug)]
pub struct ChunkCommand {
    /// Extracted-element JSONL files, or directories containing them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Chunking strategy (by-section, by-tokens, hybrid)
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Token budget per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Tokens shared by consecutive windows of one element
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Tokenizer encoding (e.g., cl100k_base)
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Directory for chunked files (default: next to each input)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print the first N chunks of each document
    #[arg(long, value_name = "N")]
    pub preview: Option<usize>,

    /// Stream chunks to stdout instead of writing files
    #[arg(long, conflicts_with = "output_dir")]
    pub stdout: bool,

    /// Output a JSON summary
    #[arg(long, conflicts_with = "stdout")]
    pub json: bool,
}

/// Outcome for one document of a batch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentSummary {
    input: PathBuf,
    chunks: usize,
    output: Option<PathBuf>,
    error: Option<String>,
}

struct ChunkedDocument {
    path: PathBuf,
    base_name: String,
    chunks: Vec<ChunkRecord>,
}

impl ChunkCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chunk command");
        tracing::debug!("Chunk options: {:?}", self);

        // Settings are validated before any document is touched
        let settings = config.chunking.clone().with_overrides(
            self.strategy.clone(),
            self.chunk_size,
            self.overlap,
            self.encoding.clone(),
        );
        let chunk_config = ChunkingConfig::from_settings(&settings)?;
        let tokenizer = create_tokenizer(&settings.encoding)?;
        let output_dir = self.output_dir.clone().or_else(|| config.output_dir.clone());

        tracing::info!(
            "Chunking with {} using encoding '{}'",
            chunk_config,
            tokenizer.encoding_name()
        );

        let documents = discover_documents(&self.inputs)?;
        if documents.is_empty() {
            return Err(AppError::Extraction(
                "No extracted-element JSONL files found in the given inputs".to_string(),
            ));
        }
        if !self.stdout {
            check_destinations(&documents, output_dir.as_deref())?;
        }

        let mut reporter = if self.json {
            ProgressReporter::noop()
        } else {
            ProgressReporter::new(Arc::new(|event: ProgressEvent| {
                eprintln!("{}", event.format_simple())
            }))
        };
        reporter.discovered(documents.len() as u64, &display_inputs(&self.inputs));

        let tasks = documents.iter().cloned().map(|path| {
            let tokenizer = Arc::clone(&tokenizer);
            let reporter = reporter.clone();
            tokio::task::spawn_blocking(move || {
                chunk_document(path, chunk_config, tokenizer.as_ref(), &reporter)
            })
        });
        let results = join_all(tasks).await;

        // Emit in input order regardless of completion order
        let mut summaries = Vec::with_capacity(results.len());
        for (path, joined) in documents.into_iter().zip(results) {
            let outcome = joined
                .map_err(|e| AppError::Other(format!("Worker for {:?} failed: {}", path, e)))
                .and_then(|result| result)
                .and_then(|document| self.emit(document, output_dir.as_deref(), &reporter));

            let summary = match outcome {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::error!("Failed to chunk {:?}: {}", path, e);
                    if !self.json {
                        eprintln!("Error: {}: {}", path.display(), e);
                    }
                    DocumentSummary {
                        input: path,
                        chunks: 0,
                        output: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            summaries.push(summary);
        }

        let failed = summaries.iter().filter(|s| s.error.is_some()).count();
        let total_chunks: usize = summaries.iter().map(|s| s.chunks).sum();

        if self.json {
            let output = serde_json::json!({
                "strategy": chunk_config.strategy().as_str(),
                "chunkSize": chunk_config.chunk_size(),
                "overlap": chunk_config.overlap(),
                "encoding": tokenizer.encoding_name(),
                "documents": summaries,
                "totalChunks": total_chunks,
                "failed": failed,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            let line = format!(
                "Chunked {} of {} documents into {} chunks ({})",
                summaries.len() - failed,
                summaries.len(),
                total_chunks,
                chunk_config
            );
            if self.stdout {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }

        if failed > 0 {
            return Err(AppError::Chunking(format!(
                "{} of {} documents failed",
                failed,
                summaries.len()
            )));
        }

        Ok(())
    }

    /// Write (or stream) one document's chunks.
    fn emit(
        &self,
        document: ChunkedDocument,
        output_dir: Option<&Path>,
        reporter: &ProgressReporter,
    ) -> AppResult<DocumentSummary> {
        if let Some(count) = self.preview.filter(|_| !self.json) {
            let preview = format_preview(&document, count)?;
            if self.stdout {
                eprint!("{}", preview);
            } else {
                print!("{}", preview);
            }
        }

        let output = if self.stdout {
            jsonl::write_jsonl(io::stdout().lock(), &document.chunks)?;
            None
        } else {
            if let Some(dir) = output_dir {
                fs::create_dir_all(dir)?;
            }
            let destination = output_path(&document.path, output_dir);
            let file = File::create(&destination)?;
            jsonl::write_jsonl(BufWriter::new(file), &document.chunks)?;

            tracing::info!(
                "Wrote {} chunks to {:?}",
                document.chunks.len(),
                destination
            );
            reporter.written(&destination.display().to_string());
            Some(destination)
        };

        Ok(DocumentSummary {
            input: document.path,
            chunks: document.chunks.len(),
            output,
            error: None,
        })
    }
}

/// Extract and chunk one document on a blocking worker.
fn chunk_document(
    path: PathBuf,
    config: ChunkingConfig,
    tokenizer: &dyn Tokenizer,
    reporter: &ProgressReporter,
) -> AppResult<ChunkedDocument> {
    let mut session = DocumentSession::new(&path, config);

    let elements = session.extract(&JsonlPartitioner, &path)?;
    reporter.extracted(session.file_name(), elements);

    let count = session.chunk(tokenizer)?.len();
    reporter.chunked(session.file_name(), count);

    let base_name = session.base_name().to_string();
    let chunks = session.take_chunks()?;

    Ok(ChunkedDocument {
        path,
        base_name,
        chunks,
    })
}

/// Expand inputs into document paths. Directories are walked for element
/// files in file-name order; explicit files are taken as given.
fn discover_documents(inputs: &[PathBuf]) -> AppResult<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for input in inputs {
        if input.is_file() {
            documents.push(input.clone());
        } else if input.is_dir() {
            let before = documents.len();
            documents.extend(
                WalkDir::new(input)
                    .follow_links(false)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|entry| match entry {
                        Ok(entry) => Some(entry),
                        Err(e) => {
                            tracing::warn!("Skipping unreadable entry under {:?}: {}", input, e);
                            None
                        }
                    })
                    .filter(|e| e.file_type().is_file() && jsonl::is_element_file(e.path()))
                    .map(|e| e.into_path()),
            );
            tracing::debug!(
                "Found {} documents under {:?}",
                documents.len() - before,
                input
            );
        } else {
            return Err(AppError::Config(format!(
                "Input path does not exist: {:?}",
                input
            )));
        }
    }

    Ok(documents)
}

/// Where a document's chunks are written.
fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(jsonl::chunked_file_name(&jsonl::document_base_name(input)))
}

/// Reject batches in which two documents would write the same output file.
fn check_destinations(documents: &[PathBuf], output_dir: Option<&Path>) -> AppResult<()> {
    let mut seen: HashMap<PathBuf, &PathBuf> = HashMap::new();
    for document in documents {
        let destination = output_path(document, output_dir);
        if let Some(previous) = seen.insert(destination.clone(), document) {
            return Err(AppError::Config(format!(
                "{:?} and {:?} would both be written to {:?}",
                previous, document, destination
            )));
        }
    }
    Ok(())
}

fn display_inputs(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_preview(document: &ChunkedDocument, count: usize) -> AppResult<String> {
    let shown = count.min(document.chunks.len());
    let mut out = format!(
        "--- {} (first {} of {} chunks) ---\n",
        document.base_name,
        shown,
        document.chunks.len()
    );
    for record in document.chunks.iter().take(count) {
        out.push_str(&serde_json::to_string_pretty(record)?);
        out.push('\n');
    }
    Ok(out)
}
