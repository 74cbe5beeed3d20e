//! Line-delimited JSON reading and writing.
//!
//! Each record is one compact JSON object on its own line, written as UTF-8
//! without ASCII escaping, so output can be consumed as a stream.

use crate::types::{ChunkRecord, StructuralElement};
use paperchunk_core::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Suffix of chunked output files.
pub const CHUNKED_SUFFIX: &str = "_chunked.jsonl";

/// Parse an extracted-elements JSONL document.
pub fn parse_elements(content: &str) -> AppResult<Vec<StructuralElement>> {
    parse_lines(content)
}

/// Parse a chunked JSONL document.
pub fn parse_chunks(content: &str) -> AppResult<Vec<ChunkRecord>> {
    parse_lines(content)
}

/// Read an extracted-elements JSONL file.
pub fn read_elements(path: &Path) -> AppResult<Vec<StructuralElement>> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Extraction(format!("Failed to read {:?}: {}", path, e)))?;

    parse_elements(&content).map_err(|e| match e {
        AppError::Serialization(msg) => AppError::Serialization(format!("{:?}: {}", path, msg)),
        other => other,
    })
}

fn parse_lines<T: DeserializeOwned>(content: &str) -> AppResult<Vec<T>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| {
                AppError::Serialization(format!("line {}: {}", index + 1, e))
            })
        })
        .collect()
}

/// Serialize records one per line, joined by `\n` (no trailing newline).
pub fn to_jsonl<T: Serialize>(records: &[T]) -> AppResult<String> {
    let lines = records
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// Stream records to `writer`, one per line, each newline-terminated.
pub fn write_jsonl<W: Write, T: Serialize>(mut writer: W, records: &[T]) -> AppResult<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Document base name: the file name without its extension.
pub fn document_base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Output file name for a document's chunks.
pub fn chunked_file_name(base_name: &str) -> String {
    format!("{}{}", base_name, CHUNKED_SUFFIX)
}

/// Whether `path` looks like an extracted-elements file (and not an output).
pub fn is_element_file(path: &Path) -> bool {
    let is_jsonl = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("jsonl"))
        .unwrap_or(false);
    let is_output = path
        .file_name()
        .map(|name| name.to_string_lossy().ends_with(CHUNKED_SUFFIX))
        .unwrap_or(false);
    is_jsonl && !is_output
}
