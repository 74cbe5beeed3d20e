//! Inspect command handler.
//!
//! Summarizes an extracted-element document before it is chunked.

use clap::Args;
use paperchunk_chunking::{
    create_tokenizer, JsonlPartitioner, Partitioner, StructuralElement, Tokenizer,
};
use paperchunk_core::{config::AppConfig, AppResult};
use serde::Serialize;
use std::path::PathBuf;

const NO_SECTION: &str = "(none)";

/// Summarize an extracted document
#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Extracted-element JSONL file
    pub input: PathBuf,

    /// Tokenizer encoding used for token counts
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct SectionStats {
    name: String,
    elements: usize,
    tokens: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentStats {
    elements: usize,
    empty_elements: usize,
    first_page: Option<u32>,
    last_page: Option<u32>,
    total_tokens: usize,
    largest_element_tokens: usize,
    /// Sections in first-seen order
    sections: Vec<SectionStats>,
}

impl InspectCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing inspect command for {:?}", self.input);

        let encoding = self
            .encoding
            .as_deref()
            .unwrap_or(&config.chunking.encoding);
        let tokenizer = create_tokenizer(encoding)?;
        let elements = JsonlPartitioner.partition(&self.input)?;
        let stats = collect_stats(&elements, tokenizer.as_ref())?;

        if self.json {
            let output = serde_json::json!({
                "input": self.input,
                "encoding": tokenizer.encoding_name(),
                "stats": stats,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("Document: {}", self.input.display());
        println!(
            "Elements: {} ({} empty)",
            stats.elements, stats.empty_elements
        );
        match (stats.first_page, stats.last_page) {
            (Some(first), Some(last)) => println!("Pages: {}-{}", first, last),
            _ => println!("Pages: unknown"),
        }
        println!(
            "Tokens ({}): {} total, largest element {}",
            tokenizer.encoding_name(),
            stats.total_tokens,
            stats.largest_element_tokens
        );
        println!("Sections:");
        for section in &stats.sections {
            println!(
                "- {} ({} elements, {} tokens)",
                section.name, section.elements, section.tokens
            );
        }

        Ok(())
    }
}

fn collect_stats(
    elements: &[StructuralElement],
    tokenizer: &dyn Tokenizer,
) -> AppResult<DocumentStats> {
    let mut stats = DocumentStats {
        elements: elements.len(),
        empty_elements: 0,
        first_page: None,
        last_page: None,
        total_tokens: 0,
        largest_element_tokens: 0,
        sections: Vec::new(),
    };

    for element in elements {
        let tokens = tokenizer.count_tokens(&element.text)?;
        if element.text.is_empty() {
            stats.empty_elements += 1;
        }
        stats.total_tokens += tokens;
        stats.largest_element_tokens = stats.largest_element_tokens.max(tokens);

        if let Some(page) = element.page_number {
            stats.first_page = Some(stats.first_page.map_or(page, |p| p.min(page)));
            stats.last_page = Some(stats.last_page.map_or(page, |p| p.max(page)));
        }

        let name = element.section.as_deref().unwrap_or(NO_SECTION);
        match stats.sections.iter_mut().find(|s| s.name == name) {
            Some(section) => {
                section.elements += 1;
                section.tokens += tokens;
            }
            None => stats.sections.push(SectionStats {
                name: name.to_string(),
                elements: 1,
                tokens,
            }),
        }
    }

    Ok(stats)
}
