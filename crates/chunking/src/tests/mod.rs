//! Engine-level tests across strategies.


use crate::config::{ChunkStrategy, ChunkingConfig};
use crate::engine::{chunk, Chunker};
use crate::error::ChunkingError;
use crate::types::{ChunkRecord, Metadata, StructuralElement};
use fake::{CharTokenizer, FailingTokenizer};
use serde_json::json;
use std::sync::Arc;

fn config(strategy: ChunkStrategy, size: usize, overlap: usize) -> ChunkingConfig {
    ChunkingConfig::new(strategy, size, overlap).unwrap()
}

/// Element whose text is exactly `tokens` characters long.
fn element_of(tokens: usize, section: &str) -> StructuralElement {
    let text: String = (0..tokens)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect();
    StructuralElement::new(text).with_section(section)
}

fn ids(records: &[ChunkRecord]) -> Vec<&str> {
    records.iter().map(ChunkRecord::chunk_id).collect()
}

fn sample_elements() -> Vec<StructuralElement> {
    let mut metadata = Metadata::new();
    metadata.insert("filename".to_string(), json!("paper1.pdf"));
    metadata.insert("coordinates".to_string(), json!({"x": 1, "y": 2}));

    vec![
        element_of(40, "Abstract").with_page(1),
        element_of(700, "Methods")
            .with_page(3)
            .with_metadata(metadata),
        StructuralElement::new(""),
        element_of(120, "Results").with_page(5),
    ]
}

#[test]
fn test_end_to_end_hybrid_example() {
    let elements = vec![element_of(10, "Introduction"), element_of(620, "Methods")];
    let records = chunk(
        &elements,
        &config(ChunkStrategy::Hybrid, 300, 50),
        "paper1",
        &CharTokenizer,
    )
    .unwrap();

    assert_eq!(ids(&records), vec!["paper1-0", "paper1-1", "paper1-2", "paper1-3"]);
    assert_eq!(records[0].section(), Some("Introduction"));
    assert_eq!(records[0].text(), elements[0].text);

    let methods = &elements[1].text;
    assert_eq!(records[1].text(), &methods[0..300]);
    assert_eq!(records[2].text(), &methods[250..550]);
    assert_eq!(records[3].text(), &methods[500..620]);
    for record in &records[1..] {
        assert_eq!(record.section(), Some("Methods"));
    }
}

#[test]
fn test_empty_input_for_every_strategy() {
    for strategy in ChunkStrategy::ALL {
        let records = chunk(&[], &config(strategy, 300, 50), "doc", &CharTokenizer).unwrap();
        assert!(records.is_empty(), "{} produced output", strategy);
    }
}

#[test]
fn test_determinism() {
    let elements = sample_elements();
    for strategy in ChunkStrategy::ALL {
        let config = config(strategy, 100, 30);
        let first = chunk(&elements, &config, "paper", &CharTokenizer).unwrap();
        let second = chunk(&elements, &config, "paper", &CharTokenizer).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_ids_unique_and_increasing() {
    let elements = sample_elements();
    for strategy in ChunkStrategy::ALL {
        let records = chunk(&elements, &config(strategy, 100, 30), "my-paper", &CharTokenizer).unwrap();
        let sequence: Vec<usize> = records.iter().filter_map(ChunkRecord::sequence).collect();
        let expected: Vec<usize> = (0..records.len()).collect();
        assert_eq!(sequence, expected, "{}", strategy);
        assert!(records.iter().all(|r| r.chunk_id().starts_with("my-paper-")));
    }
}

#[test]
fn test_by_section_cardinality() {
    let elements = sample_elements();
    let records = chunk(
        &elements,
        &config(ChunkStrategy::BySection, 50, 10),
        "paper",
        &CharTokenizer,
    )
    .unwrap();

    // Long and empty elements alike map to exactly one chunk each
    assert_eq!(records.len(), elements.len());
    for (record, element) in records.iter().zip(&elements) {
        assert_eq!(record.text(), element.text);
        assert_eq!(record.section(), element.section.as_deref());
        assert_eq!(record.page_number(), element.page_number);
    }
}

#[test]
fn test_by_section_needs_no_encoding() {
    let elements = vec![StructuralElement::new("boom goes the dynamite")];
    let records = chunk(
        &elements,
        &config(ChunkStrategy::BySection, 50, 10),
        "paper",
        &FailingTokenizer,
    )
    .unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_by_tokens_progress_boundaries() {
    let cfg = config(ChunkStrategy::ByTokens, 300, 50);

    let exact = chunk(&[element_of(300, "S")], &cfg, "d", &CharTokenizer).unwrap();
    assert_eq!(exact.len(), 1);

    let one_more = chunk(&[element_of(301, "S")], &cfg, "d", &CharTokenizer).unwrap();
    assert_eq!(one_more.len(), 2);
    assert_eq!(one_more[1].text().len(), 51);
}

#[test]
fn test_by_tokens_coverage() {
    let element = element_of(1000, "Discussion");
    let records = chunk(
        std::slice::from_ref(&element),
        &config(ChunkStrategy::ByTokens, 300, 50),
        "d",
        &CharTokenizer,
    )
    .unwrap();

    // Starts at 0, 250, 500, 750; the last window ends at N
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].text(), &element.text[..300]);
    assert_eq!(records[3].text(), &element.text[750..]);

    // Stitching windows minus their overlap rebuilds the element
    let mut rebuilt = records[0].text().to_string();
    for record in &records[1..] {
        rebuilt.push_str(&record.text()[50..]);
    }
    assert_eq!(rebuilt, element.text);
}

#[test]
fn test_by_tokens_skips_empty_elements() {
    let elements = vec![
        StructuralElement::new(""),
        element_of(5, "A"),
        StructuralElement::new(""),
    ];
    let records = chunk(
        &elements,
        &config(ChunkStrategy::ByTokens, 300, 50),
        "d",
        &CharTokenizer,
    )
    .unwrap();

    assert_eq!(ids(&records), vec!["d-0"]);
    assert_eq!(records[0].section(), Some("A"));
}

#[test]
fn test_by_tokens_keeps_short_tail_window() {
    let element = element_of(550, "Methods");
    let records = chunk(
        std::slice::from_ref(&element),
        &config(ChunkStrategy::ByTokens, 300, 50),
        "d",
        &CharTokenizer,
    )
    .unwrap();

    assert_eq!(ids(&records), vec!["d-0", "d-1", "d-2"]);
    assert_eq!(records[1].text(), &element.text[250..550]);
    assert_eq!(records[2].text(), &element.text[500..]);
}

#[test]
fn test_hybrid_keeps_empty_elements() {
    let elements = vec![
        StructuralElement::new("").with_section("Introduction"),
        element_of(5, "A"),
    ];
    let records = chunk(
        &elements,
        &config(ChunkStrategy::Hybrid, 300, 50),
        "d",
        &CharTokenizer,
    )
    .unwrap();

    assert_eq!(ids(&records), vec!["d-0", "d-1"]);
    assert_eq!(records[0].text(), "");
    assert_eq!(records[0].section(), Some("Introduction"));
}

#[test]
fn test_by_tokens_zero_overlap_boundary() {
    let records = chunk(
        &[element_of(600, "S")],
        &config(ChunkStrategy::ByTokens, 300, 0),
        "d",
        &CharTokenizer,
    )
    .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.text().len() == 300));
}

#[test]
fn test_hybrid_fallback_boundary() {
    let cfg = config(ChunkStrategy::Hybrid, 300, 50);

    let fits = chunk(&[element_of(300, "S")], &cfg, "d", &CharTokenizer).unwrap();
    assert_eq!(fits.len(), 1);

    let overflows = chunk(&[element_of(301, "S")], &cfg, "d", &CharTokenizer).unwrap();
    assert!(overflows.len() >= 2);
}

#[test]
fn test_sub_chunks_inherit_provenance() {
    let elements = sample_elements();
    let records = chunk(
        &elements,
        &config(ChunkStrategy::Hybrid, 300, 50),
        "paper1",
        &CharTokenizer,
    )
    .unwrap();

    let methods: Vec<&ChunkRecord> = records
        .iter()
        .filter(|r| r.section() == Some("Methods"))
        .collect();
    assert_eq!(methods.len(), 3);
    for record in methods {
        assert_eq!(record.page_number(), Some(3));
        assert_eq!(record.metadata(), &elements[1].metadata);
        let keys: Vec<&String> = record.metadata().keys().collect();
        assert_eq!(keys, vec!["filename", "coordinates"]);
    }
}

#[test]
fn test_tokenizer_error_aborts_whole_call() {
    let elements = vec![
        element_of(10, "A"),
        element_of(10, "B"),
        StructuralElement::new("boom").with_section("C"),
    ];

    for strategy in [ChunkStrategy::ByTokens, ChunkStrategy::Hybrid] {
        let result = chunk(&elements, &config(strategy, 300, 50), "d", &FailingTokenizer);
        assert!(matches!(result, Err(ChunkingError::Encoding(_))), "{}", strategy);
    }
}

#[test]
fn test_base_name_used_verbatim() {
    let records = chunk(
        &[element_of(3, "S")],
        &ChunkingConfig::default(),
        "2024 Smith et al. (final)",
        &CharTokenizer,
    )
    .unwrap();
    assert_eq!(records[0].chunk_id(), "2024 Smith et al. (final)-0");
}

#[test]
fn test_concurrent_invocations_are_independent() {
    let elements = sample_elements();
    let cfg = config(ChunkStrategy::ByTokens, 64, 16);
    let expected = chunk(&elements, &cfg, "doc", &CharTokenizer).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| chunk(&elements, &cfg, "doc", &CharTokenizer).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_chunker_matches_free_function() {
    let elements = sample_elements();
    let cfg = config(ChunkStrategy::Hybrid, 100, 20);
    let chunker = Chunker::new(cfg, Arc::new(CharTokenizer));

    assert_eq!(chunker.config(), &cfg);
    assert_eq!(
        chunker.chunk(&elements, "paper").unwrap(),
        chunk(&elements, &cfg, "paper", &CharTokenizer).unwrap()
    );
}
