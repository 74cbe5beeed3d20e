//! Chunking strategy and validated chunking configuration.

use crate::error::{ChunkingError, Result};
use paperchunk_core::ChunkingSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Recommended default token budget per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 300;

/// Recommended default overlap between consecutive windows.
pub const DEFAULT_OVERLAP: usize = 50;

/// Chunk sizes outside this range are accepted but logged as unusual.
pub const RECOMMENDED_CHUNK_SIZE_RANGE: RangeInclusive<usize> = 50..=2000;

/// How structural elements are mapped to chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkStrategy {
    /// One chunk per element, verbatim, whatever its length
    BySection,
    /// Fixed-size token windows with overlap over every element
    ByTokens,
    /// Whole element when it fits the budget, token windows otherwise
    #[default]
    Hybrid,
}

impl ChunkStrategy {
    pub const ALL: [ChunkStrategy; 3] = [Self::BySection, Self::ByTokens, Self::Hybrid];

    /// Kebab-case name used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BySection => "by-section",
            Self::ByTokens => "by-tokens",
            Self::Hybrid => "hybrid",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BySection => "By section",
            Self::ByTokens => "By tokens (with overlap)",
            Self::Hybrid => "By section, then tokens if too long",
        }
    }
}

impl fmt::Display for ChunkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkStrategy {
    type Err = ChunkingError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(strategy) = Self::ALL
            .into_iter()
            .find(|strategy| strategy.label().eq_ignore_ascii_case(trimmed))
        {
            return Ok(strategy);
        }

        match trimmed.to_ascii_lowercase().replace('_', "-").as_str() {
            "by-section" | "section" => Ok(Self::BySection),
            "by-tokens" | "tokens" => Ok(Self::ByTokens),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(ChunkingError::configuration(format!(
                "Unknown chunking strategy: '{}'. Supported: by-section, by-tokens, hybrid",
                s
            ))),
        }
    }
}

/// Validated chunking configuration.
///
/// Holds `chunk_size >= 1` and `overlap < chunk_size`, so the window step
/// is always at least one token. The only ways to obtain a value are
/// [`ChunkingConfig::new`], the `Default` impl and deserialization, all of
/// which validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChunkingConfig", into = "RawChunkingConfig")]
pub struct ChunkingConfig {
    strategy: ChunkStrategy,
    chunk_size: usize,
    overlap: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChunkingConfig {
    #[serde(default)]
    strategy: ChunkStrategy,
    #[serde(default = "default_chunk_size")]
    chunk_size: usize,
    #[serde(default = "default_overlap")]
    overlap: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_overlap() -> usize {
    DEFAULT_OVERLAP
}

impl TryFrom<RawChunkingConfig> for ChunkingConfig {
    type Error = ChunkingError;

    fn try_from(raw: RawChunkingConfig) -> Result<Self> {
        Self::new(raw.strategy, raw.chunk_size, raw.overlap)
    }
}

impl From<ChunkingConfig> for RawChunkingConfig {
    fn from(config: ChunkingConfig) -> Self {
        Self {
            strategy: config.strategy,
            chunk_size: config.chunk_size,
            overlap: config.overlap,
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            strategy: ChunkStrategy::Hybrid,
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    /// Create a configuration, rejecting `chunk_size == 0` and
    /// `overlap >= chunk_size`.
    pub fn new(strategy: ChunkStrategy, chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ChunkingError::configuration(
                "chunk_size must be greater than 0",
            ));
        }

        if overlap >= chunk_size {
            return Err(ChunkingError::configuration(format!(
                "overlap ({}) must be less than chunk_size ({})",
                overlap, chunk_size
            )));
        }

        if !RECOMMENDED_CHUNK_SIZE_RANGE.contains(&chunk_size) {
            tracing::warn!(
                chunk_size,
                "chunk_size is outside the recommended range {}..={}",
                RECOMMENDED_CHUNK_SIZE_RANGE.start(),
                RECOMMENDED_CHUNK_SIZE_RANGE.end()
            );
        }

        Ok(Self {
            strategy,
            chunk_size,
            overlap,
        })
    }

    /// Build from the layered application settings.
    pub fn from_settings(settings: &ChunkingSettings) -> Result<Self> {
        let strategy = settings.strategy.parse()?;
        Self::new(strategy, settings.chunk_size, settings.overlap)
    }

    pub fn strategy(&self) -> ChunkStrategy {
        self.strategy
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between consecutive window starts. Always >= 1.
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Same sizes with a different strategy.
    pub fn with_strategy(self, strategy: ChunkStrategy) -> Self {
        Self { strategy, ..self }
    }
}

impl fmt::Display for ChunkingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (chunk_size={}, overlap={})",
            self.strategy, self.chunk_size, self.overlap
        )
    }
}
