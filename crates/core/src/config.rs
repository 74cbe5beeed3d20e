//! Configuration management for paperchunk.
//!
//! This module handles loading and merging configuration from multiple sources,
//! lowest precedence first:
//! - Built-in defaults
//! - Config file (`--config`, `PAPERCHUNK_CONFIG`, or `./paperchunk.yaml`)
//! - Environment variables
//! - Command-line flags
//!
//! Chunking settings are kept as plain values here; the chunking crate turns
//! them into a validated configuration before any document is processed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default config file name looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "paperchunk.yaml";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Directory for chunked output files (defaults to next to the input)
    pub output_dir: Option<PathBuf>,

    /// Global chunking settings
    pub chunking: ChunkingSettings,
}

/// Global chunking settings, applied to every document unless overridden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkingSettings {
    /// Strategy name: "by-section", "by-tokens" or "hybrid"
    pub strategy: String,

    /// Token budget per chunk
    pub chunk_size: usize,

    /// Tokens shared by consecutive windows of one element
    pub overlap: usize,

    /// Tokenizer encoding name
    pub encoding: String,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            strategy: "hybrid".to_string(),
            chunk_size: 300,
            overlap: 50,
            encoding: "cl100k_base".to_string(),
        }
    }
}

impl ChunkingSettings {
    /// Apply per-invocation overrides, keeping current values for `None`.
    pub fn with_overrides(
        mut self,
        strategy: Option<String>,
        chunk_size: Option<usize>,
        overlap: Option<usize>,
        encoding: Option<String>,
    ) -> Self {
        if let Some(strategy) = strategy {
            self.strategy = strategy;
        }
        if let Some(chunk_size) = chunk_size {
            self.chunk_size = chunk_size;
        }
        if let Some(overlap) = overlap {
            self.overlap = overlap;
        }
        if let Some(encoding) = encoding {
            self.encoding = encoding;
        }
        self
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    chunking: Option<ChunkingSection>,
    logging: Option<LoggingSection>,
    output: Option<OutputSection>,
}

/// Section keys are checked strictly so a misspelt key fails the load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ChunkingSection {
    strategy: Option<String>,
    #[serde(alias = "chunk_size")]
    chunk_size: Option<usize>,
    overlap: Option<usize>,
    encoding: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            output_dir: None,
            chunking: ChunkingSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, config file and environment variables.
    ///
    /// The config file is `config_file` if given, else `PAPERCHUNK_CONFIG`,
    /// else `./paperchunk.yaml` when it exists. An explicitly named file that
    /// does not exist is an error.
    ///
    /// Environment variables:
    /// - `PAPERCHUNK_CONFIG`: Path to config file
    /// - `PAPERCHUNK_STRATEGY`: Chunking strategy
    /// - `PAPERCHUNK_CHUNK_SIZE`: Chunk size in tokens
    /// - `PAPERCHUNK_OVERLAP`: Overlap in tokens
    /// - `PAPERCHUNK_ENCODING`: Tokenizer encoding
    /// - `PAPERCHUNK_OUTPUT_DIR`: Output directory
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use paperchunk_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Strategy: {}", config.chunking.strategy);
    /// ```
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let explicit = config_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("PAPERCHUNK_CONFIG").map(PathBuf::from));

        let config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                Self::default().merge_yaml(&path)?
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::default().merge_yaml(&path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|e| {
                AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
            })?
        };

        let mut result = self.clone();
        result.config_file = Some(path.to_path_buf());

        if let Some(chunking) = config_file.chunking {
            result.chunking = result.chunking.with_overrides(
                chunking.strategy,
                chunking.chunk_size,
                chunking.overlap,
                chunking.encoding,
            );
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(output) = config_file.output {
            if let Some(dir) = output.dir {
                result.output_dir = Some(PathBuf::from(dir));
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply environment variable overrides read through `lookup`.
    fn apply_env<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chunk_size = lookup("PAPERCHUNK_CHUNK_SIZE")
            .map(|v| parse_usize("PAPERCHUNK_CHUNK_SIZE", &v))
            .transpose()?;
        let overlap = lookup("PAPERCHUNK_OVERLAP")
            .map(|v| parse_usize("PAPERCHUNK_OVERLAP", &v))
            .transpose()?;

        self.chunking = self.chunking.with_overrides(
            lookup("PAPERCHUNK_STRATEGY"),
            chunk_size,
            overlap,
            lookup("PAPERCHUNK_ENCODING"),
        );

        if let Some(dir) = lookup("PAPERCHUNK_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(dir));
        }

        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = Some(level);
        }

        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }

        Ok(self)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the config file and
    /// environment variables.
    pub fn with_overrides(
        mut self,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        output_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if let Some(output_dir) = output_dir {
            self.output_dir = Some(output_dir);
        }

        self
    }

    /// Render the effective configuration as YAML.
    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn parse_usize(key: &str, value: &str) -> AppResult<usize> {
    value.trim().parse::<usize>().map_err(|e| {
        AppError::Config(format!(
            "Invalid value for {}: {:?} ({})",
            key, value, e
        ))
    })
}
