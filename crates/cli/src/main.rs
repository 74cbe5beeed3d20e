//! paperchunk CLI
//!
//! Main entry point for the paperchunk command-line tool.
//! Turns extracted research-paper elements into retrieval-ready chunks.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ChunkCommand, ConfigCommand, InspectCommand};
use paperchunk_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;
use tracing::Instrument;

/// paperchunk - chunk extracted documents for retrieval-augmented generation
#[derive(Parser, Debug)]
#[command(name = "paperchunk")]
#[command(about = "Chunk extracted documents for retrieval-augmented generation", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ./paperchunk.yaml if present)
    #[arg(short, long, global = true, env = "PAPERCHUNK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chunk extracted documents into JSONL chunk files
    Chunk(ChunkCommand),

    /// Summarize an extracted document
    Inspect(InspectCommand),

    /// Show the effective configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Defaults, config file, then environment
    let config = AppConfig::load(cli.config.as_deref())?;

    // Apply CLI overrides
    let config = config.with_overrides(cli.log_level, cli.verbose, cli.no_color, None);

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("paperchunk starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Chunking: {:?}", config.chunking);

    let command_name = match &cli.command {
        Commands::Chunk(_) => "chunk",
        Commands::Inspect(_) => "inspect",
        Commands::Config(_) => "config",
    };
    let span = tracing::info_span!("command", name = command_name);

    let result = async {
        match cli.command {
            Commands::Chunk(cmd) => cmd.execute(&config).await,
            Commands::Inspect(cmd) => cmd.execute(&config).await,
            Commands::Config(cmd) => cmd.execute(&config).await,
        }
    }
    .instrument(span.clone())
    .await;

    let _guard = span.enter();

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
