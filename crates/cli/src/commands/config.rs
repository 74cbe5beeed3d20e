//! Config command handler.

use clap::Args;
use paperchunk_chunking::{create_tokenizer, ChunkingConfig};
use paperchunk_core::{config::AppConfig, AppResult};

/// Show the effective configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also check that the chunking settings and encoding are usable
    #[arg(long)]
    pub check: bool,
}

impl ConfigCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing config command");

        if self.json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            print!("{}", config.to_yaml()?);
        }

        if self.check {
            let chunk_config = ChunkingConfig::from_settings(&config.chunking)?;
            let tokenizer = create_tokenizer(&config.chunking.encoding)?;
            eprintln!(
                "Chunking settings OK: {} with encoding '{}'",
                chunk_config,
                tokenizer.encoding_name()
            );
        }

        Ok(())
    }
}
