//! Command handlers for the paperchunk CLI.

pub mod chunk;
pub mod config;
pub mod inspect;

pub use chunk::ChunkCommand;
pub use config::ConfigCommand;
pub use inspect::InspectCommand;
