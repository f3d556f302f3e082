//! Subcommands and the collaborators they share

pub mod load;
pub mod read_card;
pub mod read_deck;
pub mod show;

use cubehub_core::errors::{ExError, ExErrorKind, Result};
use cubehub_engine::openai::OpenAiImageReader;
use cubehub_store::SqliteCubeStore;

use crate::config::{Config, ENV_OPENAI_API_KEY};

pub type CliResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Open (creating and migrating if needed) the configured database
pub fn open_store(config: &Config) -> Result<SqliteCubeStore> {
    SqliteCubeStore::open(&config.db)
}

/// OpenAI-backed image reader; `op` names the command that needs it.
///
/// Fails with `InvalidInput` when no API key is configured.
pub fn openai_reader(config: &Config, op: &str) -> Result<OpenAiImageReader> {
    let openai = config.openai.as_ref().ok_or_else(|| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op(op)
            .with_message(format!("{} is not set", ENV_OPENAI_API_KEY))
    })?;
    OpenAiImageReader::new(openai.clone())
}
