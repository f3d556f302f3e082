//! Classify a single custom card image

use clap::Args;
use cubehub_engine::commands::{
    apply_engine_command, EngineCommand, EngineCommandResult, EngineDeps,
};
use cubehub_engine::custom::LlmCustomCardReader;

use super::{openai_reader, CliResult};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ReadCardArgs {
    /// Public URL of the card image
    pub image_url: String,
}

/// Needs only the classifier; the database is never opened.
pub fn execute(args: ReadCardArgs, config: &Config) -> CliResult {
    let image_reader = openai_reader(config, "read_card")?;
    let card_reader = LlmCustomCardReader::new(&image_reader);
    let deps = EngineDeps {
        card_reader: Some(&card_reader),
        ..EngineDeps::default()
    };

    let result = apply_engine_command(
        EngineCommand::ReadCard {
            image_url: args.image_url,
        },
        &deps,
    )?;
    if let EngineCommandResult::Card(card) = result {
        println!("{}", serde_json::to_string_pretty(&card)?);
    }
    Ok(())
}
