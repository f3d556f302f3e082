//! Recognise a player's deck in a photo and record it

use std::path::Path;

use clap::Args;
use cubehub_core::errors::{ExError, ExErrorKind, Result};
use cubehub_core::image_reader::ImageSource;
use cubehub_core::model::Player;
use cubehub_engine::commands::{
    apply_engine_command, EngineCommand, EngineCommandResult, EngineDeps,
};
use cubehub_engine::deck::LlmDeckReader;

use super::{open_store, openai_reader, CliResult};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ReadDeckArgs {
    pub cube_id: String,

    /// Photo of the deck: an http(s) URL or a local PNG file
    pub image: String,

    /// Cube version the deck was drafted from; defaults to the latest
    #[arg(long)]
    pub version: Option<u32>,

    #[arg(long)]
    pub player_id: String,

    /// Display name; defaults to the player id
    #[arg(long)]
    pub player_name: Option<String>,

    #[arg(long, default_value = "")]
    pub description: String,
}

fn image_source(image: &str) -> Result<ImageSource> {
    if image.starts_with("http://") || image.starts_with("https://") {
        return Ok(ImageSource::Url(image.to_string()));
    }
    std::fs::read(Path::new(image))
        .map(ImageSource::Bytes)
        .map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("read_deck")
                .with_entity_id(image)
                .with_message(format!("Cannot read deck image: {}", e))
        })
}

pub fn execute(args: ReadDeckArgs, config: &Config) -> CliResult {
    let image = image_source(&args.image)?;
    let image_reader = openai_reader(config, "read_deck")?;
    let store = open_store(config)?;
    let deck_reader = LlmDeckReader::new(&store, &image_reader);
    let deps = EngineDeps {
        storage: Some(&store),
        deck_reader: Some(&deck_reader),
        ..EngineDeps::default()
    };

    let player = Player {
        name: args.player_name.unwrap_or_else(|| args.player_id.clone()),
        id: args.player_id,
    };
    let result = apply_engine_command(
        EngineCommand::ReadDeck {
            cube_id: args.cube_id,
            version: args.version,
            image,
            player,
            description: args.description,
        },
        &deps,
    )?;

    if let EngineCommandResult::Deck(deck) = result {
        println!(
            "Deck {} ({} v{}, {} cards)",
            deck.id,
            deck.cube_id,
            deck.version_number,
            deck.cards.len()
        );
        for card in &deck.cards {
            println!("  {}", card.name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_passed_through() {
        assert_eq!(
            image_source("https://img/deck.jpg").unwrap(),
            ImageSource::Url("https://img/deck.jpg".to_string())
        );
    }

    #[test]
    fn test_local_file_is_read_as_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.png");
        std::fs::write(&path, [0x89, 0x50, 0x4e, 0x47]).unwrap();

        let source = image_source(path.to_str().unwrap()).unwrap();

        assert_eq!(source, ImageSource::Bytes(vec![0x89, 0x50, 0x4e, 0x47]));
    }

    #[test]
    fn test_missing_file_is_invalid_input() {
        let err = image_source("/nonexistent/deck.png").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }
}
