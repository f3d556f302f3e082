//! Deck recognition from a photo of the cards

#![allow(clippy::result_large_err)]

use std::collections::{BTreeSet, HashMap};

use cubehub_core::errors::{ExError, ExErrorKind, Result};
use cubehub_core::image_reader::{ImageReader, ImageRequest, ImageSource, ToolSchema};
use cubehub_core::loaders::DeckReader;
use cubehub_core::model::{Card, Deck};
use cubehub_core::storage::CubeStorage;
use serde::Deserialize;
use serde_json::json;

pub const DECK_TOOL_NAME: &str = "deck";

#[derive(Debug, Deserialize)]
struct DeckArguments {
    #[serde(default)]
    card_names: Vec<String>,
}

fn deck_prompt(names: &BTreeSet<&str>) -> String {
    let list: Vec<String> = names.iter().map(|name| format!("* {}", name)).collect();
    format!(
        "The image shows the cards of one cube draft deck. Name every card you can see.\n\
         Every card comes from the list below; some are custom cards that do not exist\n\
         outside this cube. Cards may be rotated or partly covered by glare.\n\
         Each returned name must match a name from the list exactly. Return every card\n\
         you can identify by calling the provided tool.\n\n## Card List\n{}\n",
        list.join("\n")
    )
}

fn deck_tool_schema() -> ToolSchema {
    ToolSchema {
        name: DECK_TOOL_NAME.to_string(),
        description: "The names of the cards in a deck.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "card_names": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["card_names"],
            "additionalProperties": false
        }),
    }
}

/// [`DeckReader`] that asks an image classifier for the names of cards drawn
/// from the deck's cube version
pub struct LlmDeckReader<'a> {
    storage: &'a dyn CubeStorage,
    image_reader: &'a dyn ImageReader,
}

impl<'a> LlmDeckReader<'a> {
    pub fn new(storage: &'a dyn CubeStorage, image_reader: &'a dyn ImageReader) -> Self {
        Self {
            storage,
            image_reader,
        }
    }
}

impl DeckReader for LlmDeckReader<'_> {
    fn read_deck(&self, deck: &mut Deck, image: &ImageSource) -> Result<()> {
        let cube = self
            .storage
            .get_cube(&deck.cube_id, Some(deck.version_number))
            .map_err(|e| ExError::wrap("get_cube", e))?
            .ok_or_else(|| {
                ExError::new(ExErrorKind::NotFound)
                    .with_op("read_deck")
                    .with_entity_id(deck.cube_id.as_str())
                    .with_message(format!("Cube version {} not stored", deck.version_number))
            })?;

        let by_name: HashMap<&str, &Card> =
            cube.cards.iter().map(|c| (c.name.as_str(), c)).collect();
        let names: BTreeSet<&str> = by_name.keys().copied().collect();

        let request = ImageRequest {
            prompt: deck_prompt(&names),
            image: image.clone(),
            schema: deck_tool_schema(),
        };
        let arguments = self
            .image_reader
            .generate(&request)
            .map_err(|e| ExError::wrap("generate", e))?;
        let parsed: DeckArguments = serde_json::from_str(&arguments).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("read_deck")
                .with_entity_id(deck.id.as_str())
                .with_message(e.to_string())
        })?;

        for name in &parsed.card_names {
            match by_name.get(name.as_str()) {
                Some(card) => deck.cards.push((*card).clone()),
                None => tracing::warn!(deck_id = %deck.id, name = %name, "Ignoring card not in cube"),
            }
        }
        Ok(())
    }
}
