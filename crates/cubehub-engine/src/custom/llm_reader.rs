//! Custom card classification through an [`ImageReader`]

#![allow(clippy::result_large_err)]

use cubehub_core::errors::{CardConversionError, ExError, Result};
use cubehub_core::image_reader::{ImageReader, ImageRequest, ImageSource, ToolSchema};
use cubehub_core::loaders::CustomCardReader;
use cubehub_core::model::{Card, Color};
use cubehub_core::type_line::{parse_type_line, release_date_or_today};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const CARD_TOOL_NAME: &str = "card";

const CARD_PROMPT: &str = r#"Read the custom Magic: The Gathering card in the image and fill in the card schema.
Leave the id out. Use "custom" as the set; the release date may be any date.

## Colors

List every color the card belongs to using these codes:
* White: "W"
* Blue: "U"
* Black: "B"
* Red: "R"
* Green: "G"

## Mana cost

Write the mana cost as a sequence of curly-brace symbols with nothing between them,
in the order printed on the card. For example:
* {2}{U} is two generic and one blue
* {X}{R} is a variable amount and one red
* {1}{W/U}{W/U} uses hybrid symbols
Valid symbols are {W} {U} {B} {R} {G}, colorless {C}, generic numbers like {0} or {12},
{X}, snow {S}, hybrid such as {W/U} or {2/R} and Phyrexian such as {G/P}.

## Stats

Power, toughness, loyalty and defense are integers. Use null when the card does not print
the value or prints a placeholder such as "*"."#;

/// Tool-call arguments the classifier fills in for a custom card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedCard {
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: String,
    #[serde(default)]
    pub power: Option<i32>,
    #[serde(default)]
    pub toughness: Option<i32>,
    #[serde(default)]
    pub loyalty: Option<i32>,
    #[serde(default)]
    pub defense: Option<i32>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub released_at: String,
}

impl ClassifiedCard {
    /// Convert to a card with an empty id; an unreadable release date becomes today
    pub fn to_card(&self) -> Card {
        let type_line = parse_type_line(&self.type_line);
        let (colors, unknown) = Color::parse_all(&self.colors);
        if !unknown.is_empty() {
            tracing::warn!(name = %self.name, ?unknown, "Dropping unknown color codes");
        }
        Card {
            id: String::new(),
            name: self.name.clone(),
            mana_cost: self.mana_cost.clone().filter(|cost| !cost.is_empty()),
            mana_value: self.cmc.trunc() as i32,
            card_type: type_line.card_type,
            super_types: type_line.super_types,
            sub_types: type_line.sub_types,
            text_box: self.oracle_text.clone(),
            power: self.power,
            toughness: self.toughness,
            loyalty: self.loyalty,
            defense: self.defense,
            colors,
            set: self.set.clone(),
            release_date: release_date_or_today(&self.released_at),
            image_uri: None,
        }
    }
}

/// Strict JSON schema for [`ClassifiedCard`]
pub fn card_tool_schema() -> ToolSchema {
    let nullable_int = json!({"type": ["integer", "null"]});
    ToolSchema {
        name: CARD_TOOL_NAME.to_string(),
        description: "A custom magic the gathering card.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "mana_cost": {"type": ["string", "null"]},
                "cmc": {"type": "number"},
                "type_line": {"type": "string"},
                "oracle_text": {"type": "string"},
                "power": nullable_int,
                "toughness": nullable_int,
                "loyalty": nullable_int,
                "defense": nullable_int,
                "colors": {
                    "type": "array",
                    "items": {"type": "string", "enum": ["W", "U", "B", "R", "G"]}
                },
                "set": {"type": "string"},
                "released_at": {"type": "string"}
            },
            "required": [
                "name", "mana_cost", "cmc", "type_line", "oracle_text", "power",
                "toughness", "loyalty", "defense", "colors", "set", "released_at"
            ],
            "additionalProperties": false
        }),
    }
}

/// [`CustomCardReader`] backed by an image classifier
pub struct LlmCustomCardReader<'a> {
    image_reader: &'a dyn ImageReader,
}

impl<'a> LlmCustomCardReader<'a> {
    pub fn new(image_reader: &'a dyn ImageReader) -> Self {
        Self { image_reader }
    }
}

impl CustomCardReader for LlmCustomCardReader<'_> {
    fn read_card(&self, image_url: &str) -> Result<Card> {
        let request = ImageRequest {
            prompt: CARD_PROMPT.to_string(),
            image: ImageSource::Url(image_url.to_string()),
            schema: card_tool_schema(),
        };
        let arguments = self
            .image_reader
            .generate(&request)
            .map_err(|e| ExError::wrap("generate", e))?;
        let classified: ClassifiedCard = serde_json::from_str(&arguments).map_err(|e| {
            ExError::from(CardConversionError::from(e)).with_entity_id(image_url)
        })?;
        Ok(classified.to_card())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cubehub_core::errors::ExErrorKind;
    use std::cell::RefCell;

    struct CannedReader {
        response: std::result::Result<String, ExError>,
        seen: RefCell<Vec<ImageRequest>>,
    }

    impl ImageReader for CannedReader {
        fn generate(&self, request: &ImageRequest) -> Result<String> {
            self.seen.borrow_mut().push(request.clone());
            self.response.clone()
        }
    }

    fn canned(response: std::result::Result<String, ExError>) -> CannedReader {
        CannedReader {
            response,
            seen: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_read_card_converts_arguments() {
        let reader = canned(Ok(json!({
            "name": "Goblin Tinkerer",
            "mana_cost": "{1}{R}",
            "cmc": 2,
            "type_line": "Creature — Goblin Artificer",
            "oracle_text": "Haste",
            "power": 2,
            "toughness": 1,
            "loyalty": null,
            "defense": null,
            "colors": ["R", "X"],
            "set": "custom",
            "released_at": "whenever"
        })
        .to_string()));

        let card = LlmCustomCardReader::new(&reader)
            .read_card("https://img/goblin.png")
            .unwrap();

        assert_eq!(card.id, "");
        assert_eq!(card.name, "Goblin Tinkerer");
        assert_eq!(card.sub_types, vec!["Goblin", "Artificer"]);
        assert_eq!(card.colors, vec![Color::Red]);
        assert_eq!(card.power, Some(2));
        assert_eq!(card.loyalty, None);
        assert_eq!(card.release_date, Utc::now().date_naive());

        let seen = reader.seen.borrow();
        assert_eq!(seen[0].schema.name, CARD_TOOL_NAME);
        assert_eq!(
            seen[0].image,
            ImageSource::Url("https://img/goblin.png".to_string())
        );
    }

    #[test]
    fn test_garbage_arguments_are_malformed_payload() {
        let reader = canned(Ok("not json".to_string()));
        let err = LlmCustomCardReader::new(&reader)
            .read_card("https://img/x.png")
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::CardConversion);
        assert_eq!(err.op(), Some("to_card"));
        assert_eq!(err.entity_id(), Some("https://img/x.png"));
        assert!(err.message().starts_with("Malformed card payload"));
    }

    #[test]
    fn test_classifier_error_propagates_kind() {
        let reader = canned(Err(ExError::new(ExErrorKind::Timeout)));
        let err = LlmCustomCardReader::new(&reader)
            .read_card("https://img/x.png")
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Timeout);
        assert_eq!(err.op(), Some("generate"));
    }

    #[test]
    fn test_schema_requires_every_property() {
        let schema = card_tool_schema().parameters;
        let properties = schema["properties"].as_object().unwrap();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(properties.len(), required.len());
    }
}
