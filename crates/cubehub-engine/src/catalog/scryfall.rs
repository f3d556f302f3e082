//! Scryfall wire types and their conversion into canonical cards

use cubehub_core::errors::CardConversionError;
use cubehub_core::model::{Card, Color};
use cubehub_core::type_line::{parse_release_date, parse_stat, parse_type_line};
use serde::{Deserialize, Serialize};

/// Body of `POST /cards/collection`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CollectionRequest {
    pub identifiers: Vec<CardIdentifier>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardIdentifier {
    pub id: String,
}

impl CollectionRequest {
    pub fn for_ids(ids: &[String]) -> Self {
        Self {
            identifiers: ids
                .iter()
                .map(|id| CardIdentifier { id: id.clone() })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionResponse {
    #[serde(default)]
    pub data: Vec<ScryfallCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScryfallImageUris {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub normal: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScryfallCardFace {
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: String,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub defense: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub image_uris: Option<ScryfallImageUris>,
}

/// A catalog record; multi-faced cards carry their printed data in `card_faces`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScryfallCard {
    pub id: String,
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
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub defense: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub released_at: String,
    #[serde(default)]
    pub image_uris: Option<ScryfallImageUris>,
    #[serde(default)]
    pub card_faces: Vec<ScryfallCardFace>,
}

impl ScryfallCard {
    /// Convert to the canonical card.
    ///
    /// For multi-faced records the printed fields come from the first face;
    /// id, mana value, set and release date always come from the top level.
    /// Unknown color codes are dropped with a warning.
    pub fn to_card(&self) -> Result<Card, CardConversionError> {
        let release_date = parse_release_date(&self.id, &self.released_at)?;

        let top_level = ScryfallCardFace {
            name: self.name.clone(),
            mana_cost: self.mana_cost.clone(),
            type_line: self.type_line.clone(),
            oracle_text: self.oracle_text.clone(),
            power: self.power.clone(),
            toughness: self.toughness.clone(),
            loyalty: self.loyalty.clone(),
            defense: self.defense.clone(),
            colors: self.colors.clone(),
            image_uris: self.image_uris.clone(),
        };
        let printed = match self.card_faces.first() {
            Some(face) => ScryfallCardFace {
                image_uris: face.image_uris.clone().or_else(|| self.image_uris.clone()),
                ..face.clone()
            },
            None => top_level,
        };

        let type_line = parse_type_line(&printed.type_line);
        let (colors, unknown) = Color::parse_all(&printed.colors);
        if !unknown.is_empty() {
            tracing::warn!(card_id = %self.id, ?unknown, "Dropping unknown color codes");
        }

        Ok(Card {
            id: self.id.clone(),
            name: printed.name,
            mana_cost: printed.mana_cost,
            mana_value: self.cmc.trunc() as i32,
            card_type: type_line.card_type,
            super_types: type_line.super_types,
            sub_types: type_line.sub_types,
            text_box: printed.oracle_text,
            power: parse_stat(printed.power.as_deref()),
            toughness: parse_stat(printed.toughness.as_deref()),
            loyalty: parse_stat(printed.loyalty.as_deref()),
            defense: parse_stat(printed.defense.as_deref()),
            colors,
            set: self.set.clone(),
            release_date,
            image_uri: printed.image_uris.and_then(|uris| uris.normal),
        })
    }
}
