use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::card::Card;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
}

/// A deck a player built from one version of a cube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub player_id: String,
    pub cube_id: String,
    pub version_number: u32,
    pub description: String,
    pub cards: Vec<Card>,
}

/// Prefix of generated deck ids
pub const DECK_ID_PREFIX: &str = "deck:";

/// Generate a fresh deck id (UUIDv7 behind the deck prefix)
pub fn new_deck_id() -> String {
    format!("{}{}", DECK_ID_PREFIX, Uuid::now_v7())
}

impl Deck {
    /// Empty deck for `player_id` against a cube version
    pub fn new(
        id: impl Into<String>,
        player_id: impl Into<String>,
        cube_id: impl Into<String>,
        version_number: u32,
    ) -> Self {
        Self {
            id: id.into(),
            player_id: player_id.into(),
            cube_id: cube_id.into(),
            version_number,
            description: String::new(),
            cards: Vec::new(),
        }
    }
}
