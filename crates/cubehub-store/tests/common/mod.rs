#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use cubehub_core::model::{Card, Color, Cube};
use cubehub_store::SqliteCubeStore;
use tempfile::TempDir;

/// On-disk store in a fresh temp dir; keep the dir alive for the test
pub fn setup_store() -> (TempDir, SqliteCubeStore) {
    let dir = TempDir::new().unwrap();
    let store = SqliteCubeStore::open(dir.path().join("cubes.db")).unwrap();
    (dir, store)
}

pub fn card(id: &str) -> Card {
    let mut card = Card::new(id, format!("Card {}", id));
    card.card_type = "Creature".to_string();
    card.sub_types = vec!["Bear".to_string()];
    card.power = Some(2);
    card.toughness = Some(2);
    card.colors = vec![Color::Green];
    card.set = "lea".to_string();
    card.release_date = NaiveDate::from_ymd_opt(1993, 8, 5).unwrap();
    card
}

pub fn cards(ids: &[&str]) -> Vec<Card> {
    ids.iter().map(|id| card(id)).collect()
}

pub fn cube(id: &str, version: u32, cards: Vec<Card>) -> Cube {
    Cube {
        id: id.to_string(),
        name: format!("Cube {}", id),
        version_number: version,
        cards,
        date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}
