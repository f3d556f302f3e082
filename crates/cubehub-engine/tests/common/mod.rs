#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use cubehub_core::errors::{ExError, ExErrorKind, Result};
use cubehub_core::loaders::CustomCardReader;
use cubehub_core::model::{Card, Cube, CustomCardMappings, Deck, Player};
use cubehub_core::storage::CubeStorage;
use cubehub_engine::catalog::{CardCatalog, ScryfallCard};
use cubehub_engine::manifest::{
    CubeCobraCard, CubeCobraCardDetails, CubeCobraCards, CubeCobraCube, ManifestSource,
};
use cubehub_store::SqliteCubeStore;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// In-memory catalog that records every request
#[derive(Default)]
pub struct FakeCatalog {
    pub records: HashMap<String, ScryfallCard>,
    pub requests: RefCell<Vec<Vec<String>>>,
    pub fail: Cell<bool>,
}

impl FakeCatalog {
    pub fn with_ids(ids: &[&str]) -> Self {
        let mut catalog = Self::default();
        for id in ids {
            catalog.add(scryfall(id));
        }
        catalog
    }

    pub fn add(&mut self, card: ScryfallCard) {
        self.records.insert(card.id.clone(), card);
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.requests.borrow().iter().map(Vec::len).collect()
    }
}

impl CardCatalog for FakeCatalog {
    fn fetch_collection(&self, ids: &[String]) -> Result<Vec<ScryfallCard>> {
        self.requests.borrow_mut().push(ids.to_vec());
        if self.fail.get() {
            return Err(ExError::new(ExErrorKind::ExternalService)
                .with_op("fetch_collection")
                .with_message("catalog down"));
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect())
    }
}

pub fn scryfall(id: &str) -> ScryfallCard {
    ScryfallCard {
        id: id.to_string(),
        name: format!("Card {}", id),
        mana_cost: Some("{1}{G}".to_string()),
        cmc: 2.0,
        type_line: "Creature — Bear".to_string(),
        power: Some("2".to_string()),
        toughness: Some("2".to_string()),
        colors: vec!["G".to_string()],
        set: "lea".to_string(),
        released_at: "1993-08-05".to_string(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Manifests
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeManifests {
    pub cubes: RefCell<HashMap<String, CubeCobraCube>>,
}

impl FakeManifests {
    pub fn set(&self, cube: CubeCobraCube) {
        self.cubes.borrow_mut().insert(cube.id.clone(), cube);
    }
}

impl ManifestSource for FakeManifests {
    fn fetch_manifest(&self, cube_id: &str) -> Result<CubeCobraCube> {
        self.cubes.borrow().get(cube_id).cloned().ok_or_else(|| {
            ExError::new(ExErrorKind::ExternalService)
                .with_op("fetch_manifest")
                .with_entity_id(cube_id)
                .with_message("HTTP 404")
        })
    }
}

pub fn catalog_entry(id: &str) -> CubeCobraCard {
    CubeCobraCard {
        card_id: Some(format!("cc-{}", id)),
        details: Some(CubeCobraCardDetails {
            scryfall_id: Some(id.to_string()),
        }),
        tags: Vec::new(),
        img_url: None,
    }
}

pub fn custom_entry(image_url: &str) -> CubeCobraCard {
    CubeCobraCard {
        card_id: Some("custom-placeholder".to_string()),
        details: None,
        tags: vec!["custom".to_string()],
        img_url: Some(image_url.to_string()),
    }
}

pub fn manifest(cube_id: &str, entries: Vec<CubeCobraCard>) -> CubeCobraCube {
    CubeCobraCube {
        id: cube_id.to_string(),
        name: format!("Cube {}", cube_id),
        cards: CubeCobraCards { mainboard: entries },
    }
}

pub fn catalog_manifest(cube_id: &str, ids: &[&str]) -> CubeCobraCube {
    manifest(cube_id, ids.iter().map(|id| catalog_entry(id)).collect())
}

// ---------------------------------------------------------------------------
// Custom card classifier
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeReader {
    pub calls: RefCell<Vec<String>>,
}

impl FakeReader {
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl CustomCardReader for FakeReader {
    fn read_card(&self, image_url: &str) -> Result<Card> {
        self.calls.borrow_mut().push(image_url.to_string());
        let mut card = Card::new("", format!("Custom from {}", image_url));
        card.card_type = "Instant".to_string();
        card.set = "custom".to_string();
        Ok(card)
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// SQLite store that counts writes and can inject extra mappings
pub struct CountingStore {
    pub inner: SqliteCubeStore,
    pub upsert_calls: Cell<usize>,
    pub update_cube_calls: Cell<usize>,
    pub extra_mappings: RefCell<CustomCardMappings>,
    pub recorded_decks: RefCell<Vec<Deck>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteCubeStore::open_in_memory().unwrap(),
            upsert_calls: Cell::new(0),
            update_cube_calls: Cell::new(0),
            extra_mappings: RefCell::new(HashMap::new()),
            recorded_decks: RefCell::new(Vec::new()),
        }
    }
}

impl CubeStorage for CountingStore {
    fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Card>> {
        self.inner.get_by_ids(ids)
    }

    fn get_by_names(&self, names: &[String]) -> Result<Vec<Card>> {
        self.inner.get_by_names(names)
    }

    fn upsert_cards(&self, cards: &[Card]) -> Result<()> {
        self.upsert_calls.set(self.upsert_calls.get() + 1);
        self.inner.upsert_cards(cards)
    }

    fn insert_custom_card(&self, image_url: &str, card: &Card) -> Result<()> {
        self.inner.insert_custom_card(image_url, card)
    }

    fn get_all_custom_card_ids(&self) -> Result<CustomCardMappings> {
        let mut mappings = self.inner.get_all_custom_card_ids()?;
        mappings.extend(self.extra_mappings.borrow().clone());
        Ok(mappings)
    }

    fn update_cube(&self, cube: &Cube) -> Result<()> {
        self.update_cube_calls.set(self.update_cube_calls.get() + 1);
        self.inner.update_cube(cube)
    }

    fn get_cube(&self, id: &str, version: Option<u32>) -> Result<Option<Cube>> {
        self.inner.get_cube(id, version)
    }

    fn add_player(&self, player: &Player) -> Result<()> {
        self.inner.add_player(player)
    }

    fn record_deck(&self, deck: &Deck) -> Result<()> {
        self.inner.record_deck(deck)?;
        self.recorded_decks.borrow_mut().push(deck.clone());
        Ok(())
    }
}
