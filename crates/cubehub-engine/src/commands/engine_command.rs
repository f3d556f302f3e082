//! Engine-level commands dispatched by the CLI.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use chrono::{DateTime, Utc};
use cubehub_core::errors::{ExError, ExErrorKind, Result};
use cubehub_core::image_reader::ImageSource;
use cubehub_core::loaders::{CustomCardReader, DeckReader};
use cubehub_core::model::deck::new_deck_id;
use cubehub_core::model::{Card, Cube, Deck, Player};
use cubehub_core::storage::CubeStorage;
use cubehub_core::{log_op_end, log_op_error, log_op_start};
use serde::Serialize;

use crate::commands::build::{BuildOutcome, CubeSnapshotBuilder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Build a cube from its manifest and commit it if changed
    BuildCube { cube_id: String },
    /// Read a stored version; None means the latest
    ShowCube {
        cube_id: String,
        version: Option<u32>,
    },
    /// Classify one custom card image without persisting it
    ReadCard { image_url: String },
    /// Recognise a player's deck in a photo and record it against a cube
    /// version; None means the latest
    ReadDeck {
        cube_id: String,
        version: Option<u32>,
        image: ImageSource,
        player: Player,
        description: String,
    },
}

/// Collaborators available to [`apply_engine_command`].
///
/// Callers fill in only what their command uses; a command that finds a
/// collaborator missing fails with `Internal`.
#[derive(Clone, Copy, Default)]
pub struct EngineDeps<'a> {
    pub storage: Option<&'a dyn CubeStorage>,
    pub builder: Option<&'a CubeSnapshotBuilder<'a>>,
    pub card_reader: Option<&'a dyn CustomCardReader>,
    pub deck_reader: Option<&'a dyn DeckReader>,
}

fn require<'d, T: ?Sized>(dep: Option<&'d T>, name: &str, op: &str) -> Result<&'d T> {
    dep.ok_or_else(|| {
        ExError::new(ExErrorKind::Internal)
            .with_op(op)
            .with_message(format!("No {} configured", name))
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardCount {
    pub id: String,
    pub name: String,
    pub count: u32,
}

/// A stored cube version with per-card counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CubeSummary {
    pub id: String,
    pub name: String,
    pub version: u32,
    pub date: DateTime<Utc>,
    pub distinct: usize,
    pub total: usize,
    pub cards: Vec<CardCount>,
}

impl From<&Cube> for CubeSummary {
    fn from(cube: &Cube) -> Self {
        let mut cards: Vec<CardCount> = Vec::new();
        for (id, count) in cube.card_counts() {
            let name = cube
                .cards
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
                .unwrap_or_default();
            cards.push(CardCount { id, name, count });
        }
        cards.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Self {
            id: cube.id.clone(),
            name: cube.name.clone(),
            version: cube.version_number,
            date: cube.date,
            distinct: cards.len(),
            total: cube.cards.len(),
            cards,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommandResult {
    Build(BuildOutcome),
    Cube(CubeSummary),
    Card(Card),
    Deck(Deck),
}

/// Apply an engine command against the given collaborators.
///
/// # Errors
///
/// `NotFound` for `ShowCube`/`ReadDeck` on an unknown cube or version,
/// `Internal` when a needed collaborator is missing; otherwise the error of
/// the underlying operation.
pub fn apply_engine_command(
    cmd: EngineCommand,
    deps: &EngineDeps<'_>,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::BuildCube { cube_id } => {
            let builder = require(deps.builder, "snapshot builder", "build_cube")?;
            builder.build(&cube_id).map(EngineCommandResult::Build)
        }
        EngineCommand::ShowCube { cube_id, version } => {
            let storage = require(deps.storage, "storage", "show_cube")?;
            let cube = load_cube(storage, &cube_id, version, "show_cube")?;
            Ok(EngineCommandResult::Cube(CubeSummary::from(&cube)))
        }
        EngineCommand::ReadCard { image_url } => {
            let reader = require(deps.card_reader, "custom card reader", "read_card")?;
            reader.read_card(&image_url).map(EngineCommandResult::Card)
        }
        EngineCommand::ReadDeck {
            cube_id,
            version,
            image,
            player,
            description,
        } => {
            let storage = require(deps.storage, "storage", "read_deck")?;
            let reader = require(deps.deck_reader, "deck reader", "read_deck")?;
            let version = match version {
                Some(v) => v,
                None => load_cube(storage, &cube_id, None, "read_deck")?.version_number,
            };
            let mut deck = Deck::new(new_deck_id(), player.id.as_str(), cube_id, version);
            deck.description = description;
            record_deck(storage, reader, &player, &mut deck, &image)?;
            Ok(EngineCommandResult::Deck(deck))
        }
    }
}

fn load_cube(
    storage: &dyn CubeStorage,
    cube_id: &str,
    version: Option<u32>,
    op: &str,
) -> Result<Cube> {
    storage.get_cube(cube_id, version)?.ok_or_else(|| {
        let what = match version {
            Some(v) => format!("Cube {} has no version {}", cube_id, v),
            None => format!("Cube {} is not stored", cube_id),
        };
        ExError::new(ExErrorKind::NotFound)
            .with_op(op)
            .with_entity_id(cube_id)
            .with_message(what)
    })
}

/// Read the deck from `image`, then persist the player (if new) and the deck
fn record_deck(
    storage: &dyn CubeStorage,
    reader: &dyn DeckReader,
    player: &Player,
    deck: &mut Deck,
    image: &ImageSource,
) -> Result<()> {
    let start = Instant::now();
    log_op_start!("record_deck", cube_id = deck.cube_id.as_str(), version = deck.version_number);

    let result = read_and_store(storage, reader, player, deck, image);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(()) => {
            log_op_end!(
                "record_deck",
                duration_ms = duration_ms,
                cube_id = deck.cube_id.as_str(),
                card_count = deck.cards.len()
            );
        }
        Err(err) => log_op_error!(
            "record_deck",
            err,
            duration_ms = duration_ms,
            cube_id = deck.cube_id.as_str()
        ),
    }
    result
}

fn read_and_store(
    storage: &dyn CubeStorage,
    reader: &dyn DeckReader,
    player: &Player,
    deck: &mut Deck,
    image: &ImageSource,
) -> Result<()> {
    reader
        .read_deck(deck, image)
        .map_err(|e| ExError::wrap("read_deck", e))?;

    match storage.add_player(player) {
        Ok(()) => tracing::info!(player_id = %player.id, "Registered player"),
        Err(e) if e.kind() == ExErrorKind::AlreadyExists => {
            tracing::debug!(player_id = %player.id, "Player already registered");
        }
        Err(e) => return Err(ExError::wrap("add_player", e)),
    }
    storage
        .record_deck(deck)
        .map_err(|e| ExError::wrap("record_deck", e))
}
