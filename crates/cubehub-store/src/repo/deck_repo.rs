//! Players and recorded decks

#![allow(clippy::result_large_err)]

use crate::errors::{db_error, Result};
use cubehub_core::diff::card_counts;
use cubehub_core::errors::{ExError, ExErrorKind};
use cubehub_core::model::{Deck, Player};
use rusqlite::{OptionalExtension, Transaction};

pub struct DeckRepo;

impl DeckRepo {
    pub fn add_player_tx(tx: &Transaction, player: &Player) -> Result<()> {
        let exists = tx
            .query_row("SELECT 1 FROM players WHERE id = ?1", [&player.id], |_| {
                Ok(())
            })
            .optional()
            .map_err(|e| db_error("add_player", e))?
            .is_some();
        if exists {
            return Err(ExError::new(ExErrorKind::AlreadyExists)
                .with_op("add_player")
                .with_entity_id(player.id.clone()));
        }

        tx.execute(
            "INSERT INTO players (id, name) VALUES (?1, ?2)",
            rusqlite::params![player.id, player.name],
        )
        .map_err(|e| db_error("add_player", e))?;
        Ok(())
    }

    /// Insert the deck row and one `deck_cards` row per distinct card
    pub fn record_deck_tx(tx: &Transaction, deck: &Deck) -> Result<()> {
        tx.execute(
            "INSERT INTO decks (id, player_id, cube_id, version_number, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                deck.id,
                deck.player_id,
                deck.cube_id,
                deck.version_number,
                deck.description
            ],
        )
        .map_err(|e| db_error("record_deck", e))?;

        let mut stmt = tx
            .prepare("INSERT INTO deck_cards (deck_id, card_id, count) VALUES (?1, ?2, ?3)")
            .map_err(|e| db_error("record_deck", e))?;
        for (card_id, count) in card_counts(&deck.cards) {
            stmt.execute(rusqlite::params![deck.id, card_id, count])
                .map_err(|e| db_error("record_deck", e))?;
        }
        Ok(())
    }
}
