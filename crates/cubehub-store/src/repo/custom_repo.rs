//! Custom card image mappings

#![allow(clippy::result_large_err)]

use crate::errors::{db_error, Result};
use crate::repo::card_repo::CardRepo;
use cubehub_core::errors::{ExError, ExErrorKind};
use cubehub_core::model::{Card, CustomCardMappings};
use rusqlite::{Connection, OptionalExtension, Transaction};

pub struct CustomCardRepo;

impl CustomCardRepo {
    /// Write `card` and map `image_url` to it inside `tx`.
    ///
    /// Fails with `AlreadyExists` if the image is already mapped.
    pub fn insert_tx(tx: &Transaction, image_url: &str, card: &Card) -> Result<()> {
        let existing: Option<String> = tx
            .query_row(
                "SELECT card_id FROM custom_cards WHERE image_url = ?1",
                [image_url],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| db_error("insert_custom_card", e))?;

        if let Some(card_id) = existing {
            return Err(ExError::new(ExErrorKind::AlreadyExists)
                .with_op("insert_custom_card")
                .with_entity_id(image_url)
                .with_message(format!("image already mapped to card {}", card_id)));
        }

        CardRepo::upsert_cards_tx(tx, std::slice::from_ref(card))?;
        tx.execute(
            "INSERT INTO custom_cards (image_url, card_id) VALUES (?1, ?2)",
            rusqlite::params![image_url, card.id],
        )
        .map_err(|e| db_error("insert_custom_card", e))?;

        Ok(())
    }

    pub fn get_all(conn: &Connection) -> Result<CustomCardMappings> {
        let mut stmt = conn
            .prepare("SELECT image_url, card_id FROM custom_cards")
            .map_err(|e| db_error("get_all_custom_card_ids", e))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| db_error("get_all_custom_card_ids", e))?
            .collect::<std::result::Result<CustomCardMappings, _>>()
            .map_err(|e| db_error("get_all_custom_card_ids", e))?;
        Ok(rows)
    }
}
