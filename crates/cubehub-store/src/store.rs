//! SQLite-backed [`CubeStorage`]

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use crate::db;
use crate::errors::{db_error, lock_poisoned, Result};
use crate::migrations::apply_migrations;
use crate::repo::{CardRepo, CustomCardRepo, DeckRepo};
use crate::snapshot::{commit_cube_version, fetch_cube};
use cubehub_core::model::{Card, Cube, CustomCardMappings, Deck, Player};
use cubehub_core::storage::CubeStorage;
use cubehub_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Versioned cube store over one SQLite connection
///
/// Every write runs in an `IMMEDIATE` transaction so the read-check-write
/// sequence of a version commit holds the database write lock.
pub struct SqliteCubeStore {
    conn: Mutex<Connection>,
}

impl SqliteCubeStore {
    /// Open (or create) the database at `path`, configure it and migrate it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = db::open(path)?;
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Fresh migrated in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = db::open_in_memory()?;
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already migrated connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self, op: &str) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| lock_poisoned(op))
    }

    /// Run `f` inside an IMMEDIATE transaction, committing only on success
    fn write<T>(&self, op: &str, f: impl FnOnce(&Transaction) -> Result<T>) -> Result<T> {
        let mut conn = self.lock(op)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| db_error(op, e))?;
        let value = f(&tx)?;
        tx.commit().map_err(|e| db_error(op, e))?;
        Ok(value)
    }

    /// Like [`CubeStorage::upsert_cards`], returning the chunk sizes written
    pub fn upsert_cards_chunked(&self, cards: &[Card]) -> Result<Vec<usize>> {
        self.write("upsert_cards", |tx| CardRepo::upsert_cards_tx(tx, cards))
    }

    /// Number of cached cards
    pub fn card_count(&self) -> Result<i64> {
        CardRepo::count(&*self.lock("card_count")?)
    }
}

impl CubeStorage for SqliteCubeStore {
    fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Card>> {
        CardRepo::get_by_ids(&*self.lock("get_by_ids")?, ids)
    }

    fn get_by_names(&self, names: &[String]) -> Result<Vec<Card>> {
        CardRepo::get_by_names(&*self.lock("get_by_names")?, names)
    }

    fn upsert_cards(&self, cards: &[Card]) -> Result<()> {
        let chunks = self.upsert_cards_chunked(cards)?;
        tracing::debug!(cards = cards.len(), chunks = chunks.len(), "Upserted cards");
        Ok(())
    }

    fn insert_custom_card(&self, image_url: &str, card: &Card) -> Result<()> {
        self.write("insert_custom_card", |tx| {
            CustomCardRepo::insert_tx(tx, image_url, card)
        })
    }

    fn get_all_custom_card_ids(&self) -> Result<CustomCardMappings> {
        CustomCardRepo::get_all(&*self.lock("get_all_custom_card_ids")?)
    }

    fn update_cube(&self, cube: &Cube) -> Result<()> {
        let start = Instant::now();
        log_op_start!("update_cube", cube_id = %cube.id, version = cube.version_number);

        let result = self.write("update_cube", |tx| commit_cube_version(tx, cube));
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => {
                log_op_end!("update_cube", duration_ms = duration_ms);
            }
            Err(err) => {
                log_op_error!("update_cube", err, duration_ms = duration_ms);
            }
        }
        result
    }

    fn get_cube(&self, id: &str, version: Option<u32>) -> Result<Option<Cube>> {
        fetch_cube(&*self.lock("get_cube")?, id, version)
    }

    fn add_player(&self, player: &Player) -> Result<()> {
        self.write("add_player", |tx| DeckRepo::add_player_tx(tx, player))
    }

    fn record_deck(&self, deck: &Deck) -> Result<()> {
        self.write("record_deck", |tx| DeckRepo::record_deck_tx(tx, deck))
    }
}
