//! Cube version commit.

#![allow(clippy::result_large_err)]

use crate::errors::{db_error, Result};
use cubehub_core::errors::{ExError, ExErrorKind};
use cubehub_core::model::Cube;
use rusqlite::{OptionalExtension, Transaction};

/// Stored head version of `cube_id`, if the cube exists
fn query_max_version(tx: &Transaction, cube_id: &str) -> Result<Option<u32>> {
    tx.query_row(
        "SELECT max_version FROM cubes WHERE id = ?1",
        [cube_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| db_error("query_max_version", e))
}

/// Commit `cube` as the next version inside `tx`.
///
/// 1. Check succession: the version must be stored max + 1, or 0 for a new cube
/// 2. Upsert the cube row with the new name and max version
/// 3. Insert the version row
/// 4. Insert one membership row per distinct card id with its count
///
/// The caller commits `tx`; on error nothing it wrote survives rollback.
///
/// ## Errors
///
/// - `ExErrorKind::HeadMismatch`: another writer moved the head
/// - `ExErrorKind::Persistence`: database error (e.g. a card id not in `cards`)
pub fn commit_cube_version(tx: &Transaction, cube: &Cube) -> Result<()> {
    let current = query_max_version(tx, &cube.id)?;
    let expected = current.map_or(0, |max| max + 1);
    if cube.version_number != expected {
        return Err(ExError::new(ExErrorKind::HeadMismatch)
            .with_op("update_cube")
            .with_entity_id(cube.id.clone())
            .with_message(format!(
                "Expected version {} but got {} (stored head {:?})",
                expected, cube.version_number, current
            )));
    }

    tx.execute(
        "INSERT INTO cubes (id, name, max_version) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            max_version = excluded.max_version",
        rusqlite::params![cube.id, cube.name, cube.version_number],
    )
    .map_err(|e| db_error("update_cube", e))?;

    tx.execute(
        "INSERT INTO cube_versions (cube_id, version_number, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![cube.id, cube.version_number, cube.date.timestamp_millis()],
    )
    .map_err(|e| db_error("update_cube", e))?;

    let counts = cube.card_counts();
    let mut stmt = tx
        .prepare(
            "INSERT INTO cube_cards (cube_id, version_number, card_id, count)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(|e| db_error("update_cube", e))?;
    for (card_id, count) in &counts {
        stmt.execute(rusqlite::params![cube.id, cube.version_number, card_id, count])
            .map_err(|e| db_error("update_cube", e))?;
    }

    tracing::debug!(
        cube_id = %cube.id,
        version = cube.version_number,
        distinct = counts.len(),
        total = cube.cards.len(),
        "Committed cube version"
    );

    Ok(())
}
