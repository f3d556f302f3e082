//! Read-only cube version queries.

#![allow(clippy::result_large_err)]

use crate::errors::{db_error, Result};
use crate::repo::CardRepo;
use chrono::{DateTime, Utc};
use cubehub_core::errors::{ExError, ExErrorKind};
use cubehub_core::model::Cube;
use rusqlite::{Connection, OptionalExtension};

/// Cube metadata for one stored version, without cards
#[derive(Debug, Clone, PartialEq)]
pub struct CubeHeader {
    pub id: String,
    pub name: String,
    pub version_number: u32,
    pub created_at: DateTime<Utc>,
}

/// Resolve `version` (latest when `None`) for `cube_id`.
///
/// Returns `Ok(None)` for an unknown cube or an unknown version.
pub fn fetch_cube_header(
    conn: &Connection,
    cube_id: &str,
    version: Option<u32>,
) -> Result<Option<CubeHeader>> {
    let cube: Option<(String, u32)> = conn
        .query_row(
            "SELECT name, max_version FROM cubes WHERE id = ?1",
            [cube_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| db_error("get_cube", e))?;

    let Some((name, max_version)) = cube else {
        return Ok(None);
    };
    let version_number = version.unwrap_or(max_version);

    let created_at: Option<i64> = conn
        .query_row(
            "SELECT created_at FROM cube_versions WHERE cube_id = ?1 AND version_number = ?2",
            rusqlite::params![cube_id, version_number],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| db_error("get_cube", e))?;

    let Some(created_at) = created_at else {
        return Ok(None);
    };
    let created_at = DateTime::from_timestamp(
        created_at.div_euclid(1000),
        (created_at.rem_euclid(1000) * 1_000_000) as u32,
    )
    .ok_or_else(|| {
        ExError::new(ExErrorKind::Persistence)
            .with_op("get_cube")
            .with_entity_id(cube_id)
            .with_message(format!("invalid created_at {}", created_at))
    })?;

    Ok(Some(CubeHeader {
        id: cube_id.to_string(),
        name,
        version_number,
        created_at,
    }))
}

/// Load a cube version with each card repeated by its membership count
pub fn fetch_cube(conn: &Connection, cube_id: &str, version: Option<u32>) -> Result<Option<Cube>> {
    let Some(header) = fetch_cube_header(conn, cube_id, version)? else {
        return Ok(None);
    };

    let mut stmt = conn
        .prepare(
            "SELECT card_id, count FROM cube_cards
             WHERE cube_id = ?1 AND version_number = ?2
             ORDER BY card_id",
        )
        .map_err(|e| db_error("get_cube", e))?;
    let rows: Vec<(String, u32)> = stmt
        .query_map(rusqlite::params![cube_id, header.version_number], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .map_err(|e| db_error("get_cube", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| db_error("get_cube", e))?;

    let mut ids = Vec::new();
    for (card_id, count) in rows {
        for _ in 0..count {
            ids.push(card_id.clone());
        }
    }
    let cards = CardRepo::get_by_ids(conn, &ids)?;

    Ok(Some(Cube {
        id: header.id,
        name: header.name,
        version_number: header.version_number,
        cards,
        date: header.created_at,
    }))
}
