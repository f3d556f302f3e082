//! Card cache table access

#![allow(clippy::result_large_err)]

use std::collections::HashMap;

use crate::errors::{db_error, Result};
use chrono::NaiveDate;
use cubehub_core::model::{Card, Color};
use cubehub_core::type_line::RELEASE_DATE_FORMAT;
use rusqlite::types::{Type, Value};
use rusqlite::{params_from_iter, Connection, Row, Transaction};

/// Cards written per multi-row INSERT
pub const UPSERT_CHUNK_SIZE: usize = 200;

/// Ids bound per `IN (...)` lookup
const LOOKUP_CHUNK_SIZE: usize = 500;

const CARD_COLUMNS: &str = "id, name, mana_cost, mana_value, type, super_type, sub_type, \
     text_box, power, toughness, loyalty, defense, colors, set_code, release_date, image_uri";
const CARD_COLUMN_COUNT: usize = 16;

pub struct CardRepo;

impl CardRepo {
    /// Upsert `cards` in chunks of [`UPSERT_CHUNK_SIZE`] inside `tx`.
    ///
    /// Returns the size of each chunk written.
    pub fn upsert_cards_tx(tx: &Transaction, cards: &[Card]) -> Result<Vec<usize>> {
        let mut chunk_sizes = Vec::new();
        for chunk in cards.chunks(UPSERT_CHUNK_SIZE) {
            let row = format!("({})", vec!["?"; CARD_COLUMN_COUNT].join(", "));
            let sql = format!(
                "INSERT INTO cards ({CARD_COLUMNS}) VALUES {}
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    mana_cost = excluded.mana_cost,
                    mana_value = excluded.mana_value,
                    type = excluded.type,
                    super_type = excluded.super_type,
                    sub_type = excluded.sub_type,
                    text_box = excluded.text_box,
                    power = excluded.power,
                    toughness = excluded.toughness,
                    loyalty = excluded.loyalty,
                    defense = excluded.defense,
                    colors = excluded.colors,
                    set_code = excluded.set_code,
                    release_date = excluded.release_date,
                    image_uri = excluded.image_uri",
                vec![row; chunk.len()].join(", ")
            );

            let mut values = Vec::with_capacity(chunk.len() * CARD_COLUMN_COUNT);
            for card in chunk {
                values.extend(card_values(card)?);
            }

            tx.execute(&sql, params_from_iter(values))
                .map_err(|e| db_error("upsert_cards", e))?;
            chunk_sizes.push(chunk.len());
        }
        Ok(chunk_sizes)
    }

    /// Cards for `ids` in input order, repeats kept, unknown ids dropped
    pub fn get_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Card>> {
        let mut distinct: Vec<&String> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for id in ids {
            if seen.insert(id.as_str()) {
                distinct.push(id);
            }
        }

        let mut found: HashMap<String, Card> = HashMap::new();
        for chunk in distinct.chunks(LOOKUP_CHUNK_SIZE) {
            let sql = format!(
                "SELECT {CARD_COLUMNS} FROM cards WHERE id IN ({})",
                vec!["?"; chunk.len()].join(", ")
            );
            for card in query_cards(conn, &sql, chunk, "get_by_ids")? {
                found.insert(card.id.clone(), card);
            }
        }

        Ok(ids.iter().filter_map(|id| found.get(id).cloned()).collect())
    }

    /// Cards whose name is one of `names`, ordered by name then id
    pub fn get_by_names(conn: &Connection, names: &[String]) -> Result<Vec<Card>> {
        let mut cards = Vec::new();
        for chunk in names.chunks(LOOKUP_CHUNK_SIZE) {
            let sql = format!(
                "SELECT {CARD_COLUMNS} FROM cards WHERE name IN ({}) ORDER BY name, id",
                vec!["?"; chunk.len()].join(", ")
            );
            cards.extend(query_cards(conn, &sql, chunk, "get_by_names")?);
        }
        Ok(cards)
    }

    /// Number of cached cards
    pub fn count(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))
            .map_err(|e| db_error("count_cards", e))
    }
}

fn query_cards<P: rusqlite::ToSql>(
    conn: &Connection,
    sql: &str,
    params: &[P],
    op: &str,
) -> Result<Vec<Card>> {
    let mut stmt = conn.prepare(sql).map_err(|e| db_error(op, e))?;
    let cards = stmt
        .query_map(params_from_iter(params), card_from_row)
        .map_err(|e| db_error(op, e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| db_error(op, e))?;
    Ok(cards)
}

fn json_list<T: serde::Serialize>(items: &[T]) -> Result<Value> {
    if items.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::to_string(items).map(Value::Text).map_err(|e| {
        cubehub_core::ExError::new(cubehub_core::ExErrorKind::Serialization)
            .with_op("upsert_cards")
            .with_message(e.to_string())
    })
}

fn opt_int(value: Option<i32>) -> Value {
    value.map_or(Value::Null, |v| Value::Integer(i64::from(v)))
}

fn opt_text(value: Option<&String>) -> Value {
    value.map_or(Value::Null, |v| Value::Text(v.clone()))
}

fn card_values(card: &Card) -> Result<Vec<Value>> {
    Ok(vec![
        Value::Text(card.id.clone()),
        Value::Text(card.name.clone()),
        opt_text(card.mana_cost.as_ref()),
        Value::Integer(i64::from(card.mana_value)),
        Value::Text(card.card_type.clone()),
        json_list(&card.super_types)?,
        json_list(&card.sub_types)?,
        Value::Text(card.text_box.clone()),
        opt_int(card.power),
        opt_int(card.toughness),
        opt_int(card.loyalty),
        opt_int(card.defense),
        json_list(&card.colors)?,
        Value::Text(card.set.clone()),
        Value::Text(card.release_date.format(RELEASE_DATE_FORMAT).to_string()),
        opt_text(card.image_uri.as_ref()),
    ])
}

fn parse_json_column<T: serde::de::DeserializeOwned>(
    row: &Row,
    idx: usize,
) -> rusqlite::Result<Vec<T>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        None => Ok(Vec::new()),
        Some(text) => serde_json::from_str(&text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
    }
}

fn card_from_row(row: &Row) -> rusqlite::Result<Card> {
    let release_date: String = row.get(14)?;
    let release_date = NaiveDate::parse_from_str(&release_date, RELEASE_DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(14, Type::Text, Box::new(e)))?;
    let colors: Vec<Color> = parse_json_column(row, 12)?;

    Ok(Card {
        id: row.get(0)?,
        name: row.get(1)?,
        mana_cost: row.get(2)?,
        mana_value: row.get(3)?,
        card_type: row.get(4)?,
        super_types: parse_json_column(row, 5)?,
        sub_types: parse_json_column(row, 6)?,
        text_box: row.get(7)?,
        power: row.get(8)?,
        toughness: row.get(9)?,
        loyalty: row.get(10)?,
        defense: row.get(11)?,
        colors,
        set: row.get(13)?,
        release_date,
        image_uri: row.get(15)?,
    })
}
