//! Type-line and printed-stat parsing shared by every card source

use chrono::{NaiveDate, Utc};

use crate::errors::CardConversionError;

/// Tokens that start the card-type portion of a type line
pub const CARD_TYPES: &[&str] = &[
    "Artifact",
    "Battle",
    "Creature",
    "Enchantment",
    "Instant",
    "Land",
    "Planeswalker",
    "Sorcery",
];

/// Date format used by the catalog and the classifier for release dates
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A type line split into its three parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeLine {
    pub super_types: Vec<String>,
    pub card_type: String,
    pub sub_types: Vec<String>,
}

pub fn is_card_type(token: &str) -> bool {
    CARD_TYPES.contains(&token)
}

/// Parse a printed type line such as `Legendary Creature — Elf Warrior`.
///
/// Left of the em-dash, tokens before the first card-type token are
/// supertypes; the first card-type token and everything after it form the
/// card type. Tokens right of the em-dash are subtypes.
///
/// ```
/// use cubehub_core::type_line::parse_type_line;
///
/// let parsed = parse_type_line("Legendary Artifact Creature — Golem");
/// assert_eq!(parsed.super_types, vec!["Legendary"]);
/// assert_eq!(parsed.card_type, "Artifact Creature");
/// assert_eq!(parsed.sub_types, vec!["Golem"]);
/// ```
pub fn parse_type_line(type_line: &str) -> TypeLine {
    let (left, right) = match type_line.split_once('—') {
        Some((left, right)) => (left, Some(right)),
        None => (type_line, None),
    };

    let mut parsed = TypeLine::default();
    let mut saw_card_type = false;
    for token in left.split_whitespace() {
        if saw_card_type {
            parsed.card_type.push(' ');
            parsed.card_type.push_str(token);
        } else if is_card_type(token) {
            parsed.card_type.push_str(token);
            saw_card_type = true;
        } else {
            parsed.super_types.push(token.to_string());
        }
    }

    if let Some(right) = right {
        parsed.sub_types = right.split_whitespace().map(str::to_string).collect();
    }
    parsed
}

/// Parse a printed power/toughness/loyalty/defense value.
///
/// Placeholders like `*` or `1+*` are not numbers and yield `None`.
pub fn parse_stat(value: Option<&str>) -> Option<i32> {
    value.and_then(|v| v.trim().parse::<i32>().ok())
}

/// Parse a catalog release date; failure is a conversion error
pub fn parse_release_date(card_id: &str, value: &str) -> Result<NaiveDate, CardConversionError> {
    NaiveDate::parse_from_str(value.trim(), RELEASE_DATE_FORMAT).map_err(|_| {
        CardConversionError::InvalidReleaseDate {
            card_id: card_id.to_string(),
            value: value.to_string(),
        }
    })
}

/// Parse a classifier release date, falling back to today
pub fn release_date_or_today(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value.trim(), RELEASE_DATE_FORMAT)
        .unwrap_or_else(|_| Utc::now().date_naive())
}
