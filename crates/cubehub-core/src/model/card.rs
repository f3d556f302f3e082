use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One of the five colors of the card game's color pie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
}

impl Color {
    /// Parse a single-letter color code; anything outside W/U/B/R/G is None
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "W" => Some(Color::White),
            "U" => Some(Color::Blue),
            "B" => Some(Color::Black),
            "R" => Some(Color::Red),
            "G" => Some(Color::Green),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Color::White => "W",
            Color::Blue => "U",
            Color::Black => "B",
            Color::Red => "R",
            Color::Green => "G",
        }
    }

    /// Parse a list of codes into a duplicate-free color set, keeping first-seen order.
    ///
    /// Returns the parsed colors and the codes that were not recognised.
    pub fn parse_all<S: AsRef<str>>(codes: &[S]) -> (Vec<Color>, Vec<String>) {
        let mut colors = Vec::new();
        let mut unknown = Vec::new();
        for code in codes {
            match Color::from_code(code.as_ref()) {
                Some(color) if !colors.contains(&color) => colors.push(color),
                Some(_) => {}
                None => unknown.push(code.as_ref().to_string()),
            }
        }
        (colors, unknown)
    }
}

/// Canonical card record
///
/// `id` is either a catalog identifier or a generated `custom:` identifier.
/// Optional stats are `None` when the card has no such stat (or the printed
/// value is not a number, like `*`); `Some(0)` is a real zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub mana_cost: Option<String>,
    pub mana_value: i32,
    #[serde(rename = "type")]
    pub card_type: String,
    pub super_types: Vec<String>,
    pub sub_types: Vec<String>,
    pub text_box: String,
    pub power: Option<i32>,
    pub toughness: Option<i32>,
    pub loyalty: Option<i32>,
    pub defense: Option<i32>,
    pub colors: Vec<Color>,
    pub set: String,
    pub release_date: NaiveDate,
    pub image_uri: Option<String>,
}

impl Card {
    /// Create a bare card with the given id and name, released today
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mana_cost: None,
            mana_value: 0,
            card_type: String::new(),
            super_types: Vec::new(),
            sub_types: Vec::new(),
            text_box: String::new(),
            power: None,
            toughness: None,
            loyalty: None,
            defense: None,
            colors: Vec::new(),
            set: String::new(),
            release_date: Utc::now().date_naive(),
            image_uri: None,
        }
    }

    /// Reassemble the printed type line, e.g. `Legendary Creature — Elf Warrior`
    pub fn type_line(&self) -> String {
        let mut left: Vec<&str> = self.super_types.iter().map(String::as_str).collect();
        if !self.card_type.is_empty() {
            left.push(&self.card_type);
        }
        let left = left.join(" ");
        if self.sub_types.is_empty() {
            left
        } else {
            format!("{} — {}", left, self.sub_types.join(" "))
        }
    }

    pub fn is_custom(&self) -> bool {
        self.id.starts_with(crate::model::custom::CUSTOM_ID_PREFIX)
    }
}
