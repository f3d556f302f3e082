//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All embedded migrations in application order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_cards_and_cubes",
            sql: include_str!("../../migrations/001_cards_and_cubes.sql"),
        },
        Migration {
            id: "002_custom_cards",
            sql: include_str!("../../migrations/002_custom_cards.sql"),
        },
        Migration {
            id: "003_decks",
            sql: include_str!("../../migrations/003_decks.sql"),
        },
    ]
}
