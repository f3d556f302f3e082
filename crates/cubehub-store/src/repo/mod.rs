//! Row-level persistence for cards, custom mappings and decks
//!
//! Functions taking a `Transaction` never commit; the caller owns the
//! transaction boundary.

pub mod card_repo;
pub mod custom_repo;
pub mod deck_repo;

pub use card_repo::{CardRepo, UPSERT_CHUNK_SIZE};
pub use custom_repo::CustomCardRepo;
pub use deck_repo::DeckRepo;
