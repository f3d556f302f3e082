//! CubeHub Store - SQLite persistence for cards and versioned cubes
//!
//! Provides:
//! - Connection setup and embedded, checksummed migrations
//! - Row-level repositories for cards, custom mappings and decks
//! - Atomic cube version commits with succession checks
//! - [`SqliteCubeStore`], the `CubeStorage` implementation

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod snapshot;
pub mod store;

pub use errors::Result;
pub use store::SqliteCubeStore;
