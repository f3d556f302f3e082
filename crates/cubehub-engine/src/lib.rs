//! CubeHub Engine - ingestion pipeline
//!
//! Wires the catalog client, manifest source, custom card resolver and
//! image classifier around a `CubeStorage` to build versioned cube
//! snapshots.

pub mod catalog;
pub mod commands;
pub mod custom;
pub mod deck;
pub mod http;
pub mod manifest;
pub mod openai;

pub use catalog::{CardCatalog, CatalogCardLoader, ScryfallHttpCatalog};
pub use commands::{BuildOutcome, CubeSnapshotBuilder};
pub use custom::{CustomCardResolver, LlmCustomCardReader};
pub use deck::LlmDeckReader;
pub use manifest::{CubeCobraHttpSource, ManifestSource};
pub use openai::{OpenAiConfig, OpenAiImageReader};
