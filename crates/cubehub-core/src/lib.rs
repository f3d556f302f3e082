//! CubeHub Core - domain model and collaborator interfaces
//!
//! This crate provides:
//! - Card, Cube, custom mapping and deck models
//! - Type-line and printed-stat parsing
//! - Count-blind change detection between cube snapshots
//! - The `CubeStorage`, `CardLoader`, `CustomCardReader`, `DeckReader`
//!   and `ImageReader` traits the pipeline is assembled from
//! - The structured error facility and the logging facility

pub mod diff;
pub mod errors;
pub mod image_reader;
pub mod loaders;
pub mod logging_facility;
pub mod model;
pub mod storage;
pub mod type_line;

pub use cubehub_core_types::schema;

// Re-export commonly used types
pub use errors::{CardConversionError, ExError, ExErrorKind, Result};
pub use image_reader::{ImageReader, ImageRequest, ImageSource, ToolSchema};
pub use loaders::{CardLoader, CustomCardReader, DeckReader, LoadReport, NoopCustomCardReader};
pub use model::{Card, Color, Cube, CustomCardMappings, Deck, Player};
pub use storage::CubeStorage;
