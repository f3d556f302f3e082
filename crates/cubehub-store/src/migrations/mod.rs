//! Migration framework
//!
//! - Embedded SQL migrations applied in order
//! - Idempotent application, recorded in `schema_version`
//! - Checksums detect edits to already-applied migrations

mod checksums;
mod embedded;
mod runner;

pub use runner::{applied_migrations, apply_migrations};
