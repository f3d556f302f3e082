//! Cube snapshot change detection.
//!
//! A rebuild writes a new version only when [`has_changes`] says the card
//! id *sets* differ. Counts are ignored by that decision; [`compute_diff`]
//! still reports count changes so they can be shown to a human.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{card_counts, compute_diff, has_changes};
pub use human_summary::render_human_summary;
pub use model::{CountChange, CubeDiff, DiffClassification};
