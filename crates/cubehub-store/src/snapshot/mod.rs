//! Cube version persistence.
//!
//! ## Responsibilities
//!
//! - Commit a new cube version atomically (cube row, version row, membership rows)
//! - Enforce gapless version succession inside the commit transaction
//! - Load a stored version with its multiset of cards
//!
//! ## Non-Responsibilities
//!
//! - Deciding whether a new version is needed (handled by `cubehub-engine`)

pub mod persist;
pub mod query;

pub use persist::commit_cube_version;
pub use query::{fetch_cube, fetch_cube_header, CubeHeader};
