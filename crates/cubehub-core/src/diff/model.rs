//! Cube diff output types.
//!
//! Collections use `BTreeMap` and sorted `Vec` for deterministic output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured difference between two card lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CubeDiff {
    pub classification: DiffClassification,
    /// Card ids present only in the new list, sorted
    pub added: Vec<String>,
    /// Card ids present only in the old list, sorted
    pub removed: Vec<String>,
    /// Ids present on both sides whose count differs
    pub count_changes: BTreeMap<String, CountChange>,
}

impl CubeDiff {
    /// Whether the membership set changed, the only thing that triggers a new version
    pub fn is_changed(&self) -> bool {
        self.classification == DiffClassification::Changed
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DiffClassification {
    /// Same ids with the same counts
    Identical,
    /// Same ids, only counts differ
    CountsOnly,
    /// At least one id added or removed
    Changed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountChange {
    pub before: u32,
    pub after: u32,
}
