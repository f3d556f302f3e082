//! Cube snapshot build.
//!
//! ## Pipeline (in order):
//! 1. Fetch the manifest
//! 2. Load the custom image mapping once
//! 3. Resolve custom entries; collect catalog ids for the rest
//! 4. Load catalog cards (fetch + single upsert)
//! 5. Read the resolved card list back from storage
//! 6. Read the latest stored version
//! 7. Compare id sets; counts are ignored
//! 8. Commit `latest + 1` (or 0) only when the set changed
//!
//! Any failure before step 8 aborts the build with nothing committed.

#![allow(clippy::result_large_err)]

use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use cubehub_core::diff::{compute_diff, has_changes, render_human_summary};
use cubehub_core::errors::{ExError, ExErrorKind, Result};
use cubehub_core::loaders::{CardLoader, CustomCardReader};
use cubehub_core::model::Cube;
use cubehub_core::storage::CubeStorage;
use cubehub_core::{log_op_end, log_op_error, log_op_start};
use cubehub_core_types::RunId;
use serde::Serialize;

use crate::custom::CustomCardResolver;
use crate::manifest::{CubeCobraCube, ManifestSource};

/// Result of one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BuildOutcome {
    /// A new version was written
    Committed {
        version: u32,
        /// Distinct card ids in the version
        distinct: usize,
        /// Cards including repeats
        total: usize,
    },
    /// The card set matches the latest stored version; nothing was written
    Unchanged { version: u32 },
}

impl BuildOutcome {
    pub fn version(&self) -> u32 {
        match self {
            BuildOutcome::Committed { version, .. } | BuildOutcome::Unchanged { version } => {
                *version
            }
        }
    }
}

/// Builds versioned cube snapshots from manifests
pub struct CubeSnapshotBuilder<'a> {
    manifests: &'a dyn ManifestSource,
    loader: &'a dyn CardLoader,
    reader: &'a dyn CustomCardReader,
    storage: &'a dyn CubeStorage,
}

impl<'a> CubeSnapshotBuilder<'a> {
    pub fn new(
        manifests: &'a dyn ManifestSource,
        loader: &'a dyn CardLoader,
        reader: &'a dyn CustomCardReader,
        storage: &'a dyn CubeStorage,
    ) -> Self {
        Self {
            manifests,
            loader,
            reader,
            storage,
        }
    }

    /// Build `cube_id` and commit a new version if its card set changed.
    ///
    /// # Errors
    ///
    /// Any stage failure, wrapped as `build_cube` > stage > cause.
    pub fn build(&self, cube_id: &str) -> Result<BuildOutcome> {
        let run_id = RunId::new();
        let start = Instant::now();
        log_op_start!("build_cube", run_id = %run_id, cube_id = cube_id);

        let result = self
            .run(cube_id)
            .map_err(|e| ExError::wrap("build_cube", e).with_entity_id(cube_id));
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => {
                log_op_end!(
                    "build_cube",
                    duration_ms = duration_ms,
                    run_id = %run_id,
                    cube_id = cube_id,
                    version = outcome.version()
                );
            }
            Err(err) => log_op_error!(
                "build_cube",
                err,
                duration_ms = duration_ms,
                run_id = %run_id,
                cube_id = cube_id
            ),
        }
        result
    }

    fn run(&self, cube_id: &str) -> Result<BuildOutcome> {
        let manifest = self
            .manifests
            .fetch_manifest(cube_id)
            .map_err(|e| ExError::wrap("fetch_manifest", e))?;
        let mappings = self
            .storage
            .get_all_custom_card_ids()
            .map_err(|e| ExError::wrap("load_custom_mappings", e))?;

        let mut resolver = CustomCardResolver::new(self.reader, self.storage, mappings);
        let (card_ids, catalog_ids) = partition_entries(cube_id, &manifest, &mut resolver)?;
        tracing::debug!(
            cube_id,
            entries = card_ids.len(),
            catalog = catalog_ids.len(),
            classified = resolver.classified(),
            "Manifest partitioned"
        );

        let report = self
            .loader
            .load_cards(&catalog_ids)
            .map_err(|e| ExError::wrap("load_cards", e))?;
        if !report.is_complete() {
            tracing::warn!(
                cube_id,
                missing_count = report.missing.len(),
                skipped = report.skipped.len(),
                "Building with an incomplete catalog load"
            );
        }

        let cards = self
            .storage
            .get_by_ids(&card_ids)
            .map_err(|e| ExError::wrap("get_by_ids", e))?;
        let previous = self
            .storage
            .get_cube(cube_id, None)
            .map_err(|e| ExError::wrap("get_cube", e))?;

        let version = match &previous {
            Some(prev) if !has_changes(&prev.cards, &cards) => {
                tracing::info!(cube_id, version = prev.version_number, "Cube unchanged");
                return Ok(BuildOutcome::Unchanged {
                    version: prev.version_number,
                });
            }
            Some(prev) => {
                let diff = compute_diff(&prev.cards, &cards);
                tracing::info!(
                    cube_id,
                    added = diff.added.len(),
                    removed = diff.removed.len(),
                    "Cube changed"
                );
                tracing::debug!("{}", render_human_summary(&diff));
                prev.next_version()
            }
            None => 0,
        };

        let name = if manifest.name.is_empty() {
            cube_id.to_string()
        } else {
            manifest.name.clone()
        };
        let cube = Cube {
            id: cube_id.to_string(),
            name,
            version_number: version,
            cards,
            date: Utc::now(),
        };
        let distinct = cube.card_ids().len();
        let total = cube.cards.len();
        self.storage
            .update_cube(&cube)
            .map_err(|e| ExError::wrap("update_cube", e))?;

        Ok(BuildOutcome::Committed {
            version,
            distinct,
            total,
        })
    }
}

/// Resolve custom entries and split the manifest into the full id list
/// (manifest order, repeats kept) and the distinct catalog ids to load
fn partition_entries(
    cube_id: &str,
    manifest: &CubeCobraCube,
    resolver: &mut CustomCardResolver<'_>,
) -> Result<(Vec<String>, Vec<String>)> {
    let mut card_ids = Vec::with_capacity(manifest.cards.mainboard.len());
    let mut catalog_ids = Vec::new();
    let mut seen = HashSet::new();

    for (index, entry) in manifest.cards.mainboard.iter().enumerate() {
        if entry.is_custom() {
            let image_url = entry.image_url().ok_or_else(|| {
                invalid_entry(cube_id, index, "Custom entry has no image reference")
            })?;
            let card = resolver
                .resolve(image_url)
                .map_err(|e| ExError::wrap("resolve_custom", e))?;
            card_ids.push(card.id);
        } else {
            let id = entry
                .catalog_id()
                .ok_or_else(|| invalid_entry(cube_id, index, "Entry has no catalog id"))?;
            if seen.insert(id) {
                catalog_ids.push(id.to_string());
            }
            card_ids.push(id.to_string());
        }
    }
    Ok((card_ids, catalog_ids))
}

fn invalid_entry(cube_id: &str, index: usize, message: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidManifest)
        .with_op("partition_manifest")
        .with_entity_id(cube_id)
        .with_message(format!("mainboard[{}]: {}", index, message))
}
