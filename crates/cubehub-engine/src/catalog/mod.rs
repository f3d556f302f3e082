//! Catalog client: fetches canonical card data in batches and persists it

#![allow(clippy::result_large_err)]

pub mod scryfall;

use std::collections::HashSet;
use std::time::{Duration, Instant};

use cubehub_core::errors::{ExError, Result};
use cubehub_core::loaders::{CardLoader, LoadReport};
use cubehub_core::model::Card;
use cubehub_core::storage::CubeStorage;
use cubehub_core::{log_op_end, log_op_error, log_op_start};
use reqwest::blocking::Client;

use crate::http::{build_client, decode_json, ensure_success, from_reqwest};
pub use scryfall::{CollectionRequest, CollectionResponse, ScryfallCard};

/// Maximum identifiers per collection request
pub const BATCH_SIZE: usize = 75;

pub const DEFAULT_SCRYFALL_BASE_URL: &str = "https://api.scryfall.com";

/// Remote card catalog
pub trait CardCatalog {
    /// Fetch the records for up to [`BATCH_SIZE`] ids. Ids the catalog does
    /// not know are simply absent from the result.
    ///
    /// # Errors
    ///
    /// `ExternalService`, `Timeout` or `Serialization` when the request fails.
    fn fetch_collection(&self, ids: &[String]) -> Result<Vec<ScryfallCard>>;
}

/// Scryfall `/cards/collection` over blocking HTTP
pub struct ScryfallHttpCatalog {
    client: Client,
    base_url: String,
}

impl ScryfallHttpCatalog {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_SCRYFALL_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl CardCatalog for ScryfallHttpCatalog {
    fn fetch_collection(&self, ids: &[String]) -> Result<Vec<ScryfallCard>> {
        const OP: &str = "fetch_collection";
        let url = format!("{}/cards/collection", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&CollectionRequest::for_ids(ids))
            .send()
            .map_err(|e| from_reqwest(OP, e))?;
        let body = ensure_success(OP, response)?
            .text()
            .map_err(|e| from_reqwest(OP, e))?;
        let parsed: CollectionResponse = decode_json(OP, &body)?;
        Ok(parsed.data)
    }
}

/// [`CardLoader`] that batches ids through a [`CardCatalog`] and writes the
/// converted cards with a single upsert
pub struct CatalogCardLoader<'a> {
    catalog: &'a dyn CardCatalog,
    storage: &'a dyn CubeStorage,
}

impl<'a> CatalogCardLoader<'a> {
    pub fn new(catalog: &'a dyn CardCatalog, storage: &'a dyn CubeStorage) -> Self {
        Self { catalog, storage }
    }
}

impl CardLoader for CatalogCardLoader<'_> {
    fn load_cards(&self, ids: &[String]) -> Result<LoadReport> {
        let start = Instant::now();
        log_op_start!("load_cards", card_count = ids.len());

        let result = load_in_batches(self.catalog, self.storage, ids);
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                log_op_end!(
                    "load_cards",
                    duration_ms = duration_ms,
                    card_count = report.loaded,
                    missing_count = report.missing.len()
                );
            }
            Err(err) => log_op_error!("load_cards", err, duration_ms = duration_ms),
        }
        result
    }
}

fn load_in_batches(
    catalog: &dyn CardCatalog,
    storage: &dyn CubeStorage,
    ids: &[String],
) -> Result<LoadReport> {
    let mut report = LoadReport {
        requested: ids.len(),
        ..LoadReport::default()
    };
    let mut cards: Vec<Card> = Vec::with_capacity(ids.len());

    for batch in ids.chunks(BATCH_SIZE) {
        report.batch_sizes.push(batch.len());
        tracing::debug!(batch_len = batch.len(), "Requesting catalog batch");
        let records = catalog.fetch_collection(batch)?;

        let returned: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        for id in batch {
            if !returned.contains(id.as_str()) && !report.missing.contains(id) {
                report.missing.push(id.clone());
            }
        }

        for record in &records {
            match record.to_card() {
                Ok(card) => cards.push(card),
                Err(err) => {
                    tracing::warn!(card_id = %record.id, error = %err, "Skipping unconvertible card");
                    report.skipped.push(record.id.clone());
                }
            }
        }
    }

    if !report.missing.is_empty() {
        tracing::warn!(
            missing_count = report.missing.len(),
            missing = ?report.missing,
            "Catalog did not return some requested cards"
        );
    }

    report.loaded = cards.len();
    storage
        .upsert_cards(&cards)
        .map_err(|e| ExError::wrap("upsert_cards", e))?;
    Ok(report)
}
