#![allow(clippy::result_large_err)]

use cubehub_core::errors::{ExError, ExErrorKind, Result};
use cubehub_core::loaders::CustomCardReader;
use cubehub_core::model::custom::new_custom_card_id;
use cubehub_core::model::{Card, CustomCardMappings};
use cubehub_core::storage::CubeStorage;

/// Maps custom image references to stable card ids.
///
/// Seeded once per run with the stored mapping. A reference seen before is
/// served from storage; a new one is classified, given a fresh id and
/// persisted together with its mapping. New mappings join the in-run map, so
/// the same image is classified at most once.
pub struct CustomCardResolver<'a> {
    reader: &'a dyn CustomCardReader,
    storage: &'a dyn CubeStorage,
    mappings: CustomCardMappings,
    classified: usize,
}

impl<'a> CustomCardResolver<'a> {
    pub fn new(
        reader: &'a dyn CustomCardReader,
        storage: &'a dyn CubeStorage,
        mappings: CustomCardMappings,
    ) -> Self {
        Self {
            reader,
            storage,
            mappings,
            classified: 0,
        }
    }

    /// Number of images classified by this resolver
    pub fn classified(&self) -> usize {
        self.classified
    }

    pub fn mappings(&self) -> &CustomCardMappings {
        &self.mappings
    }

    /// # Errors
    ///
    /// `CorruptedMapping` when a known reference does not resolve to exactly
    /// one stored card. Classifier and storage errors propagate.
    pub fn resolve(&mut self, image_url: &str) -> Result<Card> {
        if let Some(card_id) = self.mappings.get(image_url) {
            return self.fetch_mapped(image_url, card_id);
        }

        let mut card = self
            .reader
            .read_card(image_url)
            .map_err(|e| ExError::wrap("read_card", e).with_entity_id(image_url))?;
        self.classified += 1;

        card.id = new_custom_card_id();
        if card.image_uri.is_none() {
            card.image_uri = Some(image_url.to_string());
        }
        self.storage
            .insert_custom_card(image_url, &card)
            .map_err(|e| ExError::wrap("insert_custom_card", e))?;

        tracing::info!(image_url, card_id = %card.id, name = %card.name, "Registered custom card");
        self.mappings.insert(image_url.to_string(), card.id.clone());
        Ok(card)
    }

    fn fetch_mapped(&self, image_url: &str, card_id: &str) -> Result<Card> {
        let mut found = self
            .storage
            .get_by_ids(&[card_id.to_string()])
            .map_err(|e| ExError::wrap("get_by_ids", e))?;
        if found.len() != 1 {
            return Err(ExError::new(ExErrorKind::CorruptedMapping)
                .with_op("resolve_custom")
                .with_entity_id(image_url)
                .with_message(format!(
                    "Mapped card {} resolved to {} stored cards",
                    card_id,
                    found.len()
                )));
        }
        Ok(found.remove(0))
    }
}
