//! Card source interfaces used by the snapshot builder.

use serde::{Deserialize, Serialize};

use crate::errors::{ExError, ExErrorKind};
use crate::image_reader::ImageSource;
use crate::model::{Card, Deck};

/// Outcome of one catalog load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub requested: usize,
    pub loaded: usize,
    /// Requested ids the catalog did not return
    pub missing: Vec<String>,
    /// Returned records that could not be converted
    pub skipped: Vec<String>,
    /// Size of each catalog request, in order
    pub batch_sizes: Vec<usize>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.skipped.is_empty()
    }
}

/// Loads catalog cards into storage
#[allow(clippy::result_large_err)]
pub trait CardLoader {
    /// Fetch `ids` from the catalog and upsert what was found.
    ///
    /// # Errors
    ///
    /// `ExternalService`/`Timeout` when a catalog request fails, `Persistence`
    /// when the upsert fails. Missing ids are reported, not raised.
    fn load_cards(&self, ids: &[String]) -> Result<LoadReport, ExError>;
}

/// Classifies a custom card from its image
#[allow(clippy::result_large_err)]
pub trait CustomCardReader {
    /// Produce a card (without a final id) for the image at `image_url`.
    ///
    /// # Errors
    ///
    /// Classifier failures propagate unchanged.
    fn read_card(&self, image_url: &str) -> Result<Card, ExError>;
}

/// Reads the cards of a deck from a photo
#[allow(clippy::result_large_err)]
pub trait DeckReader {
    /// Append to `deck.cards` every card of the deck's cube recognised in `image`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the deck's cube version is not stored; classifier or
    /// storage failures propagate.
    fn read_deck(&self, deck: &mut Deck, image: &ImageSource) -> Result<(), ExError>;
}

/// Reader used when no classifier is configured: always fails.
pub struct NoopCustomCardReader;

impl CustomCardReader for NoopCustomCardReader {
    #[allow(clippy::result_large_err)]
    fn read_card(&self, image_url: &str) -> Result<Card, ExError> {
        Err(ExError::new(ExErrorKind::ExternalService)
            .with_op("read_card")
            .with_entity_id(image_url)
            .with_message("No custom card classifier configured"))
    }
}
