//! Persistence interface for cards, cube versions, custom mappings and decks.

use crate::errors::ExError;
use crate::model::{Card, Cube, CustomCardMappings, Deck, Player};

/// Versioned cube storage.
///
/// Implementations must make `upsert_cards`, `insert_custom_card`,
/// `update_cube` and `record_deck` all-or-nothing.
#[allow(clippy::result_large_err)]
pub trait CubeStorage {
    /// Cards for `ids` in input order, repeats included; unknown ids are omitted.
    ///
    /// # Errors
    ///
    /// `Persistence` on storage failure. A missing id is never an error.
    fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Card>, ExError>;

    /// Cards whose name matches one of `names` exactly
    ///
    /// # Errors
    ///
    /// `Persistence` on storage failure.
    fn get_by_names(&self, names: &[String]) -> Result<Vec<Card>, ExError>;

    /// Insert or update cards keyed by id, in one transaction.
    ///
    /// # Errors
    ///
    /// `Persistence` if any row fails; nothing is written in that case.
    fn upsert_cards(&self, cards: &[Card]) -> Result<(), ExError>;

    /// Persist a new custom card and its image mapping together.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if `image_url` is already mapped, `Persistence` otherwise.
    fn insert_custom_card(&self, image_url: &str, card: &Card) -> Result<(), ExError>;

    /// The whole image reference → card id mapping
    ///
    /// # Errors
    ///
    /// `Persistence` on storage failure.
    fn get_all_custom_card_ids(&self) -> Result<CustomCardMappings, ExError>;

    /// Commit `cube.version_number` as the cube's new head version.
    ///
    /// # Errors
    ///
    /// `HeadMismatch` if the version is not exactly the stored max + 1
    /// (or 0 for an unknown cube); `Persistence` on storage failure.
    fn update_cube(&self, cube: &Cube) -> Result<(), ExError>;

    /// A stored cube version with its cards repeated by count.
    ///
    /// `version` of `None` selects the latest version. Unknown cubes and
    /// unknown versions return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `Persistence` on storage failure.
    fn get_cube(&self, id: &str, version: Option<u32>) -> Result<Option<Cube>, ExError>;

    /// # Errors
    ///
    /// `AlreadyExists` for a duplicate player id, `Persistence` otherwise.
    fn add_player(&self, player: &Player) -> Result<(), ExError>;

    /// Store a deck row plus one row per distinct card with its count.
    ///
    /// # Errors
    ///
    /// `Persistence` on storage failure; nothing is written in that case.
    fn record_deck(&self, deck: &Deck) -> Result<(), ExError>;
}
