use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::card::Card;

/// One version of a cube together with its resolved card list
///
/// `cards` is a multiset: a card included N times appears N times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    pub id: String,
    pub name: String,
    pub version_number: u32,
    pub cards: Vec<Card>,
    pub date: DateTime<Utc>,
}

impl Cube {
    /// Per-card-id membership counts for this version
    pub fn card_counts(&self) -> BTreeMap<String, u32> {
        crate::diff::card_counts(&self.cards)
    }

    /// Distinct card ids, ignoring multiplicity
    pub fn card_ids(&self) -> BTreeSet<&str> {
        self.cards.iter().map(|c| c.id.as_str()).collect()
    }

    /// Version number the next committed snapshot must carry
    pub fn next_version(&self) -> u32 {
        self.version_number + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_counts_follow_repeats() {
        let island = Card::new("island", "Island");
        let cube = Cube {
            id: "c1".to_string(),
            name: "Test".to_string(),
            version_number: 3,
            cards: vec![island.clone(), Card::new("bolt", "Lightning Bolt"), island],
            date: Utc::now(),
        };

        let counts = cube.card_counts();
        assert_eq!(counts.get("island"), Some(&2));
        assert_eq!(counts.get("bolt"), Some(&1));
        assert_eq!(cube.card_ids().len(), 2);
        assert_eq!(cube.next_version(), 4);
    }
}
