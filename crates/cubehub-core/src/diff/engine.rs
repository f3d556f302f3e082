//! Diff computation over card lists

use std::collections::{BTreeMap, BTreeSet};

use crate::diff::model::{CountChange, CubeDiff, DiffClassification};
use crate::model::Card;

/// Count how many times each card id appears in `cards`
pub fn card_counts(cards: &[Card]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for card in cards {
        *counts.entry(card.id.clone()).or_insert(0) += 1;
    }
    counts
}

/// True when the two lists do not contain the same set of card ids.
///
/// Multiplicity is discarded: `[A, A, B]` and `[A, B]` are unchanged.
pub fn has_changes(previous: &[Card], current: &[Card]) -> bool {
    let before: BTreeSet<&str> = previous.iter().map(|c| c.id.as_str()).collect();
    let after: BTreeSet<&str> = current.iter().map(|c| c.id.as_str()).collect();
    before != after
}

/// Full structured comparison of two card lists
pub fn compute_diff(previous: &[Card], current: &[Card]) -> CubeDiff {
    let before = card_counts(previous);
    let after = card_counts(current);

    let added: Vec<String> = after
        .keys()
        .filter(|id| !before.contains_key(*id))
        .cloned()
        .collect();
    let removed: Vec<String> = before
        .keys()
        .filter(|id| !after.contains_key(*id))
        .cloned()
        .collect();

    let mut count_changes = BTreeMap::new();
    for (id, &was) in &before {
        if let Some(&now) = after.get(id) {
            if was != now {
                count_changes.insert(
                    id.clone(),
                    CountChange {
                        before: was,
                        after: now,
                    },
                );
            }
        }
    }

    let classification = if !added.is_empty() || !removed.is_empty() {
        DiffClassification::Changed
    } else if !count_changes.is_empty() {
        DiffClassification::CountsOnly
    } else {
        DiffClassification::Identical
    };

    CubeDiff {
        classification,
        added,
        removed,
        count_changes,
    }
}
