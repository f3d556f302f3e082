//! Human-readable summary renderer for cube diffs.

use crate::diff::model::{CubeDiff, DiffClassification};

/// Render a short plain-text summary of a [`CubeDiff`]
pub fn render_human_summary(diff: &CubeDiff) -> String {
    let label = match diff.classification {
        DiffClassification::Identical => "identical",
        DiffClassification::CountsOnly => "counts only (no new version)",
        DiffClassification::Changed => "changed",
    };
    let mut out = format!("membership: {label}\n");

    if !diff.added.is_empty() {
        out.push_str(&format!("added ({}):\n", diff.added.len()));
        for id in &diff.added {
            out.push_str(&format!("  + {id}\n"));
        }
    }
    if !diff.removed.is_empty() {
        out.push_str(&format!("removed ({}):\n", diff.removed.len()));
        for id in &diff.removed {
            out.push_str(&format!("  - {id}\n"));
        }
    }
    for (id, change) in &diff.count_changes {
        out.push_str(&format!("  ~ {id}: {} -> {}\n", change.before, change.after));
    }
    out
}
