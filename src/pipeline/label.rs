//! Target binarization against an integer threshold

use serde::Serialize;

use super::loader::Row;

/// Label assigned to rows whose target is below the threshold
pub const NEGATIVE: usize = 0;

/// Label assigned to rows whose target is at or above the threshold
pub const POSITIVE: usize = 1;

/// Number of rows per class after labelling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub n0: usize,
    pub n1: usize,
}

impl LabelCounts {
    /// Row count for `label`
    pub fn of(&self, label: usize) -> usize {
        if label == POSITIVE {
            self.n1
        } else {
            self.n0
        }
    }

    pub fn total(&self) -> usize {
        self.n0 + self.n1
    }
}

/// Rewrite the target field of every row to `0` (below `threshold`) or `1`.
pub fn assign_labels(rows: &mut [Row], target_index: usize, threshold: i64) -> LabelCounts {
    let mut counts = LabelCounts::default();

    for row in rows.iter_mut() {
        if row[target_index] < threshold {
            row[target_index] = NEGATIVE as i64;
            counts.n0 += 1;
        } else {
            row[target_index] = POSITIVE as i64;
            counts.n1 += 1;
        }
    }

    counts
}
