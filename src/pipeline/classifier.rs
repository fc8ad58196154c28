//! Symmetric interval classifier around the positive class
//!
//! A row is predicted positive when its feature lies strictly inside
//! `(mean - std, mean + std)` of the positive class. The negative class
//! distribution plays no part in the decision.

use super::loader::Row;

/// Open interval `(lower, upper)` on the feature value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalRule {
    pub lower: f64,
    pub upper: f64,
}

impl IntervalRule {
    pub fn new(mean: f64, std: f64) -> Self {
        Self {
            lower: mean - std,
            upper: mean + std,
        }
    }

    /// Boundary values are outside; NaN bounds contain nothing.
    pub fn contains(&self, value: f64) -> bool {
        value > self.lower && value < self.upper
    }
}

/// Set the prediction slot to `1` for rows inside `rule`, returning how many were.
///
/// Rows outside keep their initialized `0`.
pub fn classify(
    rows: &mut [Row],
    feature_index: usize,
    predict_index: usize,
    rule: IntervalRule,
) -> usize {
    let mut positives = 0;
    for row in rows.iter_mut() {
        if rule.contains(row[feature_index] as f64) {
            row[predict_index] = 1;
            positives += 1;
        }
    }
    positives
}
