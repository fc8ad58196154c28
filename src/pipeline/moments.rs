//! Per-shard, per-class moment accumulation
//!
//! Both passes only look at rows carrying the requested (already binarized)
//! label and iterate over the data fields, never the prediction slot. The
//! raw sums are what the global reduction consumes; the `local_*` helpers
//! derive this shard's own statistics for reporting only.

use super::loader::Row;

/// Field-wise sums for one class within one shard
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSums {
    pub sum: Vec<f64>,
    pub count: usize,
}

impl ClassSums {
    /// This shard's own mean per field (NaN when the class is absent)
    pub fn local_mean(&self) -> Vec<f64> {
        self.sum.iter().map(|s| s / self.count as f64).collect()
    }
}

/// Field-wise sums of squared deviations from the global mean
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeviations {
    pub sum_sq_dev: Vec<f64>,
    pub count: usize,
}

impl ClassDeviations {
    /// Spread of this shard's rows around the global mean (NaN when the class is absent)
    pub fn local_stddev(&self) -> Vec<f64> {
        self.sum_sq_dev
            .iter()
            .map(|d| (d / self.count as f64).sqrt())
            .collect()
    }
}

/// Sum every field over rows labelled `label`.
pub fn sum_pass(
    rows: &[Row],
    target_index: usize,
    num_fields: usize,
    label: usize,
) -> ClassSums {
    let mut sum = vec![0.0; num_fields];
    let mut count = 0;

    for row in rows.iter().filter(|r| r[target_index] == label as i64) {
        for (acc, &value) in sum.iter_mut().zip(&row[..num_fields]) {
            *acc += value as f64;
        }
        count += 1;
    }

    ClassSums { sum, count }
}

/// Sum squared deviations from the global class mean `mean` over rows labelled `label`.
pub fn deviation_pass(
    rows: &[Row],
    target_index: usize,
    mean: &[f64],
    label: usize,
) -> ClassDeviations {
    let num_fields = mean.len();
    let mut sum_sq_dev = vec![0.0; num_fields];
    let mut count = 0;

    for row in rows.iter().filter(|r| r[target_index] == label as i64) {
        for ((acc, &value), &u) in sum_sq_dev.iter_mut().zip(&row[..num_fields]).zip(mean) {
            let d = value as f64 - u;
            *acc += d * d;
        }
        count += 1;
    }

    ClassDeviations { sum_sq_dev, count }
}
