//! Per-shard and row-weighted global accuracy

use serde::Serialize;

use super::error::{PipelineError, Result};
use super::loader::Row;

/// Accuracy of one shard and the weight it carries in the global reduction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShardAccuracy {
    /// Rows whose prediction equals their label
    pub correct: usize,
    pub row_count: usize,
    /// Percentage in `[0, 100]`
    pub accuracy: f64,
}

/// Compare the prediction slot with the label of every row.
///
/// An empty shard reports 0% and carries no weight.
pub fn shard_accuracy(rows: &[Row], target_index: usize, predict_index: usize) -> ShardAccuracy {
    let correct = rows
        .iter()
        .filter(|r| r[target_index] == r[predict_index])
        .count();
    let row_count = rows.len();
    let accuracy = if row_count == 0 {
        0.0
    } else {
        100.0 * correct as f64 / row_count as f64
    };

    ShardAccuracy {
        correct,
        row_count,
        accuracy,
    }
}

/// Row-count weighted mean of the shard accuracies: `Σ(accuracy_i × n_i) / Σ n_i`.
pub fn weighted_accuracy<'a, I>(shards: I) -> Result<f64>
where
    I: IntoIterator<Item = &'a ShardAccuracy>,
{
    let mut weighted = 0.0;
    let mut total_rows = 0usize;
    let mut count = 0usize;

    for shard in shards {
        weighted += shard.accuracy * shard.row_count as f64;
        total_rows += shard.row_count;
        count += 1;
    }

    if total_rows == 0 {
        return Err(PipelineError::EmptyDataset { shards: count });
    }

    Ok(weighted / total_rows as f64)
}
