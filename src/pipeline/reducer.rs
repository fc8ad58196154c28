//! Global reduction of per-shard partial sums
//!
//! Global statistics are always re-derived from the raw per-shard sums and
//! counts, never by averaging per-shard means or deviations.

use serde::Serialize;

use super::label::{NEGATIVE, POSITIVE};
use super::moments::{ClassDeviations, ClassSums};

/// Element-wise sum of the partial vectors divided by the summed count.
fn merge<'a, I>(parts: I, num_fields: usize) -> Vec<f64>
where
    I: IntoIterator<Item = (&'a [f64], usize)>,
{
    let mut total = vec![0.0; num_fields];
    let mut n = 0usize;

    for (partial, count) in parts {
        for (acc, value) in total.iter_mut().zip(partial) {
            *acc += value;
        }
        n += count;
    }

    total.iter_mut().for_each(|v| *v /= n as f64);
    total
}

/// Global per-field mean for one class from every shard's sums.
pub fn reduce_means<'a, I>(parts: I, num_fields: usize) -> Vec<f64>
where
    I: IntoIterator<Item = &'a ClassSums>,
{
    merge(
        parts.into_iter().map(|p| (p.sum.as_slice(), p.count)),
        num_fields,
    )
}

/// Global per-field population standard deviation for one class.
pub fn reduce_stddevs<'a, I>(parts: I, num_fields: usize) -> Vec<f64>
where
    I: IntoIterator<Item = &'a ClassDeviations>,
{
    let mut variance = merge(
        parts.into_iter().map(|p| (p.sum_sq_dev.as_slice(), p.count)),
        num_fields,
    );
    variance.iter_mut().for_each(|v| *v = v.sqrt());
    variance
}

/// Dataset-wide means per class, published after the first barrier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalMeans {
    /// Indexed by class label, then field
    pub mean: [Vec<f64>; 2],
}

impl GlobalMeans {
    pub fn class(&self, label: usize) -> &[f64] {
        &self.mean[label]
    }
}

/// Dataset-wide means and standard deviations per class, published after the second barrier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalStats {
    pub mean: [Vec<f64>; 2],
    pub stddev: [Vec<f64>; 2],
}

impl GlobalStats {
    pub fn new(means: GlobalMeans, stddev: [Vec<f64>; 2]) -> Self {
        Self {
            mean: means.mean,
            stddev,
        }
    }

    /// Mean and standard deviation of `field` for the positive class
    pub fn positive(&self, field: usize) -> (f64, f64) {
        (self.mean[POSITIVE][field], self.stddev[POSITIVE][field])
    }

    /// Mean and standard deviation of `field` for the negative class
    pub fn negative(&self, field: usize) -> (f64, f64) {
        (self.mean[NEGATIVE][field], self.stddev[NEGATIVE][field])
    }
}
