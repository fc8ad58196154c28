//! Run configuration for the sharded pipeline

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error::{PipelineError, Result};

/// Column used as the sole predictive feature unless overridden
pub const DEFAULT_FEATURE: &str = "GrLivArea";

/// Column binarized against the threshold unless overridden
pub const DEFAULT_TARGET: &str = "SalePrice";

/// Number of shards the dataset is partitioned into
pub const DEFAULT_SHARD_COUNT: usize = 10;

pub const DEFAULT_FILENAME_PREFIX: &str = "dataset_";
pub const DEFAULT_FILENAME_SUFFIX: &str = ".csv";

/// Everything a run needs to locate and interpret its shards.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    /// Directory holding the shard files
    pub dataset_directory: PathBuf,
    /// Target values below this are class 0, the rest class 1
    pub threshold: i64,
    pub feature_name: String,
    pub target_name: String,
    /// Fixed number of shards, `dataset_0` through `dataset_{n-1}`
    pub shard_count: usize,
    pub filename_prefix: String,
    pub filename_suffix: String,
}

impl PipelineConfig {
    /// Create a config with default column names, shard count and file naming
    pub fn new(dataset_directory: impl Into<PathBuf>, threshold: i64) -> Self {
        Self {
            dataset_directory: dataset_directory.into(),
            threshold,
            feature_name: DEFAULT_FEATURE.to_string(),
            target_name: DEFAULT_TARGET.to_string(),
            shard_count: DEFAULT_SHARD_COUNT,
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            filename_suffix: DEFAULT_FILENAME_SUFFIX.to_string(),
        }
    }

    pub fn with_columns(mut self, feature_name: &str, target_name: &str) -> Self {
        self.feature_name = feature_name.to_string();
        self.target_name = target_name.to_string();
        self
    }

    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    /// Path of the shard at position `index`
    pub fn shard_path(&self, index: usize) -> PathBuf {
        self.dataset_directory.join(format!(
            "{}{}{}",
            self.filename_prefix, index, self.filename_suffix
        ))
    }

    /// Paths of every shard in shard order
    pub fn shard_paths(&self) -> Vec<PathBuf> {
        (0..self.shard_count).map(|i| self.shard_path(i)).collect()
    }

    /// Reject configurations that cannot describe a runnable dataset.
    pub fn validate(&self) -> Result<()> {
        if self.shard_count == 0 {
            return Err(PipelineError::Config(
                "shard count must be at least 1".to_string(),
            ));
        }
        if self.feature_name.is_empty() {
            return Err(PipelineError::Config(
                "feature column name must not be empty".to_string(),
            ));
        }
        if self.target_name.is_empty() {
            return Err(PipelineError::Config(
                "target column name must not be empty".to_string(),
            ));
        }
        validate_directory(&self.dataset_directory)
    }
}

fn validate_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(PipelineError::Config(format!(
            "dataset directory '{}' does not exist",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(PipelineError::Config(format!(
            "dataset path '{}' is not a directory",
            dir.display()
        )));
    }
    Ok(())
}
