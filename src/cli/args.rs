//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{
    PipelineConfig, DEFAULT_FEATURE, DEFAULT_FILENAME_PREFIX, DEFAULT_FILENAME_SUFFIX,
    DEFAULT_SHARD_COUNT, DEFAULT_TARGET,
};

/// shardacc - Accuracy of a single-feature Gaussian-threshold classifier over sharded CSV data
#[derive(Parser, Debug)]
#[command(name = "shardacc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the shard files (dataset_0.csv, dataset_1.csv, ...)
    pub directory: PathBuf,

    /// Target values below this are class 0, values at or above it class 1
    #[arg(allow_negative_numbers = true)]
    pub threshold: i64,

    /// Column used as the sole predictive feature
    #[arg(short, long, default_value = DEFAULT_FEATURE)]
    pub feature: String,

    /// Column binarized against the threshold.
    /// If a shard header lacks it, the last column of that shard is used instead.
    #[arg(short, long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Number of shards the dataset is split into
    #[arg(long, default_value_t = DEFAULT_SHARD_COUNT, value_parser = validate_shard_count)]
    pub shards: usize,

    /// Shard file name prefix, followed by the shard index
    #[arg(long, default_value = DEFAULT_FILENAME_PREFIX)]
    pub prefix: String,

    /// Shard file name suffix, following the shard index
    #[arg(long, default_value = DEFAULT_FILENAME_SUFFIX)]
    pub suffix: String,

    /// Write a JSON report of the run (global statistics and per-shard results)
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Show phase progress, a per-shard summary table and timings
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Cli {
    /// Build the pipeline configuration from parsed arguments
    pub fn to_config(&self) -> PipelineConfig {
        PipelineConfig {
            dataset_directory: self.directory.clone(),
            threshold: self.threshold,
            feature_name: self.feature.clone(),
            target_name: self.target.clone(),
            shard_count: self.shards,
            filename_prefix: self.prefix.clone(),
            filename_suffix: self.suffix.clone(),
        }
    }
}

/// Validator for the shard count
fn validate_shard_count(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid shard count", s))?;

    if value == 0 {
        Err("shard count must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
