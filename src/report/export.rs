//! JSON export of a completed run

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{PipelineConfig, PipelineOutcome, ShardReport, NEGATIVE, POSITIVE};

/// Metadata about the run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub shardacc_version: String,
    pub dataset_directory: String,
    pub threshold: i64,
    pub feature_column: String,
    pub target_column: String,
    pub shard_count: usize,
}

/// Global statistics of the feature column for one class
#[derive(Serialize)]
pub struct ClassFeatureStats {
    pub label: usize,
    pub rows: usize,
    /// `null` when the class has no rows
    pub mean: f64,
    pub stddev: f64,
}

/// Seconds spent per phase
#[derive(Serialize)]
pub struct TimingExport {
    pub load_secs: f64,
    pub deviation_secs: f64,
    pub predict_secs: f64,
}

/// Complete run export
#[derive(Serialize)]
pub struct RunExport<'a> {
    pub metadata: RunMetadata,
    pub accuracy: f64,
    pub total_rows: usize,
    pub total_correct: usize,
    pub classes: Vec<ClassFeatureStats>,
    pub shards: &'a [ShardReport],
    pub timings: TimingExport,
}

impl<'a> RunExport<'a> {
    pub fn new(config: &PipelineConfig, outcome: &'a PipelineOutcome) -> Self {
        let field = outcome.feature_index;
        let classes = [NEGATIVE, POSITIVE]
            .into_iter()
            .map(|label| ClassFeatureStats {
                label,
                rows: outcome.shards.iter().map(|s| s.counts.of(label)).sum(),
                mean: outcome.stats.mean[label][field],
                stddev: outcome.stats.stddev[label][field],
            })
            .collect();

        Self {
            metadata: RunMetadata {
                timestamp: Utc::now().to_rfc3339(),
                shardacc_version: env!("CARGO_PKG_VERSION").to_string(),
                dataset_directory: config.dataset_directory.display().to_string(),
                threshold: config.threshold,
                feature_column: config.feature_name.clone(),
                target_column: config.target_name.clone(),
                shard_count: config.shard_count,
            },
            accuracy: outcome.accuracy,
            total_rows: outcome.total_rows(),
            total_correct: outcome.total_correct(),
            classes,
            shards: &outcome.shards,
            timings: TimingExport {
                load_secs: outcome.timings.load.as_secs_f64(),
                deviation_secs: outcome.timings.deviation.as_secs_f64(),
                predict_secs: outcome.timings.predict.as_secs_f64(),
            },
        }
    }
}

/// Export a run report to a pretty-printed JSON file
pub fn export_run(
    config: &PipelineConfig,
    outcome: &PipelineOutcome,
    output_path: &Path,
) -> Result<()> {
    let export = RunExport::new(config, outcome);

    let json = serde_json::to_string_pretty(&export).context("Failed to serialize run report")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write run report: {}", output_path.display()))?;

    Ok(())
}
