//! Error types for the sharded accuracy pipeline.
//!
//! Every variant is fatal for a run: global statistics need a contribution
//! from every shard, so there is no skip or retry path.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while evaluating a sharded dataset.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or invalid run configuration (directory, threshold, names).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A shard file could not be opened or read.
    #[error("failed to read shard {}: {source}", .path.display())]
    ShardIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A shard file was readable but its contents are not a valid integer table.
    #[error("failed to parse shard {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Shards disagree on how many fields a row carries.
    #[error(
        "shard {shard} has {actual} field(s) per row but shard 0 has {expected}; \
         all shards must share one column layout"
    )]
    ShardLayout {
        shard: usize,
        expected: usize,
        actual: usize,
    },

    /// The dataset has no rows at all, so no accuracy can be computed.
    #[error("dataset contains no rows across {shards} shard(s)")]
    EmptyDataset { shards: usize },

    /// The fixed worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),

    /// A shard worker failed during one of the three phases.
    #[error("worker for shard {shard} failed: {source}")]
    Worker {
        shard: usize,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Wrap an error raised inside the worker for `shard`.
    pub fn in_worker(shard: usize, source: PipelineError) -> Self {
        PipelineError::Worker {
            shard,
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through any worker wrapping.
    pub fn root(&self) -> &PipelineError {
        match self {
            PipelineError::Worker { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
