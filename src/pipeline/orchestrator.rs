//! Three-phase fork-join orchestration over a fixed set of shards
//!
//! One worker pool with a thread per shard is reused for all phases. Each
//! phase fans out over every shard and collects every result before the
//! orchestrator reduces them and publishes the next phase's read-only input:
//!
//! 1. load, label and sum per class -> global means
//! 2. squared deviations from the global means -> global standard deviations
//! 3. classify with the positive-class interval and score -> weighted accuracy

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::ProgressBar;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::Serialize;

use super::accuracy::{shard_accuracy, weighted_accuracy, ShardAccuracy};
use super::classifier::{classify, IntervalRule};
use super::config::PipelineConfig;
use super::error::{PipelineError, Result};
use super::label::{assign_labels, LabelCounts, NEGATIVE, POSITIVE};
use super::loader::{load_shard, Shard};
use super::moments::{deviation_pass, sum_pass, ClassDeviations, ClassSums};
use super::reducer::{reduce_means, reduce_stddevs, GlobalMeans, GlobalStats};
use crate::utils::{create_progress_bar, finish_with_success};

/// Where a run currently is. Barrier states are only entered once every
/// worker of the preceding phase has returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    Phase1Running,
    Phase1Barrier,
    Phase2Running,
    Phase2Barrier,
    Phase3Running,
    Phase3Barrier,
    Done,
}

/// Phase 1 output for one shard, owned by the orchestrator between phases
#[derive(Debug)]
struct LoadedShard {
    index: usize,
    path: PathBuf,
    shard: Shard,
    counts: LabelCounts,
    sums: [ClassSums; 2],
}

/// What one shard contributed to the run
#[derive(Debug, Clone, Serialize)]
pub struct ShardReport {
    pub index: usize,
    pub path: PathBuf,
    pub counts: LabelCounts,
    /// Rows predicted positive by the interval rule
    pub predicted_positive: usize,
    #[serde(flatten)]
    pub accuracy: ShardAccuracy,
    /// Feature mean of this shard's positive rows
    pub local_feature_mean: f64,
    /// Spread of this shard's positive rows around the global mean
    pub local_feature_stddev: f64,
}

/// Wall-clock time of each phase, barrier reduction included
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimings {
    pub load: Duration,
    pub deviation: Duration,
    pub predict: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.load + self.deviation + self.predict
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Row-weighted global accuracy in percent
    pub accuracy: f64,
    pub stats: GlobalStats,
    /// Feature column position in shard 0
    pub feature_index: usize,
    pub shards: Vec<ShardReport>,
    pub timings: PhaseTimings,
}

impl PipelineOutcome {
    pub fn total_rows(&self) -> usize {
        self.shards.iter().map(|s| s.accuracy.row_count).sum()
    }

    pub fn total_correct(&self) -> usize {
        self.shards.iter().map(|s| s.accuracy.correct).sum()
    }
}

/// Drives the three phases for one configuration.
pub struct ShardPipeline {
    config: PipelineConfig,
    state: PipelineState,
    show_progress: bool,
}

impl ShardPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            state: PipelineState::Init,
            show_progress: false,
        }
    }

    /// Draw a progress bar per phase while workers complete
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all phases. The first failing worker aborts the run.
    pub fn run(&mut self) -> Result<PipelineOutcome> {
        self.config.validate()?;
        let config = self.config.clone();
        let pool = build_pool(config.shard_count)?;
        let tasks: Vec<(usize, PathBuf)> = config.shard_paths().into_iter().enumerate().collect();
        let mut timings = PhaseTimings::default();

        // Phase 1: load + label + per-class sums
        self.advance(PipelineState::Phase1Running);
        let started = Instant::now();
        let pb = self.phase_bar(tasks.len(), "Loading shards");
        let loaded: Vec<LoadedShard> = pool.install(|| {
            tasks
                .par_iter()
                .map(|(index, path)| {
                    let result = load_and_sum(*index, path, &config)
                        .map_err(|e| PipelineError::in_worker(*index, e));
                    pb.inc(1);
                    result
                })
                .collect::<Result<Vec<_>>>()
        })?;
        finish_with_success(&pb, "Shards loaded");

        self.advance(PipelineState::Phase1Barrier);
        let num_fields = common_field_count(&loaded)?;
        let means = GlobalMeans {
            mean: [
                reduce_means(loaded.iter().map(|s| &s.sums[NEGATIVE]), num_fields),
                reduce_means(loaded.iter().map(|s| &s.sums[POSITIVE]), num_fields),
            ],
        };
        timings.load = started.elapsed();

        // Phase 2: squared deviations from the published means
        self.advance(PipelineState::Phase2Running);
        let started = Instant::now();
        let pb = self.phase_bar(loaded.len(), "Accumulating deviations");
        let deviations: Vec<[ClassDeviations; 2]> = pool.install(|| {
            loaded
                .par_iter()
                .map(|s| {
                    let d = shard_deviations(&s.shard, &means);
                    pb.inc(1);
                    d
                })
                .collect()
        });
        finish_with_success(&pb, "Deviations accumulated");

        self.advance(PipelineState::Phase2Barrier);
        let stats = GlobalStats::new(
            means,
            [
                reduce_stddevs(deviations.iter().map(|d| &d[NEGATIVE]), num_fields),
                reduce_stddevs(deviations.iter().map(|d| &d[POSITIVE]), num_fields),
            ],
        );
        timings.deviation = started.elapsed();

        // Phase 3: classify and score; shard rows are dropped afterwards
        self.advance(PipelineState::Phase3Running);
        let started = Instant::now();
        let feature_index = loaded[0].shard.feature_index;
        let pb = self.phase_bar(loaded.len(), "Classifying shards");
        let shards: Vec<ShardReport> = pool.install(|| {
            loaded
                .into_par_iter()
                .zip(deviations)
                .map(|(s, d)| {
                    let report = predict_and_score(s, &d[POSITIVE], &stats);
                    pb.inc(1);
                    report
                })
                .collect()
        });
        finish_with_success(&pb, "Shards classified");

        self.advance(PipelineState::Phase3Barrier);
        let accuracy = weighted_accuracy(shards.iter().map(|s| &s.accuracy))?;
        timings.predict = started.elapsed();

        self.advance(PipelineState::Done);
        Ok(PipelineOutcome {
            accuracy,
            stats,
            feature_index,
            shards,
            timings,
        })
    }

    fn advance(&mut self, next: PipelineState) {
        self.state = next;
    }

    fn phase_bar(&self, len: usize, message: &str) -> ProgressBar {
        if self.show_progress {
            create_progress_bar(len as u64, message)
        } else {
            ProgressBar::hidden()
        }
    }
}

fn build_pool(workers: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("shard-worker-{}", i))
        .build()
        .map_err(|e| PipelineError::WorkerPool(e.to_string()))
}

fn load_and_sum(index: usize, path: &Path, config: &PipelineConfig) -> Result<LoadedShard> {
    let mut shard = load_shard(path, &config.feature_name, &config.target_name)?;
    let counts = assign_labels(&mut shard.rows, shard.target_index, config.threshold);
    let num_fields = shard.num_fields();
    let sums = [
        sum_pass(&shard.rows, shard.target_index, num_fields, NEGATIVE),
        sum_pass(&shard.rows, shard.target_index, num_fields, POSITIVE),
    ];

    Ok(LoadedShard {
        index,
        path: path.to_path_buf(),
        shard,
        counts,
        sums,
    })
}

/// Field count shared by every shard; the reductions are element-wise.
fn common_field_count(loaded: &[LoadedShard]) -> Result<usize> {
    let expected = loaded[0].shard.num_fields();
    match loaded.iter().find(|s| s.shard.num_fields() != expected) {
        Some(s) => Err(PipelineError::ShardLayout {
            shard: s.index,
            expected,
            actual: s.shard.num_fields(),
        }),
        None => Ok(expected),
    }
}

fn shard_deviations(shard: &Shard, means: &GlobalMeans) -> [ClassDeviations; 2] {
    [
        deviation_pass(&shard.rows, shard.target_index, means.class(NEGATIVE), NEGATIVE),
        deviation_pass(&shard.rows, shard.target_index, means.class(POSITIVE), POSITIVE),
    ]
}

fn predict_and_score(
    loaded: LoadedShard,
    positive_dev: &ClassDeviations,
    stats: &GlobalStats,
) -> ShardReport {
    let LoadedShard {
        index,
        path,
        mut shard,
        counts,
        sums,
    } = loaded;
    let feature = shard.feature_index;

    let (u, std) = stats.positive(feature);
    let predicted_positive = classify(
        &mut shard.rows,
        feature,
        shard.predict_index,
        IntervalRule::new(u, std),
    );
    let accuracy = shard_accuracy(&shard.rows, shard.target_index, shard.predict_index);

    ShardReport {
        index,
        path,
        counts,
        predicted_positive,
        accuracy,
        local_feature_mean: sums[POSITIVE].local_mean()[feature],
        local_feature_stddev: positive_dev.local_stddev()[feature],
    }
}
