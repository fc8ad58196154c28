//! Integration tests for the three-phase sharded pipeline

use shardacc::pipeline::*;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn run(dir: &TempDir, shard_count: usize, threshold: i64) -> Result<PipelineOutcome> {
    let config = PipelineConfig::new(dir.path(), threshold).with_shard_count(shard_count);
    ShardPipeline::new(config).run()
}

#[test]
fn test_worked_example() {
    let dir = create_worked_example();
    let mut pipeline =
        ShardPipeline::new(PipelineConfig::new(dir.path(), 120000).with_shard_count(2));
    assert_eq!(pipeline.state(), PipelineState::Init);

    let outcome = pipeline.run().unwrap();

    assert_eq!(pipeline.state(), PipelineState::Done);
    assert_eq!(outcome.feature_index, 0);

    // Class 1 = {200, 150}: mean 175, population std 25
    let (u, std) = outcome.stats.positive(0);
    assert_close(u, 175.0, "positive mean");
    assert_close(std, 25.0, "positive std");

    // Class 0 = {100}
    let (u0, std0) = outcome.stats.negative(0);
    assert_close(u0, 100.0, "negative mean");
    assert_close(std0, 0.0, "negative std");

    // Both class 1 rows sit on the open interval's boundaries
    assert!(outcome.shards.iter().all(|s| s.predicted_positive == 0));
    assert_eq!(outcome.total_correct(), 1);
    assert_eq!(outcome.total_rows(), 3);
    assert_close(outcome.accuracy, 100.0 / 3.0, "accuracy");
    assert_eq!(format!("{:.2}", outcome.accuracy), "33.33");
}

#[test]
fn test_shard_reports_follow_shard_order() {
    let dir = create_worked_example();
    let outcome = run(&dir, 2, 120000).unwrap();

    assert_eq!(outcome.shards[0].index, 0);
    assert_eq!(outcome.shards[0].counts, LabelCounts { n0: 1, n1: 1 });
    assert_eq!(outcome.shards[0].accuracy.row_count, 2);
    assert_eq!(outcome.shards[0].accuracy.accuracy, 50.0);

    assert_eq!(outcome.shards[1].index, 1);
    assert_eq!(outcome.shards[1].counts, LabelCounts { n0: 0, n1: 1 });
    assert_eq!(outcome.shards[1].accuracy.accuracy, 0.0);
}

#[test]
fn test_global_stats_match_combined_dataset_with_unequal_shards() {
    let shards = random_shards(7, &[3, 40, 11, 250, 1]);
    let dir = create_dataset(&shards);
    let threshold = 120000;

    let outcome = run(&dir, shards.len(), threshold).unwrap();

    let (u1, s1) = textbook_stats(&shards, threshold, true);
    let (u0, s0) = textbook_stats(&shards, threshold, false);
    let (got_u1, got_s1) = outcome.stats.positive(0);
    let (got_u0, got_s0) = outcome.stats.negative(0);

    assert_close(got_u1, u1, "positive mean");
    assert_close(got_s1, s1, "positive std");
    assert_close(got_u0, u0, "negative mean");
    assert_close(got_s0, s0, "negative std");
}

#[test]
fn test_label_counts_cover_every_row() {
    let shards = random_shards(11, &[17, 5, 90]);
    let dir = create_dataset(&shards);

    for threshold in [i64::MIN, 0, 60000, 120000, 180000, i64::MAX] {
        let outcome = run(&dir, shards.len(), threshold).unwrap();
        for (report, rows) in outcome.shards.iter().zip(&shards) {
            assert_eq!(report.counts.total(), rows.len(), "threshold {}", threshold);
            assert_eq!(report.accuracy.row_count, rows.len());
        }
    }
}

#[test]
fn test_accuracy_is_row_weighted() {
    let shards = random_shards(23, &[2, 300, 9, 40]);
    let dir = create_dataset(&shards);

    let outcome = run(&dir, shards.len(), 150000).unwrap();

    let expected = 100.0 * outcome.total_correct() as f64 / outcome.total_rows() as f64;
    assert!((outcome.accuracy - expected).abs() < 1e-9);

    let weighted = outcome
        .shards
        .iter()
        .map(|s| s.accuracy.accuracy * s.accuracy.row_count as f64)
        .sum::<f64>()
        / outcome.total_rows() as f64;
    assert!((outcome.accuracy - weighted).abs() < 1e-9);
}

#[test]
fn test_result_independent_of_partitioning() {
    let shards = random_shards(99, &[60, 20, 120]);
    let combined: Vec<(i64, i64)> = shards.iter().flatten().copied().collect();

    let sharded = create_dataset(&shards);
    let single = create_dataset(&[combined]);

    let a = run(&sharded, 3, 110000).unwrap();
    let b = run(&single, 1, 110000).unwrap();

    assert_close(a.stats.positive(0).0, b.stats.positive(0).0, "positive mean");
    assert_close(a.stats.positive(0).1, b.stats.positive(0).1, "positive std");
    assert_eq!(a.total_correct(), b.total_correct());
    assert_close(a.accuracy, b.accuracy, "accuracy");
}

#[test]
fn test_local_statistics_are_reported_per_shard() {
    let dir = create_worked_example();
    let outcome = run(&dir, 2, 120000).unwrap();

    // Shard 0 positive rows: {200}; shard 1: {150}
    assert_close(outcome.shards[0].local_feature_mean, 200.0, "shard 0 mean");
    assert_close(outcome.shards[1].local_feature_mean, 150.0, "shard 1 mean");
    // Deviation measured from the global mean 175
    assert_close(outcome.shards[0].local_feature_stddev, 25.0, "shard 0 std");
    assert_close(outcome.shards[1].local_feature_stddev, 25.0, "shard 1 std");
}

#[test]
fn test_rows_inside_interval_are_predicted_positive() {
    // Positive feature values 100, 200, 150, 150 -> mean 150, std ~35.36
    let dir = create_dataset(&[
        vec![(100, 10), (200, 10), (150, 10)],
        vec![(150, 10), (10, 0), (160, 0)],
    ]);

    let outcome = run(&dir, 2, 5).unwrap();

    assert_eq!(outcome.shards[0].predicted_positive, 1);
    // 150 (label 1) and 160 (label 0) are both inside
    assert_eq!(outcome.shards[1].predicted_positive, 2);
    assert_eq!(outcome.total_correct(), 3);
}

#[test]
fn test_absent_positive_class_predicts_all_negative() {
    let dir = create_dataset(&[vec![(100, 1), (200, 2)], vec![(300, 3)]]);

    let outcome = run(&dir, 2, 1000).unwrap();

    assert!(outcome.stats.positive(0).0.is_nan());
    assert!(outcome.shards.iter().all(|s| s.predicted_positive == 0));
    assert_eq!(outcome.accuracy, 100.0);
}

#[test]
fn test_malformed_shard_aborts_run() {
    let dir = create_worked_example();
    write_raw_shard(dir.path(), 1, "GrLivArea,SalePrice\n150,n/a\n");

    let err = run(&dir, 2, 120000).unwrap_err();

    assert!(matches!(err, PipelineError::Worker { shard: 1, .. }));
    assert!(matches!(err.root(), PipelineError::Parse { .. }));
}

#[test]
fn test_missing_shard_aborts_run() {
    let dir = create_worked_example();

    // Only shards 0 and 1 exist
    let err = run(&dir, 3, 120000).unwrap_err();

    assert!(matches!(err, PipelineError::Worker { shard: 2, .. }));
    assert!(matches!(err.root(), PipelineError::ShardIo { .. }));
}

#[test]
fn test_failed_run_does_not_reach_done() {
    let dir = create_worked_example();
    let mut pipeline =
        ShardPipeline::new(PipelineConfig::new(dir.path(), 120000).with_shard_count(5));

    assert!(pipeline.run().is_err());
    assert_eq!(pipeline.state(), PipelineState::Phase1Running);
}

#[test]
fn test_mismatched_layouts_rejected() {
    let dir = create_worked_example();
    write_shard(dir.path(), 1, &[FEATURE, TARGET, "Extra"], &[vec![150, 100000, 3]]);

    let err = run(&dir, 2, 120000).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::ShardLayout {
            shard: 1,
            expected: 2,
            actual: 3
        }
    ));
}

#[test]
fn test_missing_directory_is_config_error() {
    let config = PipelineConfig::new("/no/such/dataset/dir", 1).with_shard_count(2);
    let err = ShardPipeline::new(config).run().unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn test_target_fallback_changes_labels() {
    // Without a SalePrice column the last column ("Flag") becomes the target
    let dir = TempDir::new().unwrap();
    write_shard(
        dir.path(),
        0,
        &[FEATURE, "Price", "Flag"],
        &[vec![100, 500000, 0], vec![200, 1, 9]],
    );

    let outcome = run(&dir, 1, 5).unwrap();
    assert_eq!(outcome.shards[0].counts, LabelCounts { n0: 1, n1: 1 });
    assert_close(outcome.stats.positive(0).0, 200.0, "positive mean");
}

#[test]
fn test_padded_shards_match_worked_example() {
    let dir = TempDir::new().unwrap();
    write_raw_shard(dir.path(), 0, "GrLivArea, SalePrice\n100, 50000\n200, 150000\n\n\n");
    write_raw_shard(dir.path(), 1, "GrLivArea,SalePrice\n 150 ,130000\n\n");

    let outcome = run(&dir, 2, 120000).unwrap();

    assert_eq!(outcome.total_rows(), 3);
    assert_eq!(format!("{:.2}", outcome.accuracy), "33.33");
}
