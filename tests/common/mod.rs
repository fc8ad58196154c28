//! Shared test utilities and shard fixture generators

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

pub const FEATURE: &str = "GrLivArea";
pub const TARGET: &str = "SalePrice";

/// Write one shard file named `dataset_<index>.csv` into `dir`
pub fn write_shard(dir: &Path, index: usize, header: &[&str], rows: &[Vec<i64>]) -> PathBuf {
    let path = dir.join(format!("dataset_{}.csv", index));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{}", header.join(",")).unwrap();
    for row in rows {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(file, "{}", fields.join(",")).unwrap();
    }
    path
}

/// Write a raw shard body verbatim (for malformed-content tests)
pub fn write_raw_shard(dir: &Path, index: usize, contents: &str) -> PathBuf {
    let path = dir.join(format!("dataset_{}.csv", index));
    std::fs::write(&path, contents).unwrap();
    path
}

/// Create a temporary dataset directory with one shard per entry,
/// all using the `GrLivArea,SalePrice` header
pub fn create_dataset(shards: &[Vec<(i64, i64)>]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (index, rows) in shards.iter().enumerate() {
        let rows: Vec<Vec<i64>> = rows.iter().map(|&(f, t)| vec![f, t]).collect();
        write_shard(temp_dir.path(), index, &[FEATURE, TARGET], &rows);
    }
    temp_dir
}

/// The two-shard worked example: expected accuracy 33.33%
pub fn create_worked_example() -> TempDir {
    create_dataset(&[
        vec![(100, 50000), (200, 150000)],
        vec![(150, 100000)],
    ])
}

/// Random shards of unequal size with a weak relation between feature and target
pub fn random_shards(seed: u64, sizes: &[usize]) -> Vec<Vec<(i64, i64)>> {
    let mut rng = StdRng::seed_from_u64(seed);
    sizes
        .iter()
        .map(|&n| {
            (0..n)
                .map(|_| {
                    let area = rng.gen_range(500..4000);
                    let price = area * 60 + rng.gen_range(-60000..60000);
                    (area, price)
                })
                .collect()
        })
        .collect()
}

/// Population mean and standard deviation of the feature over rows with
/// the given label, computed directly on the combined dataset
pub fn textbook_stats(shards: &[Vec<(i64, i64)>], threshold: i64, positive: bool) -> (f64, f64) {
    let values: Vec<f64> = shards
        .iter()
        .flatten()
        .filter(|(_, t)| (*t >= threshold) == positive)
        .map(|(f, _)| *f as f64)
        .collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Assert two floats agree within a relative tolerance
pub fn assert_close(actual: f64, expected: f64, what: &str) {
    let tol = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tol,
        "{} mismatch: expected {}, got {}",
        what,
        expected,
        actual
    );
}
