//! shardacc: Sharded Accuracy Library
//!
//! Evaluates a single-feature Gaussian-threshold classifier over a dataset
//! split into fixed CSV shards, using a three-phase fork-join pipeline
//! that reduces per-shard sums into global statistics.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
