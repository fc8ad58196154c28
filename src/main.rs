//! shardacc: Sharded Accuracy CLI Tool
//!
//! Computes the accuracy of a single-feature Gaussian-threshold classifier
//! over a dataset split into fixed CSV shards.

use anyhow::{Context, Result};
use clap::Parser;

use shardacc::cli::Cli;
use shardacc::pipeline::ShardPipeline;
use shardacc::report::{export_run, RunSummary};
use shardacc::utils::{
    format_accuracy, print_banner, print_completion, print_config, print_info,
    print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config();

    // Progress bars draw on stderr; stdout stays empty unless every step succeeds
    let mut pipeline = ShardPipeline::new(config).with_progress(cli.verbose);
    let outcome = pipeline.run().context("Evaluation aborted")?;

    if let Some(path) = &cli.export {
        export_run(pipeline.config(), &outcome, path)?;
    }

    if cli.verbose {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(pipeline.config());
        print_step_header(1, "Sharded Evaluation");
        print_success(&format!(
            "{} shard(s), {} row(s) evaluated",
            outcome.shards.len(),
            outcome.total_rows()
        ));
        print_step_time(outcome.timings.total());
        RunSummary::new(&outcome, &pipeline.config().feature_name).display();

        if let Some(path) = &cli.export {
            print_info(&format!("Run report written to {}", path.display()));
        }
        print_completion();
    }

    println!("{}", format_accuracy(outcome.accuracy));

    Ok(())
}
