//! Terminal styling utilities for verbose run output

use std::path::Path;
use std::time::Duration;

use console::{style, Emoji};

use crate::pipeline::PipelineConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static SCISSORS: Emoji<'_, '_> = Emoji("✂️  ", "");

/// The single result line printed on stdout
pub fn format_accuracy(accuracy: f64) -> String {
    format!("Accuracy: {:.2}%", accuracy)
}

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("shardacc").cyan().bold(),
        style("sharded Gaussian-threshold accuracy").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(config: &PipelineConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Directory: {:<36}│",
        FOLDER,
        truncate_path(&config.dataset_directory, 35)
    );
    println!(
        "    │  {} Shards:    {:<36}│",
        CHART,
        format!(
            "{} ({}N{})",
            config.shard_count, config.filename_prefix, config.filename_suffix
        )
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Feature:   {:<36}│",
        TARGET,
        truncate_string(&config.feature_name, 35)
    );
    println!(
        "    │  {} Target:    {:<36}│",
        TARGET,
        truncate_string(&config.target_name, 35)
    );
    println!(
        "    │  {} Threshold: {:<36}│",
        SCISSORS,
        style(config.threshold).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("PHASE {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print how long a phase took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("⏱  {:.2?}", elapsed)).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Evaluation complete!").green().bold()
    );
    println!();
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max_len - 3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}
