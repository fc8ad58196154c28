//! Run summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{PipelineOutcome, NEGATIVE, POSITIVE};

/// Per-shard and global view of a completed run
pub struct RunSummary<'a> {
    outcome: &'a PipelineOutcome,
    feature_name: &'a str,
}

impl<'a> RunSummary<'a> {
    pub fn new(outcome: &'a PipelineOutcome, feature_name: &'a str) -> Self {
        Self {
            outcome,
            feature_name,
        }
    }

    /// Table with one row per shard plus a weighted total row
    pub fn shard_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Shard").add_attribute(Attribute::Bold),
            Cell::new("Rows").add_attribute(Attribute::Bold),
            Cell::new("Class 0").add_attribute(Attribute::Bold),
            Cell::new("Class 1").add_attribute(Attribute::Bold),
            Cell::new("Predicted 1").add_attribute(Attribute::Bold),
            Cell::new("Correct").add_attribute(Attribute::Bold),
            Cell::new("Accuracy").add_attribute(Attribute::Bold),
        ]);

        for shard in &self.outcome.shards {
            table.add_row(vec![
                Cell::new(shard.index),
                Cell::new(shard.accuracy.row_count).set_alignment(CellAlignment::Right),
                Cell::new(shard.counts.n0).set_alignment(CellAlignment::Right),
                Cell::new(shard.counts.n1).set_alignment(CellAlignment::Right),
                Cell::new(shard.predicted_positive).set_alignment(CellAlignment::Right),
                Cell::new(shard.accuracy.correct).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.2}%", shard.accuracy.accuracy))
                    .fg(accuracy_color(shard.accuracy.accuracy))
                    .set_alignment(CellAlignment::Right),
            ]);
        }

        let n0: usize = self.outcome.shards.iter().map(|s| s.counts.n0).sum();
        let n1: usize = self.outcome.shards.iter().map(|s| s.counts.n1).sum();
        let predicted: usize = self.outcome.shards.iter().map(|s| s.predicted_positive).sum();

        table.add_row(vec![
            Cell::new("All").add_attribute(Attribute::Bold),
            Cell::new(self.outcome.total_rows()).set_alignment(CellAlignment::Right),
            Cell::new(n0).set_alignment(CellAlignment::Right),
            Cell::new(n1).set_alignment(CellAlignment::Right),
            Cell::new(predicted).set_alignment(CellAlignment::Right),
            Cell::new(self.outcome.total_correct()).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}%", self.outcome.accuracy))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
        ]);

        table
    }

    /// Global mean and standard deviation of the feature for both classes
    pub fn stats_table(&self) -> Table {
        let field = self.outcome.feature_index;
        let stats = &self.outcome.stats;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Class").add_attribute(Attribute::Bold),
            Cell::new(format!("Mean {}", self.feature_name)).add_attribute(Attribute::Bold),
            Cell::new(format!("Std {}", self.feature_name)).add_attribute(Attribute::Bold),
        ]);

        for (label, (mean, std)) in [
            (NEGATIVE, stats.negative(field)),
            (POSITIVE, stats.positive(field)),
        ] {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(format!("{:.4}", mean)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.4}", std)).set_alignment(CellAlignment::Right),
            ]);
        }

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("GLOBAL STATISTICS").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();
        print_indented(&self.stats_table());

        let (u, std) = self.outcome.stats.positive(self.outcome.feature_index);
        println!();
        println!(
            "      Decision interval: {} < {} < {}",
            style(format!("{:.4}", u - std)).yellow(),
            self.feature_name,
            style(format!("{:.4}", u + std)).yellow()
        );

        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("SHARD SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();
        print_indented(&self.shard_table());

        let timings = &self.outcome.timings;
        println!();
        println!(
            "      {}",
            style(format!(
                "Load {:.2?} · Deviation {:.2?} · Predict {:.2?} · Total {:.2?}",
                timings.load,
                timings.deviation,
                timings.predict,
                timings.total()
            ))
            .dim()
        );
    }
}

fn accuracy_color(accuracy: f64) -> Color {
    if accuracy >= 75.0 {
        Color::Green
    } else if accuracy >= 50.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

// Indent the table
fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}
