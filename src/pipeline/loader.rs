//! Shard loader for integer CSV partitions
//!
//! Each shard file has a header row naming its columns followed by rows of
//! plain integers. Loading resolves where the feature, target and prediction
//! slots live and appends a zeroed prediction field to every row.

use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;

use super::error::{PipelineError, Result};

/// One parsed record: every CSV field followed by the prediction slot
pub type Row = Vec<i64>;

/// Column positions resolved from a shard header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub feature_index: usize,
    pub target_index: usize,
    /// One past the last parsed column
    pub predict_index: usize,
}

/// Resolve column positions from a header.
///
/// Repeated names resolve to their last occurrence. A column that matches
/// `feature_name` is never taken as the target, so when the target is absent
/// (or shares the feature's name) it falls back to the last parsed column.
/// Returns `None` when the header has no `feature_name` column.
pub fn resolve_columns<S: AsRef<str>>(
    header: &[S],
    feature_name: &str,
    target_name: &str,
) -> Option<ColumnLayout> {
    let feature_index = header.iter().rposition(|h| h.as_ref() == feature_name)?;
    let target_index = header
        .iter()
        .rposition(|h| h.as_ref() == target_name && h.as_ref() != feature_name)
        .unwrap_or(header.len() - 1);

    Some(ColumnLayout {
        feature_index,
        target_index,
        predict_index: header.len(),
    })
}

/// A loaded shard: its rows plus the resolved column layout
#[derive(Debug, Clone)]
pub struct Shard {
    pub rows: Vec<Row>,
    pub feature_index: usize,
    pub target_index: usize,
    pub predict_index: usize,
}

impl Shard {
    /// Build a shard from parsed records, appending a `0` prediction field to each.
    pub fn new(layout: ColumnLayout, records: Vec<Vec<i64>>) -> Self {
        let rows = records
            .into_iter()
            .map(|mut record| {
                record.push(0);
                record
            })
            .collect();

        Self {
            rows,
            feature_index: layout.feature_index,
            target_index: layout.target_index,
            predict_index: layout.predict_index,
        }
    }

    /// Number of data fields per row, excluding the prediction slot
    pub fn num_fields(&self) -> usize {
        self.predict_index
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load one shard file.
///
/// Blank lines are skipped and whitespace around each field is ignored. Any
/// non-integer or empty field aborts the whole shard with a parse error.
pub fn load_shard(path: &Path, feature_name: &str, target_name: &str) -> Result<Shard> {
    let contents = std::fs::read_to_string(path).map_err(|source| PipelineError::ShardIo {
        path: path.to_path_buf(),
        source,
    })?;

    let lines = normalized_lines(&contents);
    let header: Vec<&str> = match lines.first() {
        Some(line) => line.split(',').collect(),
        None => return Err(parse_error(path, "shard has no header row".to_string())),
    };

    // Resolve against the raw header: polars renames repeated column names
    let layout = resolve_columns(&header, feature_name, target_name).ok_or_else(|| {
        parse_error(
            path,
            format!(
                "feature column '{}' not found in header {:?}",
                feature_name, header
            ),
        )
    })?;

    if lines.len() == 1 {
        return Ok(Shard::new(layout, Vec::new()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(lines.join("\n").into_bytes()))
        .finish()
        .map_err(|e| parse_error(path, e.to_string()))?;

    if df.width() != header.len() {
        return Err(parse_error(
            path,
            format!(
                "header names {} column(s) but rows parsed into {}",
                header.len(),
                df.width()
            ),
        ));
    }

    let columns = df
        .get_columns()
        .iter()
        .map(integer_values)
        .collect::<std::result::Result<Vec<_>, String>>()
        .map_err(|message| parse_error(path, message))?;

    Ok(Shard::new(layout, transpose(&columns, df.height())))
}

/// Non-blank lines with every comma-separated field trimmed
fn normalized_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(',').map(str::trim).collect::<Vec<_>>().join(","))
        .collect()
}

fn parse_error(path: &Path, message: String) -> PipelineError {
    PipelineError::Parse {
        path: path.to_path_buf(),
        message,
    }
}

/// Extract a column as integers, rejecting floats, strings and empty fields
fn integer_values(column: &Column) -> std::result::Result<Vec<i64>, String> {
    if !column.dtype().is_integer() {
        return Err(format!(
            "column '{}' contains non-integer values (inferred type {})",
            column.name(),
            column.dtype()
        ));
    }

    if column.null_count() > 0 {
        return Err(format!(
            "column '{}' has {} empty field(s)",
            column.name(),
            column.null_count()
        ));
    }

    let cast = column
        .cast(&DataType::Int64)
        .map_err(|e| format!("column '{}': {}", column.name(), e))?;

    // Out-of-range unsigned values become null on cast
    if cast.null_count() > 0 {
        return Err(format!(
            "column '{}' has values outside the 64-bit integer range",
            column.name()
        ));
    }

    let values = cast
        .i64()
        .map_err(|e| format!("column '{}': {}", column.name(), e))?
        .into_no_null_iter()
        .collect();

    Ok(values)
}

fn transpose(columns: &[Vec<i64>], height: usize) -> Vec<Vec<i64>> {
    (0..height)
        .map(|row| columns.iter().map(|col| col[row]).collect())
        .collect()
}
