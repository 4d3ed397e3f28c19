//! Joining several report CSVs into one
//!
//! Useful when a long date range was crawled in several runs (or a run was
//! truncated and resumed later).

use crate::output::traits::{OutputError, OutputResult};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Concatenates CSV reports into `output`
///
/// The output header is the union of the input headers in first-seen
/// order; cells a report does not have are left empty. Rows keep input
/// order unless `sort_by` names a column, in which case they are stably
/// sorted ascending by it.
///
/// # Arguments
///
/// * `inputs` - Report CSVs, in order
/// * `output` - Destination CSV (overwritten)
/// * `sort_by` - Optional column to sort on
///
/// # Returns
///
/// * `Ok(usize)` - Number of rows written
/// * `Err(OutputError::MissingColumn)` - `sort_by` is in no input header
pub fn merge_reports(
    inputs: &[PathBuf],
    output: &Path,
    sort_by: Option<&str>,
) -> OutputResult<usize> {
    let mut header: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for input in inputs {
        let mut reader = csv::Reader::from_path(input)?;
        let input_header: Vec<String> = reader.headers()?.iter().map(String::from).collect();

        // Position of each input column in the merged header
        let mut positions = Vec::with_capacity(input_header.len());
        for column in &input_header {
            let position = match header.iter().position(|h| h == column) {
                Some(position) => position,
                None => {
                    header.push(column.clone());
                    header.len() - 1
                }
            };
            positions.push(position);
        }

        let before = rows.len();
        for record in reader.records() {
            let record = record?;
            let mut row = Vec::new();
            for (value, &position) in record.iter().zip(&positions) {
                if row.len() <= position {
                    row.resize(position + 1, String::new());
                }
                row[position] = value.to_string();
            }
            rows.push(row);
        }
        tracing::debug!("Read {} rows from {}", rows.len() - before, input.display());
    }

    for row in &mut rows {
        row.resize(header.len(), String::new());
    }

    if let Some(column) = sort_by {
        let index = header
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| OutputError::MissingColumn(column.to_string()))?;
        rows.sort_by(|a, b| compare_cells(&a[index], &b[index]));
    }

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(&header)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    tracing::info!(
        "Merged {} reports into {} ({} rows)",
        inputs.len(),
        output.display(),
        rows.len()
    );
    Ok(rows.len())
}

/// Numeric comparison when both cells are numbers, lexical otherwise
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}
