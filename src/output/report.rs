//! CSV report and JSON metadata sidecar
//!
//! A run produces two files sharing one stem:
//! - `<stem>.csv`: `date, url quantity, urls, <keyword>...`, one row per day
//! - `<stem>.txt`: JSON object with the run's keywords and covered range
//!
//! The stem is `{from:%d-%m-%Y}_{to:%d-%m-%Y}_{unix seconds}.{micros}`,
//! where `to` is the last day actually covered.

use crate::matcher::KeywordMatchCounts;
use crate::output::traits::{
    CrawlReport, DailyResult, OutputError, OutputResult, ReportPaths, ReportWriter, RunMetadata,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Leading columns of every report, before the keyword columns
pub const FIXED_COLUMNS: [&str; 3] = ["date", "url quantity", "urls"];

const CSV_DATE_FORMAT: &str = "%Y-%m-%d";
const STEM_DATE_FORMAT: &str = "%d-%m-%Y";

/// Writes reports as a CSV file plus a JSON sidecar in one folder
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    folder: PathBuf,
}

impl CsvReportWriter {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// Writes the report using `at` as the run timestamp
    pub fn write_at(&self, report: &CrawlReport, at: DateTime<Utc>) -> OutputResult<ReportPaths> {
        fs::create_dir_all(&self.folder)?;

        let meta = &report.metadata;
        let stem = report_stem(meta.actual_from, meta.actual_to, at);
        let paths = ReportPaths {
            csv: self.folder.join(format!("{}.csv", stem)),
            metadata: self.folder.join(format!("{}.txt", stem)),
        };

        write_csv(&paths.csv, report)?;
        fs::write(&paths.metadata, serde_json::to_string_pretty(meta)?)?;

        tracing::info!(
            "Wrote {} rows to {}",
            report.rows.len(),
            paths.csv.display()
        );
        Ok(paths)
    }
}

impl ReportWriter for CsvReportWriter {
    fn write_report(&self, report: &CrawlReport) -> OutputResult<ReportPaths> {
        self.write_at(report, Utc::now())
    }
}

/// File stem for a run covering `from..=to`, stamped at `at`
pub fn report_stem(from: NaiveDate, to: NaiveDate, at: DateTime<Utc>) -> String {
    format!(
        "{}_{}_{}.{:06}",
        from.format(STEM_DATE_FORMAT),
        to.format(STEM_DATE_FORMAT),
        at.timestamp(),
        at.timestamp_subsec_micros()
    )
}

fn write_csv(path: &Path, report: &CrawlReport) -> OutputResult<()> {
    let keywords = &report.metadata.content_keywords;
    let mut writer = csv::Writer::from_path(path)?;

    let header = FIXED_COLUMNS
        .iter()
        .copied()
        .chain(keywords.iter().map(String::as_str));
    writer.write_record(header)?;

    for row in &report.rows {
        let mut record = vec![
            row.date.format(CSV_DATE_FORMAT).to_string(),
            row.url_quantity().to_string(),
            serde_json::to_string(&row.urls)?,
        ];
        record.extend(
            keywords
                .iter()
                .map(|k| row.match_counts.get(k).unwrap_or(0).to_string()),
        );
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// One row read back from a report CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub url_quantity: usize,
    pub urls: Vec<String>,
    /// Counts in header order
    pub match_counts: KeywordMatchCounts,
}

impl From<&DailyResult> for ReportRow {
    fn from(result: &DailyResult) -> Self {
        Self {
            date: result.date,
            url_quantity: result.url_quantity(),
            urls: result.urls.clone(),
            match_counts: result.match_counts.clone(),
        }
    }
}

/// A report CSV as read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    /// Keyword columns, in header order
    pub keywords: Vec<String>,
    pub rows: Vec<ReportRow>,
}

/// Reads a report CSV written by [`CsvReportWriter`]
///
/// # Arguments
///
/// * `path` - Path to the `.csv` file
///
/// # Returns
///
/// * `Ok(ReportFile)` - Keyword columns and every row
/// * `Err(OutputError)` - Unreadable file or unexpected layout
pub fn read_report(path: &Path) -> OutputResult<ReportFile> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let leading: Vec<&str> = headers.iter().take(FIXED_COLUMNS.len()).collect();
    if leading != FIXED_COLUMNS {
        return Err(OutputError::Format(format!(
            "{}: expected leading columns {:?}, found {:?}",
            path.display(),
            FIXED_COLUMNS,
            leading
        )));
    }
    let keywords: Vec<String> = headers
        .iter()
        .skip(FIXED_COLUMNS.len())
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("");
        let bad = |what: &str| {
            OutputError::Format(format!("{}: row {}: invalid {}", path.display(), line + 1, what))
        };

        let date = NaiveDate::parse_from_str(field(0), CSV_DATE_FORMAT).map_err(|_| bad("date"))?;
        let url_quantity = field(1).parse().map_err(|_| bad("url quantity"))?;
        let urls: Vec<String> = serde_json::from_str(field(2))?;

        let mut entries = Vec::with_capacity(keywords.len());
        for (i, keyword) in keywords.iter().enumerate() {
            let count = field(FIXED_COLUMNS.len() + i)
                .parse()
                .map_err(|_| bad(keyword.as_str()))?;
            entries.push((keyword.clone(), count));
        }

        rows.push(ReportRow {
            date,
            url_quantity,
            urls,
            match_counts: KeywordMatchCounts::from_entries(entries),
        });
    }

    Ok(ReportFile { keywords, rows })
}

/// Reads a metadata sidecar
pub fn read_metadata(path: &Path) -> OutputResult<RunMetadata> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
