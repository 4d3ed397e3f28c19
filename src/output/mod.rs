//! Output module for persisting and inspecting crawl reports
//!
//! This module handles:
//! - Writing the report CSV and its JSON metadata sidecar
//! - Reading reports back
//! - Merging several reports into one
//! - Summarizing a report for the `--stats` mode

mod merge;
mod report;
pub mod stats;
mod traits;

pub use merge::merge_reports;
pub use report::{
    read_metadata, read_report, report_stem, CsvReportWriter, ReportFile, ReportRow,
    FIXED_COLUMNS,
};
pub use stats::{print_statistics, summarize_report, ReportStatistics};
pub use traits::{
    CrawlReport, DailyResult, OutputError, OutputResult, ReportPaths, ReportWriter, RunMetadata,
};
