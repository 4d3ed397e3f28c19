//! Statistics over a written report
//!
//! This module provides functionality for summarizing a report CSV and
//! displaying the summary.

use crate::output::report::ReportFile;
use chrono::NaiveDate;

/// Report statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportStatistics {
    /// Number of rows (completed days)
    pub days: usize,

    /// Earliest and latest row dates
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,

    /// Sum of `url quantity` over all rows
    pub total_urls: usize,

    /// Per keyword: total pages matched, in column order
    pub keyword_totals: Vec<(String, u64)>,

    /// Per keyword: days with at least one matching page
    pub days_with_match: Vec<(String, usize)>,
}

/// Summarizes a report read with [`read_report`](crate::output::read_report)
pub fn summarize_report(report: &ReportFile) -> ReportStatistics {
    let rows = &report.rows;

    let keyword_totals = report
        .keywords
        .iter()
        .map(|k| {
            let total = rows
                .iter()
                .map(|r| u64::from(r.match_counts.get(k).unwrap_or(0)))
                .sum();
            (k.clone(), total)
        })
        .collect();

    let days_with_match = report
        .keywords
        .iter()
        .map(|k| {
            let days = rows
                .iter()
                .filter(|r| r.match_counts.get(k).unwrap_or(0) > 0)
                .count();
            (k.clone(), days)
        })
        .collect();

    ReportStatistics {
        days: rows.len(),
        first_date: rows.iter().map(|r| r.date).min(),
        last_date: rows.iter().map(|r| r.date).max(),
        total_urls: rows.iter().map(|r| r.url_quantity).sum(),
        keyword_totals,
        days_with_match,
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ReportStatistics) {
    println!("=== Report Statistics ===\n");

    println!("Overview:");
    println!("  Days covered: {}", stats.days);
    match (stats.first_date, stats.last_date) {
        (Some(first), Some(last)) => println!("  Date range: {} to {}", first, last),
        _ => println!("  Date range: (empty report)"),
    }
    println!("  Total URLs collected: {}", stats.total_urls);
    if stats.days > 0 {
        println!(
            "  Average URLs per day: {:.1}",
            stats.total_urls as f64 / stats.days as f64
        );
    }
    println!();

    if stats.keyword_totals.is_empty() {
        return;
    }

    println!("Keywords (pages matched / days with a match):");
    // Sort keywords by pages matched (descending)
    let mut totals: Vec<_> = stats.keyword_totals.iter().zip(&stats.days_with_match).collect();
    totals.sort_by(|a, b| b.0 .1.cmp(&a.0 .1));

    for ((keyword, total), (_, days)) in totals {
        let percentage = if stats.total_urls > 0 {
            (*total as f64 / stats.total_urls as f64) * 100.0
        } else {
            0.0
        };
        println!(
            "  {}: {} ({:.1}% of URLs), {} / {} days",
            keyword, total, percentage, days, stats.days
        );
    }
}
