//! Statistics generated from the ledger file
//!
//! This module provides functionality for summarizing what the ledger has
//! recorded across every run so far.

use crate::state::ConversionStatus;
use crate::storage::{read_records, LedgerResult};
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// Ledger statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerStatistics {
    /// Total number of recorded external URLs
    pub total: u64,

    /// Conversions that produced a PDF
    pub successes: u64,

    /// Conversions recorded with an error status
    pub failures: u64,

    /// Records per external host
    pub by_host: BTreeMap<String, u64>,

    /// Failure causes and how often each occurred
    pub error_summary: BTreeMap<String, u64>,

    /// Timestamp of the first and last record, if any
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
}

/// Loads statistics from the ledger at `path`
///
/// A missing ledger yields empty statistics.
///
/// # Returns
///
/// * `Ok(LedgerStatistics)` - Successfully summarized the ledger
/// * `Err(LedgerError)` - The file could not be read or has a malformed row
pub fn load_statistics(path: &Path) -> LedgerResult<LedgerStatistics> {
    let records = read_records(path)?;
    let mut stats = LedgerStatistics::default();

    for record in &records {
        stats.total += 1;

        match &record.status {
            ConversionStatus::Success => stats.successes += 1,
            ConversionStatus::Error(cause) => {
                stats.failures += 1;
                *stats.error_summary.entry(cause.clone()).or_insert(0) += 1;
            }
        }

        let host = Url::parse(&record.external_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "(unparsable)".to_string());
        *stats.by_host.entry(host).or_insert(0) += 1;
    }

    stats.first_seen = records.first().map(|r| r.timestamp.clone());
    stats.last_seen = records.last().map(|r| r.timestamp.clone());

    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &LedgerStatistics) {
    println!("=== Ledger Statistics ===\n");

    println!("Overview:");
    println!("  Tracked external URLs: {}", stats.total);
    println!("  Converted: {}", stats.successes);
    println!("  Failed: {}", stats.failures);
    if let (Some(first), Some(last)) = (&stats.first_seen, &stats.last_seen) {
        println!("  First record: {}", first);
        println!("  Last record: {}", last);
    }
    println!();

    if !stats.by_host.is_empty() {
        println!("Top Hosts:");
        let mut host_counts: Vec<_> = stats.by_host.iter().collect();
        host_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (host, count) in host_counts.into_iter().take(10) {
            println!("  {}: {}", host, count);
        }
        println!();
    }

    if !stats.error_summary.is_empty() {
        println!("Error Summary:");
        let mut error_counts: Vec<_> = stats.error_summary.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (cause, count) in error_counts.into_iter().take(10) {
            println!("  {}: {}", cause, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} URLs converted)",
        stats.success_rate(),
        stats.successes,
        stats.total
    );
}

impl LedgerStatistics {
    pub fn success_rate(&self) -> f64 {
        if self.total > 0 {
            (self.successes as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}
