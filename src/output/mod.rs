//! Output module for run summaries and ledger reports
//!
//! This module handles:
//! - Counting what one harvest pass did
//! - Summarizing the ledger for the `--stats` report

pub mod stats;

pub use stats::{load_statistics, print_statistics, LedgerStatistics};

/// Counters for one harvest pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Domains whose search completed
    pub domains_processed: u64,

    /// Domains abandoned after a recoverable error
    pub domains_failed: u64,

    /// Source pages visited
    pub source_pages: u64,

    /// External links found across all source pages
    pub links_found: u64,

    /// Links skipped because the ledger already had them
    pub links_skipped: u64,

    /// Successful conversions
    pub converted: u64,

    /// Failed conversions (still recorded in the ledger)
    pub failed: u64,
}

impl HarvestSummary {
    /// Number of new ledger records written during the pass
    pub fn attempted(&self) -> u64 {
        self.converted + self.failed
    }

    /// Logs the summary at info level
    pub fn log(&self) {
        tracing::info!(
            "Harvest summary: {} domains processed ({} failed), {} source pages, {} external links",
            self.domains_processed,
            self.domains_failed,
            self.source_pages,
            self.links_found
        );
        tracing::info!(
            "  {} converted, {} failed, {} skipped as already processed",
            self.converted,
            self.failed,
            self.links_skipped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempted_counts_both_outcomes() {
        let summary = HarvestSummary {
            converted: 3,
            failed: 2,
            links_skipped: 7,
            ..HarvestSummary::default()
        };
        assert_eq!(summary.attempted(), 5);
    }
}
