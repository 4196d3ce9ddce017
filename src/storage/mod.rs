//! Storage module for the processed-URL ledger
//!
//! This module handles everything persisted between runs:
//! - The ledger record type and its CSV column layout
//! - Creating the ledger file with its header on first use
//! - Loading previously seen external URLs for deduplication
//! - Appending one row per conversion attempt

mod csv_ledger;
mod traits;

pub use csv_ledger::{load, read_records, CsvLedger};
pub use traits::{Ledger, LedgerError, LedgerResult};

use crate::state::ConversionStatus;
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Column names of the ledger file, in order
pub const LEDGER_HEADER: [&str; 5] = [
    "Timestamp",
    "Source URL",
    "External URL",
    "PDF Path",
    "Status",
];

/// Timestamp layout used in the ledger
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One processed external URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    pub timestamp: String,
    pub source_url: String,
    pub external_url: String,
    pub artifact_path: PathBuf,
    pub status: ConversionStatus,
}

impl LedgerRecord {
    /// Creates a record stamped with the current local time
    pub fn new(
        source_url: &str,
        external_url: &str,
        artifact_path: PathBuf,
        status: ConversionStatus,
    ) -> Self {
        Self::at(Local::now(), source_url, external_url, artifact_path, status)
    }

    /// Creates a record with an explicit timestamp
    pub fn at(
        when: DateTime<Local>,
        source_url: &str,
        external_url: &str,
        artifact_path: PathBuf,
        status: ConversionStatus,
    ) -> Self {
        Self {
            timestamp: when.format(TIMESTAMP_FORMAT).to_string(),
            source_url: source_url.to_string(),
            external_url: external_url.to_string(),
            artifact_path,
            status,
        }
    }

    /// Returns the record as a CSV row in header order
    pub fn to_row(&self) -> [String; 5] {
        [
            self.timestamp.clone(),
            self.source_url.clone(),
            self.external_url.clone(),
            self.artifact_path.to_string_lossy().into_owned(),
            self.status.to_ledger_string(),
        ]
    }
}
