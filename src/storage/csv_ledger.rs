//! CSV ledger implementation
//!
//! This module provides a CSV-file implementation of the Ledger trait.

use crate::state::ConversionStatus;
use crate::storage::traits::{Ledger, LedgerError, LedgerResult};
use crate::storage::{LedgerRecord, LEDGER_HEADER};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Append-only CSV ledger with an in-memory seen set
pub struct CsvLedger {
    path: PathBuf,
    seen: HashSet<String>,
}

impl CsvLedger {
    /// Opens the ledger at `path`, creating it with a header if absent
    ///
    /// All previously recorded external URLs are loaded into memory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the ledger CSV file
    ///
    /// # Returns
    ///
    /// * `Ok(CsvLedger)` - Ledger ready for lookups and appends
    /// * `Err(LedgerError)` - Failed to create or read the file
    pub fn open(path: &Path) -> LedgerResult<Self> {
        let seen = load(path)?;
        tracing::info!(
            "Loaded {} tracked URLs from {}",
            seen.len(),
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            seen,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Ledger for CsvLedger {
    fn contains(&self, external_url: &str) -> bool {
        self.seen.contains(external_url)
    }

    fn append(&mut self, record: &LedgerRecord) -> LedgerResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer.write_record(record.to_row())?;
        writer.flush()?;

        self.seen.insert(record.external_url.clone());
        Ok(())
    }

    fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Writes the header row if the ledger file is missing or empty
fn ensure_header(path: &Path) -> LedgerResult<()> {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
        Err(e) => return Err(e.into()),
    };

    if size > 0 {
        return Ok(());
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(LEDGER_HEADER)?;
    writer.flush()?;

    tracing::debug!("Initialized ledger at {}", path.display());
    Ok(())
}

fn is_header(record: &csv::StringRecord) -> bool {
    record.get(0) == Some(LEDGER_HEADER[0]) && record.get(2) == Some(LEDGER_HEADER[2])
}

/// Loads the set of previously processed external URLs
///
/// Creates the file with its header if it does not exist yet. Rows with fewer
/// than three fields, and rows that cannot be decoded, are skipped.
pub fn load(path: &Path) -> LedgerResult<HashSet<String>> {
    ensure_header(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut seen = HashSet::new();
    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Skipping unreadable ledger row: {}", e);
                continue;
            }
        };

        if is_header(&record) {
            continue;
        }

        if let Some(url) = record.get(2).filter(|u| !u.is_empty()) {
            seen.insert(url.to_string());
        }
    }

    Ok(seen)
}

/// Reads every data row of the ledger as records
///
/// A missing file reads as an empty ledger. Rows with fewer than three fields
/// are skipped, as in [`load`]; a row whose status column is not a known
/// status is reported as malformed.
pub fn read_records(path: &Path) -> LedgerResult<Vec<LedgerRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if is_header(&record) || record.len() < 3 {
            continue;
        }

        let field = |i: usize| record.get(i).unwrap_or("").to_string();
        let raw_status = field(4);
        let status = ConversionStatus::from_ledger_string(&raw_status).ok_or_else(|| {
            LedgerError::MalformedRow {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                message: format!("unknown status '{}'", raw_status),
            }
        })?;

        records.push(LedgerRecord {
            timestamp: field(0),
            source_url: field(1),
            external_url: field(2),
            artifact_path: PathBuf::from(field(3)),
            status,
        });
    }

    Ok(records)
}
