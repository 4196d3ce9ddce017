//! Ledger trait and error types
//!
//! This module defines the trait interface for ledger backends and
//! associated error types.

use crate::storage::LedgerRecord;
use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed ledger row {line}: {message}")]
    MalformedRow { line: u64, message: String },
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Trait for ledger backend implementations
///
/// A ledger is the deduplication key for external URLs. Implementations keep
/// the set of seen URLs in memory and persist every appended record before
/// returning.
pub trait Ledger {
    /// Checks whether an external URL has already been processed
    ///
    /// Answers from memory; storage is not re-read.
    fn contains(&self, external_url: &str) -> bool;

    /// Durably appends one record and marks its external URL as seen
    ///
    /// Earlier records are never rewritten or reordered.
    fn append(&mut self, record: &LedgerRecord) -> LedgerResult<()>;

    /// Number of distinct external URLs seen so far
    fn seen_count(&self) -> usize;
}
