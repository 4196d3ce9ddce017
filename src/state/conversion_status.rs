//! Conversion outcome definitions recorded in the ledger
//!
//! Each processed external URL ends in exactly one of these states. The ledger
//! stores them as the strings `Success` and `Error: <cause>`.
use std::fmt;

/// Prefix of every failed status in the ledger
pub const ERROR_PREFIX: &str = "Error: ";

/// Result of converting one external URL to a PDF
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversionStatus {
    /// PDF was written to the artifact path
    Success,

    /// Conversion failed; carries the underlying cause
    Error(String),
}

impl ConversionStatus {
    /// Returns true if the PDF was produced
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true if the conversion failed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Converts the status to its ledger string representation
    pub fn to_ledger_string(&self) -> String {
        match self {
            Self::Success => "Success".to_string(),
            Self::Error(cause) => format!("{}{}", ERROR_PREFIX, cause),
        }
    }

    /// Parses a status from its ledger string representation
    ///
    /// Returns None if the string is neither `Success` nor an `Error:` status.
    pub fn from_ledger_string(s: &str) -> Option<Self> {
        if s == "Success" {
            return Some(Self::Success);
        }

        s.strip_prefix("Error:")
            .map(|cause| Self::Error(cause.trim_start().to_string()))
    }
}

impl<E: fmt::Display> From<Result<(), E>> for ConversionStatus {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ledger_string())
    }
}
