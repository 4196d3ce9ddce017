//! State module for tracking harvest outcomes
//!
//! `ConversionStatus` is the terminal state of one external URL: either the PDF
//! was produced or the conversion failed with a cause. It is the value the
//! ledger's status column holds.

mod conversion_status;

// Re-export main types
pub use conversion_status::{ConversionStatus, ERROR_PREFIX};
