//! News-Harvest: external link snapshotter for news sites
//!
//! This crate searches a fixed list of news domains for recent pages, pulls the
//! outbound links off each page, and renders every link it has never seen before
//! into a PDF snapshot. Every attempt is recorded in an append-only CSV ledger so
//! later runs skip what earlier runs already handled.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for News-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status_code} for {url}")]
    HttpStatus { url: String, status_code: u16 },

    #[error("Search failed for {query}: {message}")]
    Search { query: String, message: String },

    #[error("PDF conversion failed for {url}: {message}")]
    Conversion { url: String, message: String },

    #[error("Ledger error: {0}")]
    Ledger(#[from] storage::LedgerError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    /// Returns true if the driver may log this error and move on
    ///
    /// Network, search and render failures only ever cost the item they
    /// occurred on. Ledger and filesystem failures abort the run, since carrying
    /// on would lose deduplication records.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. }
                | Self::Timeout { .. }
                | Self::HttpStatus { .. }
                | Self::Search { .. }
                | Self::Conversion { .. }
                | Self::UrlError(_)
                | Self::Reqwest(_)
        )
    }

    /// Builds the matching error variant from a reqwest failure on `url`
    pub fn from_request(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                url: url.to_string(),
                status_code: status.as_u16(),
            }
        } else {
            Self::Fetch {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for News-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Harvester;
pub use output::HarvestSummary;
pub use state::ConversionStatus;
pub use storage::{CsvLedger, Ledger, LedgerRecord};
pub use crate::url::{artifact_file_name, domain_host, is_external};
