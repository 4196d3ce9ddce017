//! URL handling module for News-Harvest
//!
//! This module provides link resolution, the external-link test, domain host
//! extraction and artifact file naming.

mod artifact;
mod domain;
mod matcher;

// Re-export main functions
pub use artifact::artifact_file_name;
pub use domain::{domain_host, netloc};
pub use matcher::{is_external, is_root_relative, resolve_href};

/// Builds the search query for a configured domain
///
/// # Examples
///
/// ```
/// use news_harvest::url::site_query;
///
/// assert_eq!(site_query("esgtoday.com"), "site:esgtoday.com");
/// ```
pub fn site_query(domain: &str) -> String {
    format!("site:{}", domain)
}
