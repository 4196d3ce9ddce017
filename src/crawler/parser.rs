//! HTML parser for extracting external links
//!
//! This module turns a source page into the set of outbound links worth
//! snapshotting. Resolution and the external test live in [`crate::url`];
//! this module walks the document and applies them.

use crate::crawler::fetcher::PageFetcher;
use crate::url::{is_external, is_root_relative, resolve_href};
use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Extracts the external links of an HTML document
///
/// # Link Extraction Rules
///
/// - Only `<a href="...">` elements are considered
/// - Absolute hrefs are kept verbatim; root-relative hrefs are resolved
///   against `https://` and the host of `owning_domain`
/// - Every other relative form is dropped
/// - Root-relative links stay on the page's own host and are never external,
///   even when `owning_domain` carries a path scope
/// - Any other link is external when `owning_domain` is not a substring of it
///
/// Duplicates collapse; the set iterates in sorted order.
///
/// # Example
///
/// ```
/// use news_harvest::crawler::extract_external_links;
///
/// let html = r##"<a href="/a/b">in</a><a href="https://other.example/x">out</a><a href="#frag">top</a>"##;
/// let links = extract_external_links(html, "example.com");
/// assert_eq!(links.len(), 1);
/// assert!(links.contains("https://other.example/x"));
/// ```
pub fn extract_external_links(html: &str, owning_domain: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut links = BTreeSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            let Some(absolute) = resolve_href(href, owning_domain) else {
                continue;
            };

            if is_root_relative(href) {
                tracing::trace!("Internal link {}", absolute);
                continue;
            }

            if is_external(&absolute, owning_domain) {
                links.insert(absolute);
            }
        }
    }

    links
}

/// Fetches a source page and extracts its external links
///
/// Never fails: any fetch error is logged and reported as an empty set, so a
/// page that could not be read looks the same as a page without links.
///
/// # Arguments
///
/// * `fetcher` - The page fetcher to use
/// * `source_url` - The page to read
/// * `owning_domain` - The configured domain the page was found under
pub async fn collect_external_links(
    fetcher: &dyn PageFetcher,
    source_url: &str,
    owning_domain: &str,
) -> BTreeSet<String> {
    match fetcher.fetch(source_url).await {
        Ok(html) => {
            let links = extract_external_links(&html, owning_domain);
            tracing::debug!("Found {} external links on {}", links.len(), source_url);
            links
        }
        Err(e) => {
            tracing::error!("Error fetching links from {}: {}", source_url, e);
            BTreeSet::new()
        }
    }
}
