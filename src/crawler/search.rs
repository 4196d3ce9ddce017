//! Search provider for discovering source pages
//!
//! This module handles:
//! - The `SearchProvider` seam over one page of results
//! - Paging through results up to a bound, with a pause between pages
//! - A news-vertical implementation that scrapes result pages

use crate::config::SearchConfig;
use crate::crawler::pacing::{Pacer, Pause};
use crate::url::site_query;
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A search for source pages under one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Query text, e.g. `site:esgtoday.com`
    pub query: String,

    /// Results requested per page
    pub page_size: u32,

    /// Upper bound on results taken in total
    pub max_results: u32,
}

impl SearchQuery {
    /// Builds the `site:` query for a configured domain
    pub fn for_domain(domain: &str, config: &SearchConfig) -> Self {
        Self {
            query: site_query(domain),
            page_size: config.page_size,
            max_results: config.max_results,
        }
    }
}

/// Returns result URLs for a query, one page at a time
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetches the result page beginning at offset `start`
    ///
    /// An empty vector means the provider has no more results.
    async fn search_page(
        &self,
        query: &SearchQuery,
        start: u32,
    ) -> Result<Vec<String>, HarvestError>;
}

/// Lazily pages through the results of one query
///
/// Results are yielded as they arrive, so work on early pages happens before
/// later pages are requested. Paging stops at `max_results`, when a page adds
/// no new URLs, or after the first error (which is yielded once).
pub struct ResultPager {
    query: SearchQuery,
    buffer: VecDeque<String>,
    seen: HashSet<String>,
    next_start: u32,
    yielded: u32,
    exhausted: bool,
}

impl ResultPager {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            buffer: VecDeque::new(),
            seen: HashSet::new(),
            next_start: 0,
            yielded: 0,
            exhausted: false,
        }
    }

    /// Returns the next result URL, requesting a new page when needed
    ///
    /// The pacer is asked for a `BetweenSearchPages` pause before every page
    /// after the first.
    pub async fn next(
        &mut self,
        provider: &dyn SearchProvider,
        pacer: &dyn Pacer,
    ) -> Option<Result<String, HarvestError>> {
        loop {
            if self.yielded >= self.query.max_results {
                return None;
            }

            if let Some(url) = self.buffer.pop_front() {
                self.yielded += 1;
                return Some(Ok(url));
            }

            if self.exhausted {
                return None;
            }

            if self.next_start > 0 {
                pacer.pause(Pause::BetweenSearchPages).await;
            }

            match provider.search_page(&self.query, self.next_start).await {
                Ok(urls) => {
                    self.next_start += self.query.page_size;
                    let before = self.buffer.len();
                    for url in urls {
                        if self.seen.insert(url.clone()) {
                            self.buffer.push_back(url);
                        }
                    }
                    if self.buffer.len() == before {
                        self.exhausted = true;
                    }
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Scrapes a news-vertical search result page
pub struct NewsSearch {
    client: Client,
    endpoint: Url,
    news_only: bool,
}

impl NewsSearch {
    /// Creates a provider for the configured endpoint
    pub fn new(client: Client, config: &SearchConfig) -> Result<Self, HarvestError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| HarvestError::Search {
            query: String::new(),
            message: format!("invalid endpoint '{}': {}", config.endpoint, e),
        })?;

        Ok(Self {
            client,
            endpoint,
            news_only: config.news_only,
        })
    }

    fn page_url(&self, query: &SearchQuery, start: u32) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", &query.query)
                .append_pair("num", &query.page_size.to_string())
                .append_pair("start", &start.to_string())
                .append_pair("hl", "en");
            if self.news_only {
                pairs.append_pair("tbm", "nws");
            }
        }
        url
    }
}

#[async_trait]
impl SearchProvider for NewsSearch {
    async fn search_page(
        &self,
        query: &SearchQuery,
        start: u32,
    ) -> Result<Vec<String>, HarvestError> {
        let url = self.page_url(query, start);
        tracing::debug!("Requesting search page {}", url);

        let search_error = |message: String| HarvestError::Search {
            query: query.query.clone(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| search_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(search_error(format!("HTTP {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| search_error(e.to_string()))?;

        Ok(parse_result_links(&body))
    }
}

/// Extracts result URLs from a search result page
///
/// Hrefs of the form `/url?q=<target>` are unwrapped; direct absolute hrefs are
/// kept unless they point back at the search engine itself. Order of first
/// appearance is preserved and duplicates are dropped.
pub fn parse_result_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(link) = element.value().attr("href").and_then(result_link) {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
        }
    }

    links
}

fn result_link(href: &str) -> Option<String> {
    let href = href.trim();

    let candidate = match href.strip_prefix("/url?") {
        Some(query) => url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "q" || key == "url")
            .map(|(_, value)| value.into_owned())?,
        None => href.to_string(),
    };

    let parsed = Url::parse(&candidate).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }

    let host = parsed.host_str()?;
    if is_search_engine_host(host) {
        return None;
    }

    Some(candidate)
}

fn is_search_engine_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == "google.com"
        || host.starts_with("google.")
        || host.contains(".google.")
        || host.ends_with(".googleusercontent.com")
        || host.ends_with("gstatic.com")
}
