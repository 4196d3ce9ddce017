//! Integration tests for the harvester
//!
//! These tests drive full harvest passes against wiremock servers and
//! in-memory fakes for search and rendering, writing into temp directories.

use async_trait::async_trait;
use news_harvest::config::{Config, OutputConfig};
use news_harvest::crawler::{
    HarvesterBuilder, HttpFetcher, NoPacing, PageFetcher, PdfRenderer, SearchProvider,
    SearchQuery,
};
use news_harvest::storage::{read_records, Ledger};
use news_harvest::{ConversionStatus, HarvestError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Returns fixed source pages per query; unknown queries fail like a blocked search
#[derive(Clone, Default)]
struct FakeSearch {
    results: HashMap<String, Vec<String>>,
}

impl FakeSearch {
    fn with(mut self, domain: &str, pages: &[&str]) -> Self {
        self.results.insert(
            format!("site:{}", domain),
            pages.iter().map(|p| p.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search_page(
        &self,
        query: &SearchQuery,
        start: u32,
    ) -> Result<Vec<String>, HarvestError> {
        match self.results.get(&query.query) {
            Some(_) if start > 0 => Ok(Vec::new()),
            Some(urls) => Ok(urls.clone()),
            None => Err(HarvestError::Search {
                query: query.query.clone(),
                message: "HTTP 429".to_string(),
            }),
        }
    }
}

/// Serves HTML from memory for hosts that cannot be reached in tests
#[derive(Clone, Default)]
struct FakeFetcher {
    pages: HashMap<String, String>,
}

impl FakeFetcher {
    fn with(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, HarvestError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| HarvestError::HttpStatus {
                url: url.to_string(),
                status_code: 404,
            })
    }
}

/// Writes a stub PDF and records every call; fails for URLs containing "broken"
#[derive(Clone, Default)]
struct FakeRenderer {
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeRenderer {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfRenderer for FakeRenderer {
    async fn render(&self, url: &str, output: &Path) -> Result<(), HarvestError> {
        self.calls.lock().unwrap().push(url.to_string());
        if url.contains("broken") {
            return Err(HarvestError::Conversion {
                url: url.to_string(),
                message: "page crashed while printing".to_string(),
            });
        }
        std::fs::write(output, b"%PDF-1.4\n%fake\n")?;
        Ok(())
    }
}

/// Never finishes rendering URLs containing "slow"; counts `close` calls
#[derive(Clone, Default)]
struct StallingRenderer {
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl PdfRenderer for StallingRenderer {
    async fn render(&self, url: &str, output: &Path) -> Result<(), HarvestError> {
        if url.contains("slow") {
            return std::future::pending().await;
        }
        std::fs::write(output, b"%PDF-1.4\n%fake\n")?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), HarvestError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Creates a test configuration writing under `dir`
fn create_test_config(dir: &TempDir, domains: &[&str]) -> Config {
    let mut config = Config::default();
    config.harvest.domains = domains.iter().map(|d| d.to_string()).collect();
    config.output = OutputConfig {
        data_dir: dir.path().join("data"),
        ..OutputConfig::default()
    };
    config
}

async fn run_pass(
    config: Config,
    search: FakeSearch,
    fetcher: impl PageFetcher + 'static,
    renderer: FakeRenderer,
) -> news_harvest::HarvestSummary {
    let mut harvester = HarvesterBuilder::new(config)
        .search_provider(search)
        .fetcher(fetcher)
        .renderer(renderer)
        .pacer(NoPacing)
        .build()
        .expect("Failed to build harvester");

    harvester.run().await.expect("Harvest pass failed")
}

fn pdf_dir(config: &Config) -> PathBuf {
    config.output.pdf_path()
}

#[tokio::test]
async fn test_single_source_page_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &["site.test"]);
    let ledger_path = config.output.ledger_path();
    let expected_artifact = pdf_dir(&config).join("vendor.test-report.pdf");

    let search = FakeSearch::default().with("site.test", &["https://site.test/news/1"]);
    let fetcher = FakeFetcher::default().with(
        "https://site.test/news/1",
        r#"<html><body>
            <a href="/news/2">Next story</a>
            <a href="https://vendor.test/report">The report</a>
        </body></html>"#,
    );
    let renderer = FakeRenderer::default();

    let summary = run_pass(config, search, fetcher, renderer.clone()).await;

    assert_eq!(renderer.calls(), vec!["https://vendor.test/report".to_string()]);
    assert_eq!(summary.converted, 1);
    assert_eq!(summary.failed, 0);

    let records = read_records(&ledger_path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_url, "https://site.test/news/1");
    assert_eq!(records[0].external_url, "https://vendor.test/report");
    assert_eq!(records[0].artifact_path, expected_artifact);
    assert_eq!(records[0].status, ConversionStatus::Success);
    assert!(expected_artifact.exists());
}

#[tokio::test]
async fn test_source_pages_fetched_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let domain = base_url.trim_start_matches("http://").to_string();

    Mock::given(method("GET"))
        .and(path("/news/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <a href="/about">About</a>
                <a href="https://vendor.test/report">Report</a>
                <a href="https://other.test/doc">Doc</a>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/news/2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &[domain.as_str()]);
    let ledger_path = config.output.ledger_path();

    let page_1 = format!("{}/news/1", base_url);
    let page_2 = format!("{}/news/2", base_url);
    let search = FakeSearch::default().with(&domain, &[page_1.as_str(), page_2.as_str()]);
    let fetcher = HttpFetcher::new(&config.user_agent, Duration::from_secs(5)).unwrap();
    let renderer = FakeRenderer::default();

    let summary = run_pass(config, search, fetcher, renderer.clone()).await;

    assert_eq!(summary.domains_processed, 1);
    assert_eq!(summary.source_pages, 2);
    assert_eq!(summary.links_found, 2);
    assert_eq!(renderer.calls().len(), 2);

    let mut urls: Vec<_> = read_records(&ledger_path)
        .unwrap()
        .into_iter()
        .map(|r| r.external_url)
        .collect();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            "https://other.test/doc".to_string(),
            "https://vendor.test/report".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_second_run_processes_nothing_new() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &["site.test"]);
    let ledger_path = config.output.ledger_path();

    let search = FakeSearch::default().with("site.test", &["https://site.test/news/1"]);
    let fetcher = FakeFetcher::default().with(
        "https://site.test/news/1",
        r#"<a href="https://vendor.test/a">A</a>
           <a href="https://vendor.test/b">B</a>
           <a href="https://broken.test/c">C</a>"#,
    );

    let first = FakeRenderer::default();
    let summary = run_pass(config.clone(), search.clone(), fetcher.clone(), first.clone()).await;
    assert_eq!(first.calls().len(), 3);
    assert_eq!(summary.attempted(), 3);

    let second = FakeRenderer::default();
    let summary = run_pass(config, search, fetcher, second.clone()).await;
    assert!(second.calls().is_empty());
    assert_eq!(summary.attempted(), 0);
    assert_eq!(summary.links_skipped, 3);

    assert_eq!(read_records(&ledger_path).unwrap().len(), 3);
}

#[tokio::test]
async fn test_link_shared_by_two_pages_converted_once() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &["site.test"]);
    let ledger_path = config.output.ledger_path();

    let search = FakeSearch::default().with(
        "site.test",
        &["https://site.test/news/1", "https://site.test/news/2"],
    );
    let fetcher = FakeFetcher::default()
        .with(
            "https://site.test/news/1",
            r#"<a href="https://vendor.test/report">Report</a>"#,
        )
        .with(
            "https://site.test/news/2",
            r#"<a href="https://vendor.test/report">Same report</a>"#,
        );
    let renderer = FakeRenderer::default();

    let summary = run_pass(config, search, fetcher, renderer.clone()).await;

    assert_eq!(renderer.calls().len(), 1);
    assert_eq!(summary.converted, 1);
    assert_eq!(summary.links_skipped, 1);

    let records = read_records(&ledger_path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_url, "https://site.test/news/1");
}

#[tokio::test]
async fn test_failed_conversion_recorded_and_run_continues() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &["site.test"]);
    let ledger_path = config.output.ledger_path();
    let pdfs = pdf_dir(&config);

    let search = FakeSearch::default().with("site.test", &["https://site.test/news/1"]);
    let fetcher = FakeFetcher::default().with(
        "https://site.test/news/1",
        r#"<a href="https://broken.test/page">Broken</a>
           <a href="https://vendor.test/report">Fine</a>"#,
    );
    let renderer = FakeRenderer::default();

    let summary = run_pass(config, search, fetcher, renderer.clone()).await;
    assert_eq!(summary.converted, 1);
    assert_eq!(summary.failed, 1);

    let records = read_records(&ledger_path).unwrap();
    assert_eq!(records.len(), 2);

    let broken = records
        .iter()
        .find(|r| r.external_url == "https://broken.test/page")
        .unwrap();
    assert!(broken.status.is_error());
    assert!(broken
        .status
        .to_ledger_string()
        .starts_with("Error: "));
    assert!(!pdfs.join("broken.test-page.pdf").exists());

    let fine = records
        .iter()
        .find(|r| r.external_url == "https://vendor.test/report")
        .unwrap();
    assert_eq!(fine.status, ConversionStatus::Success);

    let raw = std::fs::read_to_string(&ledger_path).unwrap();
    assert!(raw.contains("Error: "));
}

#[tokio::test]
async fn test_failing_search_skips_only_that_domain() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &["blocked.test", "site.test"]);

    let search = FakeSearch::default().with("site.test", &["https://site.test/news/1"]);
    let fetcher = FakeFetcher::default().with(
        "https://site.test/news/1",
        r#"<a href="https://vendor.test/report">Report</a>"#,
    );
    let renderer = FakeRenderer::default();

    let summary = run_pass(config, search, fetcher, renderer.clone()).await;

    assert_eq!(summary.domains_failed, 1);
    assert_eq!(summary.domains_processed, 1);
    assert_eq!(renderer.calls(), vec!["https://vendor.test/report".to_string()]);
}

#[tokio::test]
async fn test_existing_ledger_rows_are_respected() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &["site.test"]);
    let ledger_path = config.output.ledger_path();

    std::fs::create_dir_all(&config.output.data_dir).unwrap();
    std::fs::write(
        &ledger_path,
        "Timestamp,Source URL,External URL,PDF Path,Status\n\
         2024-01-01 09:00:00.000000,https://site.test/old,https://vendor.test/report,data/downloaded_pdfs/vendor.test-report.pdf,Success\n",
    )
    .unwrap();

    let search = FakeSearch::default().with("site.test", &["https://site.test/news/1"]);
    let fetcher = FakeFetcher::default().with(
        "https://site.test/news/1",
        r#"<a href="https://vendor.test/report">Report</a>
           <a href="https://vendor.test/new">New</a>"#,
    );
    let renderer = FakeRenderer::default();

    let mut harvester = HarvesterBuilder::new(config)
        .search_provider(search)
        .fetcher(fetcher)
        .renderer(renderer.clone())
        .pacer(NoPacing)
        .build()
        .unwrap();
    assert_eq!(harvester.ledger().seen_count(), 1);

    harvester.run().await.unwrap();

    assert_eq!(renderer.calls(), vec!["https://vendor.test/new".to_string()]);
    assert_eq!(harvester.ledger().seen_count(), 2);
    assert_eq!(read_records(&ledger_path).unwrap().len(), 2);
}

#[tokio::test]
async fn test_interrupted_pass_leaves_complete_rows_and_closes_renderer() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &["site.test"]);
    let ledger_path = config.output.ledger_path();

    let search = FakeSearch::default().with("site.test", &["https://site.test/news/1"]);
    let fetcher = FakeFetcher::default().with(
        "https://site.test/news/1",
        r#"<a href="https://a.test/fast">Fast</a>
           <a href="https://b.test/slow">Slow</a>"#,
    );
    let renderer = StallingRenderer::default();

    let mut harvester = HarvesterBuilder::new(config)
        .search_provider(search)
        .fetcher(fetcher)
        .renderer(renderer.clone())
        .pacer(NoPacing)
        .build()
        .unwrap();

    let finished = tokio::select! {
        _ = harvester.run() => true,
        _ = tokio::time::sleep(Duration::from_millis(200)) => false,
    };
    assert!(!finished, "pass should still be stuck on the slow link");
    assert_eq!(renderer.closed.load(Ordering::SeqCst), 0);

    let records = read_records(&ledger_path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].external_url, "https://a.test/fast");
    assert_eq!(records[0].status, ConversionStatus::Success);
    assert!(std::fs::read_to_string(&ledger_path).unwrap().ends_with('\n'));
    assert_eq!(harvester.summary().converted, 1);

    harvester.shutdown().await;
    assert_eq!(renderer.closed.load(Ordering::SeqCst), 1);

    // The interrupted link was never recorded, so the next pass retries it
    assert!(!harvester.ledger().contains("https://b.test/slow"));
}
