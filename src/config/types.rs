use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for News-Harvest
///
/// Every section is optional; a missing section falls back to the built-in
/// defaults, so an empty file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub harvest: HarvestConfig,
    pub search: SearchConfig,
    pub fetch: FetchConfig,
    pub renderer: RendererConfig,
    pub pacing: PacingConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Which sites to monitor
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Domains to search, processed in order. A domain may carry a path
    /// prefix (e.g. "esgdive.com/news/") that scopes the search.
    pub domains: Vec<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            domains: vec![
                "esgdive.com/news/".to_string(),
                "sustainability-news.net/tag/news/".to_string(),
                "esgtoday.com".to_string(),
                "integratedreporting.ifrs.org/news/".to_string(),
                "future.portfolio-adviser.com/news-home/".to_string(),
            ],
        }
    }
}

/// Search provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search result page endpoint
    pub endpoint: String,

    /// Restrict results to the news vertical
    #[serde(rename = "news-only")]
    pub news_only: bool,

    /// Results requested per result page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Upper bound on results taken per domain
    #[serde(rename = "max-results")]
    pub max_results: u32,

    /// Pause between result pages (milliseconds)
    #[serde(rename = "pause-ms")]
    pub pause_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.google.com/search".to_string(),
            news_only: true,
            page_size: 10,
            max_results: 100,
            pause_ms: 2000,
        }
    }
}

impl SearchConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

/// Source page fetch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Timeout for a single source page fetch (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// PDF renderer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Timeout for rendering one URL to PDF (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Explicit Chrome/Chromium binary; auto-detected when unset
    #[serde(rename = "chrome-executable")]
    pub chrome_executable: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            chrome_executable: None,
        }
    }
}

impl RendererConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Fixed delays between network operations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay after each attempted conversion (milliseconds)
    #[serde(rename = "after-link-ms")]
    pub after_link_ms: u64,

    /// Delay after finishing each source page (milliseconds)
    #[serde(rename = "after-page-ms")]
    pub after_page_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            after_link_ms: 2000,
            after_page_ms: 2000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the harvester
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for harvester-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "news-harvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/news-harvest".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Format: Name/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root data directory
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,

    /// PDF directory name, relative to the data directory
    #[serde(rename = "pdf-dir")]
    pub pdf_dir: String,

    /// Ledger file name, relative to the data directory
    #[serde(rename = "ledger-file")]
    pub ledger_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            pdf_dir: "downloaded_pdfs".to_string(),
            ledger_file: "tracked_urls.csv".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn pdf_path(&self) -> PathBuf {
        self.data_dir.join(&self.pdf_dir)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }
}
