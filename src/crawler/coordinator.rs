//! Harvest driver - main orchestration logic
//!
//! This module contains the harvest loop that coordinates one pass:
//! - Initializing the data directories and the ledger
//! - Searching each configured domain for source pages
//! - Extracting external links from each source page
//! - Converting unseen links and recording every attempt
//! - Pacing between links, pages and search result pages

use crate::config::Config;
use crate::crawler::converter::{ChromiumRenderer, PdfRenderer, SnapshotConverter};
use crate::crawler::fetcher::{build_http_client, HttpFetcher, PageFetcher};
use crate::crawler::pacing::{FixedPacer, Pacer, Pause};
use crate::crawler::parser::collect_external_links;
use crate::crawler::search::{NewsSearch, ResultPager, SearchProvider, SearchQuery};
use crate::output::HarvestSummary;
use crate::storage::{CsvLedger, Ledger, LedgerRecord};
use crate::HarvestError;

/// Assembles a [`Harvester`], defaulting every collaborator from config
///
/// # Example
///
/// ```no_run
/// use news_harvest::config::Config;
/// use news_harvest::crawler::HarvesterBuilder;
///
/// # async fn example() -> Result<(), news_harvest::HarvestError> {
/// let mut harvester = HarvesterBuilder::new(Config::default()).build()?;
/// let summary = harvester.run().await?;
/// println!("{} converted", summary.converted);
/// # Ok(())
/// # }
/// ```
pub struct HarvesterBuilder {
    config: Config,
    search: Option<Box<dyn SearchProvider>>,
    fetcher: Option<Box<dyn PageFetcher>>,
    renderer: Option<Box<dyn PdfRenderer>>,
    pacer: Option<Box<dyn Pacer>>,
}

impl HarvesterBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            search: None,
            fetcher: None,
            renderer: None,
            pacer: None,
        }
    }

    pub fn search_provider(mut self, search: impl SearchProvider + 'static) -> Self {
        self.search = Some(Box::new(search));
        self
    }

    pub fn fetcher(mut self, fetcher: impl PageFetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    pub fn renderer(mut self, renderer: impl PdfRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Some(Box::new(pacer));
        self
    }

    /// Creates the data directories, opens the ledger and fills in defaults
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - Directories or ledger could not be set up
    pub fn build(self) -> Result<Harvester, HarvestError> {
        let config = self.config;

        let pdf_dir = config.output.pdf_path();
        std::fs::create_dir_all(&config.output.data_dir)?;
        std::fs::create_dir_all(&pdf_dir)?;

        let ledger = CsvLedger::open(&config.output.ledger_path())?;

        // Search and page fetches share one connection pool
        let client = build_http_client(&config.user_agent, config.fetch.timeout())?;

        let search: Box<dyn SearchProvider> = match self.search {
            Some(search) => search,
            None => Box::new(NewsSearch::new(client.clone(), &config.search)?),
        };

        let fetcher: Box<dyn PageFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Box::new(HttpFetcher::from_client(client)),
        };

        let renderer: Box<dyn PdfRenderer> = self
            .renderer
            .unwrap_or_else(|| Box::new(ChromiumRenderer::new(config.renderer.clone())));

        let pacer: Box<dyn Pacer> = self
            .pacer
            .unwrap_or_else(|| Box::new(FixedPacer::from_config(&config.pacing, &config.search)));

        Ok(Harvester {
            converter: SnapshotConverter::new(pdf_dir, renderer),
            config,
            ledger,
            search,
            fetcher,
            pacer,
            summary: HarvestSummary::default(),
        })
    }
}

/// Drives one harvest pass over the configured domains
pub struct Harvester {
    config: Config,
    ledger: CsvLedger,
    search: Box<dyn SearchProvider>,
    fetcher: Box<dyn PageFetcher>,
    converter: SnapshotConverter,
    pacer: Box<dyn Pacer>,
    summary: HarvestSummary,
}

impl Harvester {
    /// Builds a harvester with the production collaborators
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        HarvesterBuilder::new(config).build()
    }

    pub fn ledger(&self) -> &CsvLedger {
        &self.ledger
    }

    pub fn summary(&self) -> &HarvestSummary {
        &self.summary
    }

    /// Runs the pass over every configured domain, in order
    ///
    /// A recoverable failure inside one domain is logged and counted, and the
    /// pass moves on to the next domain. Anything else (a ledger write
    /// failure, for instance) ends the pass with an error.
    pub async fn run(&mut self) -> Result<HarvestSummary, HarvestError> {
        tracing::info!("Starting news harvesting process...");
        self.summary = HarvestSummary::default();

        let outcome = self.run_domains().await;
        self.shutdown().await;
        outcome?;

        tracing::info!("News harvesting process completed!");
        self.summary.log();
        Ok(self.summary.clone())
    }

    /// Releases the renderer
    ///
    /// `run` calls this on the way out. A caller that abandons `run` part way
    /// (on Ctrl-C, say) calls it directly; calling it twice is harmless.
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.converter.close().await {
            tracing::warn!("Failed to shut down renderer: {}", e);
        }
    }

    async fn run_domains(&mut self) -> Result<(), HarvestError> {
        let domains = self.config.harvest.domains.clone();

        for domain in &domains {
            tracing::info!("Processing domain: {}", domain);

            match self.process_domain(domain).await {
                Ok(()) => self.summary.domains_processed += 1,
                Err(e) if e.is_recoverable() => {
                    tracing::error!("Error processing domain {}: {}", domain, e);
                    self.summary.domains_failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    async fn process_domain(&mut self, domain: &str) -> Result<(), HarvestError> {
        let mut pager = ResultPager::new(SearchQuery::for_domain(domain, &self.config.search));

        while let Some(result) = pager
            .next(self.search.as_ref(), self.pacer.as_ref())
            .await
        {
            let source_url = result?;
            self.process_source_page(&source_url, domain).await?;
            self.pacer.pause(Pause::AfterSourcePage).await;
        }

        Ok(())
    }

    async fn process_source_page(
        &mut self,
        source_url: &str,
        domain: &str,
    ) -> Result<(), HarvestError> {
        tracing::info!("Checking source URL: {}", source_url);
        self.summary.source_pages += 1;

        let links = collect_external_links(self.fetcher.as_ref(), source_url, domain).await;
        self.summary.links_found += links.len() as u64;

        for link in &links {
            if self.ledger.contains(link) {
                tracing::info!("Skipping already processed URL: {}", link);
                self.summary.links_skipped += 1;
                continue;
            }

            self.process_link(source_url, link).await?;
            self.pacer.pause(Pause::AfterLink).await;
        }

        Ok(())
    }

    /// Converts one unseen link and records the attempt
    async fn process_link(&mut self, source_url: &str, link: &str) -> Result<(), HarvestError> {
        tracing::info!("Processing external URL: {}", link);

        let snapshot = self.converter.snapshot(link).await;
        if snapshot.status.is_success() {
            tracing::info!(
                "Successfully created PDF: {}",
                snapshot.artifact_path.display()
            );
            self.summary.converted += 1;
        } else {
            tracing::warn!("PDF conversion failed for {}: {}", link, snapshot.status);
            self.summary.failed += 1;
        }

        let record = LedgerRecord::new(source_url, link, snapshot.artifact_path, snapshot.status);
        self.ledger.append(&record)?;
        Ok(())
    }
}
