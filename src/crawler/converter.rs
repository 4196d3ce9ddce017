//! Snapshot conversion of external URLs to PDF
//!
//! This module handles:
//! - The `PdfRenderer` seam (URL in, PDF file out)
//! - A headless Chromium renderer launched on first use
//! - Naming artifacts and folding render failures into a status

use crate::config::RendererConfig;
use crate::state::ConversionStatus;
use crate::url::artifact_file_name;
use crate::HarvestError;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;

/// Renders the live content of a URL into a PDF file
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Writes a PDF of `url` to `output`
    async fn render(&self, url: &str, output: &Path) -> Result<(), HarvestError>;

    /// Releases any resources held by the renderer
    async fn close(&mut self) -> Result<(), HarvestError> {
        Ok(())
    }
}

/// Headless Chromium renderer
///
/// The browser process is started lazily on the first render and reused for
/// every later one.
pub struct ChromiumRenderer {
    config: RendererConfig,
    browser: OnceCell<Browser>,
}

impl ChromiumRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            browser: OnceCell::new(),
        }
    }

    async fn browser(&self, url: &str) -> Result<&Browser, HarvestError> {
        self.browser
            .get_or_try_init(|| async move {
                let mut builder = BrowserConfig::builder()
                    .no_sandbox()
                    .request_timeout(self.config.timeout())
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage");

                if let Some(executable) = &self.config.chrome_executable {
                    builder = builder.chrome_executable(executable);
                }

                let browser_config = builder.build().map_err(|message| {
                    HarvestError::Conversion {
                        url: url.to_string(),
                        message: format!("invalid browser configuration: {}", message),
                    }
                })?;

                let (browser, mut handler) =
                    Browser::launch(browser_config)
                        .await
                        .map_err(|e| HarvestError::Conversion {
                            url: url.to_string(),
                            message: format!("failed to launch browser: {}", e),
                        })?;

                tokio::spawn(async move {
                    while let Some(event) = handler.next().await {
                        if event.is_err() {
                            break;
                        }
                    }
                });

                tracing::info!("Launched headless browser");
                Ok(browser)
            })
            .await
    }
}

#[async_trait]
impl PdfRenderer for ChromiumRenderer {
    async fn render(&self, url: &str, output: &Path) -> Result<(), HarvestError> {
        let conversion_error = |message: String| HarvestError::Conversion {
            url: url.to_string(),
            message,
        };

        let browser = self.browser(url).await?;

        let render = async {
            let page = browser
                .new_page(url)
                .await
                .map_err(|e| conversion_error(e.to_string()))?;

            let printed = async {
                page.wait_for_navigation().await?;
                let params = PrintToPdfParams {
                    print_background: Some(true),
                    ..Default::default()
                };
                page.save_pdf(params, output).await
            }
            .await;

            if let Err(e) = page.close().await {
                tracing::debug!("Failed to close page for {}: {}", url, e);
            }

            printed
                .map(|_| ())
                .map_err(|e| conversion_error(e.to_string()))
        };

        match tokio::time::timeout(self.config.timeout(), render).await {
            Ok(result) => result,
            Err(_) => Err(HarvestError::Timeout {
                url: url.to_string(),
            }),
        }
    }

    /// Closes the browser if one was launched
    ///
    /// The browser is taken out of the renderer, so closing twice is harmless
    /// and a later render launches a fresh one.
    async fn close(&mut self) -> Result<(), HarvestError> {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                tracing::warn!("Failed to close browser: {}", e);
            }
            match browser.wait().await {
                Ok(Some(status)) => tracing::debug!("Browser exited with {}", status),
                Ok(None) => tracing::debug!("Browser process already reaped"),
                Err(e) => tracing::debug!("Failed to wait for browser exit: {}", e),
            }
        }
        Ok(())
    }
}

/// Outcome of one conversion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Where the artifact was (or would have been) written
    pub artifact_path: PathBuf,
    pub status: ConversionStatus,
}

/// Converts external URLs into PDF artifacts in one output directory
pub struct SnapshotConverter {
    output_dir: PathBuf,
    renderer: Box<dyn PdfRenderer>,
}

impl SnapshotConverter {
    pub fn new(output_dir: impl Into<PathBuf>, renderer: Box<dyn PdfRenderer>) -> Self {
        Self {
            output_dir: output_dir.into(),
            renderer,
        }
    }

    /// Returns the artifact path `url` maps to
    pub fn artifact_path(&self, url: &str) -> Result<PathBuf, HarvestError> {
        Ok(self.output_dir.join(artifact_file_name(url)?))
    }

    /// Renders `url` into its artifact file
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written PDF
    /// * `Err(HarvestError)` - The URL could not be named or rendered
    pub async fn convert(&self, url: &str) -> Result<PathBuf, HarvestError> {
        let path = self.artifact_path(url)?;
        self.renderer.render(url, &path).await?;
        Ok(path)
    }

    /// Converts `url`, folding any failure into the returned status
    ///
    /// An unparsable URL yields an empty artifact path.
    pub async fn snapshot(&self, url: &str) -> Snapshot {
        let artifact_path = match self.artifact_path(url) {
            Ok(path) => path,
            Err(e) => {
                return Snapshot {
                    artifact_path: PathBuf::new(),
                    status: ConversionStatus::Error(e.to_string()),
                }
            }
        };

        let result = self.renderer.render(url, &artifact_path).await;
        Snapshot {
            artifact_path,
            status: ConversionStatus::from(result),
        }
    }

    /// Shuts down the underlying renderer
    pub async fn close(&mut self) -> Result<(), HarvestError> {
        self.renderer.close().await
    }
}
