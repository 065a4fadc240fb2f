//! Crawl session: one browser, many batches
//!
//! A `CrawlSession` owns a launched browser for its whole life. Every call
//! to `crawl_urls` opens one context (one identity) and one page, walks the
//! URLs in order and disposes the context again. Per-URL failures are
//! collected into the report; only context or page creation aborts a batch.

use std::sync::Arc;
use std::time::Duration;

use scraper::Html;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::backend::{BrowserBackend, BrowserContext};
use super::chromium::ChromiumBackend;
use super::crawl_types::{CrawlError, CrawlReport, CrawlResult, ExtractMode, PageFailure};
use super::page_loader::{NavigationSettings, extract_page};
use crate::config::SessionConfig;
use crate::identity::IdentityTemplate;
use crate::page_extractor::PageHooks;
use crate::utils::referrer_for;

/// A browser session that crawls batches of URLs
///
/// Configure it through the setters before the first batch. One session
/// runs one batch at a time: a second concurrent `crawl_urls` call fails
/// with `CrawlError::Busy`. Use one session per concurrent batch.
///
/// Always call `close` when done; dropping an open session only kills the
/// browser process.
pub struct CrawlSession<B: BrowserBackend = ChromiumBackend> {
    backend: Option<B>,
    config: SessionConfig,
    identity: IdentityTemplate,
    hooks: PageHooks,
    batch_guard: Mutex<()>,
}

impl CrawlSession<ChromiumBackend> {
    /// Launch a browser with the default configuration
    pub async fn new() -> CrawlResult<Self> {
        Self::with_config(SessionConfig::default()).await
    }

    /// Launch a browser configured by `config`
    ///
    /// # Errors
    ///
    /// `CrawlError::Install` or `CrawlError::Launch` when the browser can't
    /// be made available or started.
    pub async fn with_config(config: SessionConfig) -> CrawlResult<Self> {
        let backend = ChromiumBackend::launch(&config).await?;
        Ok(Self::with_backend(backend, config))
    }
}

impl<B: BrowserBackend> CrawlSession<B> {
    /// Build a session around an already launched backend
    pub fn with_backend(backend: B, config: SessionConfig) -> Self {
        Self {
            backend: Some(backend),
            config,
            identity: IdentityTemplate::default(),
            hooks: PageHooks::default(),
            batch_guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.backend.is_none()
    }

    /// Present `identity` for every batch instead of a random one
    pub fn set_fixed_identity(&mut self, identity: impl Into<String>) {
        self.config.fixed_identity = Some(identity.into());
    }

    /// Template used to generate identities when none is fixed
    pub fn set_identity_template(&mut self, template: IdentityTemplate) {
        self.identity = template;
    }

    pub fn set_timeout_ms(&mut self, timeout_ms: u64) {
        self.config.timeout_ms = timeout_ms;
    }

    pub fn set_max_retries(&mut self, max_retries: u32) {
        self.config.max_retries = max_retries;
    }

    /// Rewrite each URL before it is crawled; results are keyed by the
    /// rewritten URL
    pub fn set_url_rewriter<F>(&mut self, rewriter: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.hooks.url_rewriter = Arc::new(rewriter);
    }

    /// Replace the default non-content node removal
    pub fn set_document_filter<F>(&mut self, filter: F)
    where
        F: Fn(&mut Html) + Send + Sync + 'static,
    {
        self.hooks.document_filter = Arc::new(filter);
    }

    /// Choose the selector to extract per URL (default `body`)
    pub fn set_selector_chooser<F>(&mut self, chooser: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.hooks.selector_chooser = Arc::new(chooser);
    }

    /// Replace the plain-text normalizer
    pub fn set_text_tidier<F>(&mut self, tidier: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.hooks.text_tidier = Arc::new(tidier);
    }

    fn resolve_identity(&self) -> String {
        match self.config.fixed_identity() {
            Some(identity) if !identity.is_empty() => identity.to_string(),
            _ => self.identity.generate(),
        }
    }

    fn navigation_settings(&self) -> NavigationSettings {
        NavigationSettings {
            timeout: Duration::from_millis(self.config.timeout_ms),
            max_retries: self.config.max_retries,
        }
    }

    /// Crawl `urls` in order with one shared identity
    ///
    /// # Errors
    ///
    /// Returns `Err` only for batch-level failures (`Context`, `Page`,
    /// `Busy`, `Closed`); no URL is processed in that case. Per-URL failures
    /// are in `CrawlReport::failures`.
    pub async fn crawl_urls<S: AsRef<str>>(
        &self,
        urls: &[S],
        mode: ExtractMode,
    ) -> CrawlResult<CrawlReport> {
        let _guard = self.batch_guard.try_lock().map_err(|_| CrawlError::Busy)?;
        let backend = self.backend.as_ref().ok_or(CrawlError::Closed)?;

        let identity = self.resolve_identity();
        let context = backend
            .new_context(&identity)
            .await
            .map_err(CrawlError::Context)?;
        info!("Crawling {} urls as '{identity}'", urls.len());

        let result = match context.new_page().await {
            Ok(page) => Ok(self.crawl_with_page(&page, urls, mode).await),
            Err(e) => Err(CrawlError::Page(e)),
        };

        if let Err(e) = context.dispose().await {
            warn!("Failed to dispose browser context: {e:#}");
        }
        result
    }

    async fn crawl_with_page<S: AsRef<str>>(
        &self,
        page: &<B::Context as BrowserContext>::Page,
        urls: &[S],
        mode: ExtractMode,
    ) -> CrawlReport {
        let settings = self.navigation_settings();
        let mut report = CrawlReport::default();

        for url in urls {
            let url = self.hooks.rewrite_url(url.as_ref());

            let referrer = match referrer_for(&url) {
                Ok(referrer) => referrer,
                Err(source) => {
                    warn!("Skipping unparsable url '{url}': {source}");
                    report.failures.push(PageFailure {
                        url: url.clone(),
                        error: CrawlError::UrlParse { url, source },
                    });
                    continue;
                }
            };

            match extract_page(page, &url, &referrer, mode, &self.hooks, settings).await {
                Ok(content) => {
                    debug!("Extracted {} bytes from {url}", content.len());
                    report.pages.insert(url, content);
                }
                Err(error) => {
                    warn!("Failed to read page {url}: {error}");
                    report.failures.push(PageFailure { url, error });
                }
            }
        }

        report
    }

    /// Close the browser, then stop its engine
    ///
    /// Both steps always run; their failures are returned together as
    /// `CrawlError::Shutdown`. Closing an already closed session is a no-op.
    pub async fn close(&mut self) -> CrawlResult<()> {
        let Some(mut backend) = self.backend.take() else {
            debug!("Session already closed");
            return Ok(());
        };

        let browser = backend.close_browser().await.err();
        let engine = backend.stop_engine().await.err();

        if browser.is_none() && engine.is_none() {
            info!("Session closed");
            Ok(())
        } else {
            Err(CrawlError::Shutdown { browser, engine })
        }
    }
}

impl<B: BrowserBackend> Drop for CrawlSession<B> {
    fn drop(&mut self) {
        if self.backend.is_some() {
            warn!("CrawlSession dropped without close()");
        }
    }
}

/// Crawl `urls` once with a fresh session
///
/// Launches a browser, optionally pins `identity`, crawls, and closes the
/// browser again whatever the crawl returned. A failure to close is logged,
/// not returned.
pub async fn crawl_urls<S: AsRef<str>>(
    identity: Option<&str>,
    urls: &[S],
    mode: ExtractMode,
) -> CrawlResult<CrawlReport> {
    let mut session = CrawlSession::new().await?;
    if let Some(identity) = identity {
        session.set_fixed_identity(identity);
    }

    let result = session.crawl_urls(urls, mode).await;

    if let Err(e) = session.close().await {
        warn!("Failed to close crawl session: {e}");
    }
    result
}
