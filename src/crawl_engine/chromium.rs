//! chromiumoxide implementation of the browser capability traits
//!
//! One `ChromiumBackend` owns one Chrome process, the task driving its CDP
//! connection and the profile directory it runs in.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::page::Page;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::backend::{BrowserBackend, BrowserContext, PageDriver};
use super::crawl_types::{CrawlError, CrawlResult};
use super::page_timeout::with_page_timeout;
use crate::browser_profile::BrowserProfile;
use crate::browser_setup::{install_browser, launch_browser};
use crate::config::SessionConfig;
use crate::utils::constants::{NETWORK_IDLE_POLL_MS, NETWORK_IDLE_QUIET_MS};

/// Snapshot used by the network-idle wait
const LOAD_STATE_SCRIPT: &str = r"
    (function() {
        return {
            readyState: document.readyState,
            resources: performance.getEntriesByType('resource').length
        };
    })()
";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadState {
    ready_state: String,
    resources: u64,
}

/// A Chrome instance launched for one session
pub struct ChromiumBackend {
    browser: Option<Arc<Browser>>,
    handler: Option<JoinHandle<()>>,
    profile: BrowserProfile,
}

impl ChromiumBackend {
    /// Install (find or download) and launch Chrome for a session
    ///
    /// # Errors
    ///
    /// `CrawlError::Install` when no executable can be found or downloaded,
    /// `CrawlError::Launch` when the process or its profile can't be set up.
    pub async fn launch(config: &SessionConfig) -> CrawlResult<Self> {
        let executable = install_browser(config.chrome_executable())
            .await
            .map_err(CrawlError::Install)?;

        let profile = match config.chrome_data_dir() {
            Some(dir) => BrowserProfile::at(dir.to_path_buf()),
            None => BrowserProfile::create_unique(),
        }
        .map_err(CrawlError::Launch)?;

        let (browser, handler) = launch_browser(executable, config.headless(), profile.path())
            .await
            .map_err(CrawlError::Launch)?;

        info!("Browser launched with profile {}", profile.path().display());
        Ok(Self {
            browser: Some(Arc::new(browser)),
            handler: Some(handler),
            profile,
        })
    }

    fn browser(&self) -> Result<&Arc<Browser>> {
        self.browser.as_ref().ok_or_else(|| anyhow!("browser already closed"))
    }
}

impl BrowserBackend for ChromiumBackend {
    type Context = ChromiumContext;

    async fn new_context(&self, identity: &str) -> Result<ChromiumContext> {
        let browser = Arc::clone(self.browser()?);
        let id = browser
            .execute(CreateBrowserContextParams::default())
            .await
            .context("Target.createBrowserContext failed")?
            .result
            .browser_context_id;

        debug!("Opened browser context {:?}", id);
        Ok(ChromiumContext {
            browser,
            id,
            identity: identity.to_string(),
        })
    }

    async fn close_browser(&mut self) -> Result<()> {
        let Some(browser) = self.browser.take() else {
            return Ok(());
        };
        let mut browser = Arc::try_unwrap(browser)
            .map_err(|_| anyhow!("browser is still referenced by an open context"))?;

        browser.close().await.context("Browser.close failed")?;
        browser
            .wait()
            .await
            .context("failed waiting for browser process to exit")?;
        info!("Browser closed");
        Ok(())
    }

    async fn stop_engine(&mut self) -> Result<()> {
        if let Some(handler) = self.handler.take() {
            handler.abort();
            match handler.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => return Err(anyhow!("browser handler task panicked: {e}")),
            }
        }
        self.profile.remove()
    }
}

impl Drop for ChromiumBackend {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            // Browser::drop kills the process; the profile cleans itself up
            warn!("ChromiumBackend dropped without close - aborting handler task");
            handler.abort();
        }
    }
}

/// A CDP browser context with its identity
pub struct ChromiumContext {
    browser: Arc<Browser>,
    id: BrowserContextId,
    identity: String,
}

impl BrowserContext for ChromiumContext {
    type Page = ChromiumPage;

    async fn new_page(&self) -> Result<ChromiumPage> {
        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(self.id.clone())
            .build()
            .map_err(|e| anyhow!("invalid target params: {e}"))?;

        let page = self
            .browser
            .new_page(params)
            .await
            .context("Target.createTarget failed")?;

        page.execute(SetUserAgentOverrideParams {
            user_agent: self.identity.clone(),
            accept_language: None,
            platform: None,
            user_agent_metadata: None,
        })
        .await
        .context("Network.setUserAgentOverride failed")?;

        debug!("Page created with identity {}", self.identity);
        Ok(ChromiumPage { page })
    }

    async fn dispose(self) -> Result<()> {
        self.browser
            .execute(DisposeBrowserContextParams {
                browser_context_id: self.id,
            })
            .await
            .context("Target.disposeBrowserContext failed")?;
        Ok(())
    }
}

/// A tab inside a `ChromiumContext`
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    /// Wait until the document is complete and no new resource has
    /// started for `NETWORK_IDLE_QUIET_MS`
    async fn wait_for_network_idle(&self) -> Result<()> {
        let quiet = Duration::from_millis(NETWORK_IDLE_QUIET_MS);
        let poll = Duration::from_millis(NETWORK_IDLE_POLL_MS);

        let mut last_count = None;
        let mut quiet_since = Instant::now();
        loop {
            let state: LoadState = self
                .page
                .evaluate(LOAD_STATE_SCRIPT)
                .await
                .context("failed to evaluate load state")?
                .into_value()
                .context("unexpected load state value")?;

            if last_count != Some(state.resources) {
                last_count = Some(state.resources);
                quiet_since = Instant::now();
            } else if state.ready_state == "complete" && quiet_since.elapsed() >= quiet {
                return Ok(());
            }

            tokio::time::sleep(poll).await;
        }
    }
}

impl PageDriver for ChromiumPage {
    async fn navigate(&self, url: &str, referrer: &str, timeout: Duration) -> Result<()> {
        let params = NavigateParams::builder()
            .url(url)
            .referrer(referrer)
            .build()
            .map_err(|e| anyhow!("invalid navigate params: {e}"))?;

        with_page_timeout(
            async {
                self.page
                    .goto(params)
                    .await
                    .with_context(|| format!("navigation to {url} failed"))?;
                self.wait_for_network_idle().await
            },
            timeout,
            "Page navigation",
        )
        .await
    }

    async fn content(&self) -> Result<String> {
        self.page.content().await.context("failed to read page content")
    }
}
