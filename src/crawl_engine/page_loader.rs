//! Per-URL extraction pipeline
//!
//! Navigate (with bounded retry), read rendered HTML, then hand off to
//! `page_extractor::extract_from_html`. Only navigation is retried.

use std::time::Duration;

use log::{debug, warn};

use super::backend::PageDriver;
use super::crawl_types::{CrawlError, CrawlResult, ExtractMode};
use crate::page_extractor::{PageHooks, extract_from_html};

/// Navigation settings for one batch
#[derive(Debug, Clone, Copy)]
pub struct NavigationSettings {
    pub timeout: Duration,
    pub max_retries: u32,
}

/// Navigate `page` to `url`, retrying failed attempts immediately
///
/// Makes at most `max_retries + 1` attempts with the same URL and
/// referrer. The last failure is returned as `CrawlError::Navigation`.
pub async fn navigate_with_retry<P: PageDriver>(
    page: &P,
    url: &str,
    referrer: &str,
    settings: NavigationSettings,
) -> CrawlResult<()> {
    let mut attempt = 0;
    loop {
        match page.navigate(url, referrer, settings.timeout).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < settings.max_retries => {
                attempt += 1;
                warn!(
                    "Navigation to {url} failed (retry {attempt}/{}): {e:#}",
                    settings.max_retries
                );
            }
            Err(e) => {
                warn!("Giving up on {url} after {} attempts: {e:#}", attempt + 1);
                return Err(CrawlError::Navigation {
                    url: url.to_string(),
                    retries: settings.max_retries,
                    source: e,
                });
            }
        }
    }
}

/// Run the whole pipeline for one URL on an open page
pub async fn extract_page<P: PageDriver>(
    page: &P,
    url: &str,
    referrer: &str,
    mode: ExtractMode,
    hooks: &PageHooks,
    settings: NavigationSettings,
) -> CrawlResult<String> {
    navigate_with_retry(page, url, referrer, settings).await?;

    let html = page.content().await.map_err(|source| CrawlError::ContentRead {
        url: url.to_string(),
        source,
    })?;
    debug!("Read {} bytes of rendered HTML from {url}", html.len());

    extract_from_html(&html, url, mode, hooks)
}
