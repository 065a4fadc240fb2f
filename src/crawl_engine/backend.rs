//! Browser capability traits
//!
//! The session drives the browser only through these three traits, so the
//! crawl logic is independent of the engine behind them. `ChromiumBackend`
//! is the production implementation; tests plug in a scripted double.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;

/// A launched browser instance owned by one session
pub trait BrowserBackend: Send + Sync {
    type Context: BrowserContext;

    /// Open an isolated context whose pages present `identity` as user agent
    fn new_context(&self, identity: &str) -> impl Future<Output = Result<Self::Context>> + Send;

    /// Close the browser instance
    fn close_browser(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Stop the engine driving the browser and release its resources
    ///
    /// Called after `close_browser`, even when that failed.
    fn stop_engine(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// An isolated browsing session (cookies, storage) inside a browser
pub trait BrowserContext: Send + Sync {
    type Page: PageDriver;

    fn new_page(&self) -> impl Future<Output = Result<Self::Page>> + Send;

    /// Release the context and every page opened in it
    fn dispose(self) -> impl Future<Output = Result<()>> + Send;
}

/// One browser tab
pub trait PageDriver: Send + Sync {
    /// Load `url` with `referrer`, returning once the network is idle
    ///
    /// Implementations must give up after `timeout`.
    fn navigate(
        &self,
        url: &str,
        referrer: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Fully rendered HTML of the current document
    fn content(&self) -> impl Future<Output = Result<String>> + Send;
}
