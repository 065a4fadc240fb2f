//! Crawl Engine Module
//!
//! This module contains the browser-driven crawl pipeline: the capability
//! traits a browser must provide, the chromiumoxide implementation, the
//! per-URL navigation and extraction pipeline, and the session that runs
//! batches of URLs through it.

// Sub-modules
pub mod backend;
pub mod chromium;
pub mod crawl_types;
pub mod page_loader;
pub mod page_timeout;
pub mod session;

// Re-export capability traits and the chromium implementation
pub use backend::{BrowserBackend, BrowserContext, PageDriver};
pub use chromium::{ChromiumBackend, ChromiumContext, ChromiumPage};

// Re-export crawl types
pub use crawl_types::{BatchError, CrawlError, CrawlReport, CrawlResult, ExtractMode, PageFailure};

// Re-export pipeline and session
pub use page_loader::{NavigationSettings, extract_page, navigate_with_retry};
pub use session::{CrawlSession, crawl_urls};
