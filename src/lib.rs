pub mod browser_profile;
pub mod browser_setup;
pub mod config;
pub mod crawl_engine;
pub mod identity;
pub mod page_extractor;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, install_browser};
pub use config::{SessionConfig, SessionConfigBuilder};
pub use crawl_engine::{
    BatchError, BrowserBackend, BrowserContext, ChromiumBackend, CrawlError, CrawlReport,
    CrawlResult, CrawlSession, ExtractMode, PageDriver, PageFailure, crawl_urls,
};
pub use identity::{Component, IdentityError, IdentityField, IdentityTemplate};
pub use page_extractor::{
    PageHooks, default_document_filter, default_selector_chooser, default_text_tidier,
    default_url_rewriter,
};
pub use utils::constants::{
    DEFAULT_EXTRACT_MODE, DEFAULT_SELECTOR, DEFAULT_TIMEOUT_MS, MAX_RETRY_COUNT,
    RANDOM_USER_AGENT_PATTERN,
};

/// Re-export of the HTML document type handed to document filters
pub use scraper::Html;
