//! Caller-replaceable steps of the page pipeline.
//!
//! Each hook is a shared function value with a documented default, so a
//! session can be cloned into tasks or swapped piecemeal through setters.

use std::fmt;
use std::sync::Arc;

use scraper::Html;

use super::document_filter::default_document_filter;
use super::text_tidy::default_text_tidier;
use crate::utils::constants::DEFAULT_SELECTOR;

/// Maps a requested URL to the URL actually crawled (and used as result key)
pub type UrlRewriter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Picks the selector to extract for a URL
pub type SelectorChooser = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Removes unwanted nodes from the parsed page in place
pub type DocumentFilter = Arc<dyn Fn(&mut Html) + Send + Sync>;

/// Normalizes extracted plain text
pub type TextTidier = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Returns `url` unchanged
#[must_use]
pub fn default_url_rewriter(url: &str) -> String {
    url.to_string()
}

/// Always selects the page body
#[must_use]
pub fn default_selector_chooser(_url: &str) -> String {
    DEFAULT_SELECTOR.to_string()
}

/// The four hooks used by the extraction pipeline
#[derive(Clone)]
pub struct PageHooks {
    pub url_rewriter: UrlRewriter,
    pub selector_chooser: SelectorChooser,
    pub document_filter: DocumentFilter,
    pub text_tidier: TextTidier,
}

impl Default for PageHooks {
    fn default() -> Self {
        Self {
            url_rewriter: Arc::new(default_url_rewriter),
            selector_chooser: Arc::new(default_selector_chooser),
            document_filter: Arc::new(default_document_filter),
            text_tidier: Arc::new(default_text_tidier),
        }
    }
}

impl fmt::Debug for PageHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageHooks").finish_non_exhaustive()
    }
}

impl PageHooks {
    pub fn rewrite_url(&self, url: &str) -> String {
        (self.url_rewriter)(url)
    }

    pub fn selector_for(&self, url: &str) -> String {
        (self.selector_chooser)(url)
    }

    pub fn filter_document(&self, doc: &mut Html) {
        (self.document_filter)(doc);
    }

    pub fn tidy_text(&self, text: &str) -> String {
        (self.text_tidier)(text)
    }
}
