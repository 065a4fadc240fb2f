//! Core types for rendered-page crawling.
//!
//! This module contains the error types, the batch report and the output
//! mode shared by the session and the page pipeline.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for crawl operations
///
/// Capability failures from the browser engine are carried as `anyhow`
/// causes so the full chain survives into the final message.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// No browser executable could be found or downloaded
    #[error("failed to install browser: {0:#}")]
    Install(#[source] anyhow::Error),

    /// Browser process could not be started
    #[error("failed to launch browser: {0:#}")]
    Launch(#[source] anyhow::Error),

    /// Browser context could not be opened for a batch
    #[error("failed to create browser context: {0:#}")]
    Context(#[source] anyhow::Error),

    /// Page could not be opened inside the batch context
    #[error("failed to create page: {0:#}")]
    Page(#[source] anyhow::Error),

    /// URL (after rewriting) is not an absolute URL
    #[error("failed to parse url '{url}': {source}")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Every navigation attempt failed
    #[error("all {retries} retries of reading page '{url}' failed: {source:#}")]
    Navigation {
        url: String,
        retries: u32,
        #[source]
        source: anyhow::Error,
    },

    /// Navigation succeeded but the rendered HTML could not be read
    #[error("failed to get page content of '{url}': {source:#}")]
    ContentRead {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// Selector chooser returned something that is not a valid selector
    ///
    /// Reported as a failure for the URL rather than treated as a selector
    /// that matches nothing.
    #[error("failed to select '{selector}' of page '{url}': {reason}")]
    Selector {
        url: String,
        selector: String,
        reason: String,
    },

    /// Browser or engine shutdown failed; both steps are always attempted
    #[error("{}", shutdown_message(.browser, .engine))]
    Shutdown {
        browser: Option<anyhow::Error>,
        engine: Option<anyhow::Error>,
    },

    /// Another batch is already running on this session
    #[error("session is already crawling; use one session per concurrent batch")]
    Busy,

    /// Session was closed before this call
    #[error("session is closed")]
    Closed,
}

fn shutdown_message(browser: &Option<anyhow::Error>, engine: &Option<anyhow::Error>) -> String {
    let mut lines = Vec::with_capacity(2);
    if let Some(e) = browser {
        lines.push(format!("failed to close browser: {e:#}"));
    }
    if let Some(e) = engine {
        lines.push(format!("failed to stop browser engine: {e:#}"));
    }
    lines.join("\n")
}

impl CrawlError {
    /// Whether this error is confined to a single URL of a batch
    #[must_use]
    pub const fn is_per_url(&self) -> bool {
        matches!(
            self,
            Self::UrlParse { .. }
                | Self::Navigation { .. }
                | Self::ContentRead { .. }
                | Self::Selector { .. }
        )
    }
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;

/// One failed URL of a batch
#[derive(Debug)]
pub struct PageFailure {
    /// Effective URL (after rewriting)
    pub url: String,
    pub error: CrawlError,
}

impl fmt::Display for PageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            CrawlError::UrlParse { .. } => write!(f, "{}", self.error),
            _ => write!(f, "failed to read page: {}", self.error),
        }
    }
}

/// Aggregated per-URL failures of one batch
#[derive(Debug, Default)]
pub struct BatchError {
    pub failures: Vec<PageFailure>,
}

impl BatchError {
    /// Failed URLs in batch order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.url.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|f| &f.error as &(dyn std::error::Error + 'static))
    }
}

/// Result of one batch crawl
///
/// `pages` maps the effective (rewritten) URL to its extracted content.
/// A requested URL missing from `pages` failed, and its error is in
/// `failures`. Callers should check both.
#[derive(Debug, Default)]
pub struct CrawlReport {
    pub pages: HashMap<String, String>,
    pub failures: Vec<PageFailure>,
}

impl CrawlReport {
    /// Content extracted for `url`, keyed by the rewritten form
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&str> {
        self.pages.get(url).map(String::as_str)
    }

    /// True when no URL of the batch failed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Split into content and the aggregated error, if any URL failed
    #[must_use]
    pub fn into_parts(self) -> (HashMap<String, String>, Option<BatchError>) {
        let error = if self.failures.is_empty() {
            None
        } else {
            Some(BatchError {
                failures: self.failures,
            })
        };
        (self.pages, error)
    }

    /// Content for a fully successful batch, otherwise the aggregated error
    ///
    /// Partial results are discarded on error; use `into_parts` to keep them.
    pub fn into_result(self) -> Result<HashMap<String, String>, BatchError> {
        match self.into_parts() {
            (pages, None) => Ok(pages),
            (_, Some(err)) => Err(err),
        }
    }
}

/// How the selected node is serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Plain text passed through the text tidier
    #[default]
    Text,
    /// Inner HTML of the selected node
    Html,
}

impl ExtractMode {
    #[must_use]
    pub const fn as_html(self) -> bool {
        matches!(self, Self::Html)
    }
}

impl From<bool> for ExtractMode {
    fn from(as_html: bool) -> Self {
        if as_html { Self::Html } else { Self::Text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_failure(url: &str) -> PageFailure {
        PageFailure {
            url: url.to_string(),
            error: CrawlError::UrlParse {
                url: url.to_string(),
                source: url::ParseError::RelativeUrlWithoutBase,
            },
        }
    }

    #[test]
    fn batch_error_joins_one_line_per_failure() {
        let err = BatchError {
            failures: vec![
                parse_failure("nope"),
                PageFailure {
                    url: "https://example.com/".to_string(),
                    error: CrawlError::Navigation {
                        url: "https://example.com/".to_string(),
                        retries: 3,
                        source: anyhow::anyhow!("net::ERR_CONNECTION_REFUSED"),
                    },
                },
            ],
        };

        let msg = err.to_string();
        let lines: Vec<&str> = msg.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("failed to parse url 'nope'"));
        assert!(lines[1].starts_with("failed to read page: all 3 retries"));
        assert!(lines[1].contains("ERR_CONNECTION_REFUSED"));
        assert_eq!(err.urls().collect::<Vec<_>>(), vec!["nope", "https://example.com/"]);
    }

    #[test]
    fn report_error_present_only_with_failures() {
        let mut report = CrawlReport::default();
        report
            .pages
            .insert("https://example.com/".to_string(), "hi".to_string());
        assert!(report.is_complete());
        let (pages, err) = report.into_parts();
        assert_eq!(pages.len(), 1);
        assert!(err.is_none());

        let report = CrawlReport {
            pages: HashMap::new(),
            failures: vec![parse_failure("x")],
        };
        assert!(report.into_result().is_err());
    }

    #[test]
    fn shutdown_error_reports_both_steps() {
        let err = CrawlError::Shutdown {
            browser: Some(anyhow::anyhow!("browser gone")),
            engine: Some(anyhow::anyhow!("handler stuck")),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed to close browser: browser gone"));
        assert!(msg.contains("failed to stop browser engine: handler stuck"));
        assert!(!err.is_per_url());
    }

    #[test]
    fn extract_mode_from_flag() {
        assert_eq!(ExtractMode::from(true), ExtractMode::Html);
        assert_eq!(ExtractMode::from(false), ExtractMode::Text);
        assert_eq!(ExtractMode::default(), ExtractMode::Text);
    }
}
