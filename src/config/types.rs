//! Core configuration types for crawl sessions
//!
//! `SessionConfig` holds every setting a session reads at construction or
//! per batch. Hook functions are not part of it; they are installed through
//! setters on `CrawlSession`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::constants::{DEFAULT_TIMEOUT_MS, MAX_RETRY_COUNT};

/// Configuration for a `CrawlSession`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Timeout in milliseconds for each navigation attempt
    ///
    /// Covers the page load and the network-idle wait together.
    ///
    /// Default: 10000
    pub(crate) timeout_ms: u64,

    /// Navigation retries after a failed attempt
    ///
    /// Retries happen immediately, without backoff, and only for
    /// navigation. Set to 0 to fail a URL on its first navigation error.
    ///
    /// Default: 3
    pub(crate) max_retries: u32,

    pub(crate) headless: bool,

    /// User agent used for every batch instead of a randomized one
    pub(crate) fixed_identity: Option<String>,

    /// Chrome user data directory
    ///
    /// When unset each session gets a fresh temp profile that is removed
    /// on close. A configured directory is reused and never removed.
    pub(crate) chrome_data_dir: Option<PathBuf>,

    /// Chrome/Chromium executable, checked before `CHROMIUM_PATH` and the
    /// platform install locations
    pub(crate) chrome_executable: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: MAX_RETRY_COUNT,
            headless: true,
            fixed_identity: None,
            chrome_data_dir: None,
            chrome_executable: None,
        }
    }
}
