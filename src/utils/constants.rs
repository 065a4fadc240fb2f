//! Shared configuration constants for rendercrawl
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

use crate::crawl_engine::ExtractMode;

/// Default navigation timeout: 10 seconds
///
/// Applied to each navigation attempt (page load plus network-idle wait).
/// Override per session via `SessionConfigBuilder::timeout_ms` or
/// `CrawlSession::set_timeout_ms`.
pub const DEFAULT_TIMEOUT_MS: u64 = 10 * 1000;

/// Navigation retries after the first failed attempt
///
/// A URL gets `MAX_RETRY_COUNT + 1` navigation attempts in total before it
/// is reported as failed. Only navigation is retried.
pub const MAX_RETRY_COUNT: u32 = 3;

/// Selector used when no selector chooser is configured
pub const DEFAULT_SELECTOR: &str = "body";

/// Output mode used by callers that don't pick one
pub const DEFAULT_EXTRACT_MODE: ExtractMode = ExtractMode::Text;

/// Pattern for randomized user-agent strings
///
/// Each `{}` is filled by one field of the default identity template,
/// in order: OS major.minor, OS major.minor, `rv` revision, Gecko build
/// date, Firefox version.
pub const RANDOM_USER_AGENT_PATTERN: &str =
    "Mozilla/{} (Macintosh; Intel Mac OS X {}; rv:{}) Gecko/{} Firefox/{}";

/// Quiet window for the network-idle wait: 500ms
///
/// The page counts as idle once no new resource has started loading
/// for this long.
pub const NETWORK_IDLE_QUIET_MS: u64 = 500;

/// Poll interval for the network-idle wait
pub const NETWORK_IDLE_POLL_MS: u64 = 100;

/// Prefix of per-session Chrome profile directories in the temp dir
pub const PROFILE_DIR_PREFIX: &str = "rendercrawl_chrome";
