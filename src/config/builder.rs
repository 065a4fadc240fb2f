//! Fluent builder for `SessionConfig`
//!
//! Every field has a default, so the builder can be built straight away;
//! `build()` rejects values the session could not run with.

use anyhow::{Result, bail};
use std::path::PathBuf;

use super::types::SessionConfig;

#[derive(Debug, Clone, Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfig {
    /// Create a builder for configuring a `SessionConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

impl SessionConfigBuilder {
    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Present this user agent instead of generating one per batch
    #[must_use]
    pub fn fixed_identity(mut self, identity: impl Into<String>) -> Self {
        self.config.fixed_identity = Some(identity.into());
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.chrome_data_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_executable = Some(path.into());
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero or the fixed identity is blank.
    pub fn build(self) -> Result<SessionConfig> {
        if self.config.timeout_ms == 0 {
            bail!("timeout_ms must be greater than zero");
        }
        if let Some(identity) = &self.config.fixed_identity
            && identity.trim().is_empty()
        {
            bail!("fixed_identity must not be blank");
        }
        Ok(self.config)
    }
}
