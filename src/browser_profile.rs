//! Chrome profile directory management
//!
//! Every session launches its browser with its own profile directory so
//! parallel sessions never contend for Chrome's SingletonLock.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::utils::constants::PROFILE_DIR_PREFIX;

/// RAII wrapper for a Chrome profile directory
///
/// Generated profiles are removed on drop (or on `remove`). Profiles supplied
/// by the caller through configuration are never deleted.
#[derive(Debug)]
pub struct BrowserProfile {
    path: PathBuf,
    owned: bool,
}

impl BrowserProfile {
    /// Create a unique profile directory in the temp dir
    ///
    /// Uses `create_dir` (not `create_dir_all`) so a UUID collision fails
    /// instead of sharing a directory.
    pub fn create_unique() -> Result<Self> {
        let path = std::env::temp_dir().join(format!("{PROFILE_DIR_PREFIX}_{}", Uuid::new_v4()));

        debug!("Creating unique Chrome profile: {}", path.display());
        std::fs::create_dir(&path)
            .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;

        info!("Created Chrome profile directory: {}", path.display());
        Ok(Self { path, owned: true })
    }

    /// Use a caller-provided profile directory, creating it if needed
    pub fn at(path: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;
        Ok(Self { path, owned: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now, reporting failure
    ///
    /// Must run after the browser process has exited, otherwise Chrome may
    /// still hold files open. No-op for caller-provided directories and on
    /// repeated calls.
    pub fn remove(&mut self) -> Result<()> {
        if !self.owned || !self.path.exists() {
            self.owned = false;
            return Ok(());
        }
        self.owned = false;
        info!("Removing Chrome profile directory: {}", self.path.display());
        std::fs::remove_dir_all(&self.path)
            .with_context(|| format!("Failed to remove profile directory: {}", self.path.display()))
    }
}

impl Drop for BrowserProfile {
    fn drop(&mut self) {
        if self.owned && self.path.exists() {
            info!("BrowserProfile cleanup: removing {}", self.path.display());
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!("Failed to cleanup profile directory {}: {}", self.path.display(), e);
            }
        }
    }
}
