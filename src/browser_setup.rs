//! Locating, downloading and launching Chrome/Chromium.

use anyhow::{Context, Result, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

/// Environment variable pointing at a Chrome/Chromium executable
pub const CHROMIUM_PATH_ENV: &str = "CHROMIUM_PATH";

/// Extra flags for every launched browser
///
/// No user agent here; pages get theirs from the batch identity.
const LAUNCH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-notifications",
    "--disable-setuid-sandbox",
    "--no-first-run",
    "--no-default-browser-check",
    "--no-sandbox",
    "--disable-extensions",
    "--disable-breakpad",
    "--disable-features=TranslateUI",
    "--password-store=basic",
    "--use-mock-keychain",
    "--mute-audio",
];

/// Binary names tried with `which` when no known install path exists
const PATH_BINARIES: &[&str] = &["chromium", "chromium-browser", "google-chrome", "chrome"];

/// Well-known install locations for the current platform
fn install_locations() -> Vec<PathBuf> {
    let raw: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    raw.iter()
        .filter_map(|p| match p.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(PathBuf::from(p)),
        })
        .collect()
}

/// First binary in `PATH_BINARIES` that `which` resolves
fn which_browser() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        return None;
    }
    PATH_BINARIES.iter().find_map(|name| {
        let output = Command::new("which").arg(name).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!found.is_empty()).then(|| PathBuf::from(found))
    })
}

/// Find a Chrome/Chromium executable already on this machine
///
/// Order: `configured` (from `SessionConfig::chrome_executable`), the
/// `CHROMIUM_PATH` environment variable, platform install locations,
/// then `which`.
pub async fn find_browser_executable(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            info!("Using configured browser executable: {}", path.display());
            return Ok(path.to_path_buf());
        }
        warn!("Configured browser executable does not exist: {}", path.display());
    }

    if let Ok(value) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(value);
        if path.exists() {
            info!("Using browser from {CHROMIUM_PATH_ENV}: {}", path.display());
            return Ok(path);
        }
        warn!("{CHROMIUM_PATH_ENV} points to a missing file: {}", path.display());
    }

    if let Some(path) = install_locations().into_iter().find(|p| p.exists()) {
        info!("Found browser at: {}", path.display());
        return Ok(path);
    }

    if let Some(path) = which_browser() {
        info!("Found browser on PATH: {}", path.display());
        return Ok(path);
    }

    Err(anyhow!("Chrome/Chromium executable not found"))
}

/// Download a managed Chromium into the user cache directory
///
/// Returns the path of the downloaded executable. Later calls reuse the
/// cached revision.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(|| {
            let fallback = std::env::temp_dir();
            warn!(
                "No user cache directory, downloading browser to {}",
                fallback.display()
            );
            fallback
        })
        .join("rendercrawl")
        .join("chromium");

    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create {}", cache_dir.display()))?;

    info!("Downloading managed Chromium into {}", cache_dir.display());
    let options = BrowserFetcherOptions::builder()
        .with_path(&cache_dir)
        .build()
        .context("Failed to build fetcher options")?;
    let revision = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Failed to fetch browser")?;

    info!("Chromium ready at {}", revision.executable_path.display());
    Ok(revision.executable_path)
}

/// Make a browser executable available, downloading one if none is installed
pub async fn install_browser(configured: Option<&Path>) -> Result<PathBuf> {
    match find_browser_executable(configured).await {
        Ok(path) => Ok(path),
        Err(e) => {
            debug!("{e}; falling back to managed download");
            download_managed_browser().await
        }
    }
}

/// Launch the browser and spawn the task driving its CDP connection
///
/// # Handler Lifecycle
/// The returned `JoinHandle` must be aborted once the browser is closed,
/// otherwise it keeps polling a dead connection.
pub async fn launch_browser(
    executable: PathBuf,
    headless: bool,
    user_data_dir: &Path,
) -> Result<(Browser, JoinHandle<()>)> {
    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(30))
        .window_size(1920, 1080)
        .user_data_dir(user_data_dir)
        .chrome_executable(executable)
        .args(LAUNCH_ARGS.iter().copied());

    builder = if headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    let config = builder
        .build()
        .map_err(|e| anyhow!("Failed to build browser config: {e}"))?;

    debug!("Launching browser with config: {config:?}");
    let (browser, mut handler) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            let Err(e) = event else { continue };
            let msg = e.to_string();
            // Chrome emits CDP events chromiumoxide can't deserialize; those are harmless.
            // https://github.com/mattsse/chromiumoxide/issues/167
            if msg.contains("data did not match any variant of untagged enum Message")
                || msg.contains("Failed to deserialize WS response")
            {
                trace!("Suppressed benign CDP serialization error: {msg}");
            } else {
                error!("Browser handler error: {e:?}");
            }
        }
        debug!("Browser handler task completed");
    });

    Ok((browser, handler_task))
}
