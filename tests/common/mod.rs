//! Test utilities for the rendercrawl test suite
//!
//! `FakeBrowser` implements the browser capability traits with scripted
//! pages and failures, so session behavior can be tested without Chrome.

use anyhow::{Result, anyhow};
use kodegen_tools_rendercrawl::{BrowserBackend, BrowserContext, CrawlSession, PageDriver, SessionConfig};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared script and recordings of a fake browser
#[derive(Default)]
pub struct FakeState {
    /// url -> rendered html
    pub pages: Mutex<HashMap<String, String>>,
    /// url -> navigation failures left before it loads
    pub nav_failures: Mutex<HashMap<String, u32>>,
    /// urls whose content read fails
    pub content_failures: Mutex<HashSet<String>>,
    pub nav_delay: Mutex<Option<Duration>>,

    pub fail_context: AtomicBool,
    pub fail_page: AtomicBool,
    pub fail_close: AtomicBool,
    pub fail_stop: AtomicBool,

    /// identity of every opened context
    pub identities: Mutex<Vec<String>>,
    /// (url, referrer, timeout) of every navigation attempt
    pub navigations: Mutex<Vec<(String, String, Duration)>>,
    pub disposed: AtomicUsize,
    pub closed: AtomicUsize,
    pub stopped: AtomicUsize,
}

impl FakeState {
    #[allow(dead_code)]
    pub fn attempts_for(&self, url: &str) -> usize {
        self.navigations
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _, _)| u == url)
            .count()
    }
}

pub struct FakeBrowser {
    pub state: Arc<FakeState>,
}

pub struct FakeContext {
    state: Arc<FakeState>,
}

pub struct FakePage {
    state: Arc<FakeState>,
    current: Mutex<Option<String>>,
}

impl BrowserBackend for FakeBrowser {
    type Context = FakeContext;

    async fn new_context(&self, identity: &str) -> Result<FakeContext> {
        if self.state.fail_context.load(Ordering::SeqCst) {
            return Err(anyhow!("browser has disconnected"));
        }
        self.state.identities.lock().unwrap().push(identity.to_string());
        Ok(FakeContext {
            state: Arc::clone(&self.state),
        })
    }

    async fn close_browser(&mut self) -> Result<()> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_close.load(Ordering::SeqCst) {
            return Err(anyhow!("browser close timed out"));
        }
        Ok(())
    }

    async fn stop_engine(&mut self) -> Result<()> {
        self.state.stopped.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_stop.load(Ordering::SeqCst) {
            return Err(anyhow!("driver process did not exit"));
        }
        Ok(())
    }
}

impl BrowserContext for FakeContext {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage> {
        if self.state.fail_page.load(Ordering::SeqCst) {
            return Err(anyhow!("target crashed"));
        }
        Ok(FakePage {
            state: Arc::clone(&self.state),
            current: Mutex::new(None),
        })
    }

    async fn dispose(self) -> Result<()> {
        self.state.disposed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl PageDriver for FakePage {
    async fn navigate(&self, url: &str, referrer: &str, timeout: Duration) -> Result<()> {
        self.state
            .navigations
            .lock()
            .unwrap()
            .push((url.to_string(), referrer.to_string(), timeout));

        let delay = *self.state.nav_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        {
            let mut failures = self.state.nav_failures.lock().unwrap();
            if let Some(left) = failures.get_mut(url)
                && *left > 0
            {
                *left -= 1;
                return Err(anyhow!("net::ERR_CONNECTION_RESET"));
            }
        }

        if !self.state.pages.lock().unwrap().contains_key(url) {
            return Err(anyhow!("net::ERR_NAME_NOT_RESOLVED"));
        }
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        let current = self
            .current
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("no document"))?;
        if self.state.content_failures.lock().unwrap().contains(&current) {
            return Err(anyhow!("execution context was destroyed"));
        }
        self.state
            .pages
            .lock()
            .unwrap()
            .get(&current)
            .cloned()
            .ok_or_else(|| anyhow!("no document"))
    }
}

/// Creates a test HTML document with the given body
#[allow(dead_code)]
pub fn create_test_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <link rel="stylesheet" href="/style.css">
</head>
<body>
    {body}
    <script>window.analytics = true;</script>
</body>
</html>"#
    )
}

/// Session over a fake browser serving `pages`, plus its shared state
#[allow(dead_code)]
pub fn fake_session(pages: &[(&str, String)]) -> (CrawlSession<FakeBrowser>, Arc<FakeState>) {
    fake_session_with_config(pages, SessionConfig::default())
}

#[allow(dead_code)]
pub fn fake_session_with_config(
    pages: &[(&str, String)],
    config: SessionConfig,
) -> (CrawlSession<FakeBrowser>, Arc<FakeState>) {
    let state = Arc::new(FakeState::default());
    {
        let mut map = state.pages.lock().unwrap();
        for (url, html) in pages {
            map.insert((*url).to_string(), html.clone());
        }
    }
    let backend = FakeBrowser {
        state: Arc::clone(&state),
    };
    (CrawlSession::with_backend(backend, config), state)
}
