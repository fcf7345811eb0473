//! Headless Chromium renderer over CDP.

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::PageRenderer;
use crate::config::DEFAULT_USER_AGENT;

/// JavaScript to wait for page ready state.
const WAIT_FOR_READY_SCRIPT: &str = r#"
    new Promise((resolve) => {
        if (document.readyState === 'complete' || document.readyState === 'interactive') {
            resolve(document.readyState);
        } else {
            document.addEventListener('DOMContentLoaded', () => resolve(document.readyState));
            setTimeout(() => resolve('timeout'), 10000);
        }
    })
"#;

struct BrowserHandle {
    browser: Browser,
    event_loop: JoinHandle<()>,
}

/// Renderer backed by a lazily-launched headless Chromium.
///
/// One browser process serves the whole run; each render opens a fresh
/// page and closes it regardless of outcome.
pub struct BrowserRenderer {
    handle: Mutex<Option<BrowserHandle>>,
    user_agent: String,
    navigation_timeout: Duration,
}

impl BrowserRenderer {
    /// Create a renderer; the browser launches on first use.
    pub fn new(user_agent: impl Into<String>, navigation_timeout: Duration) -> Self {
        Self {
            handle: Mutex::new(None),
            user_agent: user_agent.into(),
            navigation_timeout,
        }
    }

    /// Renderer with the stock user agent and a 60s navigation cap.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_USER_AGENT, Duration::from_secs(60))
    }

    /// Launch the browser if it is not already running.
    async fn ensure_browser(&self) -> Result<()> {
        let mut handle = self.handle.lock().await;
        if handle.is_some() {
            return Ok(());
        }

        let config = BrowserConfig::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("Browser config error: {}", e))?;

        let (browser, mut events) = Browser::launch(config).await?;
        let event_loop = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!("Browser event error: {}", e);
                }
            }
        });

        debug!("Launched headless browser");
        *handle = Some(BrowserHandle {
            browser,
            event_loop,
        });
        Ok(())
    }

    /// Inner render logic - page cleanup handled by caller.
    async fn render_inner(&self, page: &Page, url: &str) -> Result<String> {
        // Realistic user agent before any navigation
        page.execute(SetUserAgentOverrideParams::new(self.user_agent.clone()))
            .await?;

        self.navigate(page, url).await?;
        self.wait_for_ready(page).await;

        // Settle time for late-arriving listing rows
        tokio::time::sleep(Duration::from_millis(500)).await;

        Ok(page.content().await?)
    }

    async fn navigate(&self, page: &Page, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        let params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid URL: {}", e))?;

        tokio::time::timeout(self.navigation_timeout, page.execute(params))
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "Navigation timed out after {:?} for {}",
                    self.navigation_timeout,
                    url
                )
            })?
            .map_err(|e| anyhow::anyhow!("Navigation failed for {}: {}", url, e))?;

        Ok(())
    }

    async fn wait_for_ready(&self, page: &Page) {
        match tokio::time::timeout(
            self.navigation_timeout,
            page.evaluate(WAIT_FOR_READY_SCRIPT.to_string()),
        )
        .await
        {
            Ok(Ok(result)) => {
                let state: String = result
                    .into_value()
                    .unwrap_or_else(|_| "unknown".to_string());
                debug!("Page ready state: {}", state);
            }
            Ok(Err(e)) => debug!("Could not check ready state: {}", e),
            Err(_) => warn!("Timeout waiting for page ready state"),
        }
    }
}

#[async_trait::async_trait]
impl PageRenderer for BrowserRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        self.ensure_browser().await?;

        let page = {
            let handle = self.handle.lock().await;
            let handle = handle
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("browser missing after ensure_browser"))?;
            handle.browser.new_page("about:blank").await?
        };

        // Inner call so the page is closed on every path
        let result = self.render_inner(&page, url).await;
        let _ = page.close().await;
        result
    }

    async fn close(&self) {
        let mut handle = self.handle.lock().await;
        if let Some(mut h) = handle.take() {
            if let Err(e) = h.browser.close().await {
                warn!("Browser close failed: {}", e);
            }
            let _ = h.browser.wait().await;
            h.event_loop.abort();
        }
    }
}
