//! Page rendering boundary.
//!
//! Career and news pages are frequently JS-rendered, so the default
//! fetch agent drives a headless Chromium over CDP. The trait keeps
//! the scheduler testable without a browser.

#[cfg(feature = "browser")]
mod chromium;

#[cfg(feature = "browser")]
pub use chromium::BrowserRenderer;

use async_trait::async_trait;

/// Capability that turns a URL into fully-rendered HTML.
///
/// Implementations own their per-call resources (pages, contexts) and
/// must release them on success and failure alike. The scheduler
/// applies its own hard timeout around every call; internal timeouts
/// only need to keep the implementation from wedging its resources.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Render the page at `url` and return its HTML.
    async fn render(&self, url: &str) -> anyhow::Result<String>;

    /// Release long-lived resources (e.g. the browser process).
    async fn close(&self) {}
}
