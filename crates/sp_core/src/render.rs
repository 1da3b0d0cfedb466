use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

/// Load condition the engine waits for before returning the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    DomContentLoaded,
    NetworkIdle,
}

/// Knobs for a single render call.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub user_agent: Option<String>,
    pub timeout: Duration,
    /// Resource types the engine should refuse to load (e.g. "image",
    /// "stylesheet"). Engines that cannot block resources ignore this.
    pub blocked_resource_types: Vec<String>,
    pub wait_until: WaitUntil,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout: Duration::from_secs(30),
            blocked_resource_types: Vec::new(),
            wait_until: WaitUntil::NetworkIdle,
        }
    }
}

/// Result of rendering a page: the DOM serialized back to markup, and the
/// visible text content.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub text: String,
}

/// External page-rendering engine, capable of executing a page's scripts.
///
/// A timeout or navigation error surfaces as `Error::Fetch` and is treated
/// by callers as a per-source or per-item failure, never a fatal one.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    async fn render(&self, url: &str, options: &RenderOptions) -> Result<RenderedPage>;
}
