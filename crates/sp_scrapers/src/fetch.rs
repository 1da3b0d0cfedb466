//! HTTP retrieval shared by every scraper, plus the default
//! [`RenderEngine`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use sp_core::{Error, RenderEngine, RenderOptions, RenderedPage, Result};

use crate::clean;

/// Browser-like user agent; several feed hosts refuse the default reqwest
/// one.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the pipeline's HTTP client.
pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))
}

/// GET a URL and return the response body.
///
/// Network and status failures map to [`Error::Fetch`] so callers can treat
/// them as per-source failures.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Fetch(format!("request to {url} failed: {e}")))?;

    let response = response
        .error_for_status()
        .map_err(|e| Error::Fetch(format!("request to {url} failed: {e}")))?;

    response
        .text()
        .await
        .map_err(|e| Error::Fetch(format!("reading body of {url} failed: {e}")))
}

/// Plain-HTTP stand-in for the browser rendering engine.
///
/// It cannot execute scripts, so `blocked_resource_types` and
/// `wait_until` are accepted and ignored; the sources in this pipeline all
/// serve usable markup to a UA-bearing GET. A script-capable engine can be
/// substituted through the same trait without touching any scraper.
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
        })
    }
}

#[async_trait]
impl RenderEngine for HttpRenderer {
    async fn render(&self, url: &str, options: &RenderOptions) -> Result<RenderedPage> {
        let mut request = self.client.get(url).timeout(options.timeout);
        if let Some(ref agent) = options.user_agent {
            request = request.header(reqwest::header::USER_AGENT, agent);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("navigation to {url} failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Fetch(format!("navigation to {url} failed: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("reading page at {url} failed: {e}")))?;

        let text = clean::strip_html(&html);
        Ok(RenderedPage { html, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_builds() {
        assert!(http_client(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_error_is_fetch_variant() {
        let client = http_client(Duration::from_millis(100)).unwrap();
        let result = fetch_text(&client, "http://127.0.0.1:1/unreachable").await;
        assert!(matches!(result, Err(Error::Fetch(_))));
    }
}
