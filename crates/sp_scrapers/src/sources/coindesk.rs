//! CoinDesk RSS. The feed is well-formed; the engine's media:content
//! handling covers the image and the normalizer does the rest.

use async_trait::async_trait;

use sp_core::{RawItem, Result};

use crate::sources::{FetchContext, Scraper};
use crate::{feed, fetch};

pub struct CoindeskScraper;

impl CoindeskScraper {
    pub fn new() -> Self {
        Self
    }

    const FEED_URL: &'static str = "https://www.coindesk.com/arc/outboundfeeds/rss";
}

#[async_trait]
impl Scraper for CoindeskScraper {
    fn source(&self) -> &'static str {
        "coindesk"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>> {
        let xml = fetch::fetch_text(&ctx.http, Self::FEED_URL).await?;
        Ok(feed::parse_feed(&xml))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_name() {
        assert_eq!(CoindeskScraper::new().source(), "coindesk");
    }
}
