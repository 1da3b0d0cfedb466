//! TechCrunch RSS, fetched through the rendering engine (the feed endpoint
//! sits behind bot protection that plain clients trip) and extracted with
//! the pattern engine over the raw page text.

use async_trait::async_trait;
use tracing::{info, warn};

use sp_core::{RawItem, RenderOptions, Result};

use crate::pattern;
use crate::sources::{is_startup_related, FetchContext, Scraper};

pub struct TechCrunchScraper;

impl TechCrunchScraper {
    pub fn new() -> Self {
        Self
    }

    const FEED_URL: &'static str = "https://techcrunch.com/feed/";

    fn parse_items(text: &str) -> Vec<RawItem> {
        let blocks = pattern::item_blocks(text);
        info!(count = blocks.len(), "found raw items in TechCrunch feed");

        let mut items = Vec::new();
        for block in blocks {
            let title = pattern::text_field(block, "title");
            let link = pattern::text_field(block, "link");
            let description = pattern::text_field(block, "description");

            let (Some(title), Some(link)) = (title, link) else {
                warn!("skipping TechCrunch item without title or link");
                continue;
            };

            let haystack = format!(
                "{} {}",
                title,
                description.as_deref().unwrap_or_default()
            );
            if !is_startup_related(&haystack) {
                continue;
            }

            items.push(RawItem {
                title: Some(title),
                link: Some(link),
                description,
                pub_date: pattern::text_field(block, "pubDate"),
                ..Default::default()
            });
        }
        items
    }
}

#[async_trait]
impl Scraper for TechCrunchScraper {
    fn source(&self) -> &'static str {
        "techcrunch"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>> {
        let page = ctx
            .render
            .render(Self::FEED_URL, &RenderOptions::default())
            .await?;
        Ok(Self::parse_items(&page.html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<rss><channel>
<item>
  <title><![CDATA[Acme raises $50M Series B to scale its robots]]></title>
  <link>https://techcrunch.com/2024/01/01/acme</link>
  <pubDate>Mon, 01 Jan 2024 10:00:00 GMT</pubDate>
  <description><![CDATA[The funding round was led by <b>Big VC</b>.]]></description>
</item>
<item>
  <title>Weekend reading: the best long walks</title>
  <link>https://techcrunch.com/2024/01/01/walks</link>
  <description>Nothing about companies here.</description>
</item>
<item>
  <title>No link item</title>
</item>
</channel></rss>"#;

    #[test]
    fn test_keyword_filter_keeps_startup_items() {
        let items = TechCrunchScraper::parse_items(FEED);
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].title.as_deref(),
            Some("Acme raises $50M Series B to scale its robots")
        );
        assert_eq!(
            items[0].pub_date.as_deref(),
            Some("Mon, 01 Jan 2024 10:00:00 GMT")
        );
    }

    #[test]
    fn test_items_without_title_or_link_skipped() {
        let items = TechCrunchScraper::parse_items(FEED);
        assert!(items.iter().all(|i| i.link.is_some() && i.title.is_some()));
    }

    #[test]
    fn test_empty_text_yields_no_items() {
        assert!(TechCrunchScraper::parse_items("not a feed at all").is_empty());
    }
}
