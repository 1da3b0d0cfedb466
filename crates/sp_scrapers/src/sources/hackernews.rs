//! Hacker News "Show HN" feed (hnrss.org). Titles arrive CDATA-wrapped and
//! prefixed; the prefix is boilerplate and dropped.

use async_trait::async_trait;

use sp_core::{RawItem, Result};

use crate::sources::{FetchContext, Scraper};
use crate::{feed, fetch};

pub struct HackerNewsScraper;

impl HackerNewsScraper {
    pub fn new() -> Self {
        Self
    }

    const FEED_URL: &'static str = "https://hnrss.org/show";

    fn map_item(mut item: RawItem) -> RawItem {
        if let Some(title) = item.title.take() {
            item.title = Some(
                title
                    .strip_prefix("Show HN: ")
                    .unwrap_or(&title)
                    .trim()
                    .to_string(),
            );
        }
        item
    }
}

#[async_trait]
impl Scraper for HackerNewsScraper {
    fn source(&self) -> &'static str {
        "hackernews"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>> {
        let xml = fetch::fetch_text(&ctx.http, Self::FEED_URL).await?;
        Ok(feed::parse_feed(&xml)
            .into_iter()
            .map(Self::map_item)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_hn_prefix_stripped() {
        let item = RawItem {
            title: Some("Show HN: Foo".to_string()),
            ..Default::default()
        };
        assert_eq!(HackerNewsScraper::map_item(item).title.as_deref(), Some("Foo"));
    }

    #[test]
    fn test_unprefixed_title_untouched() {
        let item = RawItem {
            title: Some("Plain title".to_string()),
            ..Default::default()
        };
        assert_eq!(
            HackerNewsScraper::map_item(item).title.as_deref(),
            Some("Plain title")
        );
    }

    #[test]
    fn test_feed_end_to_end_mapping() {
        let xml = r#"<rss><channel><item>
            <title><![CDATA[Show HN: Foo]]></title>
            <link>https://news.ycombinator.com/item?id=1</link>
            <description><![CDATA[<p>I built a thing.</p>]]></description>
            <dc:creator>builder</dc:creator>
        </item></channel></rss>"#;
        let items: Vec<RawItem> = feed::parse_feed(xml)
            .into_iter()
            .map(HackerNewsScraper::map_item)
            .collect();
        assert_eq!(items[0].title.as_deref(), Some("Foo"));
        assert_eq!(items[0].author.as_deref(), Some("builder"));
    }
}
