//! Cointelegraph RSS. Authors come prefixed with the publication name;
//! the prefix is boilerplate and dropped.

use async_trait::async_trait;

use sp_core::{RawItem, Result};

use crate::sources::{FetchContext, Scraper};
use crate::{feed, fetch};

const AUTHOR_PREFIX: &str = "Cointelegraph by ";

pub struct CointelegraphScraper;

impl CointelegraphScraper {
    pub fn new() -> Self {
        Self
    }

    const FEED_URL: &'static str = "https://cointelegraph.com/rss";

    fn map_item(mut item: RawItem) -> RawItem {
        if let Some(author) = item.author.take() {
            item.author = Some(
                author
                    .strip_prefix(AUTHOR_PREFIX)
                    .unwrap_or(&author)
                    .to_string(),
            );
        }
        item
    }
}

#[async_trait]
impl Scraper for CointelegraphScraper {
    fn source(&self) -> &'static str {
        "cointelegraph"
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
    fn test_author_prefix_stripped() {
        let item = RawItem {
            author: Some("Cointelegraph by Ana Reporter".to_string()),
            ..Default::default()
        };
        assert_eq!(
            CointelegraphScraper::map_item(item).author.as_deref(),
            Some("Ana Reporter")
        );
    }

    #[test]
    fn test_plain_author_untouched() {
        let item = RawItem {
            author: Some("Solo Writer".to_string()),
            ..Default::default()
        };
        assert_eq!(
            CointelegraphScraper::map_item(item).author.as_deref(),
            Some("Solo Writer")
        );
    }
}
