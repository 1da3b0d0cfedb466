//! Crunchbase News RSS. The raw description is kept as metadata alongside
//! the guid the engine already captures.

use async_trait::async_trait;

use sp_core::{RawItem, Result};

use crate::sources::{FetchContext, Scraper};
use crate::{feed, fetch};

pub struct CrunchbaseScraper;

impl CrunchbaseScraper {
    pub fn new() -> Self {
        Self
    }

    const FEED_URL: &'static str = "https://news.crunchbase.com/feed/";

    fn map_item(mut item: RawItem) -> RawItem {
        if let Some(description) = item.description.clone() {
            item.metadata
                .insert("description".to_string(), description.into());
        }
        item
    }
}

#[async_trait]
impl Scraper for CrunchbaseScraper {
    fn source(&self) -> &'static str {
        "crunchbase"
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
    fn test_description_copied_to_metadata() {
        let item = RawItem {
            description: Some("teaser text".to_string()),
            ..Default::default()
        };
        let mapped = CrunchbaseScraper::map_item(item);
        assert_eq!(
            mapped.metadata.get("description").and_then(|v| v.as_str()),
            Some("teaser text")
        );
        assert_eq!(mapped.description.as_deref(), Some("teaser text"));
    }
}
