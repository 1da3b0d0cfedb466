//! MIT Technology Review RSS. The feed has no media element; the lead
//! image is sniffed out of the encoded content instead.

use async_trait::async_trait;

use sp_core::{RawItem, Result};

use crate::sources::{FetchContext, Scraper};
use crate::{clean, feed, fetch};

pub struct TechReviewScraper;

impl TechReviewScraper {
    pub fn new() -> Self {
        Self
    }

    const FEED_URL: &'static str = "https://www.technologyreview.com/feed/";

    fn map_item(mut item: RawItem) -> RawItem {
        if item.image_url.is_none() {
            item.image_url = item.content.as_deref().and_then(clean::sniff_image_src);
        }
        if let Some(description) = item.description.clone() {
            item.metadata
                .insert("description".to_string(), description.into());
        }
        item
    }
}

#[async_trait]
impl Scraper for TechReviewScraper {
    fn source(&self) -> &'static str {
        "techreview"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>> {
        let xml = fetch::fetch_text(&ctx.http, Self::FEED_URL).await?;
        Ok(feed::parse_feed(&xml)
            .into_iter()
            .map(Self::map_item)
            .collect())
    }
}
