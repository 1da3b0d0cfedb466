//! ChinaTechNews RSS. Descriptions inline an image and end with a
//! syndication footer; the image is lifted out before the description is
//! scrubbed so it survives the cleanup.

use async_trait::async_trait;

use sp_core::{RawItem, Result};

use crate::sources::{FetchContext, Scraper};
use crate::{clean, feed, fetch};

const FOOTER: &str = "comes via ChinaTechNews.com.";

pub struct ChinaTechNewsScraper;

impl ChinaTechNewsScraper {
    pub fn new() -> Self {
        Self
    }

    const FEED_URL: &'static str = "https://www.chinatechnews.com/feed";

    fn map_item(mut item: RawItem) -> RawItem {
        if let Some(description) = item.description.take() {
            if item.image_url.is_none() {
                item.image_url = clean::sniff_image_src(&description);
            }
            let text = clean::strip_html(&description);
            let text = text.trim_end_matches(FOOTER).trim_end().to_string();
            item.description = Some(text);
        }
        item
    }
}

#[async_trait]
impl Scraper for ChinaTechNewsScraper {
    fn source(&self) -> &'static str {
        "chinatechnews"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>> {
        let xml = fetch::fetch_text(&ctx.http, Self::FEED_URL).await?;
        Ok(feed::parse_feed(&xml)
            .into_iter()
            .map(Self::map_item)
            .collect())
    }
}
