//! Fast Company RSS via the rendering engine, pattern-extracted.

use async_trait::async_trait;
use tracing::info;

use sp_core::{RawItem, RenderOptions, Result};

use crate::pattern;
use crate::sources::{FetchContext, Scraper};

pub struct FastCompanyScraper;

impl FastCompanyScraper {
    pub fn new() -> Self {
        Self
    }

    const FEED_URL: &'static str = "https://www.fastcompany.com/feed";

    fn parse_items(text: &str) -> Vec<RawItem> {
        let blocks = pattern::item_blocks(text);
        info!(count = blocks.len(), "found raw items in Fast Company feed");

        blocks
            .into_iter()
            .filter_map(|block| {
                let title = pattern::text_field(block, "title")?;
                let link = pattern::text_field(block, "link")?;
                Some(RawItem {
                    title: Some(title),
                    link: Some(link),
                    description: pattern::text_field(block, "description"),
                    pub_date: pattern::text_field(block, "pubDate"),
                    author: pattern::text_field(block, "dc:creator"),
                    image_url: pattern::attr_field(block, "media:content", "url"),
                    categories: pattern::text_fields(block, "category"),
                    ..Default::default()
                })
            })
            .collect()
    }
}

#[async_trait]
impl Scraper for FastCompanyScraper {
    fn source(&self) -> &'static str {
        "fastcompany"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>> {
        let page = ctx
            .render
            .render(Self::FEED_URL, &RenderOptions::default())
            .await?;
        Ok(Self::parse_items(&page.html))
    }
}
