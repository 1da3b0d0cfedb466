//! PitchBook news. A multi-page source behind aggressive bot protection:
//! article links are collected from the index (explicit news-path links
//! first, category pages as fallback), then a small number of detail pages
//! are rendered and extracted independently.

use async_trait::async_trait;
use scraper::Html;
use serde_json::json;
use std::collections::HashSet;
use tracing::{info, warn};

use sp_core::{RawItem, RenderOptions, Result};

use crate::dom;
use crate::sources::{FetchContext, Scraper};

const INDEX_URL: &str = "https://pitchbook.com/news/articles";

const CATEGORY_URLS: &[&str] = &[
    "https://pitchbook.com/news/venture-capital",
    "https://pitchbook.com/news/private-equity",
    "https://pitchbook.com/news/technology",
];

/// Detail pages fetched per run; the index lists far more than is worth
/// rendering through the engine.
const MAX_ARTICLES: usize = 5;

pub struct PitchBookScraper;

impl PitchBookScraper {
    pub fn new() -> Self {
        Self
    }

    /// Article links on a listing page. Explicit news-article paths are the
    /// primary strategy; card containers are the fallback when the page
    /// layout hides the paths.
    fn extract_links(html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        let mut links = collect_hrefs(&document, "a[href*=\"/news/articles/\"]");
        if links.is_empty() {
            links = collect_hrefs(&document, ".card a, article a");
        }

        let mut seen = HashSet::new();
        links
            .into_iter()
            .map(|href| {
                if href.starts_with("http") {
                    href
                } else {
                    format!("https://pitchbook.com{href}")
                }
            })
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }

    fn parse_article(html: &str, url: &str) -> Option<RawItem> {
        let document = Html::parse_document(html);

        let title = dom::first_text(&document, &["h1", ".article-title", "header h2"])?;
        let content = dom::first_text(
            &document,
            &[".article-body", ".article-content", "article"],
        )
        .or_else(|| dom::paragraphs_fallback(&document, 60))?;

        let mut item = RawItem {
            title: Some(title),
            link: Some(url.to_string()),
            content: Some(content),
            pub_date: dom::first_text(&document, &["time", ".article-date"]),
            author: dom::first_text(&document, &[".article-author", ".byline"]),
            image_url: dom::first_attr(&document, &["article img", ".article-hero img"], "src"),
            ..Default::default()
        };
        item.metadata
            .insert("index_url".to_string(), json!(INDEX_URL));
        Some(item)
    }
}

fn collect_hrefs(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = scraper::Selector::parse(selector) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl Scraper for PitchBookScraper {
    fn source(&self) -> &'static str {
        "pitchbook"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>> {
        let options = RenderOptions::default();

        let mut links = match ctx.render.render(INDEX_URL, &options).await {
            Ok(page) => Self::extract_links(&page.html),
            Err(e) => {
                warn!(error = %e, "index page failed, trying category pages");
                Vec::new()
            }
        };

        // The index sometimes renders without article links; category pages
        // carry the same cards.
        if links.is_empty() {
            for category in CATEGORY_URLS {
                match ctx.render.render(category, &options).await {
                    Ok(page) => {
                        links = Self::extract_links(&page.html);
                        if !links.is_empty() {
                            info!(category, count = links.len(), "found links via category page");
                            break;
                        }
                    }
                    Err(e) => warn!(category, error = %e, "category page failed"),
                }
            }
        }

        links.truncate(MAX_ARTICLES);
        info!(count = links.len(), "processing PitchBook articles");

        let mut items = Vec::new();
        for link in links {
            match ctx.render.render(&link, &options).await {
                Ok(page) => match Self::parse_article(&page.html, &link) {
                    Some(item) => items.push(item),
                    None => warn!(url = %link, "no usable content on article page"),
                },
                Err(e) => warn!(url = %link, error = %e, "article page failed, continuing"),
            }
        }
        Ok(items)
    }
}
