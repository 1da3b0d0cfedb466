//! Y Combinator news listings. A multi-page source: three listing sections
//! are scanned for startup-related posts, then the highest-ranked posts get
//! their detail pages fetched and mined for body text, one page at a time
//! with failures isolated per page.

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use sp_core::{RawItem, RenderOptions, Result, WaitUntil};

use crate::dom;
use crate::sources::{is_startup_related, FetchContext, Scraper};

const BASE_URL: &str = "https://news.ycombinator.com/";

const SECTIONS: &[&str] = &[
    "https://news.ycombinator.com/newest",
    "https://news.ycombinator.com/show",
    "https://news.ycombinator.com/jobs",
];

/// Domains that are landing pages rather than articles; their content is
/// not worth a fetch.
const SKIP_DOMAINS: &[&str] = &["twitter.com", "x.com", "youtube.com", "github.com", "t.co"];

/// Detail pages fetched per run, highest points first.
const MAX_DETAIL_PAGES: usize = 15;

const MIN_CONTENT_LEN: usize = 100;

#[derive(Debug, Clone)]
struct Post {
    title: String,
    url: String,
    pub_date: Option<String>,
    points: u64,
    comment_count: u64,
    domain: String,
}

pub struct YCombinatorScraper;

impl YCombinatorScraper {
    pub fn new() -> Self {
        Self
    }

    fn parse_listing(html: &str) -> Vec<Post> {
        let document = Html::parse_document(html);
        let row_selector = Selector::parse(".athing").expect("valid selector");
        let subtext_selector = Selector::parse(".subtext").expect("valid selector");

        let rows: Vec<_> = document.select(&row_selector).collect();
        let subtexts: Vec<_> = document.select(&subtext_selector).collect();

        let mut posts = Vec::new();
        for (row, subtext) in rows.iter().zip(subtexts.iter()) {
            let Some(title) = dom::first_text_in(row, &[".titleline > a", ".storylink"]) else {
                continue;
            };
            if !is_startup_related(&title) {
                continue;
            }
            let Some(href) = dom::first_attr_in(row, &[".titleline > a", ".storylink"], "href")
            else {
                continue;
            };
            let Some(url) = absolutize(&href) else {
                continue;
            };

            let points = dom::first_text_in(subtext, &[".score"])
                .and_then(|text| text.split(' ').next().and_then(|n| n.parse().ok()))
                .unwrap_or(0);
            let pub_date = dom::first_attr_in(subtext, &[".age a", ".age"], "title")
                .and_then(|title| title.split_whitespace().next().map(str::to_string));
            let comment_count = comment_count(subtext);
            let domain = dom::first_text_in(row, &[".sitestr"])
                .or_else(|| Url::parse(&url).ok()?.host_str().map(str::to_string))
                .unwrap_or_default();

            posts.push(Post {
                title,
                url,
                pub_date,
                points,
                comment_count,
                domain,
            });
        }
        posts
    }

    /// Body text of a detail page: known article containers first, long
    /// paragraphs as the generic fallback.
    fn extract_content(html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        dom::first_text(&document, &["article", ".article-content", ".post-content"])
            .or_else(|| dom::paragraphs_fallback(&document, 50))
    }

    fn to_raw(post: Post, content: String) -> RawItem {
        let mut item = RawItem {
            title: Some(post.title),
            link: Some(post.url),
            content: Some(content),
            pub_date: post.pub_date,
            ..Default::default()
        };
        item.metadata.insert("points".to_string(), json!(post.points));
        item.metadata
            .insert("comment_count".to_string(), json!(post.comment_count));
        item.metadata.insert("domain".to_string(), json!(post.domain));
        item
    }
}

fn absolutize(href: &str) -> Option<String> {
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    Url::parse(BASE_URL)
        .ok()?
        .join(href)
        .ok()
        .map(|u| u.to_string())
}

/// The last link of a subtext row is the "N comments" link when present.
fn comment_count(subtext: &scraper::ElementRef) -> u64 {
    let selector = Selector::parse("a").expect("valid selector");
    subtext
        .select(&selector)
        .filter_map(|a| {
            let text = dom::element_text(&a);
            text.contains("comment")
                .then(|| text.split(' ').next().and_then(|n| n.parse().ok()))
                .flatten()
        })
        .last()
        .unwrap_or(0)
}

#[async_trait]
impl Scraper for YCombinatorScraper {
    fn source(&self) -> &'static str {
        "ycombinator"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>> {
        let listing_options = RenderOptions {
            blocked_resource_types: vec!["image".to_string(), "stylesheet".to_string()],
            ..Default::default()
        };

        let mut posts: Vec<Post> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for section in SECTIONS {
            match ctx.render.render(section, &listing_options).await {
                Ok(page) => {
                    let section_posts = Self::parse_listing(&page.html);
                    info!(section, count = section_posts.len(), "parsed listing section");
                    for post in section_posts {
                        if seen.insert(post.url.clone()) {
                            posts.push(post);
                        }
                    }
                }
                Err(e) => warn!(section, error = %e, "listing section failed, continuing"),
            }
        }

        posts.sort_by(|a, b| b.points.cmp(&a.points));
        posts.truncate(MAX_DETAIL_PAGES);

        let detail_options = RenderOptions {
            wait_until: WaitUntil::DomContentLoaded,
            timeout: Duration::from_secs(20),
            ..Default::default()
        };

        let mut items = Vec::with_capacity(posts.len());
        for post in posts {
            if SKIP_DOMAINS.iter().any(|domain| post.url.contains(domain)) {
                let content = format!("[Link to {}]", post.domain);
                items.push(Self::to_raw(post, content));
                continue;
            }

            let content = match ctx.render.render(&post.url, &detail_options).await {
                Ok(page) => match Self::extract_content(&page.html) {
                    Some(content) if content.len() > MIN_CONTENT_LEN => content,
                    _ => format!("[No content extracted from {}]", post.domain),
                },
                Err(e) => {
                    warn!(url = %post.url, error = %e, "detail page failed");
                    format!("[Error accessing content: {e}]")
                }
            };
            items.push(Self::to_raw(post, content));
        }

        Ok(items)
    }
}
