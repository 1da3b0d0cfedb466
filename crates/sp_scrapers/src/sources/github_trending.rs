//! GitHub trending page, extracted from the rendered DOM. Each repository
//! card becomes an item titled `owner/name` with the repo stats carried as
//! metadata; "published" is the fetch time since trending has no dates.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde_json::json;
use tracing::info;

use sp_core::{RawItem, RenderOptions, Result};

use crate::dom;
use crate::sources::{FetchContext, Scraper};

pub struct GithubTrendingScraper;

impl GithubTrendingScraper {
    pub fn new() -> Self {
        Self
    }

    const TRENDING_URL: &'static str = "https://github.com/trending";

    fn parse_page(html: &str) -> Vec<RawItem> {
        let document = Html::parse_document(html);
        let card_selector = Selector::parse("article.Box-row").expect("valid selector");

        let repos: Vec<RawItem> = document
            .select(&card_selector)
            .filter_map(|card| Self::parse_card(&card))
            .collect();
        info!(count = repos.len(), "extracted trending repositories");
        repos
    }

    fn parse_card(card: &ElementRef) -> Option<RawItem> {
        let href = dom::first_attr_in(card, &["h2 a", "h2.h3 a"], "href")?;
        let path = href.trim_start_matches('/');
        let (owner, name) = path.split_once('/')?;

        let description = dom::first_text_in(card, &["p"]);
        let language = dom::first_text_in(card, &["[itemprop=\"programmingLanguage\"]"]);
        let stars = dom::first_text_in(card, &["a[href$=\"/stargazers\"]"])
            .map(|text| parse_count(&text))
            .unwrap_or(0);
        let forks = dom::first_text_in(card, &["a[href$=\"/forks\"]"])
            .map(|text| parse_count(&text))
            .unwrap_or(0);
        let today_stars = dom::first_text_in(card, &["span.d-inline-block.float-sm-right"])
            .map(|text| parse_count(&text))
            .unwrap_or(0);
        let avatar = dom::first_attr_in(card, &["a[data-hovercard-type=\"user\"] img", "img.avatar"], "src");

        let mut item = RawItem {
            title: Some(format!("{owner}/{name}")),
            link: Some(format!("https://github.com/{owner}/{name}")),
            description,
            image_url: avatar,
            ..Default::default()
        };
        item.metadata.insert("owner".to_string(), owner.into());
        item.metadata.insert("name".to_string(), name.into());
        item.metadata
            .insert("language".to_string(), json!(language));
        item.metadata.insert("stars".to_string(), json!(stars));
        item.metadata.insert("forks".to_string(), json!(forks));
        item.metadata
            .insert("today_stars".to_string(), json!(today_stars));
        Some(item)
    }
}

/// "12,345 stars today" → 12345.
fn parse_count(text: &str) -> u64 {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

#[async_trait]
impl Scraper for GithubTrendingScraper {
    fn source(&self) -> &'static str {
        "github-trending"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>> {
        let page = ctx
            .render
            .render(Self::TRENDING_URL, &RenderOptions::default())
            .await?;
        Ok(Self::parse_page(&page.html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
<article class="Box-row">
  <h2 class="h3"><a href="/rustacean/widget">rustacean / widget</a></h2>
  <p>A widget library for terminals.</p>
  <span itemprop="programmingLanguage">Rust</span>
  <a href="/rustacean/widget/stargazers">12,345</a>
  <a href="/rustacean/widget/forks">678</a>
  <span class="d-inline-block float-sm-right">901 stars today</span>
  <a data-hovercard-type="user" href="/alice"><img src="https://avatars.github.com/alice.png"></a>
</article>
<article class="Box-row">
  <h2 class="h3"><a href="/solo/tool">solo / tool</a></h2>
</article>
<article class="Box-row"><h2>no link here</h2></article>
</body></html>"#;

    #[test]
    fn test_cards_parsed() {
        let items = GithubTrendingScraper::parse_page(PAGE);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_card_fields() {
        let items = GithubTrendingScraper::parse_page(PAGE);
        let item = &items[0];
        assert_eq!(item.title.as_deref(), Some("rustacean/widget"));
        assert_eq!(
            item.link.as_deref(),
            Some("https://github.com/rustacean/widget")
        );
        assert_eq!(
            item.description.as_deref(),
            Some("A widget library for terminals.")
        );
        assert_eq!(
            item.image_url.as_deref(),
            Some("https://avatars.github.com/alice.png")
        );
        assert_eq!(item.metadata["language"], "Rust");
        assert_eq!(item.metadata["stars"], 12345);
        assert_eq!(item.metadata["forks"], 678);
        assert_eq!(item.metadata["today_stars"], 901);
    }

    #[test]
    fn test_card_without_description_has_none() {
        let items = GithubTrendingScraper::parse_page(PAGE);
        assert!(items[1].description.is_none());
        assert_eq!(items[1].metadata["stars"], 0);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12,345"), 12345);
        assert_eq!(parse_count("901 stars today"), 901);
        assert_eq!(parse_count("no digits"), 0);
    }
}
