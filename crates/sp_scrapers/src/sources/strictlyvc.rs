//! StrictlyVC RSS. Newsletters group deals under funding headings; those
//! sections are parsed into structured funding metadata so the reporting
//! side can aggregate deal flow without re-scanning prose.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use sp_core::{RawItem, Result};

use crate::sources::{FetchContext, Scraper};
use crate::{clean, feed, fetch};

static SECTION_RES: Lazy<[(&'static str, Regex); 3]> = Lazy::new(|| {
    let section = |heading: &str| {
        Regex::new(&format!(r"(?is)## {heading}(.*?)(?=##|$)")).unwrap()
    };
    [
        ("massive_fundings", section("Massive Fundings")),
        ("big_fundings", section("Big-But-Not-Crazy-Big Fundings")),
        ("smaller_fundings", section("Smaller Fundings")),
    ]
});

static COMPANY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\$(\d+(?:\.\d+)?)\s*(million|billion)").unwrap());
// Greedy so a `**A**, **B**` investor list is captured whole and split below.
static INVESTORS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"from\s+\*\*(.*)\*\*").unwrap());

pub struct StrictlyVcScraper;

impl StrictlyVcScraper {
    pub fn new() -> Self {
        Self
    }

    const FEED_URL: &'static str = "https://strictlyvc.com/feed/";

    fn map_item(mut item: RawItem) -> RawItem {
        let body = item.content.as_deref().or(item.description.as_deref());
        if let Some(body) = body {
            let text = clean::strip_html(body);
            if let Some(funding) = extract_funding_data(&text) {
                item.metadata.insert("funding_data".to_string(), funding);
            }
        }
        if let Some(description) = item.description.clone() {
            item.metadata
                .insert("description".to_string(), description.into());
        }
        if item.author.is_none() {
            item.author = Some("StrictlyVC".to_string());
        }
        item
    }
}

#[async_trait]
impl Scraper for StrictlyVcScraper {
    fn source(&self) -> &'static str {
        "strictlyvc"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>> {
        let xml = fetch::fetch_text(&ctx.http, Self::FEED_URL).await?;
        Ok(feed::parse_feed(&xml)
            .into_iter()
            .map(Self::map_item)
            .collect())
    }
}

/// Funding sections of a newsletter body, or `None` when the issue carries
/// no deal listings at all.
fn extract_funding_data(content: &str) -> Option<Value> {
    let mut sections = serde_json::Map::new();
    let mut any = false;
    for (key, re) in SECTION_RES.iter() {
        let entries = re
            .captures(content)
            .map(|caps| parse_funding_section(&caps[1]))
            .unwrap_or_default();
        any = any || !entries.is_empty();
        sections.insert(key.to_string(), Value::Array(entries));
    }
    any.then_some(Value::Object(sections))
}

/// One entry per blank-line-separated block; blocks naming neither a
/// company nor an amount are noise and dropped.
fn parse_funding_section(section: &str) -> Vec<Value> {
    section
        .split("\n\n")
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let company = COMPANY_RE.captures(entry).map(|c| c[1].to_string());
            let amount = AMOUNT_RE.captures(entry).map(|c| {
                let value: f64 = c[1].parse().unwrap_or(0.0);
                let multiplier = if c[2].eq_ignore_ascii_case("billion") {
                    1000.0
                } else {
                    1.0
                };
                value * multiplier
            });
            let investors: Vec<String> = INVESTORS_RE
                .captures(entry)
                .map(|c| {
                    c[1].split("**, **")
                        .map(|i| i.trim().to_string())
                        .collect()
                })
                .unwrap_or_default();

            if company.is_none() && amount.is_none() {
                return None;
            }
            Some(json!({
                "company": company,
                "amount_millions": amount,
                "investors": investors,
                "raw_text": entry,
            }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEWSLETTER: &str = "Intro chatter.\n\n\
## Massive Fundings\n\n\
**Rocketco**, a launch startup, raised $1.2 billion from **Mega Fund**, **Other Fund**.\n\n\
## Smaller Fundings\n\n\
**Tinyco** picked up $4.5 million in seed money.\n\n\
Just commentary with no deal.\n\n\
## Sundry\n\nother notes";

    #[test]
    fn test_sections_parsed() {
        let data = extract_funding_data(NEWSLETTER).unwrap();
        let massive = data["massive_fundings"].as_array().unwrap();
        assert_eq!(massive.len(), 1);
        assert_eq!(massive[0]["company"], "Rocketco");
        assert_eq!(massive[0]["amount_millions"], 1200.0);
        assert_eq!(
            massive[0]["investors"],
            json!(["Mega Fund", "Other Fund"])
        );

        let smaller = data["smaller_fundings"].as_array().unwrap();
        assert_eq!(smaller.len(), 1);
        assert_eq!(smaller[0]["amount_millions"], 4.5);
    }

    #[test]
    fn test_no_sections_yields_none() {
        assert!(extract_funding_data("A newsletter about nothing in particular.").is_none());
    }

    #[test]
    fn test_default_author_applied() {
        let item = RawItem::default();
        assert_eq!(
            StrictlyVcScraper::map_item(item).author.as_deref(),
            Some("StrictlyVC")
        );
    }

    #[test]
    fn test_existing_author_kept() {
        let item = RawItem {
            author: Some("Connie".to_string()),
            ..Default::default()
        };
        assert_eq!(
            StrictlyVcScraper::map_item(item).author.as_deref(),
            Some("Connie")
        );
    }
}
