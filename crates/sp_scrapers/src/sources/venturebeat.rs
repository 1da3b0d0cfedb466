//! VentureBeat RSS. On top of the standard fields, each article gets a
//! structured metadata block (type, topic, key points, companies, funding,
//! stats) mined from its categories and body text.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use sp_core::{RawItem, Result};

use crate::sources::{FetchContext, Scraper};
use crate::{clean, feed, fetch};

static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[•\-\*]\s+([^\n]+)").unwrap());
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static FUNDING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\$(\d+(?:\.\d+)?)\s*(million|billion|M|B)").unwrap());
static PERCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?%").unwrap());
static COUNT_STAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:over|about|approximately|nearly)\s+\d+(?:,\d+)*\s+(?:users|customers|downloads|players|developers)",
    )
    .unwrap()
});

const KEY_PHRASES: &[&str] = &["announced", "launched", "revealed", "introduced", "released"];

const TYPE_MAPPING: &[(&str, &str)] = &[
    ("games", "gaming"),
    ("game-development", "gaming"),
    ("artificial-intelligence", "ai"),
    ("ai", "ai"),
    ("enterprise", "enterprise"),
    ("security", "security"),
    ("cloud", "cloud"),
    ("mobile", "mobile"),
];

pub struct VentureBeatScraper;

impl VentureBeatScraper {
    pub fn new() -> Self {
        Self
    }

    const FEED_URL: &'static str = "https://venturebeat.com/feed/";

    fn map_item(mut item: RawItem) -> RawItem {
        let body = item.content.as_deref().or(item.description.as_deref());
        if let Some(body) = body {
            let text = clean::strip_html(body);
            item.metadata.insert(
                "article_data".to_string(),
                extract_article_data(&text, &item.categories),
            );
        }
        if let Some(description) = item.description.clone() {
            item.metadata
                .insert("description".to_string(), description.into());
        }
        item
    }
}

#[async_trait]
impl Scraper for VentureBeatScraper {
    fn source(&self) -> &'static str {
        "venturebeat"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>> {
        let xml = fetch::fetch_text(&ctx.http, Self::FEED_URL).await?;
        Ok(feed::parse_feed(&xml)
            .into_iter()
            .map(Self::map_item)
            .collect())
    }
}

fn extract_article_data(content: &str, categories: &[String]) -> Value {
    json!({
        "type": article_type(categories),
        "topic": categories.first().cloned(),
        "key_points": key_points(content),
        "companies": companies(content),
        "funding": funding_info(content),
        "stats": stats(content),
    })
}

fn article_type(categories: &[String]) -> &'static str {
    for category in categories {
        let normalized = category.to_lowercase();
        for (key, value) in TYPE_MAPPING {
            if normalized.contains(key) {
                return value;
            }
        }
    }
    "general"
}

/// Bulleted lines plus sentences announcing something.
fn key_points(content: &str) -> Vec<String> {
    let mut points: Vec<String> = BULLET_RE
        .captures_iter(content)
        .map(|caps| caps[1].trim().to_string())
        .collect();

    for sentence in content.split(['.', '!', '?']) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let lower = sentence.to_lowercase();
        if KEY_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
            points.push(sentence.to_string());
        }
    }
    points
}

/// Bolded names plus `Word Inc.`-style pairs.
fn companies(content: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut push_unique = |name: String| {
        if !name.is_empty() && !found.contains(&name) {
            found.push(name);
        }
    };

    for caps in BOLD_RE.captures_iter(content) {
        push_unique(caps[1].trim().to_string());
    }

    let indicators = ["Inc.", "Corp.", "Ltd.", "LLC"];
    let words: Vec<&str> = content.split_whitespace().collect();
    for pair in words.windows(2) {
        if indicators.iter().any(|ind| pair[1].contains(ind)) {
            push_unique(format!("{} {}", pair[0], pair[1]));
        }
    }
    found
}

fn funding_info(content: &str) -> Option<Value> {
    let caps = FUNDING_RE.captures(content)?;
    let amount: f64 = caps[1].parse().ok()?;
    let unit = caps[2].to_lowercase();
    let billions = unit.starts_with('b');
    Some(json!({
        "amount_millions": if billions { amount * 1000.0 } else { amount },
        "unit": if billions { "billion" } else { "million" },
        "raw_text": &caps[0],
    }))
}

fn stats(content: &str) -> Vec<String> {
    let mut stats: Vec<String> = PERCENT_RE
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect();
    stats.extend(
        COUNT_STAT_RE
            .find_iter(content)
            .map(|m| m.as_str().to_string()),
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_type_from_categories() {
        let cats = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(article_type(&cats(&["Games", "consoles"])), "gaming");
        assert_eq!(article_type(&cats(&["Artificial-Intelligence"])), "ai");
        assert_eq!(article_type(&cats(&["politics"])), "general");
        assert_eq!(article_type(&[]), "general");
    }

    #[test]
    fn test_key_points_from_bullets_and_phrases() {
        let content = "Intro.\n- First bullet point\nThe company announced a new model today. Unrelated sentence.";
        let points = key_points(content);
        assert!(points.contains(&"First bullet point".to_string()));
        assert!(points.iter().any(|p| p.contains("announced a new model")));
        assert!(!points.iter().any(|p| p.contains("Unrelated")));
    }

    #[test]
    fn test_companies_from_bold_and_suffix() {
        let content = "**Acme** partnered with Globex Corp. on the rollout.";
        let companies = companies(content);
        assert!(companies.contains(&"Acme".to_string()));
        assert!(companies.contains(&"Globex Corp.".to_string()));
    }

    #[test]
    fn test_funding_info() {
        let info = funding_info("They raised $2.5 billion last week.").unwrap();
        assert_eq!(info["amount_millions"], 2500.0);
        assert_eq!(info["unit"], "billion");
        assert!(funding_info("no money mentioned").is_none());
    }

    #[test]
    fn test_stats() {
        let stats = stats("Growth hit 42% with over 1,000,000 users on board.");
        assert!(stats.contains(&"42%".to_string()));
        assert!(stats.iter().any(|s| s.contains("1,000,000 users")));
    }

    #[test]
    fn test_metadata_attached() {
        let item = RawItem {
            description: Some("<p>They announced a launch and raised $5 million.</p>".to_string()),
            categories: vec!["AI".to_string()],
            ..Default::default()
        };
        let mapped = VentureBeatScraper::map_item(item);
        let data = mapped.metadata.get("article_data").unwrap();
        assert_eq!(data["type"], "ai");
        assert_eq!(data["funding"]["amount_millions"], 5.0);
    }
}
