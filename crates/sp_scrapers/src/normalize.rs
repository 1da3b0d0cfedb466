//! Mapping of extractor output onto the canonical [`Article`] shape.
//!
//! Normalization is where required-field policy lives: items missing a
//! usable title, content, or url are rejected as values, never as errors,
//! so one bad item cannot take down its batch.

use chrono::{DateTime, NaiveDateTime, Utc};

use sp_core::{Article, RawItem};

use crate::clean;

/// Why an item was dropped during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub field: &'static str,
}

impl Rejection {
    fn missing(field: &'static str) -> Self {
        Self { field }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing_field: {}", self.field)
    }
}

/// Convert a raw extraction result into a canonical article.
///
/// HTML-bearing fields are run through the markup cleaner, the publish date
/// is coerced with `fetched_at` as the fallback, and title/content/url are
/// required. The returned article carries no `scraped_at`; the persistence
/// layer stamps that.
pub fn normalize(
    raw: RawItem,
    source: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Article, Rejection> {
    let title = raw
        .title
        .as_deref()
        .map(|t| clean::collapse_whitespace(&clean::decode_entities(&clean::strip_cdata(t))))
        .unwrap_or_default();
    if title.is_empty() {
        return Err(Rejection::missing("title"));
    }

    // content:encoded is the full body when present; description otherwise.
    let body = raw.content.as_deref().or(raw.description.as_deref());
    let content = body.map(clean::strip_html).unwrap_or_default();
    if content.is_empty() {
        return Err(Rejection::missing("content"));
    }

    let url = raw.link.as_deref().map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return Err(Rejection::missing("url"));
    }

    let image_url = raw
        .image_url
        .filter(|u| !u.is_empty())
        .or_else(|| raw.description.as_deref().and_then(clean::sniff_image_src));

    let author = raw
        .author
        .as_deref()
        .map(clean::collapse_whitespace)
        .filter(|a| !a.is_empty());

    let categories: Vec<String> = raw
        .categories
        .iter()
        .map(|c| clean::collapse_whitespace(&clean::strip_cdata(c)))
        .filter(|c| !c.is_empty())
        .collect();

    Ok(Article {
        title,
        content,
        url: url.to_string(),
        image_url,
        published_date: coerce_date(raw.pub_date.as_deref(), fetched_at),
        source: source.to_string(),
        author,
        categories,
        metadata: raw.metadata,
        scraped_at: None,
    })
}

/// Best-effort date parsing; unparseable input falls back to `fallback`
/// (the fetch time), never an error and never an invalid timestamp.
pub fn coerce_date(raw: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return fallback;
    };

    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return parsed.and_utc();
        }
    }
    if let Ok(parsed) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = parsed.and_hms_opt(0, 0, 0) {
            return midnight.and_utc();
        }
    }

    fallback
}
