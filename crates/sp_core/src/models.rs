use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical article record, the unit of persistence.
///
/// `url` is the deduplication key: the store never holds two rows with the
/// same url, and a second insert for a known url is silently ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub published_date: DateTime<Utc>,
    pub source: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Stamped by the persistence layer right before the write.
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
}

/// Source-specific intermediate extraction result.
///
/// Fields are carried exactly as extracted: titles may still be wrapped in
/// CDATA, descriptions may be raw HTML, dates are unparsed strings. The
/// normalizer consumes and discards these; they are never persisted.
#[derive(Debug, Clone, Default)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub pub_date: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub metadata: Map<String, Value>,
}

/// Slim projection stored in article exports and fed to the report prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDigest {
    pub title: String,
    pub content: String,
    pub source: String,
}

impl From<&Article> for ArticleDigest {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            content: article.content.clone(),
            source: article.source.clone(),
        }
    }
}

/// Generated market report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub name: String,
    pub html: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Per-source counters for one pipeline invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceStats {
    pub source: String,
    /// Raw items the extractor produced.
    pub fetched: usize,
    /// Items that survived normalization.
    pub parsed: usize,
    /// Rows actually written by the store.
    pub saved: usize,
    /// Items rejected during normalization or skipped as duplicates.
    pub skipped: usize,
    /// The source failed at fetch/extract and contributed zero articles.
    pub failed: bool,
}

impl SourceStats {
    pub fn failed(source: &str) -> Self {
        Self {
            source: source.to_string(),
            failed: true,
            ..Default::default()
        }
    }
}

/// Aggregate of one orchestrator run. Logged, never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub sources: Vec<SourceStats>,
}

impl RunSummary {
    pub fn push(&mut self, stats: SourceStats) {
        self.sources.push(stats);
    }

    pub fn total_saved(&self) -> usize {
        self.sources.iter().map(|s| s.saved).sum()
    }

    pub fn total_fetched(&self) -> usize {
        self.sources.iter().map(|s| s.fetched).sum()
    }

    pub fn failed_sources(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|s| s.failed)
            .map(|s| s.source.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_totals() {
        let mut summary = RunSummary::default();
        summary.push(SourceStats {
            source: "a".to_string(),
            fetched: 10,
            parsed: 8,
            saved: 5,
            skipped: 3,
            failed: false,
        });
        summary.push(SourceStats::failed("b"));

        assert_eq!(summary.total_saved(), 5);
        assert_eq!(summary.total_fetched(), 10);
        assert_eq!(summary.failed_sources(), vec!["b"]);
    }

    #[test]
    fn test_digest_projection() {
        let article = Article {
            title: "Title".to_string(),
            content: "Body".to_string(),
            url: "https://example.com/a".to_string(),
            image_url: None,
            published_date: Utc::now(),
            source: "test".to_string(),
            author: None,
            categories: vec![],
            metadata: Map::new(),
            scraped_at: None,
        };
        let digest = ArticleDigest::from(&article);
        assert_eq!(digest.title, "Title");
        assert_eq!(digest.source, "test");
    }
}
