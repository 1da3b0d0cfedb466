//! In-memory store: the default for tests and dry runs, and the reference
//! implementation of the conflict policy.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use sp_core::{Article, ArticleDigest, ArticleStore, Error, Report, Result};

#[derive(Default)]
struct Inner {
    articles: Vec<Article>,
    exports: Vec<Vec<ArticleDigest>>,
    reports: Vec<Report>,
}

pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn insert_new(&self, articles: &[Article]) -> Result<usize> {
        let mut inner = self.inner.write().await;
        let mut written = 0;
        for article in articles {
            // Conflict on url means "already stored": the existing row wins.
            if inner.articles.iter().any(|a| a.url == article.url) {
                continue;
            }
            inner.articles.push(article.clone());
            written += 1;
        }
        Ok(written)
    }

    async fn latest(&self, limit: Option<usize>) -> Result<Vec<Article>> {
        let inner = self.inner.read().await;
        let mut articles = inner.articles.clone();
        articles.sort_by(|a, b| b.published_date.cmp(&a.published_date));
        if let Some(limit) = limit {
            articles.truncate(limit);
        }
        Ok(articles)
    }

    async fn delete_all(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.articles.clear();
        inner.exports.clear();
        Ok(())
    }

    async fn save_export(&self, articles: &[ArticleDigest]) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.exports.push(articles.to_vec());
        Ok(())
    }

    async fn latest_export(&self) -> Result<Vec<ArticleDigest>> {
        let inner = self.inner.read().await;
        inner
            .exports
            .last()
            .cloned()
            .ok_or_else(|| Error::Storage("no article export available".to_string()))
    }

    async fn save_report(&self, report: &Report) -> Result<()> {
        let mut inner = self.inner.write().await;
        let mut report = report.clone();
        report.created_at = Some(Utc::now());
        inner.reports.push(report);
        Ok(())
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        let inner = self.inner.read().await;
        let mut reports = inner.reports.clone();
        reports.reverse();
        Ok(reports)
    }
}
