use async_trait::async_trait;

use crate::models::{Article, ArticleDigest, Report};
use crate::Result;

/// The persistent store, keyed on article url.
///
/// Implementations must treat a url conflict on insert as "already stored":
/// the existing row is kept untouched and the incoming row is dropped.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Insert articles whose url is not yet present. Returns the number of
    /// rows actually written; conflicting rows are silently skipped.
    async fn insert_new(&self, articles: &[Article]) -> Result<usize>;

    /// Most recent articles, newest published first.
    async fn latest(&self, limit: Option<usize>) -> Result<Vec<Article>>;

    /// Remove every stored article and export.
    async fn delete_all(&self) -> Result<()>;

    /// Snapshot the given digests as a new export batch.
    async fn save_export(&self, articles: &[ArticleDigest]) -> Result<()>;

    /// The most recently saved export batch.
    async fn latest_export(&self) -> Result<Vec<ArticleDigest>>;

    async fn save_report(&self, report: &Report) -> Result<()>;

    /// Generated reports, newest first.
    async fn list_reports(&self) -> Result<Vec<Report>>;
}
