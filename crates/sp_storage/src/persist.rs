//! Deduplication and batched persistence.
//!
//! This is the layer that makes ingestion idempotent: in-batch duplicates
//! collapse to the last-seen version, the store ignores urls it already
//! holds, and a failing batch never blocks the batches behind it.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{error, info};

use sp_core::{Article, ArticleStore, Result};

/// Writes are chunked to bound per-call payload size.
pub const BATCH_SIZE: usize = 50;

/// Persist a scrape result. Returns the number of rows actually written —
/// not the number attempted — so a second run over identical input reports
/// zero.
pub async fn save_articles(store: &dyn ArticleStore, articles: &[Article]) -> Result<usize> {
    if articles.is_empty() {
        return Ok(0);
    }

    let unique = dedupe_by_url(articles);
    info!(
        before = articles.len(),
        after = unique.len(),
        "deduplicating articles"
    );

    let scraped_at = Utc::now();
    let unique: Vec<Article> = unique
        .into_iter()
        .map(|mut article| {
            article.scraped_at = Some(scraped_at);
            article
        })
        .collect();

    let batches: Vec<&[Article]> = unique.chunks(BATCH_SIZE).collect();
    info!(count = batches.len(), "processing article batches");

    let mut saved = 0;
    for (index, batch) in batches.into_iter().enumerate() {
        match store.insert_new(batch).await {
            Ok(written) => saved += written,
            Err(e) => {
                // One bad batch must not take down the rest of the write.
                error!(batch = index, error = %e, "batch write failed, skipping batch");
            }
        }
    }

    Ok(saved)
}

/// Collapse duplicate urls: position of first occurrence, content of the
/// last.
fn dedupe_by_url(articles: &[Article]) -> Vec<Article> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_url: HashMap<&str, &Article> = HashMap::new();

    for article in articles {
        if !by_url.contains_key(article.url.as_str()) {
            order.push(&article.url);
        }
        by_url.insert(&article.url, article);
    }

    order
        .into_iter()
        .map(|url| (*by_url[url]).clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use sp_core::{ArticleDigest, Error, Report};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn article(url: &str, title: &str) -> Article {
        Article {
            title: title.to_string(),
            content: "content".to_string(),
            url: url.to_string(),
            image_url: None,
            published_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            source: "test".to_string(),
            author: None,
            categories: vec![],
            metadata: serde_json::Map::new(),
            scraped_at: None,
        }
    }

    /// Store that fails a configured batch call and records the rest.
    struct FlakyStore {
        fail_on_call: usize,
        calls: AtomicUsize,
        written: Mutex<Vec<Article>>,
    }

    impl FlakyStore {
        fn new(fail_on_call: usize) -> Self {
            Self {
                fail_on_call,
                calls: AtomicUsize::new(0),
                written: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ArticleStore for FlakyStore {
        async fn insert_new(&self, articles: &[Article]) -> sp_core::Result<usize> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == self.fail_on_call {
                return Err(Error::Storage("injected batch failure".to_string()));
            }
            let mut written = self.written.lock().unwrap();
            let mut count = 0;
            for article in articles {
                if !written.iter().any(|a: &Article| a.url == article.url) {
                    written.push(article.clone());
                    count += 1;
                }
            }
            Ok(count)
        }

        async fn latest(&self, _limit: Option<usize>) -> sp_core::Result<Vec<Article>> {
            Ok(self.written.lock().unwrap().clone())
        }

        async fn delete_all(&self) -> sp_core::Result<()> {
            Ok(())
        }

        async fn save_export(&self, _articles: &[ArticleDigest]) -> sp_core::Result<()> {
            Ok(())
        }

        async fn latest_export(&self) -> sp_core::Result<Vec<ArticleDigest>> {
            Ok(vec![])
        }

        async fn save_report(&self, _report: &Report) -> sp_core::Result<()> {
            Ok(())
        }

        async fn list_reports(&self) -> sp_core::Result<Vec<Report>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_in_batch_duplicates_collapse_last_wins() {
        let store = MemoryStore::new();
        let articles = vec![
            article("https://x.com/a", "first version"),
            article("https://x.com/b", "other"),
            article("https://x.com/a", "second version"),
        ];

        let saved = save_articles(&store, &articles).await.unwrap();
        assert_eq!(saved, 2);

        let stored = store.latest(None).await.unwrap();
        let a = stored.iter().find(|a| a.url == "https://x.com/a").unwrap();
        assert_eq!(a.title, "second version");
    }

    #[tokio::test]
    async fn test_second_run_is_noop() {
        let store = MemoryStore::new();
        let articles: Vec<Article> = (0..7)
            .map(|i| article(&format!("https://x.com/{i}"), "t"))
            .collect();

        assert_eq!(save_articles(&store, &articles).await.unwrap(), 7);
        assert_eq!(save_articles(&store, &articles).await.unwrap(), 0);
        assert_eq!(store.latest(None).await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_batching_and_batch_failure_isolation() {
        let store = FlakyStore::new(1);
        let articles: Vec<Article> = (0..120)
            .map(|i| article(&format!("https://x.com/{i}"), "t"))
            .collect();

        let saved = save_articles(&store, &articles).await.unwrap();

        // 3 batches of 50/50/20; the second fails and only its rows are lost.
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
        assert_eq!(saved, 70);
        assert_eq!(store.written.lock().unwrap().len(), 70);
    }

    #[tokio::test]
    async fn test_scraped_at_stamped() {
        let store = MemoryStore::new();
        save_articles(&store, &[article("https://x.com/a", "t")])
            .await
            .unwrap();
        let stored = store.latest(None).await.unwrap();
        assert!(stored[0].scraped_at.is_some());
    }

    #[tokio::test]
    async fn test_empty_input_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(save_articles(&store, &[]).await.unwrap(), 0);
    }
}
