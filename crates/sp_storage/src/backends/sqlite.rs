//! SQLite backend for self-contained deployments. `INSERT OR IGNORE` keyed
//! on the url primary key carries the conflict policy.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;

use sp_core::{Article, ArticleDigest, ArticleStore, Error, Report, Result};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        url TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        source TEXT NOT NULL,
        published_date TEXT NOT NULL,
        image_url TEXT,
        author TEXT,
        categories TEXT NOT NULL,
        metadata TEXT NOT NULL,
        scraped_at TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS article_exports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        articles TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        html TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
];

pub struct SqliteStore {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl SqliteStore {
    pub async fn new(db_path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("failed to open database: {e}")))?;

        for (index, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("migration {index} failed: {e}")))?;
        }

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn row_to_article(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
        let categories: Vec<String> = serde_json::from_str(&row.get::<String, _>("categories"))?;
        let metadata: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&row.get::<String, _>("metadata"))?;
        let published_date = parse_timestamp(&row.get::<String, _>("published_date"))?;
        let scraped_at = row
            .get::<Option<String>, _>("scraped_at")
            .map(|raw| parse_timestamp(&raw))
            .transpose()?;

        Ok(Article {
            title: row.get("title"),
            content: row.get("content"),
            url: row.get("url"),
            image_url: row.get("image_url"),
            published_date,
            source: row.get("source"),
            author: row.get("author"),
            categories,
            metadata,
            scraped_at,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("stored timestamp unreadable: {e}")))
}

#[async_trait]
impl ArticleStore for SqliteStore {
    async fn insert_new(&self, articles: &[Article]) -> Result<usize> {
        let mut written = 0u64;
        for article in articles {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO articles
                (url, title, content, source, published_date, image_url, author, categories, metadata, scraped_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&article.url)
            .bind(&article.title)
            .bind(&article.content)
            .bind(&article.source)
            .bind(article.published_date.to_rfc3339())
            .bind(article.image_url.as_deref())
            .bind(article.author.as_deref())
            .bind(serde_json::to_string(&article.categories)?)
            .bind(serde_json::to_string(&article.metadata)?)
            .bind(article.scraped_at.map(|t| t.to_rfc3339()))
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("article insert failed: {e}")))?;
            written += result.rows_affected();
        }
        Ok(written as usize)
    }

    async fn latest(&self, limit: Option<usize>) -> Result<Vec<Article>> {
        let mut sql =
            String::from("SELECT * FROM articles ORDER BY published_date DESC");
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("article select failed: {e}")))?;

        rows.iter().map(Self::row_to_article).collect()
    }

    async fn delete_all(&self) -> Result<()> {
        for sql in ["DELETE FROM article_exports", "DELETE FROM articles"] {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| Error::Storage(format!("delete failed: {e}")))?;
        }
        Ok(())
    }

    async fn save_export(&self, articles: &[ArticleDigest]) -> Result<()> {
        sqlx::query("INSERT INTO article_exports (articles, created_at) VALUES (?, ?)")
            .bind(serde_json::to_string(articles)?)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("export insert failed: {e}")))?;
        Ok(())
    }

    async fn latest_export(&self) -> Result<Vec<ArticleDigest>> {
        let row = sqlx::query(
            "SELECT articles FROM article_exports ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("export select failed: {e}")))?
        .ok_or_else(|| Error::Storage("no article export available".to_string()))?;

        Ok(serde_json::from_str(&row.get::<String, _>("articles"))?)
    }

    async fn save_report(&self, report: &Report) -> Result<()> {
        sqlx::query("INSERT INTO reports (name, html, created_at) VALUES (?, ?, ?)")
            .bind(&report.name)
            .bind(&report.html)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("report insert failed: {e}")))?;
        Ok(())
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        let rows = sqlx::query(
            "SELECT name, html, created_at FROM reports ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("report select failed: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(Report {
                    name: row.get("name"),
                    html: row.get("html"),
                    created_at: Some(parse_timestamp(&row.get::<String, _>("created_at"))?),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn article(url: &str) -> Article {
        Article {
            title: "Title".to_string(),
            content: "Content".to_string(),
            url: url.to_string(),
            image_url: None,
            published_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            source: "test".to_string(),
            author: Some("Author".to_string()),
            categories: vec!["ai".to_string()],
            metadata: serde_json::Map::new(),
            scraped_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn test_insert_or_ignore_counts_new_rows_only() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(&dir.path().join("test.db")).await.unwrap();

        let a = article("https://x.com/a");
        assert_eq!(store.insert_new(&[a.clone()]).await.unwrap(), 1);
        assert_eq!(store.insert_new(&[a]).await.unwrap(), 0);

        let stored = store.latest(None).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].categories, vec!["ai"]);
    }

    #[tokio::test]
    async fn test_export_round_trip() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(&dir.path().join("test.db")).await.unwrap();

        assert!(store.latest_export().await.is_err());
        store
            .save_export(&[ArticleDigest {
                title: "t".to_string(),
                content: "c".to_string(),
                source: "s".to_string(),
            }])
            .await
            .unwrap();
        let export = store.latest_export().await.unwrap();
        assert_eq!(export.len(), 1);
        assert_eq!(export[0].title, "t");
    }
}
