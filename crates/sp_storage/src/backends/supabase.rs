//! Supabase (PostgREST) backend, the production store.
//!
//! The conflict policy rides on PostgREST's upsert: inserts go to
//! `?on_conflict=url` with `Prefer: resolution=ignore-duplicates`, so a url
//! the store already holds is skipped server-side and never overwritten.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use sp_core::{Article, ArticleDigest, ArticleStore, Error, Report, Result};

const ARTICLES_TABLE: &str = "startup_articles";
const EXPORTS_TABLE: &str = "article_exports";
const REPORTS_TABLE: &str = "reports";

pub struct SupabaseStore {
    client: Client,
    base_url: String,
}

impl SupabaseStore {
    /// Credentials come from `SUPABASE_URL` / `SUPABASE_ANON_KEY`. Missing
    /// credentials are a configuration error and abort the run at startup.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| Error::Config("SUPABASE_URL is not set".to_string()))?;
        let key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| Error::Config("SUPABASE_ANON_KEY is not set".to_string()))?;
        Self::new(&url, &key)
    }

    pub fn new(base_url: &str, key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(key)
            .map_err(|_| Error::Config("invalid Supabase key".to_string()))?;
        headers.insert("apikey", key_value);
        let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| Error::Config("invalid Supabase key".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to build Supabase client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(Error::Storage(format!("{action} failed: {status} {body}")))
        }
    }
}

#[async_trait]
impl ArticleStore for SupabaseStore {
    async fn insert_new(&self, articles: &[Article]) -> Result<usize> {
        let response = self
            .client
            .post(format!("{}?on_conflict=url", self.table_url(ARTICLES_TABLE)))
            .header("Prefer", "resolution=ignore-duplicates,return=representation")
            .json(articles)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("article insert failed: {e}")))?;

        let response = Self::check(response, "article insert").await?;
        let written: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| Error::Storage(format!("article insert response unreadable: {e}")))?;
        Ok(written.len())
    }

    async fn latest(&self, limit: Option<usize>) -> Result<Vec<Article>> {
        let mut url = format!(
            "{}?select=*&order=published_date.desc",
            self.table_url(ARTICLES_TABLE)
        );
        if let Some(limit) = limit {
            url.push_str(&format!("&limit={limit}"));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("article select failed: {e}")))?;
        let response = Self::check(response, "article select").await?;
        response
            .json()
            .await
            .map_err(|e| Error::Storage(format!("article select response unreadable: {e}")))
    }

    async fn delete_all(&self) -> Result<()> {
        for table in [EXPORTS_TABLE, ARTICLES_TABLE] {
            let response = self
                .client
                .delete(format!("{}?id=not.is.null", self.table_url(table)))
                .send()
                .await
                .map_err(|e| Error::Storage(format!("delete from {table} failed: {e}")))?;
            Self::check(response, "delete").await?;
        }
        Ok(())
    }

    async fn save_export(&self, articles: &[ArticleDigest]) -> Result<()> {
        let response = self
            .client
            .post(self.table_url(EXPORTS_TABLE))
            .json(&json!({ "articles": articles }))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("export insert failed: {e}")))?;
        Self::check(response, "export insert").await?;
        Ok(())
    }

    async fn latest_export(&self) -> Result<Vec<ArticleDigest>> {
        #[derive(Deserialize)]
        struct ExportRow {
            articles: Vec<ArticleDigest>,
        }

        let url = format!(
            "{}?select=articles&order=created_at.desc&limit=1",
            self.table_url(EXPORTS_TABLE)
        );
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("export select failed: {e}")))?;
        let response = Self::check(response, "export select").await?;
        let mut rows: Vec<ExportRow> = response
            .json()
            .await
            .map_err(|e| Error::Storage(format!("export select response unreadable: {e}")))?;

        rows.pop()
            .map(|row| row.articles)
            .ok_or_else(|| Error::Storage("no article export available".to_string()))
    }

    async fn save_report(&self, report: &Report) -> Result<()> {
        let response = self
            .client
            .post(self.table_url(REPORTS_TABLE))
            .json(&json!({ "name": report.name, "html": report.html }))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("report insert failed: {e}")))?;
        Self::check(response, "report insert").await?;
        Ok(())
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        let url = format!(
            "{}?select=name,html,created_at&order=created_at.desc",
            self.table_url(REPORTS_TABLE)
        );
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("report select failed: {e}")))?;
        let response = Self::check(response, "report select").await?;
        response
            .json()
            .await
            .map_err(|e| Error::Storage(format!("report select response unreadable: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url() {
        let store = SupabaseStore::new("https://proj.supabase.co/", "key").unwrap();
        assert_eq!(
            store.table_url("startup_articles"),
            "https://proj.supabase.co/rest/v1/startup_articles"
        );
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        std::env::remove_var("SUPABASE_URL");
        std::env::remove_var("SUPABASE_ANON_KEY");
        assert!(matches!(
            SupabaseStore::from_env(),
            Err(Error::Config(_))
        ));
    }
}
