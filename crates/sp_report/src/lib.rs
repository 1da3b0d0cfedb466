//! Report generation: two sequential model passes over the latest article
//! export, then a title pulled from the generated HTML.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use sp_core::{ArticleDigest, Report, ReportModel, Result};

pub mod models;
pub mod prompts;

pub use models::{create_model, DummyModel, GeminiModel};

static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h1>(.*?)</h1>").unwrap());

/// Run the cleaning pass then the composition pass and wrap the result.
///
/// The model output is treated as opaque text; no structure beyond the
/// optional `<h1>` title is assumed.
pub async fn build_report(model: &dyn ReportModel, articles: &[ArticleDigest]) -> Result<Report> {
    info!(
        model = model.name(),
        articles = articles.len(),
        "🧹 running cleaning pass"
    );
    let cleaned = model.generate(&prompts::cleaning_prompt(articles)).await?;

    info!(model = model.name(), "📝 running composition pass");
    let html = model.generate(&prompts::composition_prompt(&cleaned)).await?;

    Ok(Report {
        name: extract_report_title(&html),
        html,
        created_at: None,
    })
}

/// Report name from the first `<h1>`, with a dated default when the model
/// produced none.
pub fn extract_report_title(html: &str) -> String {
    H1_RE
        .captures(html)
        .map(|caps| caps[1].trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| {
            format!(
                "Market Insights Report - {}",
                Utc::now().format("%B %-d, %Y")
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and returns scripted responses.
    struct ScriptedModel {
        responses: Mutex<Vec<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().map(String::from).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ReportModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.responses.lock().unwrap().pop().unwrap_or_default())
        }
    }

    fn digests() -> Vec<ArticleDigest> {
        vec![ArticleDigest {
            title: "Acme raises $50M".to_string(),
            content: "Funding news".to_string(),
            source: "techcrunch".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_two_passes_in_sequence() {
        let model = ScriptedModel::new(vec![
            "[{\"title\":\"cleaned insight\"}]",
            "<h1>Weekly Pulse</h1><ul><li>insight</li></ul>",
        ]);

        let report = build_report(&model, &digests()).await.unwrap();

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Acme raises $50M"));
        assert!(prompts[1].contains("cleaned insight"));
        assert_eq!(report.name, "Weekly Pulse");
        assert!(report.html.contains("<ul>"));
    }

    #[tokio::test]
    async fn test_missing_h1_gets_dated_default() {
        let model = ScriptedModel::new(vec!["cleaned", "<p>no heading here</p>"]);
        let report = build_report(&model, &digests()).await.unwrap();
        assert!(report.name.starts_with("Market Insights Report - "));
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_report_title("<html><h1> Spaced Title </h1></html>"),
            "Spaced Title"
        );
        assert!(extract_report_title("<h1></h1>").starts_with("Market Insights Report"));
    }
}
