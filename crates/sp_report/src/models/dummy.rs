//! Deterministic model for tests and offline runs.

use async_trait::async_trait;

use sp_core::{ReportModel, Result};

pub struct DummyModel;

#[async_trait]
impl ReportModel for DummyModel {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        // Echo enough of the prompt back to make pipelines observable.
        let head: String = prompt.chars().take(80).collect();
        Ok(format!(
            "<h1>Offline Report</h1><p>Generated from prompt: {head}</p>"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_echoes_prompt_head() {
        let output = DummyModel.generate("analyze these articles").await.unwrap();
        assert!(output.starts_with("<h1>Offline Report</h1>"));
        assert!(output.contains("analyze these articles"));
    }
}
