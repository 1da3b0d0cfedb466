use async_trait::async_trait;

use crate::Result;

/// Generative text collaborator used by the report builder.
///
/// The contract is deliberately loose: prompt in, text out. Callers make no
/// structural assumption about the response beyond it being text.
#[async_trait]
pub trait ReportModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String>;
}
