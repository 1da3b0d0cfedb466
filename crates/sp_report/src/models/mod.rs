use std::sync::Arc;

use sp_core::{Error, ReportModel, Result};

pub mod dummy;
pub mod gemini;

pub use dummy::DummyModel;
pub use gemini::GeminiModel;

/// Build the configured report model. "gemini" reads its API key from the
/// environment; "dummy" is deterministic and offline.
pub fn create_model(kind: &str) -> Result<Arc<dyn ReportModel>> {
    match kind {
        "dummy" => Ok(Arc::new(DummyModel)),
        "gemini" => Ok(Arc::new(GeminiModel::from_env()?)),
        other => Err(Error::Config(format!("unknown report model: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_is_config_error() {
        assert!(matches!(create_model("gpt-9"), Err(Error::Config(_))));
    }

    #[test]
    fn test_dummy_model_available() {
        assert_eq!(create_model("dummy").unwrap().name(), "dummy");
    }
}
