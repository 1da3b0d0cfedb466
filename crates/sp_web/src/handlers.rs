use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::AppState;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "message": "Server is running" }))
}

pub async fn list_reports(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.pipeline.store().list_reports().await {
        Ok(reports) => (StatusCode::OK, Json(json!({ "reports": reports }))),
        Err(e) => {
            error!(error = %e, "failed to fetch reports");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch reports" })),
            )
        }
    }
}

/// Trigger the full automation: delete, ingest, export, report.
pub async fn generate_report(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.pipeline.run_full_report().await {
        Ok((summary, report)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "report": report.name,
                "saved": summary.total_saved(),
                "failed_sources": summary.failed_sources(),
            })),
        ),
        Err(e) => {
            error!(error = %e, "report automation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sp_scrapers::Pipeline;
    use sp_storage::MemoryStore;

    #[tokio::test]
    async fn test_router_builds() {
        let store = Arc::new(MemoryStore::new());
        let model = sp_report::create_model("dummy").unwrap();
        let pipeline = Pipeline::with_http_renderer(store, model).unwrap();
        let _app = crate::create_app(AppState::new(pipeline));
    }
}
