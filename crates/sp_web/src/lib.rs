use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/generate-report", post(handlers::generate_report))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(state: AppState, port: u16) -> sp_core::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "🚀 server running");
    axum::serve(listener, app).await?;
    Ok(())
}

pub mod prelude {
    pub use super::AppState;
    pub use sp_core::{Report, Result};
}
