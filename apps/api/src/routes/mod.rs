pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
    Router,
};

use crate::mail::handlers::handle_sync_mailbox;
use crate::screening::handlers;
use crate::state::AppState;

/// Multipart uploads carry several resumes at once.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const INDEX_HTML: &str = include_str!("index.html");

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/candidates", get(handlers::handle_list_candidates))
        .route("/api/v1/analyses", post(handlers::handle_create_analysis))
        .route(
            "/api/v1/analyses/report",
            post(handlers::handle_analysis_report),
        )
        .route("/api/v1/reports", post(handlers::handle_render_report))
        // Mail API
        .route("/api/v1/mailbox/sync", post(handle_sync_mailbox))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
