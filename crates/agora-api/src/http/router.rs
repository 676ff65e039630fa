//! Axum router configuration with middleware.
//!
//! Routes live under `/api/` on the paths the website frontend already
//! calls. Middleware: permissive CORS (the website is served from another
//! origin) and request tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Votes
        .route("/projects/{id}/votes", get(handlers::vote::get_votes))
        .route("/projects/{id}/vote", post(handlers::vote::submit_vote))
        .route("/projects/votes/all", get(handlers::vote::all_votes))
        // Comments
        .route(
            "/projects/{id}/comments",
            get(handlers::comment::list_comments).post(handlers::comment::create_comment),
        )
        .route("/comments/{id}/like", post(handlers::comment::toggle_like))
        .route(
            "/projects/comments/stats",
            get(handlers::comment::all_comment_stats),
        )
        // Word cloud
        .route(
            "/wordclouds",
            get(handlers::word::list_words).post(handlers::word::submit_word),
        )
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
