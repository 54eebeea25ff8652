// file: src/server/router.rs
// description: axum router wiring for the search page and JSON API

use crate::server::handlers;
use crate::server::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Page routes (`/`, `/search`), JSON routes under `/api`, `/health` and the stylesheet.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/search", post(handlers::submit_search))
        .route("/api/search", post(handlers::api_search))
        .route("/api/history", get(handlers::api_history))
        .route("/health", get(handlers::health))
        .route("/static/styles.css", get(handlers::styles))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
