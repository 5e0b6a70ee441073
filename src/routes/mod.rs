//! Route definitions for the PropDesk API.

pub mod dashboard;
pub mod health;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => CorsLayer::permissive(),
    };

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/api/v1/dashboard/stats", get(dashboard::stats))
        .route("/api/v1/dashboard/refresh", post(dashboard::refresh))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
