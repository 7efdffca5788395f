//! API route configuration for both processes.

use crate::api::handlers::{
    events_handler, register_link_handler, shorten_handler, stats_handler, stats_overview_handler,
};
use crate::api::middleware::rate_limit::RateLimitLayer;
use crate::state::{AnalyticsState, AppState};
use axum::{
    Router,
    routing::{get, post},
};

/// Redirect service API, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten` - Create a short link (rate limited per IP)
pub fn redirect_api_routes(rate_limit: RateLimitLayer) -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .layer(rate_limit)
}

/// Analytics service API, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /events`       - Ingest a click event (fallback delivery path)
/// - `POST /links`        - Register or refresh link metadata
/// - `GET  /stats`        - Dashboard snapshot
/// - `GET  /stats/{code}` - Aggregate for one code
pub fn analytics_api_routes() -> Router<AnalyticsState> {
    Router::new()
        .route("/events", post(events_handler))
        .route("/links", post(register_link_handler))
        .route("/stats", get(stats_overview_handler))
        .route("/stats/{code}", get(stats_handler))
}
