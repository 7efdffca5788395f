//! Top-level routers for the redirect and analytics processes.
//!
//! # Redirect service
//!
//! - `GET  /{code}`       - Short link redirect
//! - `GET  /health`       - Health check: DB, cache, event bus
//! - `POST /api/shorten`  - Link creation
//!
//! # Analytics service
//!
//! - `GET  /health`       - Health check: DB, event bus
//! - `/api/*`             - Ingestion and statistics
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on link creation
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{analytics_health_handler, health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::{AnalyticsState, AppState};
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Per-IP limits for link creation.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst: u32,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            per_second: 2,
            burst: 100,
        }
    }
}

/// Constructs the redirect service router.
pub fn app_router(state: AppState, limit: RateLimit) -> NormalizePath<Router> {
    let api_router =
        api::routes::redirect_api_routes(rate_limit::layer(limit.per_second, limit.burst));

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Constructs the analytics service router.
pub fn analytics_router(state: AnalyticsState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(analytics_health_handler))
        .nest("/api", api::routes::analytics_api_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
