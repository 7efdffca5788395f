//! Handlers for health check endpoints.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::infrastructure::bus::EventBus;
use crate::infrastructure::cache::CacheService;
use crate::state::{AnalyticsState, AppState};

type HealthResult = Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)>;

/// Returns redirect service health with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All configured components healthy
/// - **503 Service Unavailable**: One or more components failing
///
/// Disabled optional components (no cache, no bus) are reported as
/// `disabled` and do not degrade the status.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 42 links" },
///     "cache": { "status": "ok", "message": "redis connected" },
///     "event_bus": { "status": "disabled" }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> HealthResult {
    let database = match state.link_service.count_links().await {
        Ok(count) => CheckStatus::ok(format!("Connected, {count} links")),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    };

    respond(HealthChecks {
        database,
        cache: Some(check_cache(state.cache.as_ref()).await),
        event_bus: Some(check_bus(state.bus.as_ref()).await),
    })
}

/// Returns analytics service health with component checks.
///
/// # Endpoint
///
/// `GET /health`
pub async fn analytics_health_handler(State(state): State<AnalyticsState>) -> HealthResult {
    let database = match state.analytics_service.count_urls().await {
        Ok(count) => CheckStatus::ok(format!("Connected, {count} tracked codes")),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    };

    respond(HealthChecks {
        database,
        cache: None,
        event_bus: Some(check_bus(state.bus.as_ref()).await),
    })
}

fn respond(checks: HealthChecks) -> HealthResult {
    let all_healthy = checks.all_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_cache(cache: &dyn CacheService) -> CheckStatus {
    let backend = cache.backend();
    if backend == "none" {
        return CheckStatus::disabled();
    }

    if cache.health_check().await {
        CheckStatus::ok(format!("{backend} connected"))
    } else {
        CheckStatus::error(format!("{backend} connection failed"))
    }
}

async fn check_bus(bus: &dyn EventBus) -> CheckStatus {
    if !bus.is_configured() {
        return CheckStatus::disabled();
    }

    if bus.health_check().await {
        CheckStatus::ok("Event bus connected")
    } else {
        CheckStatus::error("Event bus unreachable")
    }
}
