//! Handlers for click statistics.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::api::dto::stats::{StatsOverviewResponse, UrlStatsResponse};
use crate::error::AppError;
use crate::state::AnalyticsState;

/// Returns the dashboard snapshot.
///
/// # Endpoint
///
/// `GET /api/stats`
///
/// # Response
///
/// Totals, the ten most clicked codes, the twenty latest clicks, hourly
/// click counts for the last 24 hours and every known code.
pub async fn stats_overview_handler(
    State(state): State<AnalyticsState>,
) -> Result<Json<StatsOverviewResponse>, AppError> {
    let overview = state.analytics_service.overview(Utc::now()).await?;

    Ok(Json(overview.into()))
}

/// Returns the aggregate for a single code.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code was never clicked or registered.
pub async fn stats_handler(
    State(state): State<AnalyticsState>,
    Path(code): Path<String>,
) -> Result<Json<UrlStatsResponse>, AppError> {
    let record = state.analytics_service.get_record(&code).await?;

    Ok(Json(record.into()))
}
