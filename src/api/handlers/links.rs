//! Handler for link metadata registration.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::links::RegisterLinkRequest;
use crate::api::dto::stats::UrlStatsResponse;
use crate::error::AppError;
use crate::state::AnalyticsState;

/// Registers a link with the analytics service, or refreshes its metadata.
///
/// Counters are never modified here; a record created by an earlier click
/// keeps its totals and gains the target URL.
///
/// # Endpoint
///
/// `POST /api/links`
pub async fn register_link_handler(
    State(state): State<AnalyticsState>,
    payload: Result<Json<RegisterLinkRequest>, JsonRejection>,
) -> Result<Json<UrlStatsResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state.analytics_service.register_link(payload.into()).await?;

    Ok(Json(record.into()))
}
