//! Handler for synchronous click ingestion.

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::api::dto::events::EventAcceptedResponse;
use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AnalyticsState;

/// Aggregates one click event delivered over HTTP.
///
/// This is the fallback path used by the redirector when the bus is
/// unavailable. It shares the aggregation call with the bus consumer.
///
/// # Endpoint
///
/// `POST /api/events`
///
/// # Request Body
///
/// ```json
/// { "short_code": "ab12cd", "clicked_at": "2025-06-01T12:00:00Z" }
/// ```
///
/// `clicked_at` is optional and defaults to the receive time.
///
/// # Errors
///
/// Returns 400 Bad Request when `short_code` is missing, empty or malformed.
pub async fn events_handler(
    State(state): State<AnalyticsState>,
    payload: Result<Json<ClickEvent>, JsonRejection>,
) -> Result<Json<EventAcceptedResponse>, AppError> {
    let Json(event) = payload?;

    let record = state.analytics_service.record_click(&event).await?;
    metrics::counter!("click_events_consumed_total", "path" => "http").increment(1);

    Ok(Json(EventAcceptedResponse {
        status: "success",
        short_code: record.code,
        total_clicks: record.total_clicks,
    }))
}
