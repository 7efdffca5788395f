//! DTOs for the click ingestion endpoint.

use serde::Serialize;

/// Acknowledgement returned once a click has been aggregated.
#[derive(Debug, Serialize)]
pub struct EventAcceptedResponse {
    pub status: &'static str,
    pub short_code: String,
    pub total_clicks: i64,
}
