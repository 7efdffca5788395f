//! Click event model shared by the publisher and the consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single click, as it travels from the redirector to the analytics consumer.
///
/// The same JSON shape is used as the bus payload and as the body of the
/// fallback `POST /api/events` call:
///
/// ```json
/// { "short_code": "ab12cd", "clicked_at": "2025-06-01T12:00:00Z" }
/// ```
///
/// The event is never persisted by the producer. A payload without
/// `clicked_at` is stamped with the time it is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    #[serde(rename = "short_code")]
    pub code: String,
    #[serde(default = "Utc::now")]
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates an event for a click happening now.
    pub fn new(code: impl Into<String>) -> Self {
        Self::at(code, Utc::now())
    }

    /// Creates an event with an explicit click time.
    pub fn at(code: impl Into<String>, clicked_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            clicked_at,
        }
    }

    /// Serializes the event into its wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a wire payload.
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
