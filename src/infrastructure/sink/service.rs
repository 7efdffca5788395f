//! Point-to-point click delivery trait and error types.

use crate::domain::click_event::ClickEvent;
use async_trait::async_trait;

/// Errors that can occur while delivering a click event directly.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// No fallback endpoint is configured.
    #[error("Fallback delivery is not configured")]
    NotConfigured,
    #[error("Fallback delivery timed out")]
    Timeout,
    #[error("Fallback delivery failed: {0}")]
    Transport(String),
    #[error("Fallback endpoint rejected the event with status {0}")]
    Rejected(u16),
}

/// Direct delivery of a click event to the consumer, bypassing the bus.
///
/// # Implementations
///
/// - [`crate::infrastructure::sink::HttpClickSink`] - `POST /api/events` on the analytics service
/// - [`crate::infrastructure::sink::NullClickSink`] - Placeholder when no endpoint is configured
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickSink: Send + Sync {
    /// Delivers one event; a single attempt, never retried.
    async fn deliver(&self, event: &ClickEvent) -> Result<(), DeliveryError>;
}
