//! HTTP fallback delivery to the analytics ingestion endpoint.

use super::service::{ClickSink, DeliveryError};
use crate::domain::click_event::ClickEvent;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Path of the ingestion endpoint on the analytics service.
pub const EVENTS_PATH: &str = "/api/events";

/// Posts click events to `<base_url>/api/events`.
///
/// The client carries a hard request timeout so a slow or dead consumer can
/// only hold a background task for that long.
#[derive(Debug, Clone)]
pub struct HttpClickSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpClickSink {
    /// Builds a sink for the analytics service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), EVENTS_PATH),
        })
    }

    /// Full URL events are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ClickSink for HttpClickSink {
    async fn deliver(&self, event: &ClickEvent) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(event)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout
                } else {
                    DeliveryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected(status.as_u16()));
        }

        debug!("Click event for {} delivered via HTTP", event.code);
        Ok(())
    }
}
