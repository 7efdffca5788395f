//! Placeholder sink used when no fallback endpoint is configured.

use super::service::{ClickSink, DeliveryError};
use crate::domain::click_event::ClickEvent;
use async_trait::async_trait;

/// A sink that rejects every event with [`DeliveryError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullClickSink;

impl NullClickSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClickSink for NullClickSink {
    async fn deliver(&self, _event: &ClickEvent) -> Result<(), DeliveryError> {
        Err(DeliveryError::NotConfigured)
    }
}
