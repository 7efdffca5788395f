//! Placeholder bus used when no bus address is configured.

use super::service::{BusError, EventBus, MessageStream};
use async_trait::async_trait;

/// A bus that rejects every operation with [`BusError::NotConfigured`].
///
/// Substituted for a real bus so that the publisher always goes straight to
/// the fallback path and the consumer serves HTTP ingestion only.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBus;

impl NullBus {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventBus for NullBus {
    async fn publish(&self, _topic: &str, _payload: &str) -> Result<(), BusError> {
        Err(BusError::NotConfigured)
    }

    async fn subscribe(&self, _topic: &str) -> Result<MessageStream, BusError> {
        Err(BusError::NotConfigured)
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn is_configured(&self) -> bool {
        false
    }
}
