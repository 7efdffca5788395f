//! Event bus trait and error types.

use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::Stream;

/// Well-known topic shared by every publisher and the consumer.
pub const CLICK_EVENTS_TOPIC: &str = "click_events";

/// Stream of raw payloads received on a subscribed topic.
pub type MessageStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Errors that can occur during bus operations.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// No bus is configured; callers should take the fallback path.
    #[error("Event bus is not configured")]
    NotConfigured,
    #[error("Event bus connection error: {0}")]
    Connection(String),
    #[error("Publish to '{topic}' failed: {reason}")]
    Publish { topic: String, reason: String },
    #[error("Subscribe to '{topic}' failed: {reason}")]
    Subscribe { topic: String, reason: String },
}

/// Publish/subscribe channel with no persistence guarantee.
///
/// Delivery is at-most-once: a message published while no subscriber is
/// listening is gone, and a successful [`EventBus::publish`] only means the
/// bus accepted it. Ordering is not guaranteed either.
///
/// # Implementations
///
/// - [`crate::infrastructure::bus::RedisBus`] - Redis `PUBLISH` / `SUBSCRIBE`
/// - [`crate::infrastructure::bus::InMemoryBus`] - In-process broadcast channel
/// - [`crate::infrastructure::bus::NullBus`] - Placeholder when no bus is configured
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publishes a serialized message to `topic`.
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), BusError>;

    /// Opens a subscription to `topic`.
    ///
    /// The returned stream ends when the underlying connection drops; the
    /// caller is responsible for resubscribing.
    async fn subscribe(&self, topic: &str) -> Result<MessageStream, BusError>;

    /// Checks if the bus backend is reachable.
    async fn health_check(&self) -> bool;

    /// Whether a real bus backs this handle.
    fn is_configured(&self) -> bool {
        true
    }
}
