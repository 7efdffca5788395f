//! In-process bus built on a tokio broadcast channel.

use super::service::{BusError, EventBus, MessageStream};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, warn};

/// Broadcast-backed bus with the same at-most-once semantics as Redis pub/sub.
///
/// Messages published while nobody is subscribed are discarded, and a
/// subscriber that falls more than `capacity` messages behind loses the
/// overflow. Topics are independent channels created on first use.
#[derive(Clone)]
pub struct InMemoryBus {
    topics: Arc<dashmap::DashMap<String, broadcast::Sender<String>>>,
    capacity: usize,
}

impl InMemoryBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: Arc::new(dashmap::DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<String> {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .get(topic)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl EventBus for InMemoryBus {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), BusError> {
        match self.sender(topic).send(payload.to_string()) {
            Ok(receivers) => debug!("Published to '{}' ({} receivers)", topic, receivers),
            // No subscriber: the message is lost, which is what pub/sub promises.
            Err(_) => debug!("Published to '{}' with no subscribers", topic),
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<MessageStream, BusError> {
        let topic_name = topic.to_string();
        let stream = BroadcastStream::new(self.sender(topic).subscribe()).filter_map(
            move |item| match item {
                Ok(payload) => Some(payload),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!("Subscriber on '{}' lagged, {} messages lost", topic_name, skipped);
                    None
                }
            },
        );

        Ok(Box::pin(stream))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
