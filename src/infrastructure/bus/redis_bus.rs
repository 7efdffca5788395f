//! Redis pub/sub bus.

use crate::config::mask_connection_string;
use super::service::{BusError, EventBus, MessageStream};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// Event bus backed by Redis `PUBLISH` / `SUBSCRIBE`.
///
/// Redis pub/sub keeps nothing: subscribers that are offline when a message
/// is published never see it. Publishing goes through a shared
/// `ConnectionManager`; every subscription opens its own dedicated
/// connection, as the protocol requires.
pub struct RedisBus {
    client: Client,
    publisher: ConnectionManager,
}

impl RedisBus {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Connection`] if the URL is invalid or the server is
    /// unreachable.
    pub async fn connect(redis_url: &str) -> Result<Self, BusError> {
        info!("Connecting to event bus at {}", mask_connection_string(redis_url));

        let client = Client::open(redis_url)
            .map_err(|e| BusError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let publisher = ConnectionManager::new(client.clone())
            .await
            .map_err(|e| BusError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = publisher.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| BusError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to event bus");

        Ok(Self { client, publisher })
    }
}

#[async_trait]
impl EventBus for RedisBus {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), BusError> {
        let mut conn = self.publisher.clone();

        let receivers: i64 = conn
            .publish(topic, payload)
            .await
            .map_err(|e| BusError::Publish {
                topic: topic.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Published to '{}' ({} receivers)", topic, receivers);
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<MessageStream, BusError> {
        let subscribe_error = |e: redis::RedisError| BusError::Subscribe {
            topic: topic.to_string(),
            reason: e.to_string(),
        };

        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(subscribe_error)?;
        pubsub.subscribe(topic).await.map_err(subscribe_error)?;

        info!("Subscribed to '{}'", topic);

        let stream = pubsub
            .into_on_message()
            .filter_map(|msg| match msg.get_payload::<String>() {
                Ok(payload) => Some(payload),
                Err(e) => {
                    warn!("Dropping non-text message on '{}': {}", msg.get_channel_name(), e);
                    None
                }
            });

        Ok(Box::pin(stream))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.publisher.clone();
        conn.ping::<()>().await.is_ok()
    }
}
