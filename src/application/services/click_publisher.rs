//! Dual-path click emission.
//!
//! Every redirect hands its click to [`ClickPublisher::emit`], which runs the
//! delivery in its own task so the response never waits on it:
//!
//! 1. Publish to the bus on [`CLICK_EVENTS_TOPIC`].
//! 2. If the bus is absent or the publish fails, POST the same event to the
//!    analytics ingestion endpoint.
//! 3. If that fails too, log and drop. There is no retry queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::domain::click_event::ClickEvent;
use crate::infrastructure::bus::{BusError, CLICK_EVENTS_TOPIC, EventBus};
use crate::infrastructure::sink::{ClickSink, DeliveryError};

/// Default budget for each delivery attempt.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Which path, if any, carried a click event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Bus,
    Fallback,
    Dropped,
}

impl DeliveryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryOutcome::Bus => "bus",
            DeliveryOutcome::Fallback => "fallback",
            DeliveryOutcome::Dropped => "dropped",
        }
    }
}

/// Publishes click events over the bus with a direct HTTP fallback.
#[derive(Clone)]
pub struct ClickPublisher {
    bus: Arc<dyn EventBus>,
    sink: Arc<dyn ClickSink>,
    timeout: Duration,
}

impl ClickPublisher {
    pub fn new(bus: Arc<dyn EventBus>, sink: Arc<dyn ClickSink>, timeout: Duration) -> Self {
        Self { bus, sink, timeout }
    }

    /// Spawns delivery of a click on `code` happening now.
    ///
    /// The returned handle resolves to the path that carried the event. Request
    /// handlers drop it; dropping a `JoinHandle` does not cancel the task.
    pub fn emit(&self, code: &str) -> JoinHandle<DeliveryOutcome> {
        let publisher = self.clone();
        let event = ClickEvent::new(code);

        tokio::spawn(async move { publisher.deliver(event).await })
    }

    /// Delivers one event, trying the bus first and the sink second.
    pub async fn deliver(&self, event: ClickEvent) -> DeliveryOutcome {
        let outcome = self.try_deliver(&event).await;
        metrics::counter!("click_events_emitted_total", "path" => outcome.as_str()).increment(1);
        outcome
    }

    async fn try_deliver(&self, event: &ClickEvent) -> DeliveryOutcome {
        let payload = match event.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(code = %event.code, error = %e, "Failed to serialize click event");
                return DeliveryOutcome::Dropped;
            }
        };

        match timeout(self.timeout, self.bus.publish(CLICK_EVENTS_TOPIC, &payload)).await {
            Ok(Ok(())) => {
                tracing::debug!(code = %event.code, "Click event published to bus");
                return DeliveryOutcome::Bus;
            }
            Ok(Err(BusError::NotConfigured)) => {
                tracing::debug!(code = %event.code, "No event bus, using fallback");
            }
            Ok(Err(e)) => {
                tracing::warn!(code = %event.code, error = %e, "Bus publish failed, using fallback");
            }
            Err(_) => {
                tracing::warn!(
                    code = %event.code,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Bus publish timed out, using fallback"
                );
            }
        }

        let result = match timeout(self.timeout, self.sink.deliver(event)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout),
        };

        match result {
            Ok(()) => {
                tracing::debug!(code = %event.code, "Click event delivered via fallback");
                DeliveryOutcome::Fallback
            }
            Err(DeliveryError::NotConfigured) => {
                tracing::debug!(code = %event.code, "No delivery path configured, click dropped");
                DeliveryOutcome::Dropped
            }
            Err(e) => {
                tracing::error!(code = %event.code, error = %e, "Click event dropped");
                DeliveryOutcome::Dropped
            }
        }
    }
}
