//! Bus consumer feeding click events into the aggregation service.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_stream::StreamExt;

use crate::application::services::AnalyticsService;
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::bus::{BusError, CLICK_EVENTS_TOPIC, EventBus, MessageStream};

/// Pause between a closed subscription and the next subscribe attempt.
const RESUBSCRIBE_DELAY: Duration = Duration::from_secs(1);

/// Upper bound for the subscribe backoff.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

fn subscribe_backoff() -> impl Iterator<Item = Duration> {
    // 200ms, 400ms, 800ms, ... capped at MAX_BACKOFF
    ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(MAX_BACKOFF)
}

/// Consumes click events from the bus until the task is aborted.
///
/// Keeps one long-lived subscription on [`CLICK_EVENTS_TOPIC`] and
/// re-establishes it with exponential backoff whenever it fails or closes.
/// Messages published while no subscription is active are lost. Each message
/// is handled in its own task, at most `concurrency` at a time, so events may
/// be aggregated out of order.
///
/// Returns immediately when the bus is not configured; the HTTP ingestion
/// endpoint is then the only way in.
pub async fn run_click_consumer(
    bus: Arc<dyn EventBus>,
    service: Arc<AnalyticsService>,
    concurrency: usize,
) {
    let limiter = Arc::new(Semaphore::new(concurrency.max(1)));

    loop {
        let subscription = RetryIf::start(
            subscribe_backoff(),
            || bus.subscribe(CLICK_EVENTS_TOPIC),
            |e: &BusError| {
                let retry = !matches!(e, BusError::NotConfigured);
                if retry {
                    tracing::warn!(error = %e, "Subscribe failed, retrying");
                }
                retry
            },
        )
        .await;

        let stream = match subscription {
            Ok(stream) => stream,
            Err(BusError::NotConfigured) => {
                tracing::info!("No event bus configured, bus consumer disabled");
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Giving up on bus subscription");
                return;
            }
        };

        tracing::info!(topic = CLICK_EVENTS_TOPIC, concurrency, "Click consumer subscribed");

        consume(stream, &service, &limiter).await;

        tracing::warn!(topic = CLICK_EVENTS_TOPIC, "Subscription closed, resubscribing");
        tokio::time::sleep(RESUBSCRIBE_DELAY).await;
    }
}

async fn consume(mut stream: MessageStream, service: &Arc<AnalyticsService>, limiter: &Arc<Semaphore>) {
    while let Some(payload) = stream.next().await {
        let Ok(permit) = limiter.clone().acquire_owned().await else {
            return;
        };
        let service = service.clone();

        tokio::spawn(async move {
            let _permit = permit;
            handle_payload(&service, &payload).await;
        });
    }
}

/// Parses and aggregates one bus message. Failures are logged and the
/// message is discarded.
pub async fn handle_payload(service: &AnalyticsService, payload: &str) {
    let event = match ClickEvent::from_json(payload) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, payload, "Discarding malformed click event");
            metrics::counter!("click_events_rejected_total").increment(1);
            return;
        }
    };

    match service.record_click(&event).await {
        Ok(_) => {
            metrics::counter!("click_events_consumed_total", "path" => "bus").increment(1);
        }
        Err(e) => {
            tracing::error!(code = %event.code, error = %e, "Failed to record click from bus");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AggregateRecord;
    use crate::domain::repositories::MockAggregateRepository;
    use crate::infrastructure::bus::{InMemoryBus, NullBus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_service(counter: Arc<AtomicUsize>) -> Arc<AnalyticsService> {
        let mut repo = MockAggregateRepository::new();
        repo.expect_record_click().returning(move |code, clicked_at| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(AggregateRecord::first_click(code, clicked_at))
        });
        Arc::new(AnalyticsService::new(Arc::new(repo)))
    }

    async fn wait_until(condition: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("condition not met in time");
    }

    #[tokio::test]
    async fn test_consumer_returns_without_bus() {
        let counter = Arc::new(AtomicUsize::new(0));

        tokio::time::timeout(
            Duration::from_secs(1),
            run_click_consumer(Arc::new(NullBus), counting_service(counter), 2),
        )
        .await
        .expect("consumer should return immediately");
    }

    #[tokio::test]
    async fn test_consumer_aggregates_bus_messages() {
        let bus = Arc::new(InMemoryBus::default());
        let counter = Arc::new(AtomicUsize::new(0));

        let worker = tokio::spawn(run_click_consumer(
            bus.clone(),
            counting_service(counter.clone()),
            4,
        ));

        wait_until(|| bus.subscriber_count(CLICK_EVENTS_TOPIC) > 0).await;

        for payload in [
            r#"{"short_code":"ab12cd","clicked_at":"2025-06-01T12:00:00Z"}"#,
            r#"{"short_code":"ab12cd"}"#,
            "garbage",
            r#"{"clicked_at":"2025-06-01T12:00:00Z"}"#,
            r#"{"short_code":"xy98zw","clicked_at":"2025-06-01T12:05:00Z"}"#,
        ] {
            bus.publish(CLICK_EVENTS_TOPIC, payload).await.unwrap();
        }

        wait_until(|| counter.load(Ordering::SeqCst) == 3).await;

        worker.abort();
    }

    #[tokio::test]
    async fn test_handle_payload_skips_invalid_code() {
        let counter = Arc::new(AtomicUsize::new(0));
        let service = counting_service(counter.clone());

        handle_payload(&service, r#"{"short_code":""}"#).await;
        handle_payload(&service, r#"{"short_code":"ok1234"}"#).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
