mod common;

use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use linkpulse::api::handlers::{analytics_health_handler, health_handler};
use linkpulse::infrastructure::bus::{InMemoryBus, NullBus};
use linkpulse::infrastructure::cache::{MemoryCache, NullCache};
use linkpulse::infrastructure::sink::NullClickSink;
use std::sync::Arc;

#[tokio::test]
async fn test_health_with_optional_components_disabled() {
    let state = common::create_redirect_state(
        Arc::new(common::InMemoryLinkRepository::default()),
        Arc::new(NullCache::new()),
        Arc::new(NullBus::new()),
        Arc::new(NullClickSink::new()),
    );
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "disabled");
    assert_eq!(json["checks"]["event_bus"]["status"], "disabled");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_health_with_in_process_components() {
    let state = common::create_redirect_state(
        Arc::new(common::InMemoryLinkRepository::with_links(&[("ab12cd", "https://example.com")])),
        Arc::new(MemoryCache::new(common::CACHE_TTL)),
        Arc::new(InMemoryBus::default()),
        Arc::new(NullClickSink::new()),
    );
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert_eq!(json["checks"]["event_bus"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_bus_unreachable() {
    let state = common::create_redirect_state(
        Arc::new(common::InMemoryLinkRepository::default()),
        Arc::new(NullCache::new()),
        Arc::new(common::FailingBus),
        Arc::new(NullClickSink::new()),
    );
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["event_bus"]["status"], "error");
}

#[tokio::test]
async fn test_analytics_health_omits_cache() {
    let state = common::create_analytics_state(
        Arc::new(common::InMemoryAggregateRepository::default()),
        Arc::new(NullBus::new()),
    );
    let app = Router::new()
        .route("/health", get(analytics_health_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert!(json["checks"].get("cache").is_none());
}
