mod common;

use axum::{Router, http::StatusCode, routing::post};
use axum_test::TestServer;
use linkpulse::api::handlers::shorten_handler;
use linkpulse::domain::repositories::LinkRepository;
use linkpulse::infrastructure::bus::NullBus;
use linkpulse::infrastructure::cache::NullCache;
use linkpulse::infrastructure::sink::NullClickSink;
use linkpulse::utils::code_generator::{CODE_LENGTH, is_valid_code};
use serde_json::json;
use std::sync::Arc;

fn server(links: Arc<common::InMemoryLinkRepository>) -> TestServer {
    let state = common::create_redirect_state(
        links,
        Arc::new(NullCache::new()),
        Arc::new(NullBus::new()),
        Arc::new(NullClickSink::new()),
    );
    let app = Router::new()
        .route("/api/shorten", post(shorten_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_shorten_success() {
    let links = Arc::new(common::InMemoryLinkRepository::default());
    let server = server(links.clone());

    let response = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com/some/page" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let code = json["short_code"].as_str().unwrap();
    assert_eq!(code.len(), CODE_LENGTH);
    assert!(is_valid_code(code));
    assert_eq!(json["short_url"], format!("{}/{}", common::PUBLIC_BASE_URL, code));
    assert_eq!(json["long_url"], "https://example.com/some/page");

    let stored = links.find_by_code(code).await.unwrap().unwrap();
    assert_eq!(stored.target_url, "https://example.com/some/page");
}

#[tokio::test]
async fn test_shorten_same_url_twice_gives_distinct_codes() {
    let server = server(Arc::new(common::InMemoryLinkRepository::default()));
    let body = json!({ "long_url": "https://example.com" });

    let first = server.post("/api/shorten").json(&body).await;
    let second = server.post("/api/shorten").json(&body).await;

    first.assert_status_ok();
    second.assert_status_ok();
    assert_ne!(
        first.json::<serde_json::Value>()["short_code"],
        second.json::<serde_json::Value>()["short_code"]
    );
}

#[tokio::test]
async fn test_shorten_rejects_non_http_scheme() {
    let server = server(Arc::new(common::InMemoryLinkRepository::default()));

    let response = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "ftp://example.com/file" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_shorten_rejects_malformed_url() {
    let server = server(Arc::new(common::InMemoryLinkRepository::default()));

    let response = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "not a url" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shorten_rejects_empty_url() {
    let server = server(Arc::new(common::InMemoryLinkRepository::default()));

    let response = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shorten_rejects_missing_field() {
    let server = server(Arc::new(common::InMemoryLinkRepository::default()));

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["message"], "Invalid request body");
}

#[tokio::test]
async fn test_shorten_rejects_embedded_line_breaks_and_tabs() {
    let links = Arc::new(common::InMemoryLinkRepository::default());
    let server = server(links.clone());

    for long_url in ["https://example.com/a\nb", "https://example.com/a\tb"] {
        let response = server
            .post("/api/shorten")
            .json(&json!({ "long_url": long_url }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error");
    }

    assert_eq!(links.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_shortened_link_redirects_with_location() {
    use axum::routing::get;
    use linkpulse::api::handlers::redirect_handler;

    let state = common::create_redirect_state(
        Arc::new(common::InMemoryLinkRepository::default()),
        Arc::new(NullCache::new()),
        Arc::new(NullBus::new()),
        Arc::new(NullClickSink::new()),
    );
    let app = Router::new()
        .route("/api/shorten", post(shorten_handler))
        .route("/{code}", get(redirect_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let created = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com/a?b=1" }))
        .await;
    created.assert_status_ok();
    let code = created.json::<serde_json::Value>()["short_code"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server.get(&format!("/{code}")).await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.header("location"), "https://example.com/a?b=1");
}
