//! End-to-end request scenarios
//!
//! Drives `RequestController` over `HttpTransport` against a mock HTTP server
//! and checks the state, the cache, and how many requests reached the server.

use std::sync::Arc;

use fetchstate::{
    HttpTransport, MemoryCache, Phase, RequestController, RequestDescriptor, RequestOptions,
    ResponseCache, TransportError,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    name: String,
}

fn user(name: &str) -> User {
    User {
        name: name.to_string(),
    }
}

async fn served_requests(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or(0)
}

#[tokio::test]
async fn test_get_then_cached_get_then_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "ann"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "bob"})))
        .mount(&server)
        .await;

    let cache: Arc<MemoryCache<User>> = Arc::new(MemoryCache::new());
    let transport = HttpTransport::new().with_base_url(server.uri());
    let controller =
        RequestController::new(RequestDescriptor::new("/users"), transport, cache.clone());

    // First fetch goes to the network and fills the cache
    let state = controller.attach().await.expect("first attach fetches");
    assert_eq!(state.data, Some(user("ann")));
    assert!(state.error.is_none());
    assert!(!state.loading);
    assert_eq!(cache.get("/users"), Some(user("ann")));
    assert_eq!(served_requests(&server).await, 1);

    // Plain fetch is answered from the cache
    let state = controller.fetch(false).await;
    assert_eq!(state.data, Some(user("ann")));
    assert_eq!(served_requests(&server).await, 1);

    // Retry always reaches the server and overwrites the cache
    let state = controller.retry().await;
    assert_eq!(state.data, Some(user("bob")));
    assert_eq!(cache.get("/users"), Some(user("bob")));
    assert_eq!(served_requests(&server).await, 2);
}

#[tokio::test]
async fn test_post_success_leaves_cache_unset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 10})))
        .mount(&server)
        .await;

    let cache: Arc<MemoryCache<Value>> = Arc::new(MemoryCache::new());
    let transport = HttpTransport::new().with_base_url(server.uri());
    let descriptor = RequestDescriptor::with_options(
        "/orders",
        RequestOptions::new().method(Method::POST).body(json!({"item": "tea"})),
    );
    let controller = RequestController::new(descriptor, transport, cache.clone());

    let state = controller.fetch(false).await;
    assert_eq!(state.phase(), Phase::Success);
    assert_eq!(state.data, Some(json!({"id": 10})));
    assert!(!cache.contains("/orders"));

    controller.fetch(false).await;
    assert_eq!(served_requests(&server).await, 2);
}

#[tokio::test]
async fn test_server_error_becomes_failure_state() {
    let server = MockServer::start().await;
    Mock::given(path("/users"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let cache: Arc<MemoryCache<User>> = Arc::new(MemoryCache::new());
    let transport = HttpTransport::new().with_base_url(server.uri());
    let controller =
        RequestController::new(RequestDescriptor::new("/users"), transport, cache.clone());

    let state = controller.attach().await.unwrap();

    assert_eq!(state.phase(), Phase::Failure);
    assert!(state.data.is_none());
    assert!(!state.loading);
    match state.error() {
        Some(TransportError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_second_controller_reads_shared_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "ann"})))
        .expect(1)
        .mount(&server)
        .await;

    let cache: Arc<MemoryCache<User>> = Arc::new(MemoryCache::new());
    let first = RequestController::new(
        RequestDescriptor::new("/users"),
        HttpTransport::new().with_base_url(server.uri()),
        cache.clone(),
    );
    let second = RequestController::new(
        RequestDescriptor::new("/users"),
        HttpTransport::new().with_base_url(server.uri()),
        cache.clone(),
    );

    first.attach().await;
    let state = second.attach().await.unwrap();

    assert_eq!(state.data, Some(user("ann")));
    assert_eq!(served_requests(&server).await, 1);
}

#[tokio::test]
async fn test_no_content_response_is_fetched_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let cache: Arc<MemoryCache<Value>> = Arc::new(MemoryCache::new());
    let transport = HttpTransport::new().with_base_url(server.uri());
    let controller =
        RequestController::new(RequestDescriptor::new("/empty"), transport, cache.clone());

    let state = controller.attach().await.unwrap();
    assert_eq!(state.data, Some(Value::Null));
    assert!(!cache.contains("/empty"), "an empty body should not be cached");

    let state = controller.fetch(false).await;
    assert_eq!(state.data, Some(Value::Null));
    assert_eq!(served_requests(&server).await, 2);
}
