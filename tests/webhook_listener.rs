mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::FixedNode;
use minima_kit::client::{ClientConfig, MinimaClient};
use minima_kit::webhook::{server, ListenerState, WebhookConfig, WebhookListener};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceExt;

async fn post_event(state: &Arc<ListenerState>, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/events")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = server::router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_status(state: &Arc<ListenerState>) -> Value {
    let request = Request::builder().uri("/status").body(Body::empty()).unwrap();
    let response = server::router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_new_block_updates_status() {
    let state = Arc::new(ListenerState::new());
    let body = json!({"event": "NEWBLOCK", "data": {"txpow": {"header": {"block": "12"}}}});

    let (code, reply) = post_event(&state, &body.to_string()).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(reply, json!({"status": "ok"}));

    let status = get_status(&state).await;
    assert_eq!(status["lastBlock"], "12");
    assert_eq!(status["eventCounts"]["NEWBLOCK"], 1);
    assert!(status["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_malformed_body_still_acknowledged() {
    let state = Arc::new(ListenerState::new());
    let (code, reply) = post_event(&state, "{not json").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(reply, json!({"status": "ok"}));

    let status = get_status(&state).await;
    assert_eq!(status["lastBlock"], "0");
    assert_eq!(status["eventCounts"], json!({}));
}

#[tokio::test]
async fn test_unknown_and_timer_events_are_counted() {
    let state = Arc::new(ListenerState::new());
    post_event(&state, r#"{"event":"MDS_SHUTDOWN","data":{}}"#).await;
    post_event(&state, r#"{"event":"MDS_TIMER_60SECONDS","data":{"timemilli":"1700000000000"}}"#).await;
    post_event(&state, r#"{"event":"MDS_TIMER_60SECONDS","data":{"timemilli":"1700000060000"}}"#).await;

    let status = get_status(&state).await;
    assert_eq!(status["eventCounts"]["MDS_SHUTDOWN"], 1);
    assert_eq!(status["eventCounts"]["MDS_TIMER_60SECONDS"], 2);
}

#[tokio::test]
async fn test_odd_event_names_are_counted_as_unknown() {
    let state = Arc::new(ListenerState::new());
    let (code, reply) = post_event(&state, r#"{"event":42,"data":{}}"#).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(reply, json!({"status": "ok"}));
    post_event(&state, r#"{"data":{"x":1}}"#).await;

    let status = get_status(&state).await;
    assert_eq!(status["eventCounts"], json!({"42": 1, "undefined": 1}));
    assert_eq!(status["lastBlock"], "0");
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let state = Arc::new(ListenerState::new());
    let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let response = server::router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Not found");
}

#[tokio::test]
async fn test_listener_registers_and_deregisters() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let hook = format!("http://127.0.0.1:{}/events", port);

    let node = FixedNode::new()
        .ok(&format!("webhooks action:add hook:{} filter:NEWBLOCK", hook), json!({}))
        .ok(&format!("webhooks action:remove hook:{}", hook), json!({}));
    let client = MinimaClient::with_transport(ClientConfig::default(), node);
    let config = WebhookConfig { filter: "NEWBLOCK".into(), ..WebhookConfig::default() };
    let webhook = WebhookListener::new(config, client.clone());
    let state = webhook.state();

    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(webhook.serve(listener, rx));

    let http = reqwest::Client::new();
    let reply: Value = http
        .post(&hook)
        .json(&json!({"event": "NEWBLOCK", "data": {"txpow": {"header": {"block": "44"}}}}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply, json!({"status": "ok"}));
    assert_eq!(state.last_block(), "44");

    tx.send(true).unwrap();
    task.await.unwrap().unwrap();

    assert_eq!(
        client.transport().commands(),
        vec![
            format!("webhooks action:add hook:{} filter:NEWBLOCK", hook),
            format!("webhooks action:remove hook:{}", hook),
        ]
    );
}

#[tokio::test]
async fn test_listener_serves_without_node() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let client = MinimaClient::with_transport(ClientConfig::default(), FixedNode::new());
    let webhook = WebhookListener::new(WebhookConfig::default(), client.clone());

    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(webhook.serve(listener, rx));

    let status: Value = reqwest::get(format!("http://127.0.0.1:{}/status", port))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["lastBlock"], "0");

    tx.send(true).unwrap();
    task.await.unwrap().unwrap();
    // One add attempt and one remove attempt, neither retried.
    assert_eq!(client.transport().commands().len(), 2);
}
