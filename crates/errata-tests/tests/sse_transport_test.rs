//! Integration tests for the SSE streaming binding
//!
//! Runs the real router in-process against a scripted mock backend and
//! drives it with a raw reqwest client, parsing the SSE wire format
//! directly.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use errata_api::{create_router, AppState};
use errata_client::testing::{sample_summaries, MockAdvisoryBackend, TestServer};
use errata_core::{GatewayError, Product};
use errata_gateway::Dispatcher;
use futures_util::{Stream, StreamExt};
use serde_json::{json, Value};

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

async fn start_gateway(backend: Arc<MockAdvisoryBackend>) -> TestServer {
    let state = AppState::new(Dispatcher::new(backend));
    TestServer::start(create_router(state)).await.unwrap()
}

/// Minimal SSE consumer for tests: buffers the byte stream and yields
/// (event, data) pairs, skipping keep-alive comments.
struct SseSession {
    stream: Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>,
    buffer: String,
    /// RPC endpoint announced by the first event
    endpoint: String,
}

impl SseSession {
    /// Open GET /sse and consume the initial `endpoint` event
    async fn open(base_url: &str) -> Self {
        let response = reqwest::get(format!("{base_url}/sse")).await.unwrap();
        assert_eq!(response.status(), 200);

        let mut session = Self {
            stream: Box::pin(response.bytes_stream()),
            buffer: String::new(),
            endpoint: String::new(),
        };

        let (event, data) = session.next_event().await;
        assert_eq!(event, "endpoint");
        assert!(data.starts_with("/rpc/"), "unexpected endpoint: {data}");
        session.endpoint = data;
        session
    }

    /// Submit a call onto this session; asserts 202
    async fn submit(&self, base_url: &str, request: Value) {
        let status = reqwest::Client::new()
            .post(format!("{base_url}{}", self.endpoint))
            .json(&request)
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(status, 202);
    }

    async fn next_event(&mut self) -> (String, String) {
        tokio::time::timeout(EVENT_TIMEOUT, async {
            loop {
                if let Some(event) = self.pop_event() {
                    return event;
                }
                let chunk = self
                    .stream
                    .next()
                    .await
                    .expect("SSE stream ended unexpectedly")
                    .expect("SSE stream error");
                self.buffer.push_str(std::str::from_utf8(&chunk).unwrap());
            }
        })
        .await
        .expect("timed out waiting for SSE event")
    }

    /// Next `result` event payload, parsed
    async fn next_result(&mut self) -> Value {
        let (event, data) = self.next_event().await;
        assert_eq!(event, "result");
        serde_json::from_str(&data).unwrap()
    }

    fn pop_event(&mut self) -> Option<(String, String)> {
        loop {
            let idx = self.buffer.find("\n\n")?;
            let raw: String = self.buffer[..idx].to_string();
            self.buffer.drain(..idx + 2);

            let mut event = String::new();
            let mut data = String::new();
            for line in raw.lines() {
                if let Some(rest) = line.strip_prefix("event:") {
                    event = rest.trim().to_string();
                } else if let Some(rest) = line.strip_prefix("data:") {
                    if !data.is_empty() {
                        data.push('\n');
                    }
                    data.push_str(rest.trim());
                }
                // Lines starting with ':' are keep-alive comments.
            }

            if event.is_empty() && data.is_empty() {
                continue;
            }
            return Some((event, data));
        }
    }
}

#[tokio::test]
async fn liveness_is_independent_of_auth_and_backend_health() {
    let backend = Arc::new(MockAdvisoryBackend::new());
    backend.set_advisories(Err(GatewayError::BackendUnavailable(
        "connection refused".into(),
    )));
    let server = start_gateway(backend).await;
    let base_url = server.base_url();

    // Green before any call.
    let health = reqwest::get(format!("{base_url}/health")).await.unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await.unwrap(), "OK");

    // Drive a call into a BackendUnavailable outcome.
    let mut session = SseSession::open(&base_url).await;
    session
        .submit(
            &base_url,
            json!({"id": 1, "op": "list_advisories", "args": {"limit": 10}}),
        )
        .await;
    let result = session.next_result().await;
    assert_eq!(result["status"], "error");
    assert_eq!(result["code"], "backend_unavailable");

    // Still green immediately after.
    let health = reqwest::get(format!("{base_url}/health")).await.unwrap();
    assert_eq!(health.status(), 200);

    server.shutdown().await;
}

#[tokio::test]
async fn unknown_session_is_rejected_with_404() {
    let backend = Arc::new(MockAdvisoryBackend::new());
    let server = start_gateway(backend.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/rpc/{}", server.base_url(), "no-such-session"))
        .json(&json!({"op": "list_products"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(backend.total_calls(), 0);

    server.shutdown().await;
}

#[tokio::test]
async fn calls_multiplex_onto_one_session() {
    let backend = Arc::new(MockAdvisoryBackend::new());
    backend.set_products(Ok(vec![Product {
        short_name: "RHEL".into(),
        name: "Red Hat Enterprise Linux".into(),
    }]));
    backend.set_advisories(Ok(sample_summaries()));
    let server = start_gateway(backend).await;
    let base_url = server.base_url();

    let mut session = SseSession::open(&base_url).await;
    session
        .submit(&base_url, json!({"id": "a", "op": "list_products"}))
        .await;
    session
        .submit(
            &base_url,
            json!({"id": "b", "op": "list_advisories", "args": {"product": "RHEL", "limit": 10}}),
        )
        .await;

    // Calls run concurrently; collect both and correlate by id.
    let first = session.next_result().await;
    let second = session.next_result().await;
    let mut by_id = std::collections::HashMap::new();
    by_id.insert(first["id"].as_str().unwrap().to_string(), first.clone());
    by_id.insert(second["id"].as_str().unwrap().to_string(), second.clone());

    let products = &by_id["a"];
    assert_eq!(products["status"], "success");
    assert_eq!(products["data"][0]["short_name"], "RHEL");

    let advisories = &by_id["b"];
    assert_eq!(advisories["status"], "success");
    assert_eq!(advisories["data"].as_array().unwrap().len(), 2);
    assert_eq!(advisories["data"][0]["id"], "RHSA-2024:1234");

    server.shutdown().await;
}

#[tokio::test]
async fn aborted_caller_does_not_affect_concurrent_calls() {
    let backend = Arc::new(MockAdvisoryBackend::new());
    backend.set_products(Ok(vec![Product {
        short_name: "RHEL".into(),
        name: "Red Hat Enterprise Linux".into(),
    }]));
    // Hold every call in flight long enough to abort one caller
    // while the others are still pending.
    backend.set_delay(Duration::from_millis(300));
    let server = start_gateway(backend.clone()).await;
    let base_url = server.base_url();

    let mut first = SseSession::open(&base_url).await;
    let aborted = SseSession::open(&base_url).await;
    let mut third = SseSession::open(&base_url).await;

    first
        .submit(&base_url, json!({"id": 1, "op": "list_products"}))
        .await;
    aborted
        .submit(&base_url, json!({"id": 2, "op": "list_products"}))
        .await;
    third
        .submit(&base_url, json!({"id": 3, "op": "list_products"}))
        .await;

    // Abort the middle caller while its call is in flight.
    drop(aborted);

    let result_one = first.next_result().await;
    let result_three = third.next_result().await;

    assert_eq!(result_one["id"], json!(1));
    assert_eq!(result_one["status"], "success");
    assert_eq!(result_one["data"][0]["short_name"], "RHEL");

    assert_eq!(result_three["id"], json!(3));
    assert_eq!(result_three["status"], "success");

    // The aborted caller's backend call ran to completion; only its
    // delivery was discarded.
    assert_eq!(backend.product_calls(), 3);

    server.shutdown().await;
}

#[tokio::test]
async fn invalid_arguments_are_reported_over_the_stream() {
    let backend = Arc::new(MockAdvisoryBackend::new());
    let server = start_gateway(backend.clone()).await;
    let base_url = server.base_url();

    let mut session = SseSession::open(&base_url).await;
    session
        .submit(
            &base_url,
            json!({"id": 5, "op": "get_advisory_info", "args": {}}),
        )
        .await;

    let result = session.next_result().await;
    assert_eq!(result["id"], json!(5));
    assert_eq!(result["code"], "invalid_argument");
    assert_eq!(backend.total_calls(), 0);

    server.shutdown().await;
}
