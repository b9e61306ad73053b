//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use boda_core::clock::Clock;
use boda_core::error::DomainError;
use boda_core::store::MemoryStore;
use boda_core::submission::{FormSubmitter, SubmitResponse};
use boda_test_support::FixedClock;
use http_body_util::BodyExt;
use tower::ServiceExt;

use boda_api::config::WeddingConfig;
use boda_api::state::AppState;

/// Endpoint every flow posts to in tests.
pub const TEST_ENDPOINT: &str = "https://forms.test/exec";

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 5, 1, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over `submitter` and `store`.
pub fn build_test_app(submitter: Arc<dyn FormSubmitter>, store: Arc<MemoryStore>) -> Router {
    let mut wedding = WeddingConfig::default();
    wedding.set_all_endpoints(TEST_ENDPOINT);
    let app_state = AppState::new(wedding, submitter, fixed_clock(), store);
    boda_api::app(app_state)
}

/// Send a request with an optional JSON body and return the response.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

/// Holds the first submission until the test releases it; later
/// submissions answer 200 straight away.
#[derive(Default)]
pub struct GatedSubmitter {
    /// Notified once the first submission is waiting.
    pub entered: tokio::sync::Notify,
    /// Lets the first submission through.
    pub release: tokio::sync::Notify,
    calls: AtomicUsize,
    first_status: Option<u16>,
}

impl GatedSubmitter {
    /// First submission answers 200.
    pub fn new() -> Self {
        Self::default()
    }

    /// First submission answers `status`.
    pub fn first_answers(status: u16) -> Self {
        Self {
            first_status: Some(status),
            ..Self::default()
        }
    }
}

#[async_trait]
impl FormSubmitter for GatedSubmitter {
    async fn submit(
        &self,
        _endpoint: &str,
        _payload: &serde_json::Value,
    ) -> Result<SubmitResponse, DomainError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
            return Ok(SubmitResponse::ok());
        }
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self
            .first_status
            .map_or_else(SubmitResponse::ok, SubmitResponse::with_status))
    }
}

/// Polls `uri` until the flow is no longer submitting.
pub async fn wait_until_idle(app: &Router, uri: &str) -> serde_json::Value {
    for _ in 0..100 {
        let (_, json) = get_json(app.clone(), uri).await;
        if json["submitting"] == false {
            return json;
        }
        tokio::task::yield_now().await;
    }
    panic!("flow at {uri} never left the submitting state");
}
