//! Common test utilities for driving the API in-process with mocks.
//!
//! The fixture builds the real router over an `AppState` whose collector is
//! backed by a `MockExtractor`, so no external portal or disclosure API is
//! needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tradegate_core::{
    testing::MockExtractor, Config, DisclosureClient, DisclosureConfig, Extractor,
    FetchOrchestrator,
};
use tradegate_server::api::create_router;
use tradegate_server::state::AppState;

/// Test fixture for driving the API with a controllable extractor.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock extractor - configure fields, failures and delays
    pub extractor: Arc<MockExtractor>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture without a disclosure client.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a fixture whose disclosure client points at an unreachable
    /// address, for exercising the error mapping without a network.
    pub fn with_unreachable_disclosure() -> Self {
        Self::build(Some(DisclosureConfig {
            api_key: "test-key".to_string(),
            base_url: Some("http://127.0.0.1:1/api".to_string()),
            timeout_secs: 1,
        }))
    }

    fn build(disclosure_config: Option<DisclosureConfig>) -> Self {
        let extractor = Arc::new(MockExtractor::new());
        let collector = Arc::new(FetchOrchestrator::new(
            Arc::clone(&extractor) as Arc<dyn Extractor>
        ));

        let mut config = Config::default();
        // Keep tests fast: no spacing between attempts.
        config.collector.fetch.min_delay_ms = 0;
        config.collector.fetch.timeout_ms = 2_000;
        config.disclosure = disclosure_config.clone();

        let disclosure = disclosure_config
            .map(|cfg| DisclosureClient::new(cfg).expect("Failed to create disclosure client"))
            .map(Arc::new);

        let state = Arc::new(AppState::new(config, disclosure, collector));

        Self {
            router: create_router(state),
            extractor,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }
}
