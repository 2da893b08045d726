//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! backed by a mock generation service, so the API can be exercised
//! without a live generator.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use posecast_core::{
    testing::MockGenerator, Config, GenerationService, OrchestratorConfig, ServerConfig,
};

/// Re-export fixtures for test convenience
pub use posecast_core::testing::fixtures;

/// Test fixture for API testing with a mock generator.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_workflow_creation() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/v1/workflows", json!({})).await;
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock generator - configure payloads and failures
    pub generator: Arc<MockGenerator>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default config.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Create a test fixture with custom configuration.
    pub fn with_config(test_config: TestConfig) -> Self {
        let generator = Arc::new(MockGenerator::new());

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
                max_upload_bytes: test_config
                    .max_upload_bytes
                    .unwrap_or(ServerConfig::default().max_upload_bytes),
            },
            orchestrator: OrchestratorConfig {
                max_workflows: test_config.max_workflows,
            },
            ..Default::default()
        };

        let state = Arc::new(posecast_server::state::AppState::new(
            config,
            Arc::clone(&generator) as Arc<dyn GenerationService>,
        ));
        let router = posecast_server::api::create_router(state);

        Self { router, generator }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a multipart POST with a single file field.
    pub async fn post_multipart(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> TestResponse {
        let boundary = "posecast-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        self.post_raw(
            path,
            &format!("multipart/form-data; boundary={boundary}"),
            body,
        )
        .await
    }

    /// Send a POST with a raw body and content type.
    pub async fn post_raw(&self, path: &str, content_type: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();

        self.send(request).await
    }

    /// Send a GET request and return the raw text body.
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
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string())
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
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
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

    // ------------------------------------------------------------------------
    // Workflow helpers
    // ------------------------------------------------------------------------

    /// Create a workflow and return its id.
    pub async fn create_workflow(&self) -> String {
        let response = self.post_empty("/api/v1/workflows").await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["id"].as_str().unwrap().to_string()
    }

    pub fn task_path(id: &str, task: &str, action: &str) -> String {
        format!("/api/v1/workflows/{}/tasks/{}/{}", id, task, action)
    }

    /// Choose a mode and set text input for a task.
    pub async fn configure_text(&self, id: &str, task: &str, mode: &str, text: &str) {
        let response = self
            .post(&Self::task_path(id, task, "mode"), json!({ "mode": mode }))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        let response = self
            .post(&Self::task_path(id, task, "input"), json!({ "text": text }))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    }

    pub async fn submit(&self, id: &str, task: &str) -> TestResponse {
        self.post_empty(&Self::task_path(id, task, "submit")).await
    }

    /// Status of one task in the workflow snapshot.
    pub async fn task_status(&self, id: &str, task: &str) -> String {
        let snapshot = self.get(&format!("/api/v1/workflows/{}", id)).await;
        snapshot.body["tasks"]
            .as_array()
            .and_then(|tasks| tasks.iter().find(|t| t["id"] == task))
            .and_then(|t| t["status"].as_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Poll until the task reaches `expected`.
    pub async fn wait_for_status(&self, id: &str, task: &str, expected: &str) -> bool {
        for _ in 0..200 {
            if self.task_status(id, task).await == expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Maximum concurrent workflows (0 = unlimited)
    pub max_workflows: usize,
    /// Image upload body limit (None = server default)
    pub max_upload_bytes: Option<usize>,
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
