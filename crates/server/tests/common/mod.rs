//! Common test utilities for in-process API testing with mocks.
//!
//! This module provides a test fixture that builds the router with mock
//! compile strategies and a real SQLite artifact store, so the HTTP layer
//! can be tested without a LaTeX installation or network access.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use quali_core::{
    create_artifact_recorder, testing::MockStrategy, ArtifactStore, CompilationOrchestrator,
    CompileStrategy, Config, SqliteArtifactStore,
};

/// Re-export fixtures for test convenience
pub use quali_core::testing::fixtures;

/// Test fixture with a mock `[local, remote]` strategy chain.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new().await;
/// fixture.local.fail_with("pdflatex missing").await;
///
/// let response = fixture.post("/api/v1/compile", json!({
///     "identifier": "42",
///     "source": fixtures::minimal_document(),
/// })).await;
///
/// assert_eq!(response.status, 200);
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// First strategy in the chain
    pub local: MockStrategy,
    /// Fallback strategy
    pub remote: MockStrategy,
    /// Store the artifact writer persists to
    pub store: Arc<SqliteArtifactStore>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
    writer: JoinHandle<()>,
}

/// JSON response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Raw response, for non-JSON bodies such as PDFs
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestFixture {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let store = Arc::new(
            SqliteArtifactStore::new(&db_path).expect("Failed to create artifact store"),
        );
        let (artifact_handle, artifact_writer) =
            create_artifact_recorder(Arc::clone(&store) as Arc<dyn ArtifactStore>, 100);
        let writer = tokio::spawn(artifact_writer.run());

        let local = MockStrategy::local();
        let remote = MockStrategy::remote();
        let orchestrator = CompilationOrchestrator::new(vec![
            Arc::new(local.clone()) as Arc<dyn CompileStrategy>,
            Arc::new(remote.clone()) as Arc<dyn CompileStrategy>,
        ])
        .with_artifacts(artifact_handle);

        let mut config = Config::default();
        config.database.path = db_path;

        let state = Arc::new(quali_server::AppState::new(
            config,
            Arc::new(orchestrator),
            Arc::clone(&store) as Arc<dyn ArtifactStore>,
        ));
        let router = quali_server::create_router(state);

        Self {
            router,
            local,
            remote,
            store,
            temp_dir,
            writer,
        }
    }

    /// Wait until the writer has persisted `count` markers.
    pub async fn wait_for_artifacts(&self, count: i64) -> bool {
        for _ in 0..100 {
            if self.store.count().unwrap_or(0) >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let raw = self.send(Request::get(path).body(Body::empty()).unwrap()).await;
        raw.into_json()
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.post_raw(path, body).await.into_json()
    }

    /// Send a POST request with JSON body, keeping the raw response.
    pub async fn post_raw(&self, path: &str, body: Value) -> RawResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// GET returning the raw response.
    pub async fn get_raw(&self, path: &str) -> RawResponse {
        self.send(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> RawResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        RawResponse {
            status,
            headers,
            bytes,
        }
    }
}

impl Drop for TestFixture {
    fn drop(&mut self) {
        self.writer.abort();
    }
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn into_json(self) -> TestResponse {
        let body = if self.bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status: self.status,
            body,
        }
    }
}
