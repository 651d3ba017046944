//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling E2E testing without yt-dlp
//! or ffmpeg. Downloads land in a real temporary scratch directory.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use fastmusic_core::testing::{MockProvider, MockTranscoder};
use fastmusic_core::{Config, FsScratchSpace, ScratchSpace};
use fastmusic_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use fastmusic_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_download() {
///     let fixture = TestFixture::new().await;
///     fixture.provider.push_download(MockDownload::produce("Song", "mp3"));
///
///     let response = fixture.download("https://example.com/v", Some("320")).await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock provider - script searches and download attempts
    pub provider: Arc<MockProvider>,
    /// Mock transcoder - copy or fail explicit transcodes
    pub transcoder: Arc<MockTranscoder>,
    /// Scratch directory backing the downloads
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    /// Body parsed as JSON, `Null` when it isn't JSON
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let scratch: Arc<dyn ScratchSpace> = Arc::new(
            FsScratchSpace::create(temp_dir.path().join("downloads"))
                .await
                .expect("Failed to create scratch dir"),
        );
        let provider = Arc::new(MockProvider::with_scratch(Arc::clone(&scratch)));
        let transcoder = Arc::new(MockTranscoder::new(Arc::clone(&scratch)));

        let state = Arc::new(AppState::new(
            Config::default(),
            Arc::clone(&provider) as Arc<dyn fastmusic_core::ExtractionProvider>,
            Arc::clone(&transcoder) as Arc<dyn fastmusic_core::Transcoder>,
            scratch,
        ));

        Self {
            router: create_router(state),
            provider,
            transcoder,
            temp_dir,
        }
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.temp_dir.path().join("downloads")
    }

    /// File names currently in the scratch directory.
    pub fn scratch_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.scratch_dir())
            .expect("Failed to read scratch dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Wait until the scratch directory is empty, up to one second.
    pub async fn wait_for_empty_scratch(&self) -> bool {
        for _ in 0..50 {
            if self.scratch_files().is_empty() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.post_raw(path, &body.to_string()).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// POST /download for `url`, base64 encoded the way clients do it.
    pub async fn download(&self, url: &str, quality: Option<&str>) -> TestResponse {
        let mut body = serde_json::json!({ "encoded_url": fixtures::encode_url(url) });
        if let Some(quality) = quality {
            body["quality"] = Value::String(quality.to_string());
        }
        self.post("/download", body).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
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

        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}
