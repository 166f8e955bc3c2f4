//! Common test utilities for in-process API testing with mocks.
//!
//! The fixture builds the real router around a [`MockUpstream`] and a
//! [`RecordingDelay`], so conversions run end to end without network access
//! or real poll delays.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use spodl_core::testing::{MockUpstream, RecordingDelay};
use spodl_core::{
    Config, ConversionOrchestrator, PollingConfig, UpstreamClient, UpstreamConfig,
    UpstreamEndpoints,
};

/// Re-export fixtures for test convenience
pub use spodl_core::testing::fixtures;

pub const BASE_URL: &str = "https://api.mock.test";

/// Test fixture wrapping the router and its mocks.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_conversion() {
///     let fixture = TestFixture::new();
///     fixture.upstream.script_success("/dl/a.mp3", 1).await;
///
///     let response = fixture.convert(fixtures::TRACK_URL).await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    pub router: Router,
    /// Mock conversion API - configure responses, inspect requests
    pub upstream: Arc<MockUpstream>,
    /// Records poll delays instead of sleeping
    pub delay: RecordingDelay,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with the default polling budget.
    pub fn new() -> Self {
        Self::with_polling(PollingConfig::default())
    }

    pub fn with_polling(polling: PollingConfig) -> Self {
        let upstream = Arc::new(MockUpstream::new());
        let delay = RecordingDelay::new();

        let config = Config {
            upstream: UpstreamConfig {
                base_url: BASE_URL.to_string(),
                ..Default::default()
            },
            polling: polling.clone(),
            ..Default::default()
        };

        let orchestrator = ConversionOrchestrator::new(
            Arc::clone(&upstream) as Arc<dyn UpstreamClient>,
            UpstreamEndpoints::new(BASE_URL),
            polling,
        )
        .with_delay(Arc::new(delay.clone()));

        let state = Arc::new(spodl_server::state::AppState::new(
            config,
            Arc::new(orchestrator),
        ));
        let router = spodl_server::api::create_router(state);

        Self {
            router,
            upstream,
            delay,
        }
    }

    /// GET /?url=<url> with the url percent-encoded.
    pub async fn convert(&self, url: &str) -> TestResponse {
        self.get(&format!("/?url={}", urlencoding::encode(url)))
            .await
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let (status, bytes) = self.get_raw(path).await;
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    /// Send a GET request and return the raw body.
    pub async fn get_raw(&self, path: &str) -> (StatusCode, Vec<u8>) {
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

        (status, body_bytes.to_vec())
    }
}
