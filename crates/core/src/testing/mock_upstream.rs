//! Mock conversion API for testing.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::upstream::{RequestError, UpstreamClient};

/// Which endpoint a request URL targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockRoute {
    TrackInfo,
    ConvertTask,
    ConvertProgress,
}

impl MockRoute {
    /// Classify a request URL.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.contains("/spotify/get?") {
            Some(MockRoute::TrackInfo)
        } else if url.contains("/spotify/mp3-convert-task/") {
            Some(MockRoute::ConvertTask)
        } else if url.contains("/spotify/mp3-convert-progress/") {
            Some(MockRoute::ConvertProgress)
        } else {
            None
        }
    }
}

/// Mock implementation of the UpstreamClient trait.
///
/// Provides controllable behavior for testing:
/// - Canned metadata and task responses
/// - A queue of progress responses (the last one repeats once drained)
/// - Per-route failures
/// - Request recording for call-count assertions
#[derive(Debug)]
pub struct MockUpstream {
    track_info: Arc<RwLock<Option<Value>>>,
    task: Arc<RwLock<Option<Value>>>,
    progress: Arc<RwLock<VecDeque<Value>>>,
    last_progress: Arc<RwLock<Option<Value>>>,
    failures: Arc<RwLock<HashMap<MockRoute, RequestError>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl Default for MockUpstream {
    fn default() -> Self {
        Self::new()
    }
}

impl MockUpstream {
    /// Create a mock with no configured responses.
    ///
    /// Unconfigured routes answer `{}`, i.e. a payload missing every
    /// expected field.
    pub fn new() -> Self {
        Self {
            track_info: Arc::new(RwLock::new(None)),
            task: Arc::new(RwLock::new(None)),
            progress: Arc::new(RwLock::new(VecDeque::new())),
            last_progress: Arc::new(RwLock::new(None)),
            failures: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub async fn set_track_info(&self, payload: Value) {
        *self.track_info.write().await = Some(payload);
    }

    pub async fn set_task(&self, payload: Value) {
        *self.task.write().await = Some(payload);
    }

    /// Queue a progress response.
    pub async fn push_progress(&self, payload: Value) {
        self.progress.write().await.push_back(payload);
    }

    /// Queue `count` copies of a progress response.
    pub async fn push_progress_n(&self, payload: Value, count: usize) {
        let mut queue = self.progress.write().await;
        for _ in 0..count {
            queue.push_back(payload.clone());
        }
    }

    /// Make every request to `route` fail with `error`.
    pub async fn fail_route(&self, route: MockRoute, error: RequestError) {
        self.failures.write().await.insert(route, error);
    }

    /// Configure a complete happy path: metadata, task, then ready on the
    /// `ready_on`-th poll (earlier polls report status 1).
    pub async fn script_success(&self, download_path: &str, ready_on: usize) {
        use super::fixtures;

        self.set_track_info(fixtures::track_info("gid-1", "Song", "Artist", 65_000))
            .await;
        self.set_task(fixtures::task_created("tid-1")).await;
        self.push_progress_n(fixtures::progress(1), ready_on.saturating_sub(1))
            .await;
        self.push_progress(fixtures::progress_ready(download_path))
            .await;
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// All requested URLs, in order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Number of requests that hit `route`.
    pub async fn route_count(&self, route: MockRoute) -> usize {
        self.requests
            .read()
            .await
            .iter()
            .filter(|url| MockRoute::from_url(url) == Some(route))
            .count()
    }

    async fn next_progress(&self) -> Value {
        let next = self.progress.write().await.pop_front();
        match next {
            Some(payload) => {
                *self.last_progress.write().await = Some(payload.clone());
                payload
            }
            None => self
                .last_progress
                .read()
                .await
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default())),
        }
    }
}

#[async_trait]
impl UpstreamClient for MockUpstream {
    async fn fetch_json(&self, url: &str) -> Result<Value, RequestError> {
        self.requests.write().await.push(url.to_string());

        let route = MockRoute::from_url(url)
            .ok_or_else(|| RequestError::new(url, Some(404), "Not Found"))?;

        if let Some(error) = self.failures.read().await.get(&route) {
            return Err(error.clone());
        }

        let empty = || Value::Object(Default::default());
        let payload = match route {
            MockRoute::TrackInfo => self.track_info.read().await.clone().unwrap_or_else(empty),
            MockRoute::ConvertTask => self.task.read().await.clone().unwrap_or_else(empty),
            MockRoute::ConvertProgress => self.next_progress().await,
        };
        Ok(payload)
    }
}
