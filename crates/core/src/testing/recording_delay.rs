use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::conversion::Delay;

/// A [`Delay`] that returns immediately and records what it was asked to wait.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    sleeps: Arc<RwLock<Vec<Duration>>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.sleeps.read().await.len()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.write().await.push(duration);
    }
}
