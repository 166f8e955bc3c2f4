//! Conversion state machine.
//!
//! `Start → MetadataFetched → TaskCreated → Polling → {Succeeded | Failed | TimedOut}`

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::delay::{Delay, TokioDelay};
use super::types::{
    id_field, ConversionOutcome, ConversionSession, ConversionStage, ProgressStatus,
    SessionState, TrackMetadata,
};
use crate::config::PollingConfig;
use crate::metrics::{CONVERSIONS_TOTAL, POLL_ATTEMPTS, UPSTREAM_REQUESTS_TOTAL};
use crate::track::TrackReference;
use crate::upstream::{RequestError, UpstreamClient, UpstreamEndpoints};

/// Drives one conversion per call. Holds no per-request state, so a single
/// instance is shared by all requests.
pub struct ConversionOrchestrator {
    upstream: Arc<dyn UpstreamClient>,
    endpoints: UpstreamEndpoints,
    polling: PollingConfig,
    delay: Arc<dyn Delay>,
}

impl ConversionOrchestrator {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        endpoints: UpstreamEndpoints,
        polling: PollingConfig,
    ) -> Self {
        Self {
            upstream,
            endpoints,
            polling,
            delay: Arc::new(TokioDelay),
        }
    }

    /// Replace the inter-poll delay (tests use a recording no-op).
    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    /// Validate a raw `url` value and convert it.
    ///
    /// Invalid input yields [`ConversionOutcome::Invalid`] without any
    /// upstream call.
    pub async fn convert_url(&self, raw: Option<&str>) -> Result<ConversionOutcome, RequestError> {
        match TrackReference::parse(raw) {
            Ok(track) => self.convert(&track).await,
            Err(e) => {
                debug!("Rejected track URL {:?}: {}", raw, e);
                CONVERSIONS_TOTAL.with_label_values(&["invalid"]).inc();
                Ok(ConversionOutcome::Invalid(e))
            }
        }
    }

    /// Run the full conversion for a validated track.
    ///
    /// A [`RequestError`] from any upstream call aborts the conversion.
    pub async fn convert(&self, track: &TrackReference) -> Result<ConversionOutcome, RequestError> {
        let mut session = ConversionSession::new();
        info!(
            session = %session.id(),
            track_id = track.track_id(),
            "Starting conversion"
        );

        let result = self.run(&mut session, track).await;

        match &result {
            Ok(outcome) => {
                CONVERSIONS_TOTAL.with_label_values(&[outcome.kind()]).inc();
                info!(
                    session = %session.id(),
                    attempts = session.attempts(),
                    "Conversion finished: {}",
                    outcome.kind()
                );
            }
            Err(e) => {
                CONVERSIONS_TOTAL.with_label_values(&["error"]).inc();
                warn!(
                    session = %session.id(),
                    state = ?session.state(),
                    "Conversion aborted: {}",
                    e
                );
            }
        }
        if session.attempts() > 0 {
            POLL_ATTEMPTS.observe(session.attempts() as f64);
        }

        result
    }

    async fn run(
        &self,
        session: &mut ConversionSession,
        track: &TrackReference,
    ) -> Result<ConversionOutcome, RequestError> {
        let info = self
            .fetch(ConversionStage::Metadata, &self.endpoints.track_info(track.url()))
            .await?;
        let Some(gid) = id_field(&info, "gid") else {
            return Ok(self.fail(session, ConversionStage::Metadata, info));
        };
        let metadata = TrackMetadata::from_track_info(info.get("result").unwrap_or(&Value::Null));
        let task_url = self.endpoints.convert_task(&gid, track.track_id());
        session.set_gid(gid);

        let task = self.fetch(ConversionStage::TaskCreation, &task_url).await?;
        let Some(tid) = id_field(&task, "tid") else {
            return Ok(self.fail(session, ConversionStage::TaskCreation, task));
        };
        let progress_url = self.endpoints.convert_progress(&tid);
        session.set_tid(tid);

        self.poll(session, metadata, &progress_url).await
    }

    async fn poll(
        &self,
        session: &mut ConversionSession,
        metadata: TrackMetadata,
        progress_url: &str,
    ) -> Result<ConversionOutcome, RequestError> {
        session.advance(SessionState::Polling);
        let max_attempts = self.polling.max_attempts;

        while session.attempts() < max_attempts {
            session.record_attempt();
            let progress = self.fetch(ConversionStage::Conversion, progress_url).await?;

            match ProgressStatus::from_payload(&progress) {
                ProgressStatus::Ready { download_path } => {
                    let download_url = self.endpoints.download_url(&download_path);
                    session.succeed(download_url.clone());
                    return Ok(ConversionOutcome::Success {
                        metadata,
                        download_url,
                    });
                }
                ProgressStatus::Failed => {
                    return Ok(self.fail(session, ConversionStage::Conversion, progress));
                }
                ProgressStatus::Pending { status } => {
                    debug!(
                        session = %session.id(),
                        "Poll {}/{}: status {:?}",
                        session.attempts(),
                        max_attempts,
                        status
                    );
                }
            }

            if session.attempts() < max_attempts {
                self.delay.sleep(self.polling.interval()).await;
            }
        }

        session.advance(SessionState::TimedOut);
        Ok(ConversionOutcome::Timeout {
            attempts: session.attempts(),
        })
    }

    async fn fetch(&self, stage: ConversionStage, url: &str) -> Result<Value, RequestError> {
        let result = self.upstream.fetch_json(url).await;
        let label = if result.is_ok() { "ok" } else { "error" };
        UPSTREAM_REQUESTS_TOTAL
            .with_label_values(&[stage.as_str(), label])
            .inc();
        result
    }

    fn fail(
        &self,
        session: &mut ConversionSession,
        stage: ConversionStage,
        payload: Value,
    ) -> ConversionOutcome {
        warn!(session = %session.id(), "Upstream failure at stage {}", stage);
        session.advance(SessionState::Failed);
        ConversionOutcome::UpstreamFailure { stage, payload }
    }
}
