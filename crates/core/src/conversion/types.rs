use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::track::ValidationError;

/// Progress status meaning the MP3 is ready.
pub const STATUS_READY: i64 = 3;
/// Progress status meaning the conversion failed.
pub const STATUS_FAILED: i64 = 4;

/// Placeholder for missing title/artist.
pub const UNKNOWN: &str = "Unknown";

/// Upstream step a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversionStage {
    Metadata,
    TaskCreation,
    Conversion,
}

impl ConversionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStage::Metadata => "metadata",
            ConversionStage::TaskCreation => "task-creation",
            ConversionStage::Conversion => "conversion",
        }
    }
}

impl std::fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Track details from the metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    /// `m:ss`
    pub duration: String,
    pub thumbnail: Option<String>,
}

impl TrackMetadata {
    /// Build from the `result` object of a metadata response.
    pub fn from_track_info(result: &Value) -> Self {
        let title = non_empty_str(result.get("name"))
            .unwrap_or(UNKNOWN)
            .to_string();

        let artist = match result.get("artists") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Array(items)) => {
                let names: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                if names.is_empty() {
                    UNKNOWN.to_string()
                } else {
                    names.join(", ")
                }
            }
            _ => UNKNOWN.to_string(),
        };

        let duration_ms = result
            .get("duration_ms")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)));

        Self {
            title,
            artist,
            duration: format_duration(duration_ms),
            thumbnail: non_empty_str(result.get("image")).map(str::to_string),
        }
    }
}

/// Format milliseconds as `minutes:seconds`.
///
/// Missing, zero, or negative durations render as `"0:00"`.
pub fn format_duration(ms: Option<i64>) -> String {
    match ms {
        Some(ms) if ms > 0 => {
            let total_seconds = ms / 1000;
            format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
        }
        _ => "0:00".to_string(),
    }
}

/// Interpretation of a progress response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressStatus {
    Ready { download_path: String },
    Failed,
    /// Still converting, or a status we don't recognize.
    Pending { status: Option<i64> },
}

impl ProgressStatus {
    pub fn from_payload(payload: &Value) -> Self {
        let status = result_field(payload, "status").and_then(integral);
        match status {
            Some(STATUS_READY) => match non_empty_str(result_field(payload, "download_url")) {
                Some(path) => ProgressStatus::Ready {
                    download_path: path.to_string(),
                },
                None => ProgressStatus::Pending { status },
            },
            Some(STATUS_FAILED) => ProgressStatus::Failed,
            _ => ProgressStatus::Pending { status },
        }
    }
}

/// Result of one conversion request.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Success {
        metadata: TrackMetadata,
        download_url: String,
    },
    /// The upstream answered but without the expected fields, or reported
    /// the conversion as failed. `payload` is the raw response.
    UpstreamFailure {
        stage: ConversionStage,
        payload: Value,
    },
    /// No terminal status after `attempts` progress polls.
    Timeout { attempts: u32 },
    Invalid(ValidationError),
}

impl ConversionOutcome {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionOutcome::Success { .. } => "success",
            ConversionOutcome::UpstreamFailure { .. } => "upstream_failure",
            ConversionOutcome::Timeout { .. } => "timeout",
            ConversionOutcome::Invalid(_) => "invalid",
        }
    }
}

/// Orchestrator state for a single conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Start,
    MetadataFetched,
    TaskCreated,
    Polling,
    Succeeded,
    Failed,
    TimedOut,
}

/// Per-request conversion state. Never shared between requests.
#[derive(Debug, Clone)]
pub struct ConversionSession {
    id: Uuid,
    state: SessionState,
    gid: Option<String>,
    tid: Option<String>,
    attempts: u32,
    download_url: Option<String>,
}

impl Default for ConversionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Start,
            gid: None,
            tid: None,
            attempts: 0,
            download_url: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn gid(&self) -> Option<&str> {
        self.gid.as_deref()
    }

    pub fn tid(&self) -> Option<&str> {
        self.tid.as_deref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    pub(crate) fn advance(&mut self, next: SessionState) {
        tracing::debug!(
            session = %self.id,
            "Session state {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    pub(crate) fn set_gid(&mut self, gid: String) {
        self.gid = Some(gid);
        self.advance(SessionState::MetadataFetched);
    }

    pub(crate) fn set_tid(&mut self, tid: String) {
        self.tid = Some(tid);
        self.advance(SessionState::TaskCreated);
    }

    pub(crate) fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    pub(crate) fn succeed(&mut self, download_url: String) {
        self.download_url = Some(download_url);
        self.advance(SessionState::Succeeded);
    }
}

/// `payload.result.<key>`
pub(crate) fn result_field<'a>(payload: &'a Value, key: &str) -> Option<&'a Value> {
    payload.get("result")?.get(key)
}

/// An upstream identifier: a non-empty string or a non-zero number.
pub(crate) fn id_field(payload: &Value, key: &str) -> Option<String> {
    match result_field(payload, key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        value @ Value::Number(n) if n.as_f64() != Some(0.0) => {
            Some(integral(value).map_or_else(|| n.to_string(), |i| i.to_string()))
        }
        _ => None,
    }
}

/// A JSON number with no fractional part, whether written `3` or `3.0`.
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_duration_non_positive() {
        assert_eq!(format_duration(Some(0)), "0:00");
        assert_eq!(format_duration(Some(-5)), "0:00");
        assert_eq!(format_duration(None), "0:00");
    }

    #[test]
    fn test_format_duration_values() {
        assert_eq!(format_duration(Some(65_000)), "1:05");
        assert_eq!(format_duration(Some(3_600_000)), "60:00");
        assert_eq!(format_duration(Some(999)), "0:00");
        assert_eq!(format_duration(Some(213_573)), "3:33");
    }

    #[test]
    fn test_metadata_from_full_result() {
        let result = json!({
            "gid": 1,
            "name": "Blinding Lights",
            "artists": "The Weeknd",
            "duration_ms": 200040,
            "image": "https://i.scdn.co/image/abc"
        });
        let metadata = TrackMetadata::from_track_info(&result);
        assert_eq!(metadata.title, "Blinding Lights");
        assert_eq!(metadata.artist, "The Weeknd");
        assert_eq!(metadata.duration, "3:20");
        assert_eq!(metadata.thumbnail.as_deref(), Some("https://i.scdn.co/image/abc"));
    }

    #[test]
    fn test_metadata_defaults() {
        let metadata = TrackMetadata::from_track_info(&json!({ "name": "" }));
        assert_eq!(metadata.title, UNKNOWN);
        assert_eq!(metadata.artist, UNKNOWN);
        assert_eq!(metadata.duration, "0:00");
        assert_eq!(metadata.thumbnail, None);
    }

    #[test]
    fn test_metadata_artist_array_and_float_duration() {
        let result = json!({
            "artists": ["A", "B"],
            "duration_ms": 65000.7
        });
        let metadata = TrackMetadata::from_track_info(&result);
        assert_eq!(metadata.artist, "A, B");
        assert_eq!(metadata.duration, "1:05");
    }

    #[test]
    fn test_progress_status_ready() {
        let payload = json!({ "result": { "status": 3, "download_url": "/x/y.mp3" } });
        assert_eq!(
            ProgressStatus::from_payload(&payload),
            ProgressStatus::Ready {
                download_path: "/x/y.mp3".to_string()
            }
        );
    }

    #[test]
    fn test_progress_status_ready_without_url_is_pending() {
        let payload = json!({ "result": { "status": 3, "download_url": "" } });
        assert_eq!(
            ProgressStatus::from_payload(&payload),
            ProgressStatus::Pending { status: Some(3) }
        );
    }

    #[test]
    fn test_progress_status_failed_and_pending() {
        assert_eq!(
            ProgressStatus::from_payload(&json!({ "result": { "status": 4 } })),
            ProgressStatus::Failed
        );
        assert_eq!(
            ProgressStatus::from_payload(&json!({ "result": { "status": 1 } })),
            ProgressStatus::Pending { status: Some(1) }
        );
        assert_eq!(
            ProgressStatus::from_payload(&json!({ "error": "busy" })),
            ProgressStatus::Pending { status: None }
        );
    }

    #[test]
    fn test_progress_status_accepts_integral_floats() {
        let payload = json!({ "result": { "status": 3.0, "download_url": "/a.mp3" } });
        assert_eq!(
            ProgressStatus::from_payload(&payload),
            ProgressStatus::Ready {
                download_path: "/a.mp3".to_string()
            }
        );
        assert_eq!(
            ProgressStatus::from_payload(&json!({ "result": { "status": 4.0 } })),
            ProgressStatus::Failed
        );
        assert_eq!(
            ProgressStatus::from_payload(&json!({ "result": { "status": 3.5 } })),
            ProgressStatus::Pending { status: None }
        );
    }

    #[test]
    fn test_id_field_renders_integral_floats_without_fraction() {
        assert_eq!(
            id_field(&json!({ "result": { "gid": 42.0 } }), "gid").as_deref(),
            Some("42")
        );
        assert_eq!(id_field(&json!({ "result": { "gid": 0.0 } }), "gid"), None);
    }

    #[test]
    fn test_id_field() {
        assert_eq!(
            id_field(&json!({ "result": { "gid": 123 } }), "gid").as_deref(),
            Some("123")
        );
        assert_eq!(
            id_field(&json!({ "result": { "tid": "abc" } }), "tid").as_deref(),
            Some("abc")
        );
        assert_eq!(id_field(&json!({ "result": { "gid": 0 } }), "gid"), None);
        assert_eq!(id_field(&json!({ "result": { "gid": "" } }), "gid"), None);
        assert_eq!(id_field(&json!({ "result": null }), "gid"), None);
        assert_eq!(id_field(&json!({}), "gid"), None);
    }

    #[test]
    fn test_stage_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(ConversionStage::TaskCreation).unwrap(),
            json!("task-creation")
        );
        assert_eq!(ConversionStage::Metadata.to_string(), "metadata");
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = ConversionSession::new();
        assert_eq!(session.state(), SessionState::Start);

        session.set_gid("g".to_string());
        assert_eq!(session.state(), SessionState::MetadataFetched);
        session.set_tid("t".to_string());
        assert_eq!(session.state(), SessionState::TaskCreated);

        session.advance(SessionState::Polling);
        session.record_attempt();
        session.record_attempt();
        session.succeed("https://api/x.mp3".to_string());

        assert_eq!(session.gid(), Some("g"));
        assert_eq!(session.tid(), Some("t"));
        assert_eq!(session.attempts(), 2);
        assert_eq!(session.download_url(), Some("https://api/x.mp3"));
        assert_eq!(session.state(), SessionState::Succeeded);
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(ConversionSession::new().id(), ConversionSession::new().id());
    }
}
