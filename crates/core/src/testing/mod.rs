//! Testing utilities and mock implementations.
//!
//! Lets the orchestrator and the HTTP layer be exercised without network
//! access or real poll delays.
//!
//! # Example
//!
//! ```rust,ignore
//! use spodl_core::testing::{fixtures, MockUpstream, RecordingDelay};
//!
//! let upstream = MockUpstream::new();
//! upstream.set_track_info(fixtures::track_info("g1", "Song", "Artist", 65_000)).await;
//! upstream.set_task(fixtures::task_created("t1")).await;
//! upstream.push_progress(fixtures::progress_ready("/dl/song.mp3")).await;
//! ```

mod mock_upstream;
mod recording_delay;

pub use mock_upstream::{MockRoute, MockUpstream};
pub use recording_delay::RecordingDelay;

/// Test fixtures shaped like conversion API responses.
pub mod fixtures {
    use serde_json::{json, Value};

    /// A valid track URL whose id is [`TRACK_ID`].
    pub const TRACK_URL: &str = "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC";
    pub const TRACK_ID: &str = "4uLU6hMCjMI75M1A2tKUQC";

    /// Metadata lookup response.
    pub fn track_info(gid: &str, name: &str, artists: &str, duration_ms: i64) -> Value {
        json!({
            "result": {
                "gid": gid,
                "id": TRACK_ID,
                "name": name,
                "artists": artists,
                "duration_ms": duration_ms,
                "image": "https://i.scdn.co/image/cover.jpg",
                "type": "track"
            }
        })
    }

    /// Task creation response.
    pub fn task_created(tid: &str) -> Value {
        json!({ "result": { "tid": tid, "status": 0 } })
    }

    /// Progress response with an in-flight or failed status.
    pub fn progress(status: i64) -> Value {
        json!({ "result": { "status": status } })
    }

    /// Progress response for a finished conversion.
    pub fn progress_ready(download_path: &str) -> Value {
        json!({ "result": { "status": 3, "download_url": download_path } })
    }
}
