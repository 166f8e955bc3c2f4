//! Spotify → MP3 conversion against the upstream API.
//!
//! A conversion is three upstream calls: look up the track (yields `gid`),
//! create a conversion task (yields `tid`), then poll the task until it is
//! ready, fails, or the attempt budget runs out.

mod delay;
mod orchestrator;
mod types;

pub use delay::{Delay, TokioDelay};
pub use orchestrator::ConversionOrchestrator;
pub use types::*;
