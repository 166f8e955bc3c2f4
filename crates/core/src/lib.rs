pub mod config;
pub mod conversion;
pub mod metrics;
pub mod testing;
pub mod track;
pub mod upstream;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, PollingConfig,
    ServerConfig, UpstreamConfig,
};
pub use conversion::{
    format_duration, ConversionOrchestrator, ConversionOutcome, ConversionSession,
    ConversionStage, Delay, ProgressStatus, SessionState, TokioDelay, TrackMetadata,
};
pub use track::{TrackReference, ValidationError};
pub use upstream::{HttpUpstream, RequestError, UpstreamClient, UpstreamEndpoints, UpstreamSetupError};
