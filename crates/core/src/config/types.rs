use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    3000
}

/// Conversion API the relay talks to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// API origin (e.g., "https://api.fabdl.com"). Download paths returned by
    /// the progress endpoint are relative to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_accept")]
    pub accept: String,
    /// Origin header identifying the calling site.
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds (default: 60)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            accept: default_accept(),
            origin: default_origin(),
            referer: default_referer(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.fabdl.com".to_string()
}

fn default_accept() -> String {
    "application/json, text/plain, */*".to_string()
}

fn default_origin() -> String {
    "https://spodownloader.com".to_string()
}

fn default_referer() -> String {
    "https://spodownloader.com/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36".to_string()
}

fn default_timeout() -> u64 {
    60
}

/// Progress polling for a conversion task.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Maximum number of progress requests before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay between progress requests (milliseconds).
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval(),
        }
    }
}

fn default_max_attempts() -> u32 {
    15
}

fn default_interval() -> u64 {
    5000 // 5 seconds
}
