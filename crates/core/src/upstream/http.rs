//! reqwest implementation of [`UpstreamClient`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{RequestError, UpstreamClient, UpstreamSetupError};
use crate::config::UpstreamConfig;

/// HTTP client sending the browser-like header set the conversion API expects.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamSetupError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value("Accept", &config.accept)?);
        headers.insert(ORIGIN, header_value("Origin", &config.origin)?);
        headers.insert(REFERER, header_value("Referer", &config.referer)?);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client })
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, UpstreamSetupError> {
    HeaderValue::from_str(value).map_err(|source| UpstreamSetupError::InvalidHeader { name, source })
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn fetch_json(&self, url: &str) -> Result<Value, RequestError> {
        debug!("Upstream GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RequestError::from_reqwest(url, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            RequestError::new(url, Some(status), format!("Failed to read body: {}", e))
        })?;

        // A 2xx body that is not JSON is passed on as a string payload.
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            debug!("Upstream body from {} is not JSON: {}", url, e);
            Value::String(body)
        }))
    }
}
