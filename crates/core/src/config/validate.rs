use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Upstream base URL is http(s) and the timeout is non-zero
/// - At least one progress poll is allowed
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let base_url = &config.upstream.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "upstream.base_url must be an http(s) URL, got '{}'",
            base_url
        )));
    }

    if config.upstream.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "upstream.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.polling.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "polling.max_attempts must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PollingConfig, ServerConfig, UpstreamConfig};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                port: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_non_http_base_url_fails() {
        let config = Config {
            upstream: UpstreamConfig {
                base_url: "ftp://api.example.com".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("upstream.base_url"));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let config = Config {
            upstream: UpstreamConfig {
                timeout_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_attempts_fails() {
        let config = Config {
            polling: PollingConfig {
                max_attempts: 0,
                interval_ms: 10,
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("polling.max_attempts"));
    }
}
