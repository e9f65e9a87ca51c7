//! HTTP client configuration
//!
//! Timeouts and identification for `HttpsClient`. TLS material is not part of
//! this configuration; it comes from a `TlsTrustConfiguration`.

use std::time::Duration;

pub mod validation;

pub use validation::{
    ConfigDefaults, ConfigResult, ConfigValidator, ConfigurationError, Validator,
};

/// Connection settings for `HttpsClient`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Deadline for establishing the TCP connection and TLS handshake
    pub connect_timeout: Duration,
    /// Deadline for receiving the complete response
    pub read_timeout: Duration,
    /// Value sent in the `User-Agent` header
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: ConfigDefaults::DEFAULT_CONNECT_TIMEOUT,
            read_timeout: ConfigDefaults::DEFAULT_READ_TIMEOUT,
            user_agent: ConfigDefaults::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Validator for HttpConfig {
    fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate_timeout(self.connect_timeout, "connect_timeout")?;
        ConfigValidator::validate_timeout(self.read_timeout, "read_timeout")?;
        ConfigValidator::validate_non_empty(&self.user_agent, "user_agent")?;
        if http::HeaderValue::from_str(&self.user_agent).is_err() {
            return Err(ConfigurationError::InvalidParameter(
                "user_agent is not a valid header value".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_ten_and_six_second_timeouts() {
        let config = HttpConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.read_timeout, Duration::from_secs(6));
        assert!(config.user_agent.starts_with("sslkit/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let config = HttpConfig::default().with_read_timeout(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidTimeout(_))
        ));

        let config = HttpConfig::default().with_user_agent("bad\nagent");
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidParameter(_))
        ));
    }
}
