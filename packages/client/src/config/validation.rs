//! Configuration validation utilities
//!
//! Shared by the client's `HttpConfig` and the demo service's configuration.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid network address: {0}")]
    InvalidAddress(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration conflict: {0}")]
    Conflict(String),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` variant if any validation fails:
    /// - `InvalidTimeout` - if timeout values are zero or exceed limits
    /// - `InvalidAddress` - if network addresses are unusable
    /// - `InvalidParameter` - if a parameter is empty or malformed
    /// - `Conflict` - if settings contradict each other
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate timeout duration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidTimeout` if:
    /// - The timeout duration is zero
    /// - The timeout duration exceeds 1 hour (3600 seconds)
    pub fn validate_timeout(timeout: Duration, name: &str) -> ConfigResult<()> {
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot be zero"
            )));
        }

        if timeout.as_secs() > 3600 {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot exceed 1 hour"
            )));
        }

        Ok(())
    }

    /// Validate socket address
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidAddress` if the address is multicast
    /// or the IPv4 broadcast address. Port 0 is accepted and binds an
    /// ephemeral port.
    pub fn validate_socket_addr(addr: SocketAddr, name: &str) -> ConfigResult<()> {
        let ip = addr.ip();
        let broadcast = matches!(ip, IpAddr::V4(v4) if v4.is_broadcast());
        if ip.is_multicast() || broadcast {
            return Err(ConfigurationError::InvalidAddress(format!(
                "{name} cannot listen on {ip}"
            )));
        }

        Ok(())
    }

    /// Validate that a text parameter is not blank
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` if `value` is empty or
    /// whitespace only.
    pub fn validate_non_empty(value: &str, name: &str) -> ConfigResult<()> {
        if value.trim().is_empty() {
            return Err(ConfigurationError::InvalidParameter(format!(
                "{name} cannot be empty"
            )));
        }

        Ok(())
    }
}

/// Common configuration defaults
pub struct ConfigDefaults;

impl ConfigDefaults {
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(6);
    pub const DEFAULT_USER_AGENT: &'static str = concat!("sslkit/", env!("CARGO_PKG_VERSION"));
}
