//! Demo service configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use sslkit_client::config::{ConfigResult, ConfigValidator, ConfigurationError, Validator};

/// Base path the person routes are mounted under
pub const DEFAULT_BASE_PATH: &str = "/demo/bootswagger/person";

/// Where and how the demo service listens.
///
/// TLS material is named by resource names resolved through a
/// `ResourceLoader`, so relative names follow the loader's root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub base_path: String,
    pub server_cert: String,
    pub server_key: String,
    pub client_ca: Option<String>,
    /// Demand a client certificate issued by `client_ca`
    pub require_client_auth: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8443),
            base_path: DEFAULT_BASE_PATH.to_string(),
            server_cert: "server.pem".to_string(),
            server_key: "server.key".to_string(),
            client_ca: None,
            require_client_auth: false,
        }
    }
}

impl ServiceConfig {
    #[must_use]
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    #[must_use]
    pub fn with_server_identity(mut self, cert: impl Into<String>, key: impl Into<String>) -> Self {
        self.server_cert = cert.into();
        self.server_key = key.into();
        self
    }

    /// Require client certificates issued by `client_ca`
    #[must_use]
    pub fn with_client_auth(mut self, client_ca: impl Into<String>) -> Self {
        self.client_ca = Some(client_ca.into());
        self.require_client_auth = true;
        self
    }

    /// Client CA used during the handshake, `None` for one-way TLS
    #[must_use]
    pub fn handshake_client_ca(&self) -> Option<&str> {
        if self.require_client_auth {
            self.client_ca.as_deref()
        } else {
            None
        }
    }
}

impl Validator for ServiceConfig {
    fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate_socket_addr(self.bind_addr, "bind_addr")?;

        if !self.base_path.starts_with('/') {
            return Err(ConfigurationError::InvalidParameter(format!(
                "base_path must start with '/': {}",
                self.base_path
            )));
        }

        match (self.server_cert.trim().is_empty(), self.server_key.trim().is_empty()) {
            (false, false) => {}
            (true, true) => {
                return Err(ConfigurationError::InvalidParameter(
                    "server certificate and key are required".to_string(),
                ));
            }
            _ => {
                return Err(ConfigurationError::Conflict(
                    "server certificate and key must be supplied together".to_string(),
                ));
            }
        }

        if self.require_client_auth {
            match &self.client_ca {
                Some(ca) => ConfigValidator::validate_non_empty(ca, "client_ca")?,
                None => {
                    return Err(ConfigurationError::Conflict(
                        "client authentication requires a client CA".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}
