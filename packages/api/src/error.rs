//! Demo service error types

use sslkit_client::LoaderError;
use sslkit_client::config::ConfigurationError;

/// Errors raised while configuring or running the demo service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid service configuration: {0}")]
    Config(#[from] ConfigurationError),

    #[error("Failed to load TLS material: {0}")]
    Loader(#[from] LoaderError),

    #[error("Server TLS setup failed: {0}")]
    Tls(String),

    #[error("Person repository failure: {0}")]
    Repository(String),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    pub(crate) fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }
}
