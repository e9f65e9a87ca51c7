//! Credential error types for detailed error handling

/// Errors raised while turning credential material into a TLS trust configuration.
///
/// Every variant is fatal to the `build` call that produced it. No builder
/// returns a partially initialised configuration.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// A required field was missing or a field combination is not allowed
    #[error("Invalid credential input: {0}")]
    InvalidInput(String),
    /// Malformed certificate, key or keystore container, or a wrong passphrase
    #[error("Credential parsing failed: {0}")]
    CredentialParse(String),
    /// The TLS library refused the decoded material while assembling the context
    #[error("TLS context initialisation failed: {0}")]
    ContextInit(String),
}

impl CredentialError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::CredentialParse(message.into())
    }

    pub(crate) fn context(err: rustls::Error) -> Self {
        Self::ContextInit(err.to_string())
    }

    /// Returns true if the caller supplied a missing or conflicting field.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns true if some credential material could not be decoded.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::CredentialParse(_))
    }
}
