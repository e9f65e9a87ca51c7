//! In-memory trust anchor and identity stores
//!
//! Both stores are created fresh by a builder, handed to the context assembler
//! and dropped once the TLS configuration has been produced.

use std::collections::BTreeMap;
use std::fmt;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::sign::CertifiedKey;
use rustls::{InconsistentKeys, RootCertStore};

use super::crypto_provider;
use super::errors::CredentialError;

/// Alias under which the CA certificate is stored
pub const CA_CERT_ALIAS: &str = "ca-cert";

/// Alias under which a PEM client identity is stored
pub const CLIENT_IDENTITY_ALIAS: &str = "client-identity";

/// Trusted root certificates keyed by alias
#[derive(Debug, Clone, Default)]
pub struct TrustAnchorStore {
    anchors: BTreeMap<String, CertificateDer<'static>>,
}

impl TrustAnchorStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `cert` under `alias`, replacing any previous entry.
    pub fn insert(&mut self, alias: &str, cert: CertificateDer<'static>) {
        tracing::debug!("Adding trust anchor '{}'", alias);
        self.anchors.insert(alias.to_string(), cert);
    }

    /// Certificate stored under `alias`
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&CertificateDer<'static>> {
        self.anchors.get(alias)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Convert into a rustls root store.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::CredentialParse` if a certificate cannot serve
    /// as a trust anchor, and `CredentialError::InvalidInput` if the store is
    /// empty.
    pub(crate) fn root_store(&self) -> Result<RootCertStore, CredentialError> {
        if self.anchors.is_empty() {
            return Err(CredentialError::invalid_input(
                "trust anchor store holds no certificates",
            ));
        }

        let mut roots = RootCertStore::empty();
        for (alias, cert) in &self.anchors {
            roots.add(cert.clone()).map_err(|e| {
                CredentialError::parse(format!(
                    "certificate '{alias}' cannot act as a trust anchor: {e}"
                ))
            })?;
        }
        Ok(roots)
    }
}

/// Private key plus certificate chain presented during mutual TLS
pub struct IdentityStore {
    alias: String,
    key: PrivateKeyDer<'static>,
    chain: Vec<CertificateDer<'static>>,
}

impl IdentityStore {
    /// Bind `key` to `chain` (leaf first) under `alias`.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::CredentialParse` if the chain is empty, the
    /// key cannot be loaded as a signing key, or the key does not belong to
    /// the leaf certificate.
    pub fn new(
        alias: &str,
        key: PrivateKeyDer<'static>,
        chain: Vec<CertificateDer<'static>>,
    ) -> Result<Self, CredentialError> {
        if chain.is_empty() {
            return Err(CredentialError::parse(format!(
                "identity '{alias}' has no certificate chain"
            )));
        }

        let signing_key = crypto_provider()
            .key_provider
            .load_private_key(key.clone_key())
            .map_err(|e| {
                CredentialError::parse(format!("identity '{alias}' has an unusable private key: {e}"))
            })?;

        match CertifiedKey::new(chain.clone(), signing_key).keys_match() {
            Ok(()) | Err(rustls::Error::InconsistentKeys(InconsistentKeys::Unknown)) => {}
            Err(e) => {
                return Err(CredentialError::parse(format!(
                    "identity '{alias}' private key does not match its certificate: {e}"
                )));
            }
        }

        Ok(Self {
            alias: alias.to_string(),
            key,
            chain,
        })
    }

    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Certificate chain, leaf first
    #[must_use]
    pub fn chain(&self) -> &[CertificateDer<'static>] {
        &self.chain
    }

    /// End-entity certificate presented to the peer
    #[must_use]
    pub fn leaf(&self) -> &CertificateDer<'static> {
        // `new` rejects empty chains
        &self.chain[0]
    }

    pub(crate) fn key(&self) -> &PrivateKeyDer<'static> {
        &self.key
    }
}

impl fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityStore")
            .field("alias", &self.alias)
            .field("chain_len", &self.chain.len())
            .finish_non_exhaustive()
    }
}
