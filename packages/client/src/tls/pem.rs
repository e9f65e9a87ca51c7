//! PEM credential builder
//!
//! Trust comes from a PEM CA certificate. A client identity is optional and,
//! when used, arrives as an unencrypted PKCS#8 RSA private key plus its PEM
//! certificate. Key and certificate must be supplied together or not at all.

use std::fmt;

use pkcs8::{ObjectIdentifier, PrivateKeyInfo};
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use zeroize::Zeroizing;

use super::armor::{PRIVATE_KEY_LABEL, decode_armored};
use super::certificate::decode_certificate;
use super::context::{TlsTrustConfiguration, assemble, trust_anchors};
use super::errors::CredentialError;
use super::stores::{CLIENT_IDENTITY_ALIAS, IdentityStore};

/// rsaEncryption (PKCS#1)
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// CA certificate plus optional PEM client key and certificate
#[derive(Clone)]
pub struct PemCredentials {
    ca_certificate: String,
    private_key: Option<Zeroizing<String>>,
    client_certificate: Option<String>,
}

impl PemCredentials {
    /// One-way credentials trusting `ca_certificate`
    pub fn new(ca_certificate: impl Into<String>) -> Self {
        Self {
            ca_certificate: ca_certificate.into(),
            private_key: None,
            client_certificate: None,
        }
    }

    /// Credentials from optional parts, as read from configuration
    pub fn from_parts(
        ca_certificate: impl Into<String>,
        private_key: Option<String>,
        client_certificate: Option<String>,
    ) -> Self {
        Self {
            ca_certificate: ca_certificate.into(),
            private_key: private_key.map(Zeroizing::new),
            client_certificate,
        }
    }

    /// Add a client identity for mutual TLS
    #[must_use]
    pub fn with_client_identity(
        mut self,
        private_key: impl Into<String>,
        client_certificate: impl Into<String>,
    ) -> Self {
        self.private_key = Some(Zeroizing::new(private_key.into()));
        self.client_certificate = Some(client_certificate.into());
        self
    }

    /// Build the trust configuration; mutual when an identity was supplied.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the CA text is empty, or exactly one of key and
    ///   client certificate is supplied
    /// - `CredentialParse` if any certificate is not X.509, or the key is not
    ///   unencrypted PKCS#8 RSA material
    /// - `ContextInit` if rustls rejects the assembled material
    pub fn build(&self) -> Result<TlsTrustConfiguration, CredentialError> {
        let (trust, ca_summary) = trust_anchors(&self.ca_certificate)?;
        let identity = self.client_identity()?;
        let mutual = identity.is_some();
        let config = assemble(trust, identity)?;

        tracing::info!(
            "Built PEM TLS configuration trusting '{}' ({})",
            ca_summary.subject,
            if mutual { "two-way" } else { "one-way" }
        );
        Ok(config)
    }

    fn client_identity(&self) -> Result<Option<IdentityStore>, CredentialError> {
        let key = present(self.private_key.as_deref().map(String::as_str));
        let cert = present(self.client_certificate.as_deref());

        match (key, cert) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(CredentialError::invalid_input(
                "client private key supplied without a client certificate",
            )),
            (None, Some(_)) => Err(CredentialError::invalid_input(
                "client certificate supplied without a client private key",
            )),
            (Some(key), Some(cert)) => {
                let key = decode_rsa_private_key(key)?;
                let (cert, summary) = decode_certificate(cert)?;
                tracing::debug!("Using client certificate '{}'", summary.subject);
                IdentityStore::new(CLIENT_IDENTITY_ALIAS, key, vec![cert]).map(Some)
            }
        }
    }
}

impl fmt::Debug for PemCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PemCredentials")
            .field("client_identity", &self.private_key.is_some())
            .finish_non_exhaustive()
    }
}

/// Decode armored, unencrypted PKCS#8 RSA key text.
///
/// # Errors
///
/// Returns `CredentialError::CredentialParse` if the text is not a PKCS#8
/// `PRIVATE KEY` block or the algorithm is not RSA.
pub fn decode_rsa_private_key(text: &str) -> Result<PrivateKeyDer<'static>, CredentialError> {
    let der = Zeroizing::new(decode_armored(text, PRIVATE_KEY_LABEL)?);

    let info = PrivateKeyInfo::try_from(der.as_slice()).map_err(|e| {
        CredentialError::parse(format!("private key is not unencrypted PKCS#8: {e}"))
    })?;

    if info.algorithm.oid != RSA_ENCRYPTION {
        return Err(CredentialError::parse(format!(
            "expected an RSA private key, found algorithm {}",
            info.algorithm.oid
        )));
    }

    Ok(PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(der.to_vec())))
}

fn present(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
