//! Keystore credential builder
//!
//! Trust comes from a PEM CA certificate; the client identity comes from a
//! passphrase protected PKCS#12 container that already holds the private key
//! and its certificate chain.

use std::fmt;
use std::io::Read;

use p12_keystore::KeyStore;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use zeroize::Zeroizing;

use super::certificate::{chain_order, inspect_der};
use super::context::{TlsTrustConfiguration, assemble, trust_anchors};
use super::errors::CredentialError;
use super::stores::IdentityStore;

/// CA certificate plus PKCS#12 client keystore
pub struct KeystoreCredentials {
    ca_certificate: String,
    keystore: Zeroizing<Vec<u8>>,
    passphrase: Zeroizing<String>,
}

impl KeystoreCredentials {
    /// Credentials from CA text, keystore bytes and the keystore passphrase
    pub fn new(
        ca_certificate: impl Into<String>,
        keystore: impl Into<Vec<u8>>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            ca_certificate: ca_certificate.into(),
            keystore: Zeroizing::new(keystore.into()),
            passphrase: Zeroizing::new(passphrase.into()),
        }
    }

    /// Credentials whose keystore is read from `reader`.
    ///
    /// The reader is consumed to the end and dropped before returning, on the
    /// error path as well.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::CredentialParse` if the stream cannot be read.
    pub fn from_reader<R: Read>(
        ca_certificate: impl Into<String>,
        mut reader: R,
        passphrase: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let mut keystore = Zeroizing::new(Vec::new());
        reader
            .read_to_end(&mut keystore)
            .map_err(|e| CredentialError::parse(format!("failed to read keystore stream: {e}")))?;

        Ok(Self {
            ca_certificate: ca_certificate.into(),
            keystore,
            passphrase: Zeroizing::new(passphrase.into()),
        })
    }

    /// Build the mutual TLS trust configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the CA certificate text is empty
    /// - `CredentialParse` if the CA text is not a PEM X.509 certificate
    /// - `CredentialParse` if the keystore is not PKCS#12, the passphrase does
    ///   not unlock it, or it holds no private key entry
    /// - `ContextInit` if rustls rejects the assembled material
    pub fn build(&self) -> Result<TlsTrustConfiguration, CredentialError> {
        let (trust, ca_summary) = trust_anchors(&self.ca_certificate)?;
        let identity = self.open_identity()?;
        let config = assemble(trust, Some(identity))?;

        tracing::info!(
            "Built keystore TLS configuration trusting '{}'",
            ca_summary.subject
        );
        Ok(config)
    }

    fn open_identity(&self) -> Result<IdentityStore, CredentialError> {
        let keystore = KeyStore::from_pkcs12(&self.keystore, &self.passphrase).map_err(|e| {
            CredentialError::parse(format!(
                "keystore could not be opened (wrong passphrase or not PKCS#12): {e:?}"
            ))
        })?;

        let (alias, entry) = keystore.private_key_chain().ok_or_else(|| {
            CredentialError::parse("keystore holds no private key entry")
        })?;

        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(entry.key().to_vec()));

        // PKCS#12 bags carry no order; rebuild it from the issuer links
        let mut summaries = Vec::with_capacity(entry.chain().len());
        let mut ders = Vec::with_capacity(entry.chain().len());
        for cert in entry.chain() {
            let der = cert.as_der().to_vec();
            summaries.push(inspect_der(&der)?);
            ders.push(Some(CertificateDer::from(der)));
        }
        let chain = chain_order(&summaries)
            .into_iter()
            .filter_map(|i| ders[i].take())
            .collect::<Vec<_>>();

        tracing::debug!(
            "Opened keystore entry '{}' with {} certificate(s)",
            alias,
            chain.len()
        );
        IdentityStore::new(alias, key, chain)
    }
}

impl fmt::Debug for KeystoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreCredentials")
            .field("keystore_len", &self.keystore.len())
            .finish_non_exhaustive()
    }
}
