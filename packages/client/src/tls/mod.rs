//! TLS credential builders
//!
//! Two builders turn credential material into a `TlsTrustConfiguration`:
//! `PemCredentials` (PEM CA, optional PEM client key and certificate) and
//! `KeystoreCredentials` (PEM CA plus a PKCS#12 client keystore). Both share
//! the same in-memory stores and context assembly.
//!
//! The trust-everything verifier lives in [`danger`] and is never reachable
//! from either builder.

use std::sync::Arc;

use rustls::crypto::CryptoProvider;

pub(crate) mod armor;
pub mod certificate;
mod connector;
mod context;
pub mod danger;
pub mod errors;
mod hostname;
mod keystore;
mod pem;
mod stores;

pub use certificate::{CertificateSummary, inspect_der};
pub use connector::TlsConnectionFactory;
pub use context::{PROTOCOL_VERSIONS, TlsTrustConfiguration};
pub use danger::{InsecureTlsConfig, TrustEverything};
pub use errors::CredentialError;
pub use hostname::HostnameVerification;
pub use keystore::KeystoreCredentials;
pub use self::pem::{PemCredentials, decode_rsa_private_key};
pub use stores::{CA_CERT_ALIAS, CLIENT_IDENTITY_ALIAS, IdentityStore, TrustAnchorStore};

/// Cryptographic provider used for every context, verifier and key check.
///
/// Always passed explicitly so no process-wide default has to be installed.
pub(crate) fn crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}
