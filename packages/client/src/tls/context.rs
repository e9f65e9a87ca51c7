//! TLS context assembly shared by both credential builders
//!
//! `assemble` turns a trust anchor store and an optional identity store into an
//! immutable `TlsTrustConfiguration`. The presence of an identity decides
//! between one-way and mutual TLS; nothing else differs.

use std::fmt;
use std::sync::Arc;

use rustls::client::danger::ServerCertVerifier;
use rustls::client::{WantsClientCert, WebPkiServerVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, ConfigBuilder, SupportedProtocolVersion};

use super::certificate::{CertificateSummary, decode_certificate};
use super::connector::TlsConnectionFactory;
use super::crypto_provider;
use super::errors::CredentialError;
use super::hostname::{HostnameVerification, NameAgnosticVerifier};
use super::stores::{CA_CERT_ALIAS, IdentityStore, TrustAnchorStore};

/// Fixed protocol selection offered by every assembled context
pub const PROTOCOL_VERSIONS: &[&SupportedProtocolVersion] = rustls::DEFAULT_VERSIONS;

/// Assembled trust material: a connection factory and the peer verifier
///
/// Immutable once built. Cloning shares the underlying contexts.
#[derive(Clone)]
pub struct TlsTrustConfiguration {
    strict: TlsConnectionFactory,
    hostname_agnostic: TlsConnectionFactory,
    peer_verifier: Arc<WebPkiServerVerifier>,
    identity_leaf: Option<CertificateDer<'static>>,
    trust_anchor_count: usize,
}

impl TlsTrustConfiguration {
    /// Connection factory verifying chain and hostname
    #[must_use]
    pub fn connection_factory(&self) -> TlsConnectionFactory {
        self.strict.clone()
    }

    /// Connection factory for the given hostname policy
    #[must_use]
    pub fn connection_factory_for(&self, policy: HostnameVerification) -> TlsConnectionFactory {
        match policy {
            HostnameVerification::Strict => self.strict.clone(),
            HostnameVerification::AcceptAll => self.hostname_agnostic.clone(),
        }
    }

    /// Peer-certificate verifier built from the trust anchors
    #[must_use]
    pub fn peer_verifier(&self) -> Arc<WebPkiServerVerifier> {
        Arc::clone(&self.peer_verifier)
    }

    /// Verify a peer chain for `host` against the trust anchors, now.
    ///
    /// # Errors
    ///
    /// Returns the rustls verification error, or `rustls::Error::General` when
    /// `host` is not a valid server name.
    pub fn verify_peer(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        host: &str,
    ) -> Result<(), rustls::Error> {
        let server_name = ServerName::try_from(host)
            .map_err(|e| rustls::Error::General(format!("Invalid server name {host}: {e}")))?;

        self.peer_verifier
            .verify_server_cert(end_entity, intermediates, &server_name, &[], UnixTime::now())
            .map(|_| ())
    }

    /// Whether a client identity was assembled (mutual TLS)
    #[must_use]
    pub fn identity_present(&self) -> bool {
        self.identity_leaf.is_some()
    }

    /// Leaf certificate presented as client identity
    #[must_use]
    pub fn identity_certificate(&self) -> Option<&CertificateDer<'static>> {
        self.identity_leaf.as_ref()
    }

    #[must_use]
    pub fn trust_anchor_count(&self) -> usize {
        self.trust_anchor_count
    }
}

impl fmt::Debug for TlsTrustConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsTrustConfiguration")
            .field("trust_anchor_count", &self.trust_anchor_count)
            .field("identity_present", &self.identity_present())
            .finish_non_exhaustive()
    }
}

/// Trust anchor store holding the CA certificate read from `ca_text`.
///
/// The one CA decoding path of both credential builders.
pub(crate) fn trust_anchors(
    ca_text: &str,
) -> Result<(TrustAnchorStore, CertificateSummary), CredentialError> {
    if ca_text.trim().is_empty() {
        return Err(CredentialError::invalid_input("CA certificate must not be empty"));
    }

    let (ca_cert, summary) = decode_certificate(ca_text)?;
    let mut trust = TrustAnchorStore::new();
    trust.insert(CA_CERT_ALIAS, ca_cert);
    Ok((trust, summary))
}

/// Combine the stores into a protocol context.
///
/// Consumes both stores; they do not outlive the call.
pub(crate) fn assemble(
    trust: TrustAnchorStore,
    identity: Option<IdentityStore>,
) -> Result<TlsTrustConfiguration, CredentialError> {
    let provider = crypto_provider();
    let roots = Arc::new(trust.root_store()?);

    let peer_verifier = WebPkiServerVerifier::builder_with_provider(roots, Arc::clone(&provider))
        .build()
        .map_err(|e| CredentialError::ContextInit(e.to_string()))?;

    let strict = ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_protocol_versions(PROTOCOL_VERSIONS)
        .map_err(CredentialError::context)?
        .with_webpki_verifier(Arc::clone(&peer_verifier));

    let agnostic: Arc<dyn ServerCertVerifier> =
        Arc::new(NameAgnosticVerifier::new(Arc::clone(&peer_verifier)));
    let hostname_agnostic = ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(PROTOCOL_VERSIONS)
        .map_err(CredentialError::context)?
        .dangerous()
        .with_custom_certificate_verifier(agnostic);

    let strict = with_identity(strict, identity.as_ref())?;
    let hostname_agnostic = with_identity(hostname_agnostic, identity.as_ref())?;

    tracing::debug!(
        "Assembled TLS context with {} trust anchor(s), client identity: {}",
        trust.len(),
        identity.as_ref().map_or("none", IdentityStore::alias)
    );

    Ok(TlsTrustConfiguration {
        strict: TlsConnectionFactory::new(Arc::new(strict)),
        hostname_agnostic: TlsConnectionFactory::new(Arc::new(hostname_agnostic)),
        peer_verifier,
        identity_leaf: identity.map(|identity| identity.leaf().clone()),
        trust_anchor_count: trust.len(),
    })
}

fn with_identity(
    builder: ConfigBuilder<ClientConfig, WantsClientCert>,
    identity: Option<&IdentityStore>,
) -> Result<ClientConfig, CredentialError> {
    match identity {
        Some(identity) => builder
            .with_client_auth_cert(identity.chain().to_vec(), identity.key().clone_key())
            .map_err(CredentialError::context),
        None => Ok(builder.with_no_client_auth()),
    }
}
