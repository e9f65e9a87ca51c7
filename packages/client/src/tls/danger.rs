//! INSECURE trust-everything verifiers for debug and exploratory calls
//!
//! Nothing here is reachable from `PemCredentials` or `KeystoreCredentials`.
//! The only way to obtain a client context from this module is
//! `InsecureTlsConfig`, a type that cannot be turned into a
//! `TlsTrustConfiguration`.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::server::danger::{ClientCertVerified, ClientCertVerifier};
use rustls::{ClientConfig, DigitallySignedStruct, DistinguishedName, Error, SignatureScheme};

use super::connector::TlsConnectionFactory;
use super::context::PROTOCOL_VERSIONS;
use super::crypto_provider;
use super::errors::CredentialError;

/// Accepts every server and client certificate and names no accepted issuers.
///
/// Handshake signatures are still checked so the session keys stay bound to
/// whatever certificate the peer sent.
#[derive(Debug)]
pub struct TrustEverything {
    provider: Arc<CryptoProvider>,
}

impl TrustEverything {
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: crypto_provider(),
        }
    }
}

impl Default for TrustEverything {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerCertVerifier for TrustEverything {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, Error> {
        tracing::warn!("Trusting unverified server certificate for {:?}", server_name);
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

impl ClientCertVerifier for TrustEverything {
    fn root_hint_subjects(&self) -> &[DistinguishedName] {
        &[]
    }

    fn verify_client_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _now: UnixTime,
    ) -> Result<ClientCertVerified, Error> {
        tracing::warn!("Trusting unverified client certificate");
        Ok(ClientCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// INSECURE client context that trusts any server certificate and any host
#[derive(Debug, Clone)]
pub struct InsecureTlsConfig {
    factory: TlsConnectionFactory,
}

impl InsecureTlsConfig {
    /// Build the trust-everything client context.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::ContextInit` if rustls rejects the protocol
    /// selection.
    pub fn new() -> Result<Self, CredentialError> {
        let config = ClientConfig::builder_with_provider(crypto_provider())
            .with_protocol_versions(PROTOCOL_VERSIONS)
            .map_err(CredentialError::context)?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(TrustEverything::new()))
            .with_no_client_auth();

        tracing::warn!("Created INSECURE trust-everything TLS context");
        Ok(Self {
            factory: TlsConnectionFactory::new(Arc::new(config)),
        })
    }

    #[must_use]
    pub fn connection_factory(&self) -> TlsConnectionFactory {
        self.factory.clone()
    }
}
