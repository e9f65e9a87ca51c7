//! Server-side TLS configuration

use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};
use sslkit_client::ResourceLoader;

use super::config::ServiceConfig;
use crate::error::ServiceError;

fn crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

/// Build a rustls server configuration from PEM text.
///
/// Without `client_ca_pem` the server runs one-way TLS. With it, every client
/// must present a certificate chaining to one of the CA certificates.
///
/// # Errors
///
/// Returns `ServiceError::Tls` if the certificate, key or CA text holds no
/// usable PEM material, or rustls rejects the combination.
pub fn server_tls_config(
    server_cert_pem: &str,
    server_key_pem: &str,
    client_ca_pem: Option<&str>,
) -> Result<ServerConfig, ServiceError> {
    let chain = read_certificates(server_cert_pem, "server certificate")?;
    let key = read_private_key(server_key_pem)?;
    let provider = crypto_provider();

    let builder = ServerConfig::builder_with_provider(provider.clone())
        .with_protocol_versions(rustls::DEFAULT_VERSIONS)
        .map_err(|e| ServiceError::tls(format!("unsupported protocol versions: {e}")))?;

    let builder = match client_ca_pem {
        Some(ca_pem) => {
            let mut roots = RootCertStore::empty();
            for cert in read_certificates(ca_pem, "client CA")? {
                roots
                    .add(cert)
                    .map_err(|e| ServiceError::tls(format!("invalid client CA certificate: {e}")))?;
            }
            tracing::debug!("Requiring client certificates from {} CA(s)", roots.len());

            let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider)
                .build()
                .map_err(|e| ServiceError::tls(format!("client verifier: {e}")))?;
            builder.with_client_cert_verifier(verifier)
        }
        None => builder.with_no_client_auth(),
    };

    let mut config = builder
        .with_single_cert(chain, key)
        .map_err(|e| ServiceError::tls(format!("server identity rejected: {e}")))?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(config)
}

/// Load the TLS material named by `config` through `loader`
///
/// # Errors
///
/// Returns `ServiceError::Loader` if a file cannot be read and
/// `ServiceError::Tls` if its contents are unusable.
pub fn load_server_tls<L>(config: &ServiceConfig, loader: &L) -> Result<ServerConfig, ServiceError>
where
    L: ResourceLoader + ?Sized,
{
    let cert = loader.load_text(&config.server_cert)?;
    let key = loader.load_text(&config.server_key)?;
    let client_ca = config
        .handshake_client_ca()
        .map(|name| loader.load_text(name))
        .transpose()?;

    server_tls_config(&cert, &key, client_ca.as_deref())
}

fn read_certificates(pem: &str, what: &str) -> Result<Vec<CertificateDer<'static>>, ServiceError> {
    let certs = rustls_pemfile::certs(&mut pem.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServiceError::tls(format!("malformed {what}: {e}")))?;

    if certs.is_empty() {
        return Err(ServiceError::tls(format!("no certificate found in {what}")));
    }
    Ok(certs)
}

fn read_private_key(pem: &str) -> Result<PrivateKeyDer<'static>, ServiceError> {
    rustls_pemfile::private_key(&mut pem.as_bytes())
        .map_err(|e| ServiceError::tls(format!("malformed server key: {e}")))?
        .ok_or_else(|| ServiceError::tls("no private key found in server key"))
}
