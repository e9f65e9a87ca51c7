//! Shared fixtures and a minimal TLS test server

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};
use sslkit_client::tls::decode_rsa_private_key;
use sslkit_client::{FsResourceLoader, ResourceLoader};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

pub const KEYSTORE_PASSPHRASE: &str = "123456";

pub fn fixtures() -> FsResourceLoader {
    FsResourceLoader::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

pub fn fixture_text(name: &str) -> String {
    fixtures().load_text(name).unwrap()
}

pub fn fixture_bytes(name: &str) -> Vec<u8> {
    fixtures().load_bytes(name).unwrap()
}

pub fn fixture_der(name: &str) -> CertificateDer<'static> {
    let block = pem::parse(fixture_text(name)).unwrap();
    CertificateDer::from(block.into_contents())
}

fn provider() -> Arc<rustls::crypto::CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

/// Server config for `cert_name`/`key_name`, optionally requiring a client
/// certificate issued by `client_ca`.
pub fn server_config(cert_name: &str, key_name: &str, client_ca: Option<&str>) -> Arc<ServerConfig> {
    let chain = vec![fixture_der(cert_name)];
    let key = decode_rsa_private_key(&fixture_text(key_name)).unwrap();
    server_config_from(chain, key, client_ca)
}

pub fn server_config_from(
    chain: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
    client_ca: Option<&str>,
) -> Arc<ServerConfig> {
    let builder = ServerConfig::builder_with_provider(provider())
        .with_protocol_versions(rustls::DEFAULT_VERSIONS)
        .unwrap();

    let config = match client_ca {
        Some(ca) => {
            let mut roots = RootCertStore::empty();
            roots.add(fixture_der(ca)).unwrap();
            let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider())
                .build()
                .unwrap();
            builder
                .with_client_cert_verifier(verifier)
                .with_single_cert(chain, key)
                .unwrap()
        }
        None => builder.with_no_client_auth().with_single_cert(chain, key).unwrap(),
    };
    Arc::new(config)
}

/// Self-signed certificate and key for `localhost`, unrelated to any fixture CA
pub fn rogue_identity() -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
    let key = rcgen::KeyPair::generate().unwrap();
    let cert = rcgen::CertificateParams::new(vec!["localhost".to_string()])
        .unwrap()
        .self_signed(&key)
        .unwrap();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key.serialize_der()));
    (cert.der().clone(), key)
}

/// What the server saw on its single accepted connection
#[derive(Debug)]
pub struct Accepted {
    pub peer_certificates: Option<Vec<CertificateDer<'static>>>,
    pub request: Option<String>,
}

/// Accept one TLS connection. When `response` is given, read one HTTP/1.1
/// request and answer with a `200 OK` carrying `response` as JSON.
pub async fn spawn_tls_server(
    config: Arc<ServerConfig>,
    response: Option<&'static str>,
) -> (SocketAddr, JoinHandle<std::io::Result<Accepted>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let acceptor = TlsAcceptor::from(config);

    let handle = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await?;
        let mut tls = acceptor.accept(tcp).await?;

        let peer_certificates = tls
            .get_ref()
            .1
            .peer_certificates()
            .map(|certs| certs.iter().map(|c| c.clone().into_owned()).collect());

        let mut request = None;
        if let Some(body) = response {
            request = Some(read_request(&mut tls).await?);
            let reply = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            tls.write_all(reply.as_bytes()).await?;
            tls.shutdown().await?;
        }

        Ok(Accepted {
            peer_certificates,
            request,
        })
    });

    (addr, handle)
}

async fn read_request<S: AsyncReadExt + Unpin>(stream: &mut S) -> std::io::Result<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(String::from_utf8_lossy(&data).into_owned());
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }

    Ok(String::from_utf8_lossy(&data).into_owned())
}
