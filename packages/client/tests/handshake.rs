mod common;

use common::{
    KEYSTORE_PASSPHRASE, fixture_bytes, fixture_der, fixture_text, rogue_identity, server_config,
    server_config_from, spawn_tls_server,
};
use sslkit_client::tls::InsecureTlsConfig;
use sslkit_client::{HostnameVerification, KeystoreCredentials, PemCredentials};
use tokio::net::TcpStream;

fn one_way_trust() -> sslkit_client::TlsTrustConfiguration {
    PemCredentials::new(fixture_text("root_ca.pem")).build().unwrap()
}

fn pem_mutual_trust() -> sslkit_client::TlsTrustConfiguration {
    PemCredentials::new(fixture_text("root_ca.pem"))
        .with_client_identity(fixture_text("client.key"), fixture_text("client.pem"))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_one_way_handshake_with_trusted_server() {
    let (addr, server) = spawn_tls_server(server_config("server.pem", "server.key", None), None).await;

    let tcp = TcpStream::connect(addr).await.unwrap();
    let _tls = one_way_trust()
        .connection_factory()
        .connect(tcp, "localhost")
        .await
        .unwrap();

    let accepted = server.await.unwrap().unwrap();
    assert!(accepted.peer_certificates.is_none());
}

#[tokio::test]
async fn test_one_way_handshake_by_ip_address() {
    let (addr, server) = spawn_tls_server(server_config("server.pem", "server.key", None), None).await;

    let tcp = TcpStream::connect(addr).await.unwrap();
    let _tls = one_way_trust()
        .connection_factory()
        .connect(tcp, "127.0.0.1")
        .await
        .unwrap();

    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_handshake_with_self_signed_server_fails() {
    let (cert, key) = rogue_identity();
    let (addr, _server) = spawn_tls_server(server_config_from(vec![cert], key, None), None).await;

    let tcp = TcpStream::connect(addr).await.unwrap();
    let err = one_way_trust()
        .connection_factory()
        .connect(tcp, "localhost")
        .await
        .unwrap_err();

    let tls_error = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
        .unwrap();
    assert!(matches!(tls_error, rustls::Error::InvalidCertificate(_)), "{tls_error}");
}

#[tokio::test]
async fn test_hostname_mismatch_fails_unless_accept_all() {
    let config = server_config("wrong_host.pem", "wrong_host.key", None);
    let trust = one_way_trust();

    let (addr, _server) = spawn_tls_server(config.clone(), None).await;
    let tcp = TcpStream::connect(addr).await.unwrap();
    assert!(trust
        .connection_factory_for(HostnameVerification::Strict)
        .connect(tcp, "localhost")
        .await
        .is_err());

    let (addr, server) = spawn_tls_server(config, None).await;
    let tcp = TcpStream::connect(addr).await.unwrap();
    let _tls = trust
        .connection_factory_for(HostnameVerification::AcceptAll)
        .connect(tcp, "localhost")
        .await
        .unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_accept_all_still_rejects_untrusted_chains() {
    let (cert, key) = rogue_identity();
    let (addr, _server) = spawn_tls_server(server_config_from(vec![cert], key, None), None).await;

    let tcp = TcpStream::connect(addr).await.unwrap();
    assert!(one_way_trust()
        .connection_factory_for(HostnameVerification::AcceptAll)
        .connect(tcp, "localhost")
        .await
        .is_err());
}

#[tokio::test]
async fn test_mutual_handshake_presents_pem_identity() {
    let config = server_config("server.pem", "server.key", Some("root_ca.pem"));
    let (addr, server) = spawn_tls_server(config, None).await;

    let tcp = TcpStream::connect(addr).await.unwrap();
    let _tls = pem_mutual_trust()
        .connection_factory()
        .connect(tcp, "localhost")
        .await
        .unwrap();

    let accepted = server.await.unwrap().unwrap();
    let presented = accepted.peer_certificates.unwrap();
    assert_eq!(presented[0].as_ref(), fixture_der("client.pem").as_ref());
}

#[tokio::test]
async fn test_mutual_handshake_presents_keystore_identity() {
    let config = server_config("server.pem", "server.key", Some("root_ca.pem"));
    let (addr, server) = spawn_tls_server(config, None).await;

    let trust = KeystoreCredentials::new(
        fixture_text("root_ca.pem"),
        fixture_bytes("client.p12"),
        KEYSTORE_PASSPHRASE,
    )
    .build()
    .unwrap();

    let tcp = TcpStream::connect(addr).await.unwrap();
    let _tls = trust
        .connection_factory()
        .connect(tcp, "localhost")
        .await
        .unwrap();

    let accepted = server.await.unwrap().unwrap();
    let presented = accepted.peer_certificates.unwrap();
    assert_eq!(presented[0].as_ref(), fixture_der("client.pem").as_ref());
}

#[tokio::test]
async fn test_server_requiring_client_auth_rejects_one_way_client() {
    let config = server_config("server.pem", "server.key", Some("root_ca.pem"));
    let (addr, server) = spawn_tls_server(config, None).await;

    let tcp = TcpStream::connect(addr).await.unwrap();
    // TLS 1.3 clients may finish before the server rejects them
    let _ = one_way_trust()
        .connection_factory()
        .connect(tcp, "localhost")
        .await;

    assert!(server.await.unwrap().is_err());
}

#[tokio::test]
async fn test_insecure_configuration_accepts_any_server() {
    let (cert, key) = rogue_identity();
    let (addr, server) = spawn_tls_server(server_config_from(vec![cert], key, None), None).await;

    let tcp = TcpStream::connect(addr).await.unwrap();
    let _tls = InsecureTlsConfig::new()
        .unwrap()
        .connection_factory()
        .connect(tcp, "anything.invalid")
        .await
        .unwrap();

    server.await.unwrap().unwrap();
}

#[test]
fn test_blocking_wrap_completes_handshake() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (addr, server) = runtime.block_on(spawn_tls_server(
        server_config("server.pem", "server.key", None),
        None,
    ));

    let tcp = std::net::TcpStream::connect(addr).unwrap();
    let mut tls = one_way_trust()
        .connection_factory()
        .wrap_blocking(tcp, "localhost")
        .unwrap();
    while tls.conn.is_handshaking() {
        tls.conn.complete_io(&mut tls.sock).unwrap();
    }
    while tls.conn.wants_write() {
        tls.conn.write_tls(&mut tls.sock).unwrap();
    }

    runtime.block_on(server).unwrap().unwrap();
}
