mod common;

use std::time::Duration;

use common::{fixture_text, rogue_identity, server_config, server_config_from, spawn_tls_server};
use sslkit_client::{
    HostnameVerification, HttpConfig, HttpsClient, PemCredentials, RequestBody, build_url,
};

const PERSON: &str = r#"{"code":200,"message":"success","result":{"id":"1","name":"Ada","age":36,"address":"London"}}"#;

fn mutual_client() -> HttpsClient {
    let trust = PemCredentials::new(fixture_text("root_ca.pem"))
        .with_client_identity(fixture_text("client.key"), fixture_text("client.pem"))
        .build()
        .unwrap();
    HttpsClient::new(HttpConfig::default(), &trust, HostnameVerification::Strict).unwrap()
}

#[tokio::test]
async fn test_get_over_mutual_tls() {
    let config = server_config("server.pem", "server.key", Some("root_ca.pem"));
    let (addr, server) = spawn_tls_server(config, Some(PERSON)).await;

    let url = format!("https://localhost:{}/demo/bootswagger/person/1", addr.port());
    let client = mutual_client();
    let response = client.get(&url, &[("X-Request-Id", "42")]).await.unwrap();

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["result"]["name"], "Ada");

    let accepted = server.await.unwrap().unwrap();
    assert!(accepted.peer_certificates.is_some());

    let request = accepted.request.unwrap();
    assert!(request.starts_with("GET /demo/bootswagger/person/1 HTTP/1.1\r\n"));
    let head = request.to_lowercase();
    assert!(head.contains(&format!("host: localhost:{}\r\n", addr.port())));
    assert!(head.contains("x-request-id: 42\r\n"));
    assert!(head.contains("user-agent: sslkit/"));

    let stats = client.stats();
    assert_eq!(stats.requests_total, 1);
    assert_eq!(stats.responses_received, 1);
}

#[tokio::test]
async fn test_post_json_and_query_parameters() {
    let config = server_config("server.pem", "server.key", None);
    let (addr, server) = spawn_tls_server(config, Some(PERSON)).await;

    let base = format!("https://localhost:{}/demo/bootswagger/person/save", addr.port());
    let url = build_url(&base, &[("dryRun", "true")]).unwrap();
    let body = RequestBody::Json(r#"{"name":"Ada","age":36}"#.to_string());

    let response = mutual_client().post(&url, &[], body).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::OK);

    let request = server.await.unwrap().unwrap().request.unwrap();
    assert!(request.starts_with("POST /demo/bootswagger/person/save?dryRun=true HTTP/1.1\r\n"));
    assert!(request.to_lowercase().contains("content-type: application/json\r\n"));
    assert!(request.ends_with(r#"{"name":"Ada","age":36}"#));
}

#[tokio::test]
async fn test_post_urlencoded_form() {
    let config = server_config("server.pem", "server.key", None);
    let (addr, server) = spawn_tls_server(config, Some(PERSON)).await;

    let url = format!("https://localhost:{}/form", addr.port());
    let fields = vec![
        ("name".to_string(), "Ada Lovelace".to_string()),
        ("age".to_string(), "36".to_string()),
    ];
    let body = RequestBody::from_media_type("application/x-www-form-urlencoded", &fields, None)
        .unwrap();

    mutual_client().post(&url, &[], body).await.unwrap();

    let request = server.await.unwrap().unwrap().request.unwrap();
    assert!(request
        .to_lowercase()
        .contains("content-type: application/x-www-form-urlencoded\r\n"));
    assert!(request.ends_with("name=Ada+Lovelace&age=36"));
}

#[tokio::test]
async fn test_untrusted_server_is_a_tls_error() {
    let (cert, key) = rogue_identity();
    let (addr, _server) = spawn_tls_server(server_config_from(vec![cert], key, None), Some(PERSON)).await;

    let url = format!("https://localhost:{}/", addr.port());
    let client = mutual_client();
    let err = client.get(&url, &[]).await.unwrap_err();

    assert!(err.is_tls(), "{err:?}");
    assert_eq!(err.url().map(|u| u.as_str()), Some(url.as_str()));
    assert_eq!(client.stats().handshake_failures, 1);
}

#[tokio::test]
async fn test_insecure_client_trusts_any_server() {
    let (cert, key) = rogue_identity();
    let (addr, server) = spawn_tls_server(server_config_from(vec![cert], key, None), Some(PERSON)).await;

    let url = format!("https://127.0.0.1:{}/demo/bootswagger/person/1", addr.port());
    let client = HttpsClient::insecure_trust_everything(HttpConfig::default()).unwrap();
    assert!(!client.presents_client_identity());

    let response = client.get(&url, &[]).await.unwrap();
    assert_eq!(response.text().unwrap(), PERSON);
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_accept_all_hostname_policy_reaches_misnamed_server() {
    let config = server_config("wrong_host.pem", "wrong_host.key", None);
    let (addr, server) = spawn_tls_server(config, Some(PERSON)).await;

    let trust = PemCredentials::new(fixture_text("root_ca.pem")).build().unwrap();
    let client =
        HttpsClient::new(HttpConfig::default(), &trust, HostnameVerification::AcceptAll).unwrap();

    let url = format!("https://localhost:{}/", addr.port());
    assert!(client.get(&url, &[]).await.unwrap().is_success());
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_connection_refused_is_a_connect_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = mutual_client()
        .get(&format!("https://127.0.0.1:{port}/"), &[])
        .await
        .unwrap_err();
    assert!(err.is_connect(), "{err:?}");
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let _hold = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(socket);
    });

    let trust = PemCredentials::new(fixture_text("root_ca.pem")).build().unwrap();
    let config = HttpConfig::default().with_connect_timeout(Duration::from_millis(200));
    let client = HttpsClient::new(config, &trust, HostnameVerification::Strict).unwrap();

    let err = client
        .get(&format!("https://127.0.0.1:{port}/"), &[])
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "{err:?}");
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let trust = PemCredentials::new(fixture_text("root_ca.pem")).build().unwrap();
    let config = HttpConfig::default().with_connect_timeout(Duration::ZERO);

    let err = HttpsClient::new(config, &trust, HostnameVerification::Strict).unwrap_err();
    assert!(err.is_builder());
}

#[tokio::test]
async fn test_plain_http_urls_are_rejected() {
    let err = mutual_client()
        .get("http://localhost/demo", &[])
        .await
        .unwrap_err();
    assert!(err.is_builder());
}
