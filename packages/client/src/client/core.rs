//! Core HTTPS client implementation
//!
//! Every request opens a fresh TCP connection, performs the TLS handshake
//! through the configured connection factory and runs a single HTTP/1.1
//! exchange over it.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HOST, HeaderName, HeaderValue, USER_AGENT};
use http::{Method, Request};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::client::TlsStream;
use url::Url;

use super::stats::{ClientStats, ClientStatsSnapshot};
use crate::config::{HttpConfig, Validator};
use crate::error;
use crate::http::body::{EncodedBody, RequestBody};
use crate::http::response::HttpResponse;
use crate::http::url::{authority, host_header, parse_url};
use crate::tls::{
    HostnameVerification, InsecureTlsConfig, TlsConnectionFactory, TlsTrustConfiguration,
};

/// HTTPS client bound to one TLS trust configuration
///
/// Cheap to clone; clones share configuration and statistics.
#[derive(Debug, Clone)]
pub struct HttpsClient {
    config: Arc<HttpConfig>,
    factory: TlsConnectionFactory,
    stats: Arc<ClientStats>,
}

impl HttpsClient {
    /// Client verifying servers against `trust` under the given hostname policy.
    ///
    /// # Errors
    ///
    /// Returns a builder error if `config` fails validation.
    pub fn new(
        config: HttpConfig,
        trust: &TlsTrustConfiguration,
        hostname: HostnameVerification,
    ) -> crate::Result<Self> {
        if hostname == HostnameVerification::AcceptAll {
            tracing::warn!("Hostname verification disabled for HTTPS client");
        }
        Self::with_factory(config, trust.connection_factory_for(hostname))
    }

    /// INSECURE client trusting every server certificate and hostname.
    ///
    /// For exploratory calls against servers whose CA is unknown.
    ///
    /// # Errors
    ///
    /// Returns a builder error if `config` fails validation or the TLS
    /// context cannot be created.
    pub fn insecure_trust_everything(config: HttpConfig) -> crate::Result<Self> {
        let insecure = InsecureTlsConfig::new().map_err(error::builder)?;
        Self::with_factory(config, insecure.connection_factory())
    }

    fn with_factory(config: HttpConfig, factory: TlsConnectionFactory) -> crate::Result<Self> {
        config.validate().map_err(error::builder)?;
        Ok(Self {
            config: Arc::new(config),
            factory,
            stats: Arc::new(ClientStats::default()),
        })
    }

    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Whether this client presents a client certificate when asked
    #[must_use]
    pub fn presents_client_identity(&self) -> bool {
        self.factory.presents_client_identity()
    }

    #[must_use]
    pub fn stats(&self) -> ClientStatsSnapshot {
        self.stats.snapshot()
    }

    /// Send a GET request with the given `(name, value)` headers.
    ///
    /// # Errors
    ///
    /// Returns the connect, TLS, timeout or exchange failure. A response is
    /// returned whatever its status; use `HttpResponse::error_for_status` to
    /// reject failures.
    pub async fn get(&self, url: &str, headers: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        self.execute(Method::GET, url, headers, &RequestBody::None)
            .await
    }

    /// Send a POST request carrying `body`.
    ///
    /// # Errors
    ///
    /// Fails like [`HttpsClient::get`], and with a body error if the form
    /// fields cannot be encoded.
    pub async fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: RequestBody,
    ) -> crate::Result<HttpResponse> {
        self.execute(Method::POST, url, headers, &body).await
    }

    /// Send a PUT request carrying `body`.
    ///
    /// # Errors
    ///
    /// Fails like [`HttpsClient::post`].
    pub async fn put(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: RequestBody,
    ) -> crate::Result<HttpResponse> {
        self.execute(Method::PUT, url, headers, &body).await
    }

    /// Send a DELETE request.
    ///
    /// # Errors
    ///
    /// Fails like [`HttpsClient::get`].
    pub async fn delete(&self, url: &str, headers: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        self.execute(Method::DELETE, url, headers, &RequestBody::None)
            .await
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: &RequestBody,
    ) -> crate::Result<HttpResponse> {
        let url = parse_url(url)?;
        let encoded = body.encode().map_err(|e| e.with_url(url.clone()))?;
        let body_len = encoded.bytes.len();
        let request = self.build_request(method, &url, headers, encoded)?;

        tracing::debug!("{} {}", request.method(), url);
        self.stats.record_request(body_len);

        match self.exchange(&url, request).await {
            Ok(response) => {
                self.stats.record_response(response.bytes().len());
                tracing::debug!("{} answered {}", url, response.status());
                Ok(response)
            }
            Err(err) => {
                self.stats.record_failure(&err);
                tracing::warn!("HTTP request to {} failed: {}", url, err);
                Err(err)
            }
        }
    }

    fn build_request(
        &self,
        method: Method,
        url: &Url,
        headers: &[(&str, &str)],
        encoded: EncodedBody,
    ) -> crate::Result<Request<Full<Bytes>>> {
        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let mut request = Request::builder()
            .method(method)
            .uri(target)
            .body(Full::new(encoded.bytes))
            .map_err(|e| error::builder(e).with_url(url.clone()))?;

        let map = request.headers_mut();
        map.insert(HOST, header_value(&host_header(url), url)?);
        map.insert(USER_AGENT, header_value(&self.config.user_agent, url)?);
        if let Some(content_type) = encoded.content_type {
            map.insert(CONTENT_TYPE, header_value(&content_type, url)?);
        }

        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| error::builder(e).with_url(url.clone()))?;
            map.insert(name, header_value(value, url)?);
        }

        Ok(request)
    }

    async fn exchange(
        &self,
        url: &Url,
        request: Request<Full<Bytes>>,
    ) -> crate::Result<HttpResponse> {
        let stream = self.connect(url).await?;

        let read = async {
            let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
                .await
                .map_err(error::request)?;

            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::debug!("HTTPS connection closed with error: {}", e);
                }
            });

            let response = sender.send_request(request).await.map_err(error::request)?;
            let (parts, body) = response.into_parts();
            let body = body.collect().await.map_err(error::body)?.to_bytes();
            Ok::<_, crate::Error>(HttpResponse::new(
                parts.status,
                parts.headers,
                body,
                url.clone(),
            ))
        };

        timeout(self.config.read_timeout, read)
            .await
            .map_err(|elapsed| error::timeout(elapsed).with_url(url.clone()))?
            .map_err(|e| e.with_url(url.clone()))
    }

    async fn connect(&self, url: &Url) -> crate::Result<TlsStream<TcpStream>> {
        let (host, port) = authority(url)?;

        let connect = async {
            let tcp = TcpStream::connect((host.as_str(), port))
                .await
                .map_err(error::connect)?;
            tcp.set_nodelay(true).map_err(error::connect)?;

            self.factory
                .connect(tcp, &host)
                .await
                .map_err(error::tls)
        };

        timeout(self.config.connect_timeout, connect)
            .await
            .map_err(|elapsed| error::timeout(elapsed).with_url(url.clone()))?
            .map_err(|e| e.with_url(url.clone()))
    }
}

fn header_value(value: &str, url: &Url) -> crate::Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| error::builder(e).with_url(url.clone()))
}
