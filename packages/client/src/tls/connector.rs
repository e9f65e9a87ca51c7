//! TLS connection establishment over caller-supplied transports
//!
//! A `TlsConnectionFactory` wraps an already connected stream in TLS using an
//! assembled client configuration. Blocking `std::net` streams and async tokio
//! streams are both supported.

use std::io;
use std::net::TcpStream;
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, StreamOwned};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

/// Connection factory exposing an assembled TLS client context
#[derive(Clone)]
pub struct TlsConnectionFactory {
    config: Arc<ClientConfig>,
}

impl TlsConnectionFactory {
    pub(crate) fn new(config: Arc<ClientConfig>) -> Self {
        Self { config }
    }

    /// Underlying rustls client configuration
    #[must_use]
    pub fn client_config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.config)
    }

    /// Whether the context presents a client certificate when asked
    #[must_use]
    pub fn presents_client_identity(&self) -> bool {
        self.config.client_auth_cert_resolver.has_certs()
    }

    /// Establish TLS over a blocking TCP stream.
    ///
    /// The handshake is driven lazily by the first read or write.
    ///
    /// # Errors
    ///
    /// Returns `io::ErrorKind::InvalidInput` if `host` is neither a DNS name
    /// nor an IP address, or any error rustls raises creating the session.
    pub fn wrap_blocking(
        &self,
        stream: TcpStream,
        host: &str,
    ) -> io::Result<StreamOwned<ClientConnection, TcpStream>> {
        let server_name = server_name(host)?;
        let client = ClientConnection::new(Arc::clone(&self.config), server_name)
            .map_err(|e| io::Error::other(format!("Failed to create TLS connection: {e}")))?;

        Ok(StreamOwned::new(client, stream))
    }

    /// Perform a TLS handshake over an async stream.
    ///
    /// # Errors
    ///
    /// Returns `io::ErrorKind::InvalidInput` for an unusable `host`, or the
    /// handshake failure (for example an untrusted peer certificate).
    pub async fn connect<IO>(&self, stream: IO, host: &str) -> io::Result<TlsStream<IO>>
    where
        IO: AsyncRead + AsyncWrite + Unpin,
    {
        let server_name = server_name(host)?;
        tracing::debug!("Starting TLS handshake with {}", host);

        TlsConnector::from(Arc::clone(&self.config))
            .connect(server_name, stream)
            .await
    }
}

impl std::fmt::Debug for TlsConnectionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConnectionFactory")
            .field("client_identity", &self.presents_client_identity())
            .finish_non_exhaustive()
    }
}

fn server_name(host: &str) -> io::Result<ServerName<'static>> {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    ServerName::try_from(host.to_string()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid server name {host}: {e}"),
        )
    })
}
