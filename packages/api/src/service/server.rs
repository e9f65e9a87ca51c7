//! TLS listener for the demo service

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use sslkit_client::ResourceLoader;
use sslkit_client::config::Validator;
use tokio::task::JoinHandle;

use super::config::ServiceConfig;
use super::repository::PersonRepository;
use super::router;
use super::tls::load_server_tls;
use crate::error::ServiceError;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// A demo service accepting TLS connections in the background
#[derive(Debug)]
pub struct RunningServer {
    local_addr: SocketAddr,
    base_path: String,
    handle: Handle,
    task: JoinHandle<io::Result<()>>,
}

impl RunningServer {
    /// Validate `config`, load its TLS material and start listening.
    ///
    /// Resolves once the listener is bound, so `local_addr` reports the real
    /// port when the configured one is `0`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Config` for invalid configuration, `Loader` or
    /// `Tls` for unusable TLS material and `Io` if the address cannot be bound.
    pub async fn start<L>(
        config: &ServiceConfig,
        loader: &L,
        repository: Arc<dyn PersonRepository>,
    ) -> Result<Self, ServiceError>
    where
        L: ResourceLoader + ?Sized,
    {
        config.validate()?;
        let tls = load_server_tls(config, loader)?;
        let mutual = config.handshake_client_ca().is_some();

        let app = router(&config.base_path, repository);
        let handle = Handle::new();
        let server = axum_server::bind_rustls(config.bind_addr, RustlsConfig::from_config(Arc::new(tls)))
            .handle(handle.clone());
        let task = tokio::spawn(server.serve(app.into_make_service()));

        let Some(local_addr) = handle.listening().await else {
            let err = match task.await {
                Ok(Err(e)) => e,
                Ok(Ok(())) => io::Error::other("server stopped before listening"),
                Err(e) => io::Error::other(e),
            };
            return Err(ServiceError::Io(err));
        };

        tracing::info!(
            "Person service listening on https://{}{} (client auth: {})",
            local_addr,
            config.base_path,
            mutual
        );

        Ok(Self {
            local_addr,
            base_path: config.base_path.clone(),
            handle,
            task,
        })
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `https://host:port/base` of the person routes
    #[must_use]
    pub fn base_url(&self, host: &str) -> String {
        format!("https://{}:{}{}", host, self.local_addr.port(), self.base_path)
    }

    /// Stop accepting connections and wait for in-flight requests
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Io` if the server task failed.
    pub async fn shutdown(self) -> Result<(), ServiceError> {
        self.handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        self.wait().await
    }

    /// Run until the server stops on its own
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Io` if the server task failed.
    pub async fn wait(self) -> Result<(), ServiceError> {
        self.task.await.map_err(io::Error::other)??;
        tracing::info!("Person service on {} stopped", self.local_addr);
        Ok(())
    }
}
