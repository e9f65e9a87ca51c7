//! # sslkit client
//!
//! TLS trust material from PEM or PKCS#12 credentials, and an HTTPS client
//! that consumes it.
//!
//! ## Features
//!
//! - **PEM credentials**: CA certificate plus an optional PKCS#8 RSA client
//!   key and certificate
//! - **Keystore credentials**: CA certificate plus a passphrase protected
//!   PKCS#12 client keystore
//! - **One-way and mutual TLS** from the same `TlsTrustConfiguration`
//! - **HTTPS client** with connect and read timeouts and JSON or form bodies
//! - **Explicitly named insecure modes** for debugging only
//!
//! ## Usage
//!
//! ```no_run
//! use sslkit_client::{HostnameVerification, HttpConfig, HttpsClient, PemCredentials};
//!
//! # async fn run(ca: String, key: String, cert: String) -> Result<(), Box<dyn std::error::Error>> {
//! let trust = PemCredentials::new(ca)
//!     .with_client_identity(key, cert)
//!     .build()?;
//!
//! let client = HttpsClient::new(HttpConfig::default(), &trust, HostnameVerification::Strict)?;
//! let response = client
//!     .get("https://localhost:8443/demo/bootswagger/person/1", &[])
//!     .await?;
//! println!("{}", response.text()?);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod loader;
pub mod tls;

pub use crate::client::{ClientStatsSnapshot, HttpsClient};
pub use crate::config::HttpConfig;
pub use crate::error::{Error, Result};
pub use crate::http::{HttpResponse, RequestBody, build_url};
pub use crate::loader::{FsResourceLoader, LoaderError, ResourceLoader};
pub use crate::tls::{
    CredentialError, HostnameVerification, InsecureTlsConfig, KeystoreCredentials,
    PemCredentials, TlsConnectionFactory, TlsTrustConfiguration,
};
