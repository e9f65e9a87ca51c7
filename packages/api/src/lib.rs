//! sslkit: one-way and mutual TLS from PEM text or PKCS#12 keystores
//!
//! Re-exports the credential builders and the HTTPS client from
//! `sslkit_client`, and adds a person CRUD demo service served over TLS.

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod service;

pub use error::ServiceError;
pub use service::{
    InMemoryPersonRepository, Person, PersonRepository, RunningServer, ServiceConfig, WebResponse,
};

pub use sslkit_client::{
    ClientStatsSnapshot, CredentialError, Error, FsResourceLoader, HostnameVerification,
    HttpConfig, HttpResponse, HttpsClient, InsecureTlsConfig, KeystoreCredentials, LoaderError,
    PemCredentials, RequestBody, ResourceLoader, Result, TlsConnectionFactory,
    TlsTrustConfiguration, build_url,
};
pub use sslkit_client::{config, tls};
