use http::StatusCode;

use super::BoxError;
use super::types::{Error, Kind};

/// Creates an `Error` for a builder error.
pub(crate) fn builder<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e)
}

/// Creates an `Error` for a failed TCP connection.
pub(crate) fn connect<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Connect).with(e)
}

/// Creates an `Error` for a failed TLS handshake.
pub(crate) fn tls<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Tls).with(e)
}

/// Creates an `Error` for a request error.
pub(crate) fn request<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Request).with(e)
}

/// Creates an `Error` for a body error.
pub(crate) fn body<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Body).with(e)
}

/// Creates an `Error` for a decode error.
pub(crate) fn decode<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Decode).with(e)
}

pub(crate) fn timeout<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Timeout).with(e)
}

pub(crate) fn status_code(url: url::Url, status: StatusCode) -> Error {
    Error::new(Kind::Status(status)).with_url(url)
}
