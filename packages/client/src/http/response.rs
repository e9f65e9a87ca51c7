//! Fully buffered HTTP response

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP response whose body has been read to the end
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    url: url::Url,
}

impl HttpResponse {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Bytes, url: url::Url) -> Self {
        Self {
            status,
            headers,
            body,
            url,
        }
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// URL the request was sent to
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get a specific header value by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Get content type header value
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(http::header::CONTENT_TYPE.as_str())
            .and_then(|v| v.to_str().ok())
    }

    /// Raw body bytes
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Response body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the body is not valid UTF-8.
    pub fn text(&self) -> crate::Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| crate::error::decode(e).with_url(self.url.clone()))
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the body does not deserialize into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| crate::error::decode(e).with_url(self.url.clone()))
    }

    /// Turn a 4xx or 5xx response into an error.
    ///
    /// # Errors
    ///
    /// Returns a status error carrying the code and URL.
    pub fn error_for_status(self) -> crate::Result<Self> {
        if self.status.is_client_error() || self.status.is_server_error() {
            Err(crate::error::status_code(self.url, self.status))
        } else {
            Ok(self)
        }
    }
}
