//! Wire types of the person endpoint

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Person record as exchanged in JSON and form bodies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub address: String,
}

/// Response envelope: `code` mirrors the HTTP status, `result` is `null`
/// when there is nothing to return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResponse<T> {
    pub code: u16,
    pub message: String,
    pub result: Option<T>,
}

impl<T> WebResponse<T> {
    #[must_use]
    pub fn success(result: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: "success".to_string(),
            result: Some(result),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(StatusCode::NOT_FOUND, message)
    }

    #[must_use]
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            result: None,
        }
    }

    /// Success when `result` is present, `404` otherwise
    pub fn found_or(result: Option<T>, missing: impl FnOnce() -> String) -> Self {
        match result {
            Some(result) => Self::success(result),
            None => Self::not_found(missing()),
        }
    }
}

impl<T: Serialize> IntoResponse for WebResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
