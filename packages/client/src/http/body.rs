//! POST request bodies
//!
//! A `RequestBody` knows how to encode itself and which `Content-Type` it
//! carries. Form parameters are ordered name/value pairs.

use std::fmt::Write as _;

use bytes::Bytes;

pub const MEDIA_TYPE_NONE: &str = "none";
pub const MEDIA_TYPE_JSON: &str = "application/json";
pub const MEDIA_TYPE_FORM_DATA: &str = "form-data";
pub const MEDIA_TYPE_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Body of a POST request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    /// Empty body without a content type
    #[default]
    None,
    /// Raw JSON text
    Json(String),
    /// `multipart/form-data` fields
    FormData(Vec<(String, String)>),
    /// `application/x-www-form-urlencoded` fields
    FormUrlEncoded(Vec<(String, String)>),
}

/// Encoded body bytes together with the content type to announce
#[derive(Debug, Clone)]
pub(crate) struct EncodedBody {
    pub(crate) content_type: Option<String>,
    pub(crate) bytes: Bytes,
}

impl RequestBody {
    /// Select a body by media type name.
    ///
    /// `params` feed the two form types, `body` feeds JSON. A blank JSON
    /// body produces an empty request body.
    ///
    /// # Errors
    ///
    /// Returns a builder error for an unsupported media type.
    pub fn from_media_type(
        media_type: &str,
        params: &[(String, String)],
        body: Option<&str>,
    ) -> crate::Result<Self> {
        match media_type {
            MEDIA_TYPE_NONE => Ok(Self::None),
            MEDIA_TYPE_JSON => match body {
                Some(json) if !json.trim().is_empty() => Ok(Self::Json(json.to_string())),
                _ => Ok(Self::None),
            },
            MEDIA_TYPE_FORM_DATA => Ok(Self::FormData(params.to_vec())),
            MEDIA_TYPE_FORM_URLENCODED => Ok(Self::FormUrlEncoded(params.to_vec())),
            other => Err(crate::error::builder(format!(
                "unsupported media type: {other}"
            ))),
        }
    }

    pub(crate) fn encode(&self) -> crate::Result<EncodedBody> {
        match self {
            Self::None => Ok(EncodedBody {
                content_type: None,
                bytes: Bytes::new(),
            }),
            Self::Json(json) => Ok(EncodedBody {
                content_type: Some(MEDIA_TYPE_JSON.to_string()),
                bytes: Bytes::from(json.clone()),
            }),
            Self::FormUrlEncoded(fields) => {
                let encoded = serde_urlencoded::to_string(fields).map_err(crate::error::body)?;
                Ok(EncodedBody {
                    content_type: Some(MEDIA_TYPE_FORM_URLENCODED.to_string()),
                    bytes: Bytes::from(encoded),
                })
            }
            Self::FormData(fields) => {
                let boundary = multipart_boundary();
                Ok(EncodedBody {
                    content_type: Some(format!("multipart/form-data; boundary={boundary}")),
                    bytes: Bytes::from(encode_multipart(fields, &boundary)),
                })
            }
        }
    }
}

fn multipart_boundary() -> String {
    let mut boundary = String::with_capacity(32);
    for _ in 0..32 {
        boundary.push(fastrand::alphanumeric());
    }
    boundary
}

fn encode_multipart(fields: &[(String, String)], boundary: &str) -> String {
    let mut out = String::new();
    for (name, value) in fields {
        let name = name.replace('"', "%22");
        // Writing into a String cannot fail
        let _ = write!(
            out,
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        );
    }
    let _ = write!(out, "--{boundary}--\r\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<(String, String)> {
        vec![
            ("name".to_string(), "Ada Lovelace".to_string()),
            ("age".to_string(), "36".to_string()),
        ]
    }

    #[test]
    fn media_type_selection() {
        assert_eq!(
            RequestBody::from_media_type("none", &pairs(), Some("{}")).unwrap(),
            RequestBody::None
        );
        assert_eq!(
            RequestBody::from_media_type("application/json", &[], Some(r#"{"a":1}"#)).unwrap(),
            RequestBody::Json(r#"{"a":1}"#.to_string())
        );
        assert_eq!(
            RequestBody::from_media_type("form-data", &pairs(), None).unwrap(),
            RequestBody::FormData(pairs())
        );
        assert!(
            RequestBody::from_media_type("text/plain", &[], None)
                .unwrap_err()
                .is_builder()
        );
    }

    #[test]
    fn blank_json_becomes_empty_body() {
        let body = RequestBody::from_media_type("application/json", &[], Some("  ")).unwrap();
        let encoded = body.encode().unwrap();
        assert!(encoded.bytes.is_empty());
        assert!(encoded.content_type.is_none());
    }

    #[test]
    fn urlencoded_form_is_escaped_in_order() {
        let encoded = RequestBody::FormUrlEncoded(pairs()).encode().unwrap();
        assert_eq!(&encoded.bytes[..], b"name=Ada+Lovelace&age=36");
        assert_eq!(
            encoded.content_type.as_deref(),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn multipart_form_lists_every_field_between_boundaries() {
        let encoded = RequestBody::FormData(pairs()).encode().unwrap();
        let content_type = encoded.content_type.unwrap();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        let text = std::str::from_utf8(&encoded.bytes).unwrap();

        assert!(text.starts_with(&format!("--{boundary}\r\n")));
        assert!(text.ends_with(&format!("--{boundary}--\r\n")));
        assert!(text.contains("Content-Disposition: form-data; name=\"name\"\r\n\r\nAda Lovelace\r\n"));
        assert!(text.contains("Content-Disposition: form-data; name=\"age\"\r\n\r\n36\r\n"));
    }
}
