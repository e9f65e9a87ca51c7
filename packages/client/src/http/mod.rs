//! HTTP utilities and helpers
//!
//! Request bodies, the buffered response type and URL composition used by
//! `HttpsClient`.

pub mod body;
pub mod response;
pub mod url;

pub use body::RequestBody;
pub use response::HttpResponse;
pub use self::url::{build_url, parse_url};
