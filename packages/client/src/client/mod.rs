//! HTTPS client consuming a TLS trust configuration
//!
//! There is no process-wide client. Callers construct an `HttpsClient` from a
//! trust configuration and pass it where it is needed.

pub mod core;
pub mod stats;

pub use self::core::HttpsClient;
pub use stats::{ClientStats, ClientStatsSnapshot};
