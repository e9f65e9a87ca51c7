//! Per-client exchange counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by every exchange of one `HttpsClient`
#[derive(Debug, Default)]
pub struct ClientStats {
    requests_total: AtomicU64,
    responses_received: AtomicU64,
    connect_failures: AtomicU64,
    handshake_failures: AtomicU64,
    exchange_failures: AtomicU64,
    bytes_sent: AtomicU64,
    bytes_received: AtomicU64,
}

impl ClientStats {
    pub(crate) fn record_request(&self, body_len: usize) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(body_len as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_response(&self, body_len: usize) {
        self.responses_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(body_len as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self, err: &crate::Error) {
        let counter = if err.is_connect() {
            &self.connect_failures
        } else if err.is_tls() {
            &self.handshake_failures
        } else {
            &self.exchange_failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters
    #[must_use]
    pub fn snapshot(&self) -> ClientStatsSnapshot {
        ClientStatsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            responses_received: self.responses_received.load(Ordering::Relaxed),
            connect_failures: self.connect_failures.load(Ordering::Relaxed),
            handshake_failures: self.handshake_failures.load(Ordering::Relaxed),
            exchange_failures: self.exchange_failures.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of client statistics at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientStatsSnapshot {
    pub requests_total: u64,
    pub responses_received: u64,
    pub connect_failures: u64,
    pub handshake_failures: u64,
    pub exchange_failures: u64,
    /// Request body bytes, headers excluded
    pub bytes_sent: u64,
    /// Response body bytes, headers excluded
    pub bytes_received: u64,
}
