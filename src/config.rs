//! Runtime configuration for transports.
//!
//! A single serde-friendly config struct with a `Default` impl that callers
//! can override field-by-field.

use serde::{Deserialize, Serialize};

/// Default block size used by the chunked streaming transports when no
/// override is given. Never transmitted on the wire — both ends must agree
/// on it out of band.
pub const DEFAULT_BLOCK_SIZE: usize = 256;

/// Configuration shared by the transport backends.
///
/// `block_size` only affects [`crate::transport::stream`] transports.
/// `file_path` and `bind_addr` are informational fields a caller fills in
/// to remember which file or address a transport handle was opened against;
/// deepwire itself only ever consumes already-open transport handles, so
/// turning this struct into one is the caller's own responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Block size, in bytes, for [`crate::transport::stream::SendStream`],
    /// [`crate::transport::stream::RecvStream`] and
    /// [`crate::transport::stream::BroadcastStream`].
    pub block_size: usize,

    /// Path used by file-backed transports.
    pub file_path: Option<String>,

    /// Address used by socket-backed transports (`host:port`).
    pub bind_addr: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            file_path: None,
            bind_addr: None,
        }
    }
}

impl TransportConfig {
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = Some(addr.into());
        self
    }
}
