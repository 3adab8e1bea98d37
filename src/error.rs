//! Fatal error kinds raised by the traversal engine and its transports.
//!
//! Every engine entry point returns [`anyhow::Result`]; this enum covers the
//! conditions that originate inside deepwire itself rather than bubbling up
//! from the underlying transport's own I/O error.

use thiserror::Error;

/// Fatal conditions detected while packing or unpacking a message.
#[derive(Debug, Error)]
pub enum DeepWireError {
    /// A length prefix read from the wire did not match what the descriptor
    /// expected, or was negative.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: u64, found: i64 },

    /// A write or read ran past the end of a fixed-size buffer transport.
    #[error("buffer overflow: attempted to access {attempted} bytes at offset {offset}, capacity {capacity}")]
    BufferOverflow {
        offset: u64,
        attempted: u64,
        capacity: u64,
    },

    /// A stream transport was written to or read from after it was closed.
    #[error("operation on closed stream")]
    StreamClosed,

    /// The identity table referenced a destination index that was never
    /// inserted, meaning the source and sink walked a different graph shape.
    #[error("identity table has no entry for source key {0}")]
    UnknownIdentity(u64),

    /// A node count exceeded what fits in the wire's 32-bit node index.
    #[error("graph has too many nodes ({0}) to address with a 32-bit index")]
    GraphTooLarge(usize),
}
