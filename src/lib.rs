//! # deepwire
//!
//! A deep-serialization and distributed deep-copy engine for heterogeneous
//! object graphs: traverse a root value once, emit a self-describing byte
//! stream that preserves sharing and cycles, and reconstruct an isomorphic
//! value from the same stream on a peer.

pub mod config;
pub mod error;
pub mod facade;
pub mod graph;
pub mod identity;
pub mod logging;
pub mod message;
pub mod scalar;
pub mod transport;

pub use config::TransportConfig;
pub use error::DeepWireError;
pub use facade::{
    buffer_size, buffer_size_container, buffer_size_pointer, recv_container,
    recv_container_buffered, recv_object, recv_object_buffered, recv_pointer,
    recv_pointer_buffered, recv_slice_exact, send_container, send_container_buffered,
    send_object, send_object_buffered, send_pointer, send_pointer_buffered, send_slice_exact,
};
pub use graph::{Graph, GraphNode, NodeId};
pub use identity::IdentityTable;
pub use message::{Message, Pack, SharedSlot, Sink, Source, Unpack};
pub use scalar::Scalar;

/// The current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
