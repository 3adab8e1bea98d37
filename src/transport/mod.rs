//! Transport backends.
//!
//! Each backend implements one direction only: [`SourceTransport`] for
//! writers, [`SinkTransport`] for readers. Keeping the two separate (rather
//! than one `Transport` trait with both methods) means a backend that only
//! makes sense in one direction — [`null::NullTransport`], a one-shot
//! [`tcp::TcpSend`] socket — simply never implements the other trait,
//! instead of carrying a method that would panic if called.
//!
//! Which direction a given byte-plumbing call resolves to is decided by
//! which [`crate::message::Message`] wraps the backend, not by a flag
//! carried on the backend itself.

pub mod broadcast;
pub mod buffer;
pub mod file;
pub mod null;
pub mod stream;
pub mod tcp;

/// A transport that accepts outgoing bytes.
pub trait SourceTransport {
    fn write_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()>;
}

/// A transport that supplies incoming bytes.
pub trait SinkTransport {
    fn read_bytes(&mut self, buf: &mut [u8]) -> anyhow::Result<()>;
}

impl<T: SourceTransport + ?Sized> SourceTransport for &mut T {
    fn write_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        (**self).write_bytes(bytes)
    }
}

impl<T: SinkTransport + ?Sized> SinkTransport for &mut T {
    fn read_bytes(&mut self, buf: &mut [u8]) -> anyhow::Result<()> {
        (**self).read_bytes(buf)
    }
}

pub use broadcast::{BroadcastPeer, BroadcastRoot};
pub use buffer::{BufferRead, BufferWrite};
pub use file::{FileRead, FileWrite};
pub use null::NullTransport;
pub use stream::{BroadcastStream, RecvStream, SendStream};
pub use tcp::{TcpRecv, TcpSend};
