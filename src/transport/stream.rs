//! Chunked, block-buffered streaming transports.
//!
//! [`SendStream`] double-buffers (fill one block while the other is in
//! flight, toggle on fill), [`RecvStream`] single-buffers (refill whole
//! blocks on exhaustion), and [`BroadcastStream`] is root-shaped or
//! peer-shaped depending on how it was constructed, not two duplicated
//! types.
//!
//! Each stream is a small typestate: [`BlockBuffer`] is either
//! [`Open`] (writable) or [`Closed`] (flushed, rejects further writes). The
//! type system only needs to catch this at the one call site that matters —
//! [`SendStream::write_bytes`] — so the typestate lives internally behind an
//! enum rather than being threaded through the public API.

use super::{SinkTransport, SourceTransport};
use crate::config::TransportConfig;
use crate::error::DeepWireError;
use std::marker::PhantomData;

pub struct Open;
pub struct Closed;

struct BlockBuffer<S> {
    blocks: [Vec<u8>; 2],
    active: usize,
    pos: usize,
    block_size: usize,
    _state: PhantomData<S>,
}

impl BlockBuffer<Open> {
    fn new(block_size: usize) -> Self {
        Self {
            blocks: [vec![0u8; block_size], vec![0u8; block_size]],
            active: 0,
            pos: 0,
            block_size,
            _state: PhantomData,
        }
    }

    /// Push one byte into the active block. Returns the filled block when
    /// it wraps, after which the active block toggles.
    fn push(&mut self, byte: u8) -> Option<Vec<u8>> {
        self.blocks[self.active][self.pos] = byte;
        self.pos += 1;
        if self.pos == self.block_size {
            let filled = std::mem::replace(&mut self.blocks[self.active], vec![0u8; self.block_size]);
            self.active = 1 - self.active;
            self.pos = 0;
            Some(filled)
        } else {
            None
        }
    }

    /// Flush the active block, zero-padded to `block_size`. The block's
    /// unwritten tail is already zero (freshly allocated or replaced at the
    /// last toggle), so the full block, not just the first `pos` bytes, is
    /// what goes out — matching what the receiver's fixed-size refill reads.
    /// Returns `None` when nothing has been written since the last toggle.
    fn close(self) -> (BlockBuffer<Closed>, Option<Vec<u8>>) {
        let tail = if self.pos > 0 {
            Some(self.blocks[self.active].clone())
        } else {
            None
        };
        (
            BlockBuffer {
                blocks: self.blocks,
                active: self.active,
                pos: self.pos,
                block_size: self.block_size,
                _state: PhantomData,
            },
            tail,
        )
    }
}

enum SendState {
    Open(BlockBuffer<Open>),
    Closed(BlockBuffer<Closed>),
}

/// Double-buffered send stream: `put_block` ships the block that just
/// filled and toggles to the other one, so a transmission can be in flight
/// while the caller keeps filling.
pub struct SendStream<X: SourceTransport> {
    transport: X,
    state: SendState,
}

impl<X: SourceTransport> SendStream<X> {
    pub fn new(transport: X, block_size: usize) -> Self {
        Self {
            transport,
            state: SendState::Open(BlockBuffer::new(block_size)),
        }
    }

    /// As [`SendStream::new`], taking the block size from a shared config
    /// struct so both ends of a connection can be built from the same value.
    pub fn with_config(transport: X, config: &TransportConfig) -> Self {
        Self::new(transport, config.block_size)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        let buf = match &mut self.state {
            SendState::Open(buf) => buf,
            SendState::Closed(_) => return Err(DeepWireError::StreamClosed.into()),
        };
        for &byte in bytes {
            if let Some(filled) = buf.push(byte) {
                self.transport.write_bytes(&filled)?;
            }
        }
        Ok(())
    }

    /// Flush any partially-filled block and reject further writes.
    /// Idempotent: closing an already-closed stream is a no-op.
    pub fn close(&mut self) -> anyhow::Result<()> {
        let placeholder = BlockBuffer {
            blocks: [Vec::new(), Vec::new()],
            active: 0,
            pos: 0,
            block_size: 0,
            _state: PhantomData,
        };
        let buf = match std::mem::replace(&mut self.state, SendState::Closed(placeholder)) {
            SendState::Open(buf) => buf,
            SendState::Closed(already) => {
                self.state = SendState::Closed(already);
                return Ok(());
            }
        };
        let (closed, tail) = buf.close();
        self.state = SendState::Closed(closed);
        if let Some(tail) = tail {
            self.transport.write_bytes(&tail)?;
        }
        Ok(())
    }
}

impl<X: SourceTransport> Drop for SendStream<X> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl<X: SourceTransport> SourceTransport for SendStream<X> {
    fn write_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        SendStream::write_bytes(self, bytes)
    }
}

/// Single-buffered receive stream: refills one whole block at a time from
/// the underlying transport once the previous block is exhausted.
pub struct RecvStream<X: SinkTransport> {
    transport: X,
    buf: Vec<u8>,
    pos: usize,
    block_size: usize,
    closed: bool,
}

impl<X: SinkTransport> RecvStream<X> {
    pub fn new(transport: X, block_size: usize) -> Self {
        Self {
            transport,
            buf: vec![0u8; block_size],
            pos: block_size,
            block_size,
            closed: false,
        }
    }

    /// As [`RecvStream::new`], taking the block size from a shared config
    /// struct so both ends of a connection can be built from the same value.
    pub fn with_config(transport: X, config: &TransportConfig) -> Self {
        Self::new(transport, config.block_size)
    }

    fn refill(&mut self) -> anyhow::Result<()> {
        self.transport.read_bytes(&mut self.buf)?;
        self.pos = 0;
        Ok(())
    }

    pub fn read_bytes(&mut self, out: &mut [u8]) -> anyhow::Result<()> {
        if self.closed {
            return Err(DeepWireError::StreamClosed.into());
        }
        for slot in out.iter_mut() {
            if self.pos == self.block_size {
                self.refill()?;
            }
            *slot = self.buf[self.pos];
            self.pos += 1;
        }
        Ok(())
    }

    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl<X: SinkTransport> SinkTransport for RecvStream<X> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> anyhow::Result<()> {
        RecvStream::read_bytes(self, buf)
    }
}

/// A broadcast-shaped chunked stream: send-shaped on the root, receive-shaped
/// on every other peer. One type instead of duplicated root/peer structs.
pub enum BroadcastStream {
    Root(SendStream<super::BroadcastRoot>),
    Peer(RecvStream<super::BroadcastPeer>),
}

impl BroadcastStream {
    pub fn root(transport: super::BroadcastRoot, block_size: usize) -> Self {
        BroadcastStream::Root(SendStream::new(transport, block_size))
    }

    pub fn peer(transport: super::BroadcastPeer, block_size: usize) -> Self {
        BroadcastStream::Peer(RecvStream::new(transport, block_size))
    }

    /// As [`BroadcastStream::root`], taking the block size from a shared
    /// config struct.
    pub fn root_with_config(transport: super::BroadcastRoot, config: &TransportConfig) -> Self {
        Self::root(transport, config.block_size)
    }

    /// As [`BroadcastStream::peer`], taking the block size from a shared
    /// config struct.
    pub fn peer_with_config(transport: super::BroadcastPeer, config: &TransportConfig) -> Self {
        Self::peer(transport, config.block_size)
    }

    pub fn close(&mut self) -> anyhow::Result<()> {
        match self {
            BroadcastStream::Root(s) => s.close(),
            BroadcastStream::Peer(s) => {
                s.close();
                Ok(())
            }
        }
    }
}

impl SourceTransport for BroadcastStream {
    fn write_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        match self {
            BroadcastStream::Root(s) => s.write_bytes(bytes),
            BroadcastStream::Peer(_) => {
                Err(anyhow::anyhow!("cannot write to a peer-shaped broadcast stream"))
            }
        }
    }
}

impl SinkTransport for BroadcastStream {
    fn read_bytes(&mut self, buf: &mut [u8]) -> anyhow::Result<()> {
        match self {
            BroadcastStream::Peer(s) => s.read_bytes(buf),
            BroadcastStream::Root(_) => {
                Err(anyhow::anyhow!("cannot read from a root-shaped broadcast stream"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::buffer::{BufferRead, BufferWrite};

    #[test]
    fn exact_multiple_of_block_size_flushes_on_every_boundary() {
        let mut send = SendStream::new(BufferWrite::new(), 4);
        send.write_bytes(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        send.close().unwrap();
        drop(send);
    }

    #[test]
    fn partial_final_block_is_zero_padded_to_block_size_on_close() {
        let mut out = BufferWrite::new();
        {
            let mut send = SendStream::new(&mut out, 4);
            send.write_bytes(&[1, 2, 3]).unwrap();
            send.close().unwrap();
        }
        let bytes = out.into_inner();
        assert_eq!(bytes, vec![1, 2, 3, 0]);
    }

    #[test]
    fn closing_twice_does_not_re_emit_the_block() {
        let mut out = BufferWrite::new();
        {
            let mut send = SendStream::new(&mut out, 4);
            send.write_bytes(&[1, 2, 3]).unwrap();
            send.close().unwrap();
            send.close().unwrap();
        }
        assert_eq!(out.into_inner(), vec![1, 2, 3, 0]);
    }

    #[test]
    fn with_config_uses_configured_block_size() {
        let config = crate::config::TransportConfig::default().with_block_size(4);
        let mut out = BufferWrite::new();
        {
            let mut send = SendStream::with_config(&mut out, &config);
            send.write_bytes(&[1, 2, 3, 4, 5]).unwrap();
            send.close().unwrap();
        }
        assert_eq!(out.into_inner(), vec![1, 2, 3, 4, 5, 0, 0, 0]);
    }

    #[test]
    fn write_after_close_is_rejected() {
        let mut send = SendStream::new(BufferWrite::new(), 4);
        send.close().unwrap();
        assert!(send.write_bytes(&[1]).is_err());
    }

    #[test]
    fn recv_stream_refills_across_block_boundary() {
        let data: Vec<u8> = (0u8..16).collect();
        let reader = BufferRead::new(&data);
        let mut recv = RecvStream::new(reader, 4);
        let mut out = [0u8; 16];
        recv.read_bytes(&mut out).unwrap();
        assert_eq!(out.to_vec(), data);
    }

    #[test]
    fn send_then_recv_round_trip_through_buffers() {
        let payload: Vec<u8> = (0u8..20).collect();
        let mut direct = BufferWrite::new();
        {
            let mut s = SendStream::new(&mut direct, 8);
            s.write_bytes(&payload).unwrap();
            s.close().unwrap();
        }
        let bytes = direct.into_inner();
        let reader = BufferRead::new(&bytes);
        let mut recv = RecvStream::new(reader, 8);
        let mut out = vec![0u8; payload.len()];
        recv.read_bytes(&mut out).unwrap();
        assert_eq!(out, payload);
    }
}
