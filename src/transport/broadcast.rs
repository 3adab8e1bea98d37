//! Broadcast stand-in transports.
//!
//! deepwire does not ship a collective communication primitive of its own;
//! these two types satisfy the one contract the engine needs from a
//! broadcast — identical bytes reach every peer — over plain
//! point-to-point TCP connections.

use super::{SinkTransport, SourceTransport};
use std::io::{Read, Write};
use std::net::TcpStream;
use tracing::debug;

/// Root side of a broadcast: holds one connection per peer and writes the
/// same bytes to each in turn.
pub struct BroadcastRoot {
    peers: Vec<TcpStream>,
}

impl BroadcastRoot {
    pub fn new(peers: Vec<TcpStream>) -> Self {
        debug!("broadcast root with {} peers", peers.len());
        Self { peers }
    }
}

impl SourceTransport for BroadcastRoot {
    fn write_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        for peer in &mut self.peers {
            peer.write_all(bytes)?;
        }
        Ok(())
    }
}

/// Peer side of a broadcast: a single connection back to the root.
pub struct BroadcastPeer {
    stream: TcpStream,
}

impl BroadcastPeer {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl SinkTransport for BroadcastPeer {
    fn read_bytes(&mut self, buf: &mut [u8]) -> anyhow::Result<()> {
        self.stream.read_exact(buf)?;
        Ok(())
    }
}
