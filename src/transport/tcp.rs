//! Point-to-point transports over a blocking `TcpStream`.
//!
//! Plain blocking sockets rather than an async runtime: the traversal is
//! single-threaded and synchronous end to end, so there is no benefit to
//! non-blocking I/O here.

use super::{SinkTransport, SourceTransport};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use tracing::debug;

pub struct TcpSend {
    stream: TcpStream,
}

impl TcpSend {
    pub fn connect(addr: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        debug!("connected to {}", addr);
        Ok(Self { stream })
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl SourceTransport for TcpSend {
    fn write_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.stream.write_all(bytes)?;
        Ok(())
    }
}

pub struct TcpRecv {
    stream: TcpStream,
}

impl TcpRecv {
    pub fn accept(listener: &TcpListener) -> anyhow::Result<Self> {
        let (stream, addr) = listener.accept()?;
        debug!("accepted connection from {}", addr);
        Ok(Self { stream })
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl SinkTransport for TcpRecv {
    fn read_bytes(&mut self, buf: &mut [u8]) -> anyhow::Result<()> {
        self.stream.read_exact(buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn send_then_recv_round_trips() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let mut recv = TcpRecv::accept(&listener).unwrap();
            let mut buf = [0u8; 5];
            recv.read_bytes(&mut buf).unwrap();
            buf
        });

        let mut send = TcpSend::connect(&addr.to_string()).unwrap();
        send.write_bytes(&[1, 2, 3, 4, 5]).unwrap();

        let received = handle.join().unwrap();
        assert_eq!(received, [1, 2, 3, 4, 5]);
    }
}
