//! In-memory buffer transports, used by the "buffered" façade family to
//! materialize a whole message before handing it to a single transport call.

use super::{SinkTransport, SourceTransport};
use crate::error::DeepWireError;

/// Writes into a byte buffer with a running offset. `new()` grows without
/// bound, for callers (the buffered façade, mostly) that don't know the
/// final size up front. `with_capacity` fixes the buffer at that size and
/// rejects, rather than grows past, a write that would overflow it —
/// mirroring a caller-provided fixed buffer the way [`BufferRead`] wraps a
/// caller-provided fixed slice.
#[derive(Debug, Default)]
pub struct BufferWrite {
    buf: Vec<u8>,
    capacity: Option<usize>,
}

impl BufferWrite {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            capacity: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

impl SourceTransport for BufferWrite {
    fn write_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        if let Some(capacity) = self.capacity {
            if self.buf.len() + bytes.len() > capacity {
                return Err(DeepWireError::BufferOverflow {
                    offset: self.buf.len() as u64,
                    attempted: bytes.len() as u64,
                    capacity: capacity as u64,
                }
                .into());
            }
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

/// Reads sequentially from a caller-owned byte slice.
#[derive(Debug)]
pub struct BufferRead<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> BufferRead<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }
}

impl<'a> SinkTransport for BufferRead<'a> {
    fn read_bytes(&mut self, out: &mut [u8]) -> anyhow::Result<()> {
        let end = self.offset + out.len();
        if end > self.buf.len() {
            return Err(DeepWireError::BufferOverflow {
                offset: self.offset as u64,
                attempted: out.len() as u64,
                capacity: self.buf.len() as u64,
            }
            .into());
        }
        out.copy_from_slice(&self.buf[self.offset..end]);
        self.offset = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let mut w = BufferWrite::new();
        w.write_bytes(&[1, 2, 3]).unwrap();
        w.write_bytes(&[4, 5]).unwrap();
        let bytes = w.into_inner();
        assert_eq!(bytes, vec![1, 2, 3, 4, 5]);

        let mut r = BufferRead::new(&bytes);
        let mut a = [0u8; 3];
        let mut b = [0u8; 2];
        r.read_bytes(&mut a).unwrap();
        r.read_bytes(&mut b).unwrap();
        assert_eq!(a, [1, 2, 3]);
        assert_eq!(b, [4, 5]);
    }

    #[test]
    fn read_past_end_overflows() {
        let bytes = [1u8, 2, 3];
        let mut r = BufferRead::new(&bytes);
        let mut buf = [0u8; 4];
        assert!(r.read_bytes(&mut buf).is_err());
    }

    #[test]
    fn write_past_fixed_capacity_overflows() {
        let mut w = BufferWrite::with_capacity(4);
        w.write_bytes(&[1, 2, 3]).unwrap();
        assert!(w.write_bytes(&[4, 5]).is_err());
    }

    #[test]
    fn write_up_to_fixed_capacity_succeeds() {
        let mut w = BufferWrite::with_capacity(4);
        w.write_bytes(&[1, 2, 3, 4]).unwrap();
        assert_eq!(w.into_inner(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn unbounded_write_never_overflows() {
        let mut w = BufferWrite::new();
        for _ in 0..100 {
            w.write_bytes(&[0]).unwrap();
        }
        assert_eq!(w.into_inner().len(), 100);
    }
}
