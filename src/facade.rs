//! Public façade: the same three families — direct, buffered, size-only —
//! over the same four root shapes — object, pointer, pointer+length,
//! container — regardless of which transport backend is plugged in.
//!
//! Every function here is generic over `X: SourceTransport` /
//! `X: SinkTransport`, so the same call works unmodified whether `X` is a
//! point-to-point socket, a broadcast root/peer, a file, or a chunked
//! stream — the façade never special-cases a backend.

use crate::message::{Message, Pack, Sink, Source, Unpack};
use crate::transport::{NullTransport, SinkTransport, SourceTransport};
use anyhow::Result;
use tracing::debug;

// ---------------------------------------------------------------------
// size-only
// ---------------------------------------------------------------------

/// Run the traversal against a transport that discards every byte, and
/// return how many bytes it would have emitted. Used to size a buffer
/// before a buffered send, or simply to measure.
pub fn buffer_size<T: Pack<NullTransport>>(value: &T) -> Result<u64> {
    let mut msg = Message::<_, Source>::new(NullTransport::new());
    msg.composite(value)?;
    Ok(msg.offset())
}

/// Size-only variant for the pointer root shape.
pub fn buffer_size_pointer<T: Pack<NullTransport>>(value: &Option<Box<T>>) -> Result<u64> {
    let mut msg = Message::<_, Source>::new(NullTransport::new());
    msg.owned(value)?;
    Ok(msg.offset())
}

/// Size-only variant for the container root shape.
pub fn buffer_size_container<T: Pack<NullTransport>>(values: &[T]) -> Result<u64> {
    let mut msg = Message::<_, Source>::new(NullTransport::new());
    msg.vec(values)?;
    Ok(msg.offset())
}

// ---------------------------------------------------------------------
// direct: object
// ---------------------------------------------------------------------

/// Stream `value` straight to `transport`.
pub fn send_object<X: SourceTransport, T: Pack<X>>(transport: X, value: &T) -> Result<()> {
    let mut msg = Message::<_, Source>::new(transport);
    msg.composite(value)?;
    debug!("sent object, {} bytes", msg.offset());
    Ok(())
}

/// Reconstruct a `T` straight from `transport`.
pub fn recv_object<X: SinkTransport, T: Unpack<X>>(transport: X) -> Result<T> {
    let mut msg = Message::<_, Sink>::new(transport);
    let value = msg.composite()?;
    debug!("received object, {} bytes", msg.offset());
    Ok(value)
}

// ---------------------------------------------------------------------
// direct: pointer (`Option<Box<T>>`)
// ---------------------------------------------------------------------

pub fn send_pointer<X: SourceTransport, T: Pack<X>>(
    transport: X,
    value: &Option<Box<T>>,
) -> Result<()> {
    let mut msg = Message::<_, Source>::new(transport);
    msg.owned(value)
}

pub fn recv_pointer<X: SinkTransport, T: Unpack<X>>(
    transport: X,
) -> Result<Option<Box<T>>> {
    let mut msg = Message::<_, Sink>::new(transport);
    msg.owned()
}

// ---------------------------------------------------------------------
// direct: pointer + explicit length (caller supplies `n` out of band,
// matching on both ends — no length prefix is carried on the wire)
// ---------------------------------------------------------------------

pub fn send_slice_exact<X: SourceTransport, T: Pack<X>>(
    transport: X,
    values: &[T],
) -> Result<()> {
    let mut msg = Message::<_, Source>::new(transport);
    for v in values {
        msg.composite(v)?;
    }
    Ok(())
}

pub fn recv_slice_exact<X: SinkTransport, T: Unpack<X>>(
    transport: X,
    n: usize,
) -> Result<Vec<T>> {
    let mut msg = Message::<_, Sink>::new(transport);
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(msg.composite()?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------
// direct: container (length-prefixed)
// ---------------------------------------------------------------------

pub fn send_container<X: SourceTransport, T: Pack<X>>(
    transport: X,
    values: &[T],
) -> Result<()> {
    let mut msg = Message::<_, Source>::new(transport);
    msg.vec(values)
}

pub fn recv_container<X: SinkTransport, T: Unpack<X>>(transport: X) -> Result<Vec<T>> {
    let mut msg = Message::<_, Sink>::new(transport);
    msg.vec()
}

// ---------------------------------------------------------------------
// buffered: materialize into memory first, then one transport call whose
// framing is `len_i32` followed by the body.
// ---------------------------------------------------------------------

use crate::transport::{BufferRead, BufferWrite};

fn to_buffer<T>(pack: impl FnOnce(&mut Message<BufferWrite, Source>) -> Result<()>) -> Result<Vec<u8>> {
    let mut msg = Message::<_, Source>::new(BufferWrite::new());
    pack(&mut msg)?;
    Ok(msg.into_transport().into_inner())
}

pub fn send_object_buffered<X: SourceTransport, T: Pack<BufferWrite>>(
    transport: X,
    value: &T,
) -> Result<()> {
    let bytes = to_buffer::<T>(|m| m.composite(value))?;
    let mut framed = Message::<_, Source>::new(transport);
    framed.bytes(&bytes)
}

pub fn recv_object_buffered<X: SinkTransport, T>(transport: X) -> Result<T>
where
    for<'a> T: Unpack<BufferRead<'a>>,
{
    let mut framed = Message::<_, Sink>::new(transport);
    let bytes = framed.bytes()?;
    let mut buf_msg = Message::<_, Sink>::new(BufferRead::new(&bytes));
    buf_msg.composite()
}

pub fn send_pointer_buffered<X: SourceTransport, T: Pack<BufferWrite>>(
    transport: X,
    value: &Option<Box<T>>,
) -> Result<()> {
    let bytes = to_buffer::<T>(|m| m.owned(value))?;
    let mut framed = Message::<_, Source>::new(transport);
    framed.bytes(&bytes)
}

pub fn recv_pointer_buffered<X: SinkTransport, T>(transport: X) -> Result<Option<Box<T>>>
where
    for<'a> T: Unpack<BufferRead<'a>>,
{
    let mut framed = Message::<_, Sink>::new(transport);
    let bytes = framed.bytes()?;
    let mut buf_msg = Message::<_, Sink>::new(BufferRead::new(&bytes));
    buf_msg.owned()
}

pub fn send_container_buffered<X: SourceTransport, T: Pack<BufferWrite>>(
    transport: X,
    values: &[T],
) -> Result<()> {
    let bytes = to_buffer::<T>(|m| m.vec(values))?;
    let mut framed = Message::<_, Source>::new(transport);
    framed.bytes(&bytes)
}

pub fn recv_container_buffered<X: SinkTransport, T>(transport: X) -> Result<Vec<T>>
where
    for<'a> T: Unpack<BufferRead<'a>>,
{
    let mut framed = Message::<_, Sink>::new(transport);
    let bytes = framed.bytes()?;
    let mut buf_msg = Message::<_, Sink>::new(BufferRead::new(&bytes));
    buf_msg.vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{BufferRead, BufferWrite};

    #[derive(Debug, PartialEq)]
    struct Pair(i32, i32);

    impl<X: SourceTransport> Pack<X> for Pair {
        fn pack(&self, msg: &mut Message<X, Source>) -> Result<()> {
            msg.scalar(self.0)?;
            msg.scalar(self.1)
        }
    }

    impl<X: SinkTransport> Unpack<X> for Pair {
        fn unpack(msg: &mut Message<X, Sink>) -> Result<Self> {
            Ok(Pair(msg.scalar()?, msg.scalar()?))
        }
    }

    #[test]
    fn buffer_size_matches_direct_emission_length() {
        let p = Pair(1, 2);
        let size = buffer_size(&p).unwrap();

        let mut w = BufferWrite::new();
        send_object(&mut w, &p).unwrap();
        assert_eq!(w.as_slice().len() as u64, size);
    }

    #[test]
    fn direct_object_round_trips() {
        let p = Pair(10, -5);
        let mut w = BufferWrite::new();
        send_object(&mut w, &p).unwrap();
        let bytes = w.into_inner();
        let mut r = BufferRead::new(&bytes);
        let back: Pair = recv_object(&mut r).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn container_round_trips_including_empty() {
        let values = vec![Pair(1, 1), Pair(2, 2)];
        let mut w = BufferWrite::new();
        send_container(&mut w, &values).unwrap();
        let bytes = w.into_inner();
        let mut r = BufferRead::new(&bytes);
        let back: Vec<Pair> = recv_container(&mut r).unwrap();
        assert_eq!(back, values);

        let empty: Vec<Pair> = vec![];
        let mut w2 = BufferWrite::new();
        send_container(&mut w2, &empty).unwrap();
        let bytes2 = w2.into_inner();
        let mut r2 = BufferRead::new(&bytes2);
        let back2: Vec<Pair> = recv_container(&mut r2).unwrap();
        assert_eq!(back2, empty);
    }

    #[test]
    fn buffered_object_round_trips_with_length_prefix_framing() {
        let p = Pair(7, 8);
        let mut w = BufferWrite::new();
        send_object_buffered(&mut w, &p).unwrap();
        let bytes = w.into_inner();
        // 4-byte i32 length prefix + 8-byte payload (two i32 fields).
        assert_eq!(bytes.len(), 4 + 8);

        let mut r = BufferRead::new(&bytes);
        let back: Pair = recv_object_buffered(&mut r).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn null_root_round_trips() {
        let none: Option<Box<Pair>> = None;
        let mut w = BufferWrite::new();
        send_pointer(&mut w, &none).unwrap();
        let bytes = w.into_inner();
        let mut r = BufferRead::new(&bytes);
        let back: Option<Box<Pair>> = recv_pointer(&mut r).unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn slice_exact_round_trips_without_length_prefix() {
        let values = vec![Pair(1, 2), Pair(3, 4), Pair(5, 6)];
        let mut w = BufferWrite::new();
        send_slice_exact(&mut w, &values).unwrap();
        let bytes = w.into_inner();
        assert_eq!(bytes.len(), 3 * 8);

        let mut r = BufferRead::new(&bytes);
        let back: Vec<Pair> = recv_slice_exact(&mut r, 3).unwrap();
        assert_eq!(back, values);
    }
}
