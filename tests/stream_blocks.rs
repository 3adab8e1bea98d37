//! Exercises the chunked streaming transports directly: exact-multiple and
//! one-byte-over block sizes, and a send/recv pair wired through a live
//! TCP socket so the block-count invariant holds across a real transport,
//! not just an in-memory buffer.

use deepwire::transport::{BufferRead, BufferWrite, RecvStream, SendStream, TcpRecv, TcpSend};
use std::net::{TcpListener, TcpStream};
use std::thread;

#[test]
fn exact_block_multiple_round_trips() {
    deepwire::logging::init();
    let payload: Vec<u8> = (0u8..32).collect(); // exactly 4 blocks of 8
    let mut out = BufferWrite::new();
    {
        let mut send = SendStream::new(&mut out, 8);
        send.write_bytes(&payload).unwrap();
        send.close().unwrap();
    }
    let bytes = out.into_inner();
    assert_eq!(bytes.len(), payload.len());

    let mut recv = RecvStream::new(BufferRead::new(&bytes), 8);
    let mut received = vec![0u8; payload.len()];
    recv.read_bytes(&mut received).unwrap();
    assert_eq!(received, payload);
}

#[test]
fn one_byte_over_block_boundary_round_trips() {
    let payload: Vec<u8> = (0u8..9).collect(); // one block of 8 plus 1 trailing byte
    let mut out = BufferWrite::new();
    {
        let mut send = SendStream::new(&mut out, 8);
        send.write_bytes(&payload).unwrap();
        send.close().unwrap();
    }
    let bytes = out.into_inner();
    // The first full block (8 bytes) plus the closing block, zero-padded
    // out to the full block size rather than trimmed to the 1 real byte.
    assert_eq!(bytes.len(), 16);

    let mut recv = RecvStream::new(BufferRead::new(&bytes), 8);
    let mut received = vec![0u8; payload.len()];
    recv.read_bytes(&mut received).unwrap();
    assert_eq!(received, payload);
}

#[test]
fn send_stream_over_live_socket() {
    deepwire::logging::init();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let payload: Vec<u8> = (0u8..100).collect();
    let expected = payload.clone();

    let handle = thread::spawn(move || {
        let recv = TcpRecv::accept(&listener).unwrap();
        let mut stream = RecvStream::new(recv, 16);
        let mut buf = vec![0u8; expected.len()];
        stream.read_bytes(&mut buf).unwrap();
        buf
    });

    let send_conn = TcpSend::connect(&addr.to_string()).unwrap();
    let mut stream = SendStream::new(send_conn, 16);
    stream.write_bytes(&payload).unwrap();
    stream.close().unwrap();
    drop(stream);

    let received = handle.join().unwrap();
    assert_eq!(received, payload);
}
