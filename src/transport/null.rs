//! Null transport used to measure how many bytes a traversal would emit
//! without emitting them.

use super::SourceTransport;

/// Discards every write. Paired with [`crate::message::Message`]'s own
/// running offset, this is how [`crate::facade::buffer_size`] computes the
/// byte count of a would-be emission without allocating a buffer for it.
#[derive(Debug, Default)]
pub struct NullTransport;

impl NullTransport {
    pub fn new() -> Self {
        Self
    }
}

impl SourceTransport for NullTransport {
    fn write_bytes(&mut self, _bytes: &[u8]) -> anyhow::Result<()> {
        Ok(())
    }
}
