//! The traversal engine: [`Message`], direction markers, and the
//! [`Pack`]/[`Unpack`] descriptor traits.
//!
//! Direction is resolved entirely at compile time. `Message<X, Source>` and
//! `Message<X, Sink>` expose the same method names for the write-side and
//! read-side of each operation, so a type's `Pack` and `Unpack` impls read
//! as mirror images of each other; there is no runtime `is_source` branch
//! anywhere in this module.

use crate::error::DeepWireError;
use crate::identity::IdentityTable;
use crate::scalar::Scalar;
use crate::transport::{SinkTransport, SourceTransport};
use anyhow::Result;
use std::collections::LinkedList;
use std::marker::PhantomData;

/// Marks a [`Message`] as the write side of a traversal.
pub struct Source;
/// Marks a [`Message`] as the read side of a traversal.
pub struct Sink;

/// One end of a single traversal: the transport it reads or writes through,
/// the running byte offset (monotonically non-decreasing), and the identity
/// table used to round-trip shared and cyclic references.
pub struct Message<X, Dir> {
    transport: X,
    offset: u64,
    identity: IdentityTable,
    _dir: PhantomData<Dir>,
}

impl<X, Dir> Message<X, Dir> {
    /// Bytes written or read so far this traversal.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn identity(&self) -> &IdentityTable {
        &self.identity
    }

    pub fn identity_mut(&mut self) -> &mut IdentityTable {
        &mut self.identity
    }
}

/// The three shapes a reconstructed `shared` slot can take. `Seen`/`New`
/// both carry the key that was actually on the wire; a caller tracking its
/// own table of already-built shared values (an `Rc<T>` pool, say) resolves
/// `Seen` against that table rather than against [`IdentityTable`], which
/// only ever stores source-key-to-source-key bookkeeping.
#[derive(Debug, PartialEq)]
pub enum SharedSlot<T> {
    Null,
    Seen(u64),
    New(u64, T),
}

/// A type that knows how to write itself onto the wire through any
/// [`SourceTransport`].
pub trait Pack<X: SourceTransport> {
    fn pack(&self, msg: &mut Message<X, Source>) -> Result<()>;
}

/// A type that knows how to reconstruct itself from the wire through any
/// [`SinkTransport`].
pub trait Unpack<X: SinkTransport>: Sized {
    fn unpack(msg: &mut Message<X, Sink>) -> Result<Self>;
}

// ---------------------------------------------------------------------
// Source side
// ---------------------------------------------------------------------

impl<X: SourceTransport> Message<X, Source> {
    pub fn new(transport: X) -> Self {
        Self {
            transport,
            offset: 0,
            identity: IdentityTable::new(),
            _dir: PhantomData,
        }
    }

    pub fn into_transport(self) -> X {
        self.transport
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.transport.write_bytes(bytes)?;
        self.offset += bytes.len() as u64;
        Ok(())
    }

    /// Write a fixed-width scalar, host-native byte order.
    pub fn scalar<V: Scalar>(&mut self, value: V) -> Result<()> {
        self.write_raw(&value.to_bytes())
    }

    /// Write a composite value by delegating to its own descriptor.
    pub fn composite<T: Pack<X>>(&mut self, value: &T) -> Result<()> {
        value.pack(self)
    }

    /// `unique_ptr`-shaped slot: null tag, else tag followed by the payload.
    pub fn owned<T: Pack<X>>(&mut self, value: &Option<Box<T>>) -> Result<()> {
        match value {
            None => self.scalar::<u8>(0),
            Some(inner) => {
                self.scalar::<u8>(1)?;
                self.composite(inner.as_ref())
            }
        }
    }

    /// `shared_ptr`-shaped slot keyed by `source_key`: a tag distinguishing
    /// null / already-seen / new, the key itself, then — only for a
    /// genuinely new pointee — the payload. The key rides on the wire in
    /// both the seen and new cases, since the sink has no other way to
    /// correlate a "seen" tag back to the node it refers to. The identity
    /// table is updated before the payload is packed, matching the engine's
    /// "record before recursing" invariant.
    pub fn shared<T: Pack<X>>(
        &mut self,
        source_key: Option<u64>,
        value: Option<&T>,
    ) -> Result<()> {
        let (key, inner) = match (source_key, value) {
            (Some(key), Some(inner)) => (key, inner),
            _ => return self.scalar::<u8>(0),
        };
        if self.identity.lookup(key).is_some() {
            self.scalar::<u8>(1)?;
            self.scalar::<u64>(key)
        } else {
            self.identity.insert(key, key);
            self.scalar::<u8>(2)?;
            self.scalar::<u64>(key)?;
            self.composite(inner)
        }
    }

    /// Length-prefixed contiguous container.
    pub fn vec<T: Pack<X>>(&mut self, values: &[T]) -> Result<()> {
        self.scalar::<i32>(values.len() as i32)?;
        for v in values {
            self.composite(v)?;
        }
        Ok(())
    }

    /// Length-prefixed linked container.
    pub fn list<T: Pack<X>>(&mut self, values: &LinkedList<T>) -> Result<()> {
        self.scalar::<i32>(values.len() as i32)?;
        for v in values {
            self.composite(v)?;
        }
        Ok(())
    }

    /// Length-prefixed raw byte string.
    pub fn bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.scalar::<i32>(bytes.len() as i32)?;
        self.write_raw(bytes)
    }
}

// ---------------------------------------------------------------------
// Sink side
// ---------------------------------------------------------------------

impl<X: SinkTransport> Message<X, Sink> {
    pub fn new(transport: X) -> Self {
        Self {
            transport,
            offset: 0,
            identity: IdentityTable::new(),
            _dir: PhantomData,
        }
    }

    pub fn into_transport(self) -> X {
        self.transport
    }

    fn read_raw(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.transport.read_bytes(&mut buf)?;
        self.offset += len as u64;
        Ok(buf)
    }

    pub fn scalar<V: Scalar>(&mut self) -> Result<V> {
        let bytes = self.read_raw(V::SIZE)?;
        Ok(V::from_bytes(&bytes))
    }

    pub fn composite<T: Unpack<X>>(&mut self) -> Result<T> {
        T::unpack(self)
    }

    pub fn owned<T: Unpack<X>>(&mut self) -> Result<Option<Box<T>>> {
        let tag: u8 = self.scalar()?;
        match tag {
            0 => Ok(None),
            1 => Ok(Some(Box::new(self.composite()?))),
            other => Err(DeepWireError::LengthMismatch {
                expected: 1,
                found: other as i64,
            }
            .into()),
        }
    }

    /// Reconstruct a `shared_ptr`-shaped slot. The key always comes off the
    /// wire rather than from the caller, mirroring the source side: a
    /// "seen" tag is meaningless without it.
    pub fn shared<T: Unpack<X>>(&mut self) -> Result<SharedSlot<T>> {
        let tag: u8 = self.scalar()?;
        match tag {
            0 => Ok(SharedSlot::Null),
            1 => {
                let key: u64 = self.scalar()?;
                Ok(SharedSlot::Seen(key))
            }
            2 => {
                let key: u64 = self.scalar()?;
                let value: T = self.composite()?;
                self.identity.insert(key, key);
                Ok(SharedSlot::New(key, value))
            }
            other => Err(DeepWireError::LengthMismatch {
                expected: 2,
                found: other as i64,
            }
            .into()),
        }
    }

    pub fn vec<T: Unpack<X>>(&mut self) -> Result<Vec<T>> {
        let len: i32 = self.scalar()?;
        if len < 0 {
            return Err(DeepWireError::LengthMismatch {
                expected: 0,
                found: len as i64,
            }
            .into());
        }
        let mut out = Vec::with_capacity(len as usize);
        for _ in 0..len {
            out.push(self.composite()?);
        }
        Ok(out)
    }

    pub fn list<T: Unpack<X>>(&mut self) -> Result<LinkedList<T>> {
        let len: i32 = self.scalar()?;
        if len < 0 {
            return Err(DeepWireError::LengthMismatch {
                expected: 0,
                found: len as i64,
            }
            .into());
        }
        let mut out = LinkedList::new();
        for _ in 0..len {
            out.push_back(self.composite()?);
        }
        Ok(out)
    }

    pub fn bytes(&mut self) -> Result<Vec<u8>> {
        let len: i32 = self.scalar()?;
        if len < 0 {
            return Err(DeepWireError::LengthMismatch {
                expected: 0,
                found: len as i64,
            }
            .into());
        }
        self.read_raw(len as usize)
    }
}

macro_rules! impl_scalar_pack_unpack {
    ($($t:ty),* $(,)?) => {
        $(
            impl<X: SourceTransport> Pack<X> for $t {
                fn pack(&self, msg: &mut Message<X, Source>) -> Result<()> {
                    msg.scalar(*self)
                }
            }
            impl<X: SinkTransport> Unpack<X> for $t {
                fn unpack(msg: &mut Message<X, Sink>) -> Result<Self> {
                    msg.scalar()
                }
            }
        )*
    };
}

impl_scalar_pack_unpack!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, f32, f64, bool);
