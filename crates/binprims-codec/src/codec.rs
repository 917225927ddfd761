use std::sync::Arc;

use binprims_shape::Shape;

use crate::error::{CodecError, Result};

/// Size, write and read operations for one type.
///
/// Implementations must keep exact accounting: `write` at `pos` returns
/// `pos + size_of(value)`, and `read` at the same `pos` returns an equivalent
/// value together with that same end offset. Compound codecs rely on this to
/// concatenate sub-encodings without delimiters.
pub trait Codec {
    /// The type this codec encodes.
    type Value;

    /// Number of bytes `write` will produce for `value`.
    fn size_of(&self, value: &Self::Value) -> usize;

    /// Write `value` at `pos`, returning the offset just past it.
    fn write(&self, buf: &mut [u8], pos: usize, value: &Self::Value) -> Result<usize>;

    /// Read a value at `pos`, returning it with the offset just past it.
    fn read(&self, buf: &[u8], pos: usize) -> Result<(Self::Value, usize)>;

    /// Structural description of the encoding.
    fn shape(&self) -> Shape;
}

impl<C: Codec + ?Sized> Codec for &C {
    type Value = C::Value;

    fn size_of(&self, value: &Self::Value) -> usize {
        (**self).size_of(value)
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &Self::Value) -> Result<usize> {
        (**self).write(buf, pos, value)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(Self::Value, usize)> {
        (**self).read(buf, pos)
    }

    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

impl<C: Codec + ?Sized> Codec for Arc<C> {
    type Value = C::Value;

    fn size_of(&self, value: &Self::Value) -> usize {
        (**self).size_of(value)
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &Self::Value) -> Result<usize> {
        (**self).write(buf, pos, value)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(Self::Value, usize)> {
        (**self).read(buf, pos)
    }

    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

/// Return `pos + needed` if `len` bytes hold that many bytes starting at `pos`.
pub fn check_bounds(len: usize, pos: usize, needed: usize) -> Result<usize> {
    match pos.checked_add(needed) {
        Some(end) if end <= len => Ok(end),
        _ => Err(CodecError::BufferTooShort { pos, needed, len }),
    }
}

/// Encode `value` into a freshly allocated buffer of exactly its size.
pub fn to_vec<C: Codec + ?Sized>(codec: &C, value: &C::Value) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; codec.size_of(value)];
    codec.write(&mut buf, 0, value)?;
    Ok(buf)
}
