//! The fixed-width size header.
//!
//! Eight bytes, little-endian two's complement. Only values in
//! `0..=min(i64::MAX, usize::MAX)` are valid lengths; anything else is
//! [`FrameError::MalformedHeader`], whether it is negative or merely too wide
//! for this platform.

use binprims_codec::prim::{Int64, INT64_SIZE};
use binprims_codec::{Codec, CodecError};
use binprims_shape::Shape;

use crate::error::{FrameError, Result};

/// Size header width in bytes.
pub const HEADER_SIZE: usize = INT64_SIZE;

/// Write `len` as a size header at `pos`.
pub fn write_size_header(buf: &mut [u8], pos: usize, len: usize) -> Result<usize> {
    let raw = i64::try_from(len).map_err(|_| FrameError::MalformedHeader { value: len as i128 })?;
    Ok(Int64.write(buf, pos, &raw)?)
}

/// Read a size header at `pos`, returning the length and the offset after it.
pub fn read_size_header(buf: &[u8], pos: usize) -> Result<(usize, usize)> {
    let (raw, end) = Int64.read(buf, pos)?;
    let len = usize::try_from(raw).map_err(|_| FrameError::MalformedHeader {
        value: i128::from(raw),
    })?;
    Ok((len, end))
}

/// The size header as a [`Codec`] for `usize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeHeader;

impl Codec for SizeHeader {
    type Value = usize;

    fn size_of(&self, _value: &usize) -> usize {
        HEADER_SIZE
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &usize) -> binprims_codec::Result<usize> {
        write_size_header(buf, pos, *value).map_err(|err| to_codec_error(err, pos))
    }

    fn read(&self, buf: &[u8], pos: usize) -> binprims_codec::Result<(usize, usize)> {
        read_size_header(buf, pos).map_err(|err| to_codec_error(err, pos))
    }

    fn shape(&self) -> Shape {
        Int64.shape()
    }
}

fn to_codec_error(err: FrameError, pos: usize) -> CodecError {
    match err {
        FrameError::Codec(inner) => inner,
        _ => CodecError::Overflow {
            pos,
            what: "size header",
        },
    }
}
