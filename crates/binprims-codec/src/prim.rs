//! Primitive scalar codecs.
//!
//! Variable-length integers share one layout. Values `0x00..=0x7f` are a
//! single byte; anything larger is a marker byte followed by a little-endian
//! body:
//!
//! ```text
//! ┌────────┬──────────────────────────────┐
//! │ 0xff   │ i8   (Int only, negatives)   │
//! │ 0xfe   │ 16-bit                       │
//! │ 0xfd   │ 32-bit                       │
//! │ 0xfc   │ 64-bit                       │
//! └────────┴──────────────────────────────┘
//! ```

use binprims_shape::token::builtin;
use binprims_shape::Shape;
use bytes::{Buf, BufMut};

use crate::codec::{check_bounds, Codec};
use crate::error::{CodecError, Result};

/// Marker for a negative value that fits in one signed byte.
pub const CODE_NEG_INT8: u8 = 0xff;
/// Marker for a 16-bit body.
pub const CODE_INT16: u8 = 0xfe;
/// Marker for a 32-bit body.
pub const CODE_INT32: u8 = 0xfd;
/// Marker for a 64-bit body.
pub const CODE_INT64: u8 = 0xfc;

fn read_tag(buf: &[u8], pos: usize) -> Result<u8> {
    check_bounds(buf.len(), pos, 1)?;
    Ok(buf[pos])
}

fn take(buf: &[u8], pos: usize, len: usize) -> Result<&[u8]> {
    let end = check_bounds(buf.len(), pos, len)?;
    Ok(&buf[pos..end])
}

fn slot(buf: &mut [u8], pos: usize, len: usize) -> Result<(&mut [u8], usize)> {
    let end = check_bounds(buf.len(), pos, len)?;
    Ok((&mut buf[pos..end], end))
}

/// Non-negative integer in the variable-length layout. Used for every length
/// prefix in the workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nat0;

impl Nat0 {
    fn size_u64(n: u64) -> usize {
        if n < 0x80 {
            1
        } else if n <= u64::from(u16::MAX) {
            3
        } else if n <= u64::from(u32::MAX) {
            5
        } else {
            9
        }
    }
}

impl Codec for Nat0 {
    type Value = usize;

    fn size_of(&self, value: &usize) -> usize {
        Self::size_u64(*value as u64)
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &usize) -> Result<usize> {
        let n = *value as u64;
        let (mut dst, end) = slot(buf, pos, Self::size_u64(n))?;
        if n < 0x80 {
            dst.put_u8(n as u8);
        } else if n <= u64::from(u16::MAX) {
            dst.put_u8(CODE_INT16);
            dst.put_u16_le(n as u16);
        } else if n <= u64::from(u32::MAX) {
            dst.put_u8(CODE_INT32);
            dst.put_u32_le(n as u32);
        } else {
            dst.put_u8(CODE_INT64);
            dst.put_u64_le(n);
        }
        Ok(end)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(usize, usize)> {
        let tag = read_tag(buf, pos)?;
        let body = pos + 1;
        let (n, end) = match tag {
            0x00..=0x7f => (u64::from(tag), body),
            CODE_INT16 => (u64::from(take(buf, body, 2)?.get_u16_le()), body + 2),
            CODE_INT32 => (u64::from(take(buf, body, 4)?.get_u32_le()), body + 4),
            CODE_INT64 => (take(buf, body, 8)?.get_u64_le(), body + 8),
            _ => {
                return Err(CodecError::InvalidTag {
                    pos,
                    tag,
                    what: "nat0",
                })
            }
        };
        let value = usize::try_from(n).map_err(|_| CodecError::Overflow { pos, what: "nat0" })?;
        Ok((value, end))
    }

    fn shape(&self) -> Shape {
        Shape::leaf(builtin::NAT0)
    }
}

/// Signed integer in the variable-length layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Int;

impl Codec for Int {
    type Value = i64;

    fn size_of(&self, value: &i64) -> usize {
        let v = *value;
        if (0..0x80).contains(&v) {
            1
        } else if i8::try_from(v).is_ok() {
            2
        } else if i16::try_from(v).is_ok() {
            3
        } else if i32::try_from(v).is_ok() {
            5
        } else {
            9
        }
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &i64) -> Result<usize> {
        let v = *value;
        let (mut dst, end) = slot(buf, pos, self.size_of(value))?;
        if (0..0x80).contains(&v) {
            dst.put_u8(v as u8);
        } else if let Ok(small) = i8::try_from(v) {
            dst.put_u8(CODE_NEG_INT8);
            dst.put_i8(small);
        } else if let Ok(short) = i16::try_from(v) {
            dst.put_u8(CODE_INT16);
            dst.put_i16_le(short);
        } else if let Ok(word) = i32::try_from(v) {
            dst.put_u8(CODE_INT32);
            dst.put_i32_le(word);
        } else {
            dst.put_u8(CODE_INT64);
            dst.put_i64_le(v);
        }
        Ok(end)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(i64, usize)> {
        let tag = read_tag(buf, pos)?;
        let body = pos + 1;
        match tag {
            0x00..=0x7f => Ok((i64::from(tag), body)),
            CODE_NEG_INT8 => Ok((i64::from(take(buf, body, 1)?.get_i8()), body + 1)),
            CODE_INT16 => Ok((i64::from(take(buf, body, 2)?.get_i16_le()), body + 2)),
            CODE_INT32 => Ok((i64::from(take(buf, body, 4)?.get_i32_le()), body + 4)),
            CODE_INT64 => Ok((take(buf, body, 8)?.get_i64_le(), body + 8)),
            _ => Err(CodecError::InvalidTag {
                pos,
                tag,
                what: "int",
            }),
        }
    }

    fn shape(&self) -> Shape {
        Shape::leaf(builtin::INT)
    }
}

/// Fixed 8-byte little-endian two's-complement integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Int64;

/// Encoded width of [`Int64`].
pub const INT64_SIZE: usize = 8;

impl Codec for Int64 {
    type Value = i64;

    fn size_of(&self, _value: &i64) -> usize {
        INT64_SIZE
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &i64) -> Result<usize> {
        let (mut dst, end) = slot(buf, pos, INT64_SIZE)?;
        dst.put_i64_le(*value);
        Ok(end)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(i64, usize)> {
        let value = take(buf, pos, INT64_SIZE)?.get_i64_le();
        Ok((value, pos + INT64_SIZE))
    }

    fn shape(&self) -> Shape {
        Shape::leaf(builtin::INT64)
    }
}

/// One raw byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct U8;

impl Codec for U8 {
    type Value = u8;

    fn size_of(&self, _value: &u8) -> usize {
        1
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &u8) -> Result<usize> {
        let end = check_bounds(buf.len(), pos, 1)?;
        buf[pos] = *value;
        Ok(end)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(u8, usize)> {
        Ok((read_tag(buf, pos)?, pos + 1))
    }

    fn shape(&self) -> Shape {
        Shape::leaf(builtin::U8)
    }
}

/// `false` as `0x00`, `true` as `0x01`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bool;

impl Codec for Bool {
    type Value = bool;

    fn size_of(&self, _value: &bool) -> usize {
        1
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &bool) -> Result<usize> {
        let end = check_bounds(buf.len(), pos, 1)?;
        buf[pos] = u8::from(*value);
        Ok(end)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(bool, usize)> {
        match read_tag(buf, pos)? {
            0 => Ok((false, pos + 1)),
            1 => Ok((true, pos + 1)),
            tag => Err(CodecError::InvalidTag {
                pos,
                tag,
                what: "bool",
            }),
        }
    }

    fn shape(&self) -> Shape {
        Shape::leaf(builtin::BOOL)
    }
}

/// `()` as a single zero byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unit;

impl Codec for Unit {
    type Value = ();

    fn size_of(&self, _value: &()) -> usize {
        1
    }

    fn write(&self, buf: &mut [u8], pos: usize, _value: &()) -> Result<usize> {
        let end = check_bounds(buf.len(), pos, 1)?;
        buf[pos] = 0;
        Ok(end)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<((), usize)> {
        match read_tag(buf, pos)? {
            0 => Ok(((), pos + 1)),
            tag => Err(CodecError::InvalidTag {
                pos,
                tag,
                what: "unit",
            }),
        }
    }

    fn shape(&self) -> Shape {
        Shape::leaf(builtin::UNIT)
    }
}

/// IEEE-754 double, 8 bytes little-endian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct F64;

impl Codec for F64 {
    type Value = f64;

    fn size_of(&self, _value: &f64) -> usize {
        8
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &f64) -> Result<usize> {
        let (mut dst, end) = slot(buf, pos, 8)?;
        dst.put_f64_le(*value);
        Ok(end)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(f64, usize)> {
        Ok((take(buf, pos, 8)?.get_f64_le(), pos + 8))
    }

    fn shape(&self) -> Shape {
        Shape::leaf(builtin::FLOAT)
    }
}

/// UTF-8 string: [`Nat0`] byte length, then the bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Str;

impl Codec for Str {
    type Value = String;

    fn size_of(&self, value: &String) -> usize {
        Nat0.size_of(&value.len()) + value.len()
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &String) -> Result<usize> {
        write_bytes(buf, pos, value.as_bytes())
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(String, usize)> {
        let (bytes, end) = read_bytes(buf, pos)?;
        let body = end - bytes.len();
        let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 { pos: body })?;
        Ok((text.to_owned(), end))
    }

    fn shape(&self) -> Shape {
        Shape::leaf(builtin::STRING)
    }
}

/// Opaque byte string: [`Nat0`] length, then the bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteString;

impl Codec for ByteString {
    type Value = Vec<u8>;

    fn size_of(&self, value: &Vec<u8>) -> usize {
        Nat0.size_of(&value.len()) + value.len()
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &Vec<u8>) -> Result<usize> {
        write_bytes(buf, pos, value)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(Vec<u8>, usize)> {
        let (bytes, end) = read_bytes(buf, pos)?;
        Ok((bytes.to_vec(), end))
    }

    fn shape(&self) -> Shape {
        Shape::leaf(builtin::BYTES)
    }
}

fn write_bytes(buf: &mut [u8], pos: usize, bytes: &[u8]) -> Result<usize> {
    check_bounds(buf.len(), pos, Nat0.size_of(&bytes.len()) + bytes.len())?;
    let body = Nat0.write(buf, pos, &bytes.len())?;
    let (mut dst, end) = slot(buf, body, bytes.len())?;
    dst.put_slice(bytes);
    Ok(end)
}

fn read_bytes(buf: &[u8], pos: usize) -> Result<(&[u8], usize)> {
    let (len, body) = Nat0.read(buf, pos)?;
    let bytes = take(buf, body, len)?;
    Ok((bytes, body + len))
}
