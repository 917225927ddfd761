//! Sequential composition of codecs.

use binprims_shape::token::builtin;
use binprims_shape::Shape;

use crate::codec::{check_bounds, Codec};
use crate::error::{CodecError, Result};

/// Two values written back to back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pair<A, B>(pub A, pub B);

impl<A: Codec, B: Codec> Codec for Pair<A, B> {
    type Value = (A::Value, B::Value);

    fn size_of(&self, value: &Self::Value) -> usize {
        self.0.size_of(&value.0) + self.1.size_of(&value.1)
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &Self::Value) -> Result<usize> {
        let pos = self.0.write(buf, pos, &value.0)?;
        self.1.write(buf, pos, &value.1)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(Self::Value, usize)> {
        let (a, pos) = self.0.read(buf, pos)?;
        let (b, pos) = self.1.read(buf, pos)?;
        Ok(((a, b), pos))
    }

    fn shape(&self) -> Shape {
        Shape::tuple(vec![self.0.shape(), self.1.shape()])
    }
}

/// Three values written back to back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Triple<A, B, C>(pub A, pub B, pub C);

impl<A: Codec, B: Codec, C: Codec> Codec for Triple<A, B, C> {
    type Value = (A::Value, B::Value, C::Value);

    fn size_of(&self, value: &Self::Value) -> usize {
        self.0.size_of(&value.0) + self.1.size_of(&value.1) + self.2.size_of(&value.2)
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &Self::Value) -> Result<usize> {
        let pos = self.0.write(buf, pos, &value.0)?;
        let pos = self.1.write(buf, pos, &value.1)?;
        self.2.write(buf, pos, &value.2)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(Self::Value, usize)> {
        let (a, pos) = self.0.read(buf, pos)?;
        let (b, pos) = self.1.read(buf, pos)?;
        let (c, pos) = self.2.read(buf, pos)?;
        Ok(((a, b, c), pos))
    }

    fn shape(&self) -> Shape {
        Shape::tuple(vec![self.0.shape(), self.1.shape(), self.2.shape()])
    }
}

/// `None` as `0x00`, `Some(v)` as `0x01` followed by `v`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionCodec<C>(pub C);

impl<C: Codec> Codec for OptionCodec<C> {
    type Value = Option<C::Value>;

    fn size_of(&self, value: &Self::Value) -> usize {
        1 + value.as_ref().map_or(0, |inner| self.0.size_of(inner))
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &Self::Value) -> Result<usize> {
        let body = check_bounds(buf.len(), pos, 1)?;
        match value {
            None => {
                buf[pos] = 0;
                Ok(body)
            }
            Some(inner) => {
                buf[pos] = 1;
                self.0.write(buf, body, inner)
            }
        }
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(Self::Value, usize)> {
        let body = check_bounds(buf.len(), pos, 1)?;
        match buf[pos] {
            0 => Ok((None, body)),
            1 => {
                let (inner, end) = self.0.read(buf, body)?;
                Ok((Some(inner), end))
            }
            tag => Err(CodecError::InvalidTag {
                pos,
                tag,
                what: "option",
            }),
        }
    }

    fn shape(&self) -> Shape {
        Shape::basetype(builtin::OPTION, vec![self.0.shape()])
    }
}
