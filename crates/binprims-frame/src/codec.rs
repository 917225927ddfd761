use binprims_codec::{Codec, CodecError};
use bytes::{Buf, BytesMut};
use tracing::{debug, warn};

use crate::error::{FrameError, Result};
use crate::header::{read_size_header, write_size_header, HEADER_SIZE};
use crate::source::Pull;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Encode a value into a buffer of exactly the right size.
///
/// Wire format with `with_header`:
/// ```text
/// ┌──────────────────┬──────────────────────┐
/// │ Size (8B LE i64) │ Payload (Size bytes) │
/// └──────────────────┴──────────────────────┘
/// ```
/// Without it, only the payload.
///
/// Fails with [`FrameError::SizeMismatch`] if the codec's `write` does not
/// produce exactly `size_of` bytes.
pub fn dump<C: Codec + ?Sized>(codec: &C, value: &C::Value, with_header: bool) -> Result<BytesMut> {
    dump_sized(codec, value, codec.size_of(value), with_header)
}

/// [`dump`] with `size` already computed by `codec.size_of(value)`.
pub(crate) fn dump_sized<C: Codec + ?Sized>(
    codec: &C,
    value: &C::Value,
    size: usize,
    with_header: bool,
) -> Result<BytesMut> {
    let start = if with_header { HEADER_SIZE } else { 0 };
    let total = start
        .checked_add(size)
        .ok_or(FrameError::MalformedHeader { value: size as i128 })?;

    let mut buf = BytesMut::zeroed(total);
    if with_header {
        write_size_header(&mut buf, 0, size)?;
    }

    let end = codec.write(&mut buf, start, value).map_err(|err| match err {
        CodecError::BufferTooShort { pos, needed, .. } => FrameError::SizeMismatch {
            predicted: size,
            written: pos.saturating_add(needed) - start,
        },
        other => FrameError::Codec(other),
    })?;

    if end < start || end - start != size {
        warn!(predicted = size, end, "codec wrote a different size than it predicted");
        return Err(FrameError::SizeMismatch {
            predicted: size,
            written: end.saturating_sub(start),
        });
    }

    debug!(size, with_header, "dumped value");
    Ok(buf)
}

/// Decode an unheadered dump. Every byte must be consumed.
pub fn load<C: Codec + ?Sized>(codec: &C, bytes: &[u8]) -> Result<C::Value> {
    decode_exact(codec, bytes)
}

/// Read one framed value from a byte source.
///
/// The header is pulled first. If it declares more than `max_size` bytes the
/// read stops with [`FrameError::SizeLimitExceeded`] before any payload buffer
/// is allocated.
///
/// Bytes already pulled for a frame are dropped if a later pull fails. Use
/// [`FrameReader`](crate::FrameReader) or [`decode_framed`] when a stalled
/// source has to be retried.
pub fn read_from_stream<C, P>(codec: &C, source: &mut P, max_size: Option<usize>) -> Result<C::Value>
where
    C: Codec + ?Sized,
    P: Pull + ?Sized,
{
    let mut header = [0u8; HEADER_SIZE];
    source.pull(&mut header, 0, HEADER_SIZE)?;
    let (len, _) = read_size_header(&header, 0)?;
    check_limit(len, max_size)?;

    let mut payload = BytesMut::zeroed(len);
    source.pull(&mut payload, 0, len)?;
    debug!(len, "pulled framed payload");

    decode_exact(codec, &payload)
}

/// Decode a framed value from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_framed<C: Codec + ?Sized>(
    src: &mut BytesMut,
    codec: &C,
    max_size: Option<usize>,
) -> Result<Option<C::Value>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    let (len, _) = read_size_header(&src[..], 0)?;
    check_limit(len, max_size)?;

    let total = HEADER_SIZE
        .checked_add(len)
        .ok_or(FrameError::MalformedHeader { value: len as i128 })?;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(len);
    decode_exact(codec, &payload).map(Some)
}

/// Configuration for framed reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Maximum payload size in bytes, `None` for no limit. Default: 16 MiB.
    pub max_size: Option<usize>,
}

impl FrameConfig {
    /// Accept any length the header can express.
    pub fn unbounded() -> Self {
        Self { max_size: None }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_size: Some(DEFAULT_MAX_PAYLOAD),
        }
    }
}

pub(crate) fn check_limit(len: usize, max_size: Option<usize>) -> Result<()> {
    match max_size {
        Some(max) if len > max => {
            warn!(size = len, max, "rejecting oversized frame");
            Err(FrameError::SizeLimitExceeded { size: len, max })
        }
        _ => Ok(()),
    }
}

pub(crate) fn decode_exact<C: Codec + ?Sized>(codec: &C, payload: &[u8]) -> Result<C::Value> {
    let declared = payload.len();
    let (value, end) = codec.read(payload, 0).map_err(|err| match err {
        CodecError::BufferTooShort { pos, needed, .. } => FrameError::HeaderPayloadMismatch {
            declared,
            consumed: pos.saturating_add(needed),
        },
        other => FrameError::Codec(other),
    })?;

    if end != declared {
        warn!(declared, consumed = end, "payload not fully consumed");
        return Err(FrameError::HeaderPayloadMismatch {
            declared,
            consumed: end,
        });
    }
    Ok(value)
}
