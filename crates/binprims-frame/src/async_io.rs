//! Async framing on top of tokio.
//!
//! Enabled with the `async` feature. The wire format matches the blocking
//! reader and writer exactly.

use binprims_codec::Codec;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::codec::{check_limit, decode_exact, decode_framed, dump, dump_sized, FrameConfig};
use crate::error::{FrameError, Result};
use crate::header::{read_size_header, HEADER_SIZE};

/// Read one framed value from an async stream.
///
/// Same contract as [`read_from_stream`](crate::codec::read_from_stream): the
/// size limit is enforced before the payload is read.
pub async fn read_from_async_stream<C, R>(
    codec: &C,
    reader: &mut R,
    max_size: Option<usize>,
) -> Result<C::Value>
where
    C: Codec + ?Sized,
    R: AsyncRead + Unpin + ?Sized,
{
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header).await?;
    let (len, _) = read_size_header(&header, 0)?;
    check_limit(len, max_size)?;

    let mut payload = BytesMut::zeroed(len);
    reader.read_exact(&mut payload).await?;
    debug!(len, "read framed payload from async stream");

    decode_exact(codec, &payload)
}

/// Write one framed value to an async stream and flush it.
pub async fn write_to_async_stream<C, W>(codec: &C, writer: &mut W, value: &C::Value) -> Result<()>
where
    C: Codec + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let buf = dump(codec, value, true)?;
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}

/// A `tokio_util` codec that frames values of a single [`Codec`].
///
/// Plug it into `FramedRead`/`FramedWrite` to stream typed values.
#[derive(Debug, Clone)]
pub struct ValueCodec<C> {
    codec: C,
    config: FrameConfig,
}

impl<C: Codec> ValueCodec<C> {
    pub fn new(codec: C) -> Self {
        Self::with_config(codec, FrameConfig::default())
    }

    pub fn with_config(codec: C, config: FrameConfig) -> Self {
        Self { codec, config }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<C: Codec> Decoder for ValueCodec<C> {
    type Item = C::Value;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        decode_framed(src, &self.codec, self.config.max_size)
    }
}

impl<C: Codec> Encoder<C::Value> for ValueCodec<C> {
    type Error = FrameError;

    fn encode(&mut self, item: C::Value, dst: &mut BytesMut) -> Result<()> {
        let size = self.codec.size_of(&item);
        check_limit(size, self.config.max_size)?;
        let frame = dump_sized(&self.codec, &item, size, true)?;
        dst.extend_from_slice(&frame);
        Ok(())
    }
}
