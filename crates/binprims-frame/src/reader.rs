use std::io::{ErrorKind, Read};

use binprims_codec::Codec;
use bytes::BytesMut;

use crate::codec::{decode_framed, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads framed values from any `Read` stream.
///
/// Handles partial reads internally, so callers always get complete values.
/// Bytes received before an I/O error stay buffered: after a `WouldBlock` or
/// timeout the next [`read_value`](Self::read_value) resumes the same frame.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next framed value (blocking).
    ///
    /// At end of stream the error satisfies
    /// [`FrameError::is_connection_closed`](crate::FrameError::is_connection_closed).
    pub fn read_value<C: Codec + ?Sized>(&mut self, codec: &C) -> Result<C::Value> {
        loop {
            if let Some(value) = decode_framed(&mut self.buf, codec, self.config.max_size)? {
                return Ok(value);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::Io(ErrorKind::UnexpectedEof.into()));
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Number of received bytes not yet returned as a value.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    ///
    /// Buffered bytes are discarded.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent reads.
    pub fn set_max_size(&mut self, max_size: Option<usize>) {
        self.config.max_size = max_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
