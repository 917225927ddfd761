use std::io::{ErrorKind, Write};

use binprims_codec::Codec;

use crate::codec::{check_limit, dump_sized, FrameConfig};
use crate::error::{FrameError, Result};

/// Writes complete framed values to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Encode a value with its size header and write it out (blocking).
    pub fn write_value<C: Codec + ?Sized>(&mut self, codec: &C, value: &C::Value) -> Result<()> {
        let size = codec.size_of(value);
        check_limit(size, self.config.max_size)?;
        let buf = dump_sized(codec, value, size, true)?;

        let mut offset = 0usize;
        while offset < buf.len() {
            match self.inner.write(&buf[offset..]) {
                Ok(0) => return Err(FrameError::Io(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent writes.
    pub fn set_max_size(&mut self, max_size: Option<usize>) {
        self.config.max_size = max_size;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use binprims_codec::containers::vec;
    use binprims_codec::prim::{Int, Str, U8};
    use binprims_shape::Shape;
    use bytes::BytesMut;

    use super::*;
    use crate::codec::{decode_framed, load};
    use crate::header::HEADER_SIZE;

    #[test]
    fn write_single_value() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        writer.write_value(&vec(U8), &vec![1, 2, 3]).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire, [4, 0, 0, 0, 0, 0, 0, 0, 3, 1, 2, 3]);
    }

    #[test]
    fn write_multiple_values() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        writer.write_value(&Str, &"one".to_owned()).unwrap();
        writer.write_value(&Str, &"two".to_owned()).unwrap();
        writer.write_value(&Str, &"three".to_owned()).unwrap();

        let mut wire = BytesMut::from(writer.into_inner().into_inner().as_slice());
        let v1 = decode_framed(&mut wire, &Str, None).unwrap().unwrap();
        let v2 = decode_framed(&mut wire, &Str, None).unwrap().unwrap();
        let v3 = decode_framed(&mut wire, &Str, None).unwrap().unwrap();

        assert_eq!((v1.as_str(), v2.as_str(), v3.as_str()), ("one", "two", "three"));
        assert!(wire.is_empty());
    }

    #[test]
    fn payload_too_large_rejected() {
        let cfg = FrameConfig { max_size: Some(4) };
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), cfg);

        let err = writer.write_value(&Str, &"oversized".to_owned()).unwrap_err();
        assert!(matches!(err, FrameError::SizeLimitExceeded { size: 10, max: 4 }));
        assert!(writer.get_ref().get_ref().is_empty());
    }

    #[test]
    fn set_max_size_lifts_limit() {
        let mut writer =
            FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), FrameConfig { max_size: Some(1) });
        assert!(writer.write_value(&Int, &1_000).is_err());

        writer.set_max_size(None);
        writer.write_value(&Int, &1_000).unwrap();
        assert_eq!(writer.config().max_size, None);

        let wire = writer.into_inner().into_inner();
        assert_eq!(load(&Int, &wire[HEADER_SIZE..]).unwrap(), 1_000);
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = FrameWriter::new(sink);

        writer.write_value(&U8, &7).unwrap();

        assert!(flag.load(Ordering::SeqCst));
        assert_eq!(writer.get_ref().data.len(), HEADER_SIZE + 1);
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut writer = FrameWriter::new(cursor);

        let _ = writer.get_ref();
        let _ = writer.get_mut();
        let _inner = writer.into_inner();
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let writer_impl = InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        };

        let mut writer = FrameWriter::new(writer_impl);
        writer.write_value(&Str, &"retry".to_owned()).unwrap();

        let inner = writer.into_inner();
        assert_eq!(inner.data.len(), HEADER_SIZE + 6);
    }

    #[test]
    fn handles_would_block_write_and_flush() {
        let writer_impl = WouldBlockWriteThenFlush {
            wrote_once: false,
            flush_would_block: false,
            data: Vec::new(),
        };

        let mut writer = FrameWriter::new(writer_impl);
        writer.write_value(&Str, &"retry".to_owned()).unwrap();

        let inner = writer.into_inner();
        assert_eq!(inner.data.len(), HEADER_SIZE + 6);
    }

    #[test]
    fn value_is_sized_once_per_write() {
        let counted = CountingSizes::default();
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        writer.write_value(&counted, &vec![1, 2, 3]).unwrap();
        assert_eq!(counted.calls.get(), 1);

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire, [4, 0, 0, 0, 0, 0, 0, 0, 3, 1, 2, 3]);
    }

    /// `vec(U8)` that counts `size_of` calls.
    #[derive(Default)]
    struct CountingSizes {
        calls: Cell<usize>,
    }

    impl Codec for CountingSizes {
        type Value = Vec<u8>;

        fn size_of(&self, value: &Vec<u8>) -> usize {
            self.calls.set(self.calls.get() + 1);
            vec(U8).size_of(value)
        }

        fn write(&self, buf: &mut [u8], pos: usize, value: &Vec<u8>) -> binprims_codec::Result<usize> {
            vec(U8).write(buf, pos, value)
        }

        fn read(&self, buf: &[u8], pos: usize) -> binprims_codec::Result<(Vec<u8>, usize)> {
            vec(U8).read(buf, pos)
        }

        fn shape(&self) -> Shape {
            vec(U8).shape()
        }
    }

    #[test]
    fn write_zero_is_an_error() {
        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.write_value(&U8, &1).unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WriteZero));
    }

    #[test]
    fn written_bytes_decode() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        writer.write_value(&Int, &-300).unwrap();

        let wire = writer.into_inner().into_inner();
        let mut framed = crate::reader::FrameReader::new(Cursor::new(wire));
        assert_eq!(framed.read_value(&Int).unwrap(), -300);
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    struct WouldBlockWriteThenFlush {
        wrote_once: bool,
        flush_would_block: bool,
        data: Vec<u8>,
    }

    impl Write for WouldBlockWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_would_block {
                self.flush_would_block = true;
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
