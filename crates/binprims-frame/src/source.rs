//! Byte sources for stream decoding.

use std::io::{self, Read};

/// Something that fills `buf[offset..offset + len]` completely or fails.
///
/// Blocking, retries and timeouts are the implementation's business; the
/// framing code calls `pull` once per header and once per payload.
pub trait Pull {
    fn pull(&mut self, buf: &mut [u8], offset: usize, len: usize) -> io::Result<()>;
}

impl<R: Read + ?Sized> Pull for R {
    fn pull(&mut self, buf: &mut [u8], offset: usize, len: usize) -> io::Result<()> {
        let range = pull_range(buf.len(), offset, len)?;
        self.read_exact(&mut buf[range])
    }
}

/// A [`Pull`] backed by a closure.
pub struct PullFn<F>(F);

/// Wrap a closure as a byte source.
///
/// ```
/// use binprims_frame::source::{pull_fn, Pull};
///
/// let mut source = pull_fn(|buf: &mut [u8], offset: usize, len: usize| {
///     buf[offset..offset + len].fill(0x2a);
///     Ok(())
/// });
/// let mut buf = [0u8; 4];
/// source.pull(&mut buf, 1, 2).unwrap();
/// assert_eq!(buf, [0, 0x2a, 0x2a, 0]);
/// ```
pub fn pull_fn<F>(f: F) -> PullFn<F>
where
    F: FnMut(&mut [u8], usize, usize) -> io::Result<()>,
{
    PullFn(f)
}

impl<F> Pull for PullFn<F>
where
    F: FnMut(&mut [u8], usize, usize) -> io::Result<()>,
{
    fn pull(&mut self, buf: &mut [u8], offset: usize, len: usize) -> io::Result<()> {
        pull_range(buf.len(), offset, len)?;
        (self.0)(buf, offset, len)
    }
}

fn pull_range(buf_len: usize, offset: usize, len: usize) -> io::Result<std::ops::Range<usize>> {
    match offset.checked_add(len) {
        Some(end) if end <= buf_len => Ok(offset..end),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("pull range {offset}+{len} outside buffer of {buf_len} bytes"),
        )),
    }
}
