//! Size-prefixed framing for binprims-encoded values.
//!
//! Every framed value is written as:
//! - An 8-byte little-endian signed size header
//! - Exactly that many payload bytes, produced by a [`Codec`](binprims_codec::Codec)
//!
//! Writes allocate once at the exact predicted size. Reads check the header
//! against a configurable limit before allocating the payload.

#[cfg(feature = "async")]
pub mod async_io;
pub mod codec;
pub mod error;
pub mod header;
pub mod reader;
pub mod source;
pub mod writer;

#[cfg(feature = "async")]
pub use async_io::{read_from_async_stream, write_to_async_stream, ValueCodec};
pub use codec::{decode_framed, dump, load, read_from_stream, FrameConfig, DEFAULT_MAX_PAYLOAD};
pub use error::{FrameError, Result};
pub use header::{read_size_header, write_size_header, SizeHeader, HEADER_SIZE};
pub use reader::FrameReader;
pub use source::{pull_fn, Pull, PullFn};
pub use writer::FrameWriter;
