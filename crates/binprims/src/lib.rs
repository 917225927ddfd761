//! Compositional binary codecs with exact sizing and size-prefixed framing.
//!
//! binprims builds codecs for user-defined types out of smaller codecs. Every
//! codec predicts its encoded size before writing, so a value is encoded into
//! a buffer allocated exactly once.
//!
//! # Crate Structure
//!
//! - [`shape`]: identity tokens, shape descriptions and the compatibility registry
//! - [`codec`]: the `Codec` trait, primitives, and the isomorphism and iterable lifters
//! - [`frame`]: size header, dump/load, and stream reads and writes

/// Re-export shape types.
pub mod shape {
    pub use binprims_shape::*;
}

/// Re-export codec types.
pub mod codec {
    pub use binprims_codec::*;
}

/// Re-export frame types.
pub mod frame {
    pub use binprims_frame::*;
}

pub use binprims_codec::{Codec, CodecError};
pub use binprims_frame::{dump, load, read_from_stream, FrameError};
pub use binprims_shape::{IdentityToken, Shape};
