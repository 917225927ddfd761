//! Composable binary codecs with exact byte accounting.
//!
//! A [`Codec`] knows three things about a type: how many bytes a value takes,
//! how to write it at an offset, and how to read it back. Compound codecs are
//! plain concatenations of their parts, so the size predicted by `size_of` must
//! match what `write` produces and `read` consumes, byte for byte.
//!
//! # Crate Structure
//!
//! - [`prim`]: Scalar codecs and the variable-length integer layout
//! - [`combinator`]: Tuples and options
//! - [`iso`]: Codecs for types convertible to an encodable representation
//! - [`iterable`]: Codecs for containers, generic over 0 to 3 element types
//! - [`containers`]: Standard collections built with [`iterable`]

pub mod codec;
pub mod combinator;
pub mod containers;
pub mod error;
pub mod iso;
pub mod iterable;
pub mod prim;

pub use codec::{check_bounds, to_vec, Codec};
pub use combinator::{OptionCodec, Pair, Triple};
pub use error::{CodecError, Result};
pub use iso::{iso0, iso1, iso2, iso3, Iso, IsoCodec};
pub use iterable::{iterable0, iterable1, iterable2, iterable3, Iterable, IterableCodec};
