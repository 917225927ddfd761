//! Structural shape fingerprints for binprims codecs.
//!
//! Every codec describes the layout it puts on the wire as a [`Shape`]. Two
//! codecs whose shapes hash to the same [`Digest`] read each other's bytes.
//!
//! Container codecs carry an [`IdentityToken`] chosen at their definition
//! site. Two containers with the same element layout but different tokens get
//! different digests, so they are never treated as interchangeable even
//! though their bytes would line up.
//!
//! The [`ShapeRegistry`] records digests by name and answers compatibility
//! checks between peers or between versions of a stored format.

pub mod config;
pub mod error;
pub mod registry;
pub mod shape;
pub mod token;

pub use config::RegistryConfig;
pub use error::{Result, ShapeError};
pub use registry::ShapeRegistry;
pub use shape::{Digest, Shape};
pub use token::IdentityToken;
