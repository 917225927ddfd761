//! Codecs for container types, built from length/iterate/reconstruct.
//!
//! A container is encoded as its element count ([`Nat0`]) followed by each
//! element in iteration order:
//!
//! ```text
//! ┌─────────────┬───────────┬───────────┬─────┐
//! │ count (Nat0)│ element 0 │ element 1 │ ... │
//! └─────────────┴───────────┴───────────┴─────┘
//! ```
//!
//! The count is the variable-length integer, not the fixed 8-byte size header
//! used for framing.
//!
//! Every construction takes an [`IdentityToken`]. It never affects the bytes;
//! it only goes into the codec's [`Shape`], so two containers defined at
//! different sites are never mistaken for each other by shape checks.

use std::marker::PhantomData;

use binprims_shape::{IdentityToken, Shape};
use tracing::warn;

use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::prim::Nat0;

/// Container primitives for a family of containers.
///
/// `Params` is the tuple of free element types: `()` for a container with a
/// fixed element type, `(A,)`, `(A, B)` or `(A, B, C)` otherwise.
pub trait Iterable<Params> {
    type Container;
    type Elem;

    /// Number of elements `iterate` visits.
    fn length(container: &Self::Container) -> usize;

    /// Visit every element exactly once, in a fixed order.
    fn iterate(container: &Self::Container, visit: &mut dyn FnMut(&Self::Elem));

    /// Rebuild a container by calling `pull` exactly `len` times.
    ///
    /// Elements arrive in the order `iterate` produced them. Errors from
    /// `pull` must be propagated.
    fn reconstruct(
        len: usize,
        pull: &mut dyn FnMut() -> Result<Self::Elem>,
    ) -> Result<Self::Container>;
}

/// Codec for `M::Container` given a codec for its elements.
pub struct IterableCodec<M, P, E> {
    token: IdentityToken,
    args: Vec<Shape>,
    elem: E,
    _marker: PhantomData<fn() -> (M, P)>,
}

impl<M, P, E> IterableCodec<M, P, E> {
    fn new(token: IdentityToken, args: Vec<Shape>, elem: E) -> Self {
        Self {
            token,
            args,
            elem,
            _marker: PhantomData,
        }
    }

    pub fn token(&self) -> IdentityToken {
        self.token
    }

    /// The element codec.
    pub fn elem(&self) -> &E {
        &self.elem
    }
}

impl<M, P, E: Clone> Clone for IterableCodec<M, P, E> {
    fn clone(&self) -> Self {
        Self::new(self.token, self.args.clone(), self.elem.clone())
    }
}

impl<M, P, E> Codec for IterableCodec<M, P, E>
where
    E: Codec,
    M: Iterable<P, Elem = E::Value>,
{
    type Value = M::Container;

    fn size_of(&self, container: &Self::Value) -> usize {
        let mut size = Nat0.size_of(&M::length(container));
        M::iterate(container, &mut |elem| size += self.elem.size_of(elem));
        size
    }

    fn write(&self, buf: &mut [u8], pos: usize, container: &Self::Value) -> Result<usize> {
        let declared = M::length(container);
        let mut cursor = Nat0.write(buf, pos, &declared)?;
        let mut visited = 0usize;
        let mut failure = None;

        M::iterate(container, &mut |elem| {
            if failure.is_some() {
                return;
            }
            visited += 1;
            match self.elem.write(buf, cursor, elem) {
                Ok(next) => cursor = next,
                Err(err) => failure = Some(err),
            }
        });

        if let Some(err) = failure {
            return Err(err);
        }
        if visited != declared {
            warn!(token = %self.token, declared, visited, "iterate disagrees with length");
            return Err(CodecError::ElementCountMismatch {
                declared,
                actual: visited,
            });
        }
        Ok(cursor)
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(Self::Value, usize)> {
        let (declared, mut cursor) = Nat0.read(buf, pos)?;
        let mut requested = 0usize;

        let container = M::reconstruct(declared, &mut || {
            requested += 1;
            if requested > declared {
                return Err(CodecError::ElementCountMismatch {
                    declared,
                    actual: requested,
                });
            }
            let (elem, next) = self.elem.read(buf, cursor)?;
            cursor = next;
            Ok(elem)
        })?;

        if requested != declared {
            warn!(token = %self.token, declared, requested, "reconstruct pulled wrong element count");
            return Err(CodecError::ElementCountMismatch {
                declared,
                actual: requested,
            });
        }
        Ok((container, cursor))
    }

    fn shape(&self) -> Shape {
        Shape::basetype(self.token, self.args.clone())
    }
}

/// Lift a container whose element type is fixed.
///
/// The shape arguments are the element codec's shape.
pub fn iterable0<M, E>(token: IdentityToken, elem: E) -> IterableCodec<M, (), E>
where
    E: Codec,
    M: Iterable<(), Elem = E::Value>,
{
    let args = vec![elem.shape()];
    IterableCodec::new(token, args, elem)
}

macro_rules! iterable_lifter {
    ($(#[$meta:meta])* $lift:ident, $ctor:ident, $($codec:ident: $arg:ident),+) => {
        $(#[$meta])*
        pub struct $lift<M, F> {
            token: IdentityToken,
            elem: F,
            _marker: PhantomData<fn() -> M>,
        }

        impl<M, F> $lift<M, F> {
            /// Build the container codec for concrete parameter codecs.
            ///
            /// The shape arguments are the parameter codecs' shapes.
            pub fn apply<$($codec,)+ E>(
                &self,
                $($arg: $codec),+
            ) -> IterableCodec<M, ($($codec::Value,)+), E>
            where
                $($codec: Codec,)+
                E: Codec,
                F: Fn($($codec),+) -> E,
                M: Iterable<($($codec::Value,)+), Elem = E::Value>,
            {
                let args = vec![$($arg.shape()),+];
                IterableCodec::new(self.token, args, (self.elem)($($arg),+))
            }

            pub fn token(&self) -> IdentityToken {
                self.token
            }
        }

        /// Start a lifter from the definition-site token and a function
        /// building the element codec out of the parameter codecs.
        pub fn $ctor<M, F>(token: IdentityToken, elem: F) -> $lift<M, F> {
            $lift {
                token,
                elem,
                _marker: PhantomData,
            }
        }
    };
}

iterable_lifter!(
    /// Iterable lifter for containers with one free type parameter.
    IterableLift1, iterable1, C1: c1
);
iterable_lifter!(
    /// Iterable lifter for containers with two free type parameters.
    IterableLift2, iterable2, C1: c1, C2: c2
);
iterable_lifter!(
    /// Iterable lifter for containers with three free type parameters.
    IterableLift3, iterable3, C1: c1, C2: c2, C3: c3
);
