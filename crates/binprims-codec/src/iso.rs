//! Codecs derived from a bijection with an already-encodable representation.
//!
//! A type `T` that converts to and from some `R` with a codec gets a codec of
//! its own: every operation converts and delegates. The wire bytes and the
//! shape are exactly those of `R`.
//!
//! Generic types pick the lifter for their number of free type parameters.
//! The parameter tuple (`()`, `(A,)`, `(A, B)`, `(A, B, C)`) selects which
//! [`Iso`] impl applies, and `apply` turns parameter codecs into the final
//! codec:
//!
//! ```
//! use binprims_codec::iso::{iso1, Iso};
//! use binprims_codec::prim::Int;
//! use binprims_codec::{to_vec, Codec};
//!
//! #[derive(Debug, PartialEq)]
//! struct Wrapped<A>(A);
//!
//! enum WrappedIso {}
//!
//! impl<A: Clone> Iso<(A,)> for WrappedIso {
//!     type Value = Wrapped<A>;
//!     type Repr = A;
//!
//!     fn to_repr(value: &Wrapped<A>) -> A {
//!         value.0.clone()
//!     }
//!
//!     fn of_repr(repr: A) -> Wrapped<A> {
//!         Wrapped(repr)
//!     }
//! }
//!
//! let codec = iso1::<WrappedIso, _>(|inner: Int| inner).apply(Int);
//! let bytes = to_vec(&codec, &Wrapped(300)).unwrap();
//! assert_eq!(codec.read(&bytes, 0).unwrap(), (Wrapped(300), 3));
//! ```

use std::marker::PhantomData;

use binprims_shape::Shape;

use crate::codec::Codec;
use crate::error::Result;

/// Conversion between a value type and its representation.
///
/// `of_repr(to_repr(v))` must be equivalent to `v`. The lifter relies on it
/// and cannot check it.
pub trait Iso<Params> {
    type Value;
    type Repr;

    fn to_repr(value: &Self::Value) -> Self::Repr;

    fn of_repr(repr: Self::Repr) -> Self::Value;
}

/// Codec for `M::Value`, delegating to a codec for `M::Repr`.
pub struct IsoCodec<M, P, R> {
    repr: R,
    _marker: PhantomData<fn() -> (M, P)>,
}

impl<M, P, R> IsoCodec<M, P, R> {
    pub fn new(repr: R) -> Self {
        Self {
            repr,
            _marker: PhantomData,
        }
    }

    /// The representation codec.
    pub fn repr(&self) -> &R {
        &self.repr
    }
}

impl<M, P, R: Clone> Clone for IsoCodec<M, P, R> {
    fn clone(&self) -> Self {
        Self::new(self.repr.clone())
    }
}

impl<M, P, R> Codec for IsoCodec<M, P, R>
where
    R: Codec,
    M: Iso<P, Repr = R::Value>,
{
    type Value = M::Value;

    fn size_of(&self, value: &Self::Value) -> usize {
        self.repr.size_of(&M::to_repr(value))
    }

    fn write(&self, buf: &mut [u8], pos: usize, value: &Self::Value) -> Result<usize> {
        self.repr.write(buf, pos, &M::to_repr(value))
    }

    fn read(&self, buf: &[u8], pos: usize) -> Result<(Self::Value, usize)> {
        let (repr, end) = self.repr.read(buf, pos)?;
        Ok((M::of_repr(repr), end))
    }

    fn shape(&self) -> Shape {
        self.repr.shape()
    }
}

/// Lift a type with no free parameters.
pub fn iso0<M, R>(repr: R) -> IsoCodec<M, (), R>
where
    R: Codec,
    M: Iso<(), Repr = R::Value>,
{
    IsoCodec::new(repr)
}

macro_rules! iso_lifter {
    ($(#[$meta:meta])* $lift:ident, $ctor:ident, $($codec:ident: $arg:ident),+) => {
        $(#[$meta])*
        pub struct $lift<M, F> {
            repr: F,
            _marker: PhantomData<fn() -> M>,
        }

        impl<M, F> $lift<M, F> {
            /// Build the codec for concrete parameter codecs.
            pub fn apply<$($codec,)+ R>(&self, $($arg: $codec),+) -> IsoCodec<M, ($($codec::Value,)+), R>
            where
                $($codec: Codec,)+
                R: Codec,
                F: Fn($($codec),+) -> R,
                M: Iso<($($codec::Value,)+), Repr = R::Value>,
            {
                IsoCodec::new((self.repr)($($arg),+))
            }
        }

        /// Start a lifter from a function building the representation codec
        /// out of the parameter codecs.
        pub fn $ctor<M, F>(repr: F) -> $lift<M, F> {
            $lift {
                repr,
                _marker: PhantomData,
            }
        }
    };
}

iso_lifter!(
    /// Isomorphism lifter for one free type parameter.
    IsoLift1, iso1, C1: c1
);
iso_lifter!(
    /// Isomorphism lifter for two free type parameters.
    IsoLift2, iso2, C1: c1, C2: c2
);
iso_lifter!(
    /// Isomorphism lifter for three free type parameters.
    IsoLift3, iso3, C1: c1, C2: c2, C3: c3
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::to_vec;
    use crate::combinator::{Pair, Triple};
    use crate::containers::vec;
    use crate::prim::{Bool, Int, Str};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Celsius(i64);

    enum CelsiusIso {}

    impl Iso<()> for CelsiusIso {
        type Value = Celsius;
        type Repr = i64;

        fn to_repr(value: &Celsius) -> i64 {
            value.0
        }

        fn of_repr(repr: i64) -> Celsius {
            Celsius(repr)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct NonEmpty<A> {
        head: A,
        tail: Vec<A>,
    }

    enum NonEmptyIso {}

    impl<A: Clone> Iso<(A,)> for NonEmptyIso {
        type Value = NonEmpty<A>;
        type Repr = (A, Vec<A>);

        fn to_repr(value: &NonEmpty<A>) -> (A, Vec<A>) {
            (value.head.clone(), value.tail.clone())
        }

        fn of_repr((head, tail): (A, Vec<A>)) -> NonEmpty<A> {
            NonEmpty { head, tail }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Labeled<K, V> {
        label: K,
        value: V,
    }

    enum LabeledIso {}

    impl<K: Clone, V: Clone> Iso<(K, V)> for LabeledIso {
        type Value = Labeled<K, V>;
        type Repr = (K, V);

        fn to_repr(value: &Labeled<K, V>) -> (K, V) {
            (value.label.clone(), value.value.clone())
        }

        fn of_repr((label, value): (K, V)) -> Labeled<K, V> {
            Labeled { label, value }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Span<A, B, C> {
        start: A,
        end: B,
        tag: C,
    }

    enum SpanIso {}

    impl<A: Clone, B: Clone, C: Clone> Iso<(A, B, C)> for SpanIso {
        type Value = Span<A, B, C>;
        type Repr = (A, B, C);

        fn to_repr(value: &Span<A, B, C>) -> (A, B, C) {
            (value.start.clone(), value.end.clone(), value.tag.clone())
        }

        fn of_repr((start, end, tag): (A, B, C)) -> Span<A, B, C> {
            Span { start, end, tag }
        }
    }

    #[test]
    fn arity0_matches_repr_bytes() {
        let codec = iso0::<CelsiusIso, _>(Int);
        let lifted = to_vec(&codec, &Celsius(-40)).unwrap();
        let raw = to_vec(&Int, &-40).unwrap();

        assert_eq!(lifted, raw);
        assert_eq!(codec.size_of(&Celsius(-40)), raw.len());
        assert_eq!(codec.read(&lifted, 0).unwrap(), (Celsius(-40), raw.len()));
        assert_eq!(codec.shape(), Int.shape());
    }

    #[test]
    fn arity1_roundtrip() {
        let codec = iso1::<NonEmptyIso, _>(|a: Int| Pair(a, vec(a))).apply(Int);
        let value = NonEmpty {
            head: 1,
            tail: vec![2, 3, 1000],
        };

        let bytes = to_vec(&codec, &value).unwrap();
        assert_eq!(bytes.len(), codec.size_of(&value));
        assert_eq!(codec.read(&bytes, 0).unwrap(), (value, bytes.len()));
    }

    #[test]
    fn arity2_roundtrip() {
        let lifter = iso2::<LabeledIso, _>(|k: Str, v: Bool| Pair(k, v));
        let codec = lifter.apply(Str, Bool);
        let value = Labeled {
            label: "enabled".to_owned(),
            value: true,
        };

        let bytes = to_vec(&codec, &value).unwrap();
        assert_eq!(codec.read(&bytes, 0).unwrap(), (value, bytes.len()));
        assert_eq!(codec.shape(), Pair(Str, Bool).shape());
    }

    #[test]
    fn arity3_roundtrip() {
        let codec =
            iso3::<SpanIso, _>(|a: Int, b: Int, c: Str| Triple(a, b, c)).apply(Int, Int, Str);
        let value = Span {
            start: -5,
            end: 70_000,
            tag: "block".to_owned(),
        };

        let bytes = to_vec(&codec, &value).unwrap();
        assert_eq!(bytes.len(), codec.size_of(&value));
        assert_eq!(codec.read(&bytes, 0).unwrap(), (value, bytes.len()));
    }

    #[test]
    fn lifter_is_reusable() {
        let lifter = iso1::<NonEmptyIso, _>(|a: Int| Pair(a, vec(a)));
        let first = lifter.apply(Int);
        let second = lifter.apply(Int);
        assert_eq!(first.shape(), second.shape());
    }
}
