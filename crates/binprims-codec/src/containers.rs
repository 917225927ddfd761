//! Standard collections, encoded through the iterable lifter.
//!
//! Sequences keep their order. Sets and maps are written in their own
//! iteration order and refuse duplicate keys when read back.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;

use binprims_shape::token::builtin;

use crate::codec::Codec;
use crate::combinator::Pair;
use crate::error::{CodecError, Result};
use crate::iterable::{iterable1, iterable2, Iterable, IterableCodec};

/// Upper bound on capacity reserved from an untrusted length prefix.
///
/// Containers still grow past this as elements actually decode.
pub const MAX_PREALLOC: usize = 4096;

/// `Vec<A>`.
pub enum VecOf {}

impl<A> Iterable<(A,)> for VecOf {
    type Container = Vec<A>;
    type Elem = A;

    fn length(container: &Vec<A>) -> usize {
        container.len()
    }

    fn iterate(container: &Vec<A>, visit: &mut dyn FnMut(&A)) {
        container.iter().for_each(visit);
    }

    fn reconstruct(len: usize, pull: &mut dyn FnMut() -> Result<A>) -> Result<Vec<A>> {
        let mut out = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            out.push(pull()?);
        }
        Ok(out)
    }
}

/// `VecDeque<A>`, front to back.
pub enum VecDequeOf {}

impl<A> Iterable<(A,)> for VecDequeOf {
    type Container = VecDeque<A>;
    type Elem = A;

    fn length(container: &VecDeque<A>) -> usize {
        container.len()
    }

    fn iterate(container: &VecDeque<A>, visit: &mut dyn FnMut(&A)) {
        container.iter().for_each(visit);
    }

    fn reconstruct(len: usize, pull: &mut dyn FnMut() -> Result<A>) -> Result<VecDeque<A>> {
        let mut out = VecDeque::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            out.push_back(pull()?);
        }
        Ok(out)
    }
}

/// `BTreeSet<A>`, ascending.
pub enum BTreeSetOf {}

impl<A: Ord> Iterable<(A,)> for BTreeSetOf {
    type Container = BTreeSet<A>;
    type Elem = A;

    fn length(container: &BTreeSet<A>) -> usize {
        container.len()
    }

    fn iterate(container: &BTreeSet<A>, visit: &mut dyn FnMut(&A)) {
        container.iter().for_each(visit);
    }

    fn reconstruct(len: usize, pull: &mut dyn FnMut() -> Result<A>) -> Result<BTreeSet<A>> {
        let mut out = BTreeSet::new();
        for _ in 0..len {
            if !out.insert(pull()?) {
                return Err(CodecError::Duplicate { what: "set element" });
            }
        }
        Ok(out)
    }
}

/// `HashSet<A>`.
pub enum HashSetOf {}

impl<A: Eq + Hash> Iterable<(A,)> for HashSetOf {
    type Container = HashSet<A>;
    type Elem = A;

    fn length(container: &HashSet<A>) -> usize {
        container.len()
    }

    fn iterate(container: &HashSet<A>, visit: &mut dyn FnMut(&A)) {
        container.iter().for_each(visit);
    }

    fn reconstruct(len: usize, pull: &mut dyn FnMut() -> Result<A>) -> Result<HashSet<A>> {
        let mut out = HashSet::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            if !out.insert(pull()?) {
                return Err(CodecError::Duplicate { what: "set element" });
            }
        }
        Ok(out)
    }
}

/// `BTreeMap<K, V>` as ascending `(key, value)` pairs.
///
/// Entries are cloned into pairs while writing.
pub enum BTreeMapOf {}

impl<K: Ord + Clone, V: Clone> Iterable<(K, V)> for BTreeMapOf {
    type Container = BTreeMap<K, V>;
    type Elem = (K, V);

    fn length(container: &BTreeMap<K, V>) -> usize {
        container.len()
    }

    fn iterate(container: &BTreeMap<K, V>, visit: &mut dyn FnMut(&(K, V))) {
        for (key, value) in container {
            visit(&(key.clone(), value.clone()));
        }
    }

    fn reconstruct(
        len: usize,
        pull: &mut dyn FnMut() -> Result<(K, V)>,
    ) -> Result<BTreeMap<K, V>> {
        let mut out = BTreeMap::new();
        for _ in 0..len {
            let (key, value) = pull()?;
            if out.insert(key, value).is_some() {
                return Err(CodecError::Duplicate { what: "map key" });
            }
        }
        Ok(out)
    }
}

/// `HashMap<K, V>` as `(key, value)` pairs.
pub enum HashMapOf {}

impl<K: Eq + Hash + Clone, V: Clone> Iterable<(K, V)> for HashMapOf {
    type Container = HashMap<K, V>;
    type Elem = (K, V);

    fn length(container: &HashMap<K, V>) -> usize {
        container.len()
    }

    fn iterate(container: &HashMap<K, V>, visit: &mut dyn FnMut(&(K, V))) {
        for (key, value) in container {
            visit(&(key.clone(), value.clone()));
        }
    }

    fn reconstruct(
        len: usize,
        pull: &mut dyn FnMut() -> Result<(K, V)>,
    ) -> Result<HashMap<K, V>> {
        let mut out = HashMap::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            let (key, value) = pull()?;
            if out.insert(key, value).is_some() {
                return Err(CodecError::Duplicate { what: "map key" });
            }
        }
        Ok(out)
    }
}

pub type VecCodec<C> = IterableCodec<VecOf, (<C as Codec>::Value,), C>;
pub type VecDequeCodec<C> = IterableCodec<VecDequeOf, (<C as Codec>::Value,), C>;
pub type BTreeSetCodec<C> = IterableCodec<BTreeSetOf, (<C as Codec>::Value,), C>;
pub type HashSetCodec<C> = IterableCodec<HashSetOf, (<C as Codec>::Value,), C>;
pub type BTreeMapCodec<K, V> =
    IterableCodec<BTreeMapOf, (<K as Codec>::Value, <V as Codec>::Value), Pair<K, V>>;
pub type HashMapCodec<K, V> =
    IterableCodec<HashMapOf, (<K as Codec>::Value, <V as Codec>::Value), Pair<K, V>>;

pub fn vec<C: Codec>(elem: C) -> VecCodec<C> {
    iterable1::<VecOf, _>(builtin::VEC, |c: C| c).apply(elem)
}

pub fn vec_deque<C: Codec>(elem: C) -> VecDequeCodec<C> {
    iterable1::<VecDequeOf, _>(builtin::VEC_DEQUE, |c: C| c).apply(elem)
}

pub fn btree_set<C>(elem: C) -> BTreeSetCodec<C>
where
    C: Codec,
    C::Value: Ord,
{
    iterable1::<BTreeSetOf, _>(builtin::BTREE_SET, |c: C| c).apply(elem)
}

pub fn hash_set<C>(elem: C) -> HashSetCodec<C>
where
    C: Codec,
    C::Value: Eq + Hash,
{
    iterable1::<HashSetOf, _>(builtin::HASH_SET, |c: C| c).apply(elem)
}

pub fn btree_map<K, V>(key: K, value: V) -> BTreeMapCodec<K, V>
where
    K: Codec,
    V: Codec,
    K::Value: Ord + Clone,
    V::Value: Clone,
{
    iterable2::<BTreeMapOf, _>(builtin::BTREE_MAP, |k: K, v: V| Pair(k, v)).apply(key, value)
}

pub fn hash_map<K, V>(key: K, value: V) -> HashMapCodec<K, V>
where
    K: Codec,
    V: Codec,
    K::Value: Eq + Hash + Clone,
    V::Value: Clone,
{
    iterable2::<HashMapOf, _>(builtin::HASH_MAP, |k: K, v: V| Pair(k, v)).apply(key, value)
}
