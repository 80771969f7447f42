//! Caller-supplied capabilities: key projection and strict weak ordering.
//!
//! Both are pure. The tree never asks whether two keys are equal; two keys `a` and `b` are
//! equivalent when neither `less(a, b)` nor `less(b, a)` holds.

use core::marker::PhantomData;

/// Extracts the ordering key from a stored value.
pub trait KeyOf<V: ?Sized> {
    type Key: ?Sized;

    fn key_of<'a>(&self, value: &'a V) -> &'a Self::Key;
}

/// Projects a value onto itself, as used by sets.
#[derive(Copy, Clone, Debug, Default)]
pub struct Identity;

impl<V> KeyOf<V> for Identity {
    type Key = V;

    #[inline]
    fn key_of<'a>(&self, value: &'a V) -> &'a V {
        value
    }
}

/// Projects a pair onto its first component, as used by maps.
#[derive(Copy, Clone, Debug, Default)]
pub struct First;

impl<K, V> KeyOf<(K, V)> for First {
    type Key = K;

    #[inline]
    fn key_of<'a>(&self, value: &'a (K, V)) -> &'a K {
        &value.0
    }
}

/// A strict weak ordering over keys.
pub trait Compare<K: ?Sized> {
    /// Returns `true` if `a` is ordered strictly before `b`.
    fn less(&self, a: &K, b: &K) -> bool;
}

/// Ascending order by `Ord`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Less;

impl<K: Ord + ?Sized> Compare<K> for Less {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

/// Descending order by `Ord`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Greater;

impl<K: Ord + ?Sized> Compare<K> for Greater {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a > b
    }
}

/// Adapts a closure `Fn(&K, &K) -> bool` into a [`Compare`].
///
/// The closure must implement a strict weak ordering; the tree's structure is unspecified (but
/// memory safe) otherwise.
pub struct FnLess<K: ?Sized, F> {
    f: F,
    _key: PhantomData<fn(&K, &K) -> bool>,
}

impl<K: ?Sized, F> FnLess<K, F>
where
    F: Fn(&K, &K) -> bool,
{
    pub const fn new(f: F) -> Self {
        FnLess {
            f,
            _key: PhantomData,
        }
    }
}

impl<K: ?Sized, F: Clone> Clone for FnLess<K, F> {
    fn clone(&self) -> Self {
        FnLess {
            f: self.f.clone(),
            _key: PhantomData,
        }
    }
}

impl<K: ?Sized, F> Compare<K> for FnLess<K, F>
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        (self.f)(a, b)
    }
}
