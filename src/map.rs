//! Ordered maps layered on [`RbTree`].
//!
//! Entries are stored as `(K, V)` pairs ordered by their first component. Mutable access only
//! ever reaches the value half of a pair, so the key order can't be disturbed from outside.

use core::{fmt, iter::FusedIterator, mem, ops::Bound};

use crate::{entry, Compare, First, Global, IntoIter, Less, NodeAlloc, RbTree};

type Tree<K, V, C, A> = RbTree<(K, V), First, C, A>;

/// An ordered map with unique keys, based on a red-black tree.
pub struct RbMap<K, V, C = Less, A: NodeAlloc = Global> {
    tree: Tree<K, V, C, A>,
}

impl<K, V, C, A> RbMap<K, V, C, A>
where
    C: Compare<K> + Default,
    A: NodeAlloc + Default,
{
    /// Creates a new, empty `RbMap`.
    pub fn new() -> Self {
        Self::with_parts(C::default(), A::default())
    }
}

impl<K, V, C, A> Default for RbMap<K, V, C, A>
where
    C: Compare<K> + Default,
    A: NodeAlloc + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, A> RbMap<K, V, C, A>
where
    C: Compare<K>,
    A: NodeAlloc,
{
    /// Creates a new, empty `RbMap` ordered by `compare`, allocating from `alloc`.
    pub const fn with_parts(compare: C, alloc: A) -> Self {
        RbMap {
            tree: RbTree::with_parts(First, compare, alloc),
        }
    }

    /// Returns the underlying tree.
    pub fn as_tree(&self) -> &Tree<K, V, C, A> {
        &self.tree
    }

    /// Returns `true` if the map contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of elements in the map.
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already held `key`, its value is replaced and the old value returned; the
    /// stored key is left as it was.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.tree.entry(&key) {
            entry::Entry::Occupied(mut entry) => Some(mem::replace(&mut entry.value_mut().1, value)),
            entry::Entry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Inserts a key-value pair only if `key` is absent.
    ///
    /// Returns `true` if the pair was inserted. An existing value is never overwritten.
    pub fn try_insert(&mut self, key: K, value: V) -> bool {
        self.tree.insert_unique((key, value)).1
    }

    /// Returns `true` if the map contains a value associated with `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Returns a reference to the value associated with `key`.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(key).map(|(_, v)| v)
    }

    /// Returns the stored key-value pair for `key`.
    #[inline]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.get(key).map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value associated with `key`.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree.find_mut(key).into_value_mut().map(|(_, v)| v)
    }

    /// Returns the value for `key`, inserting `V::default()` first if it is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Gets the entry for `key` for in-place manipulation.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C, A> {
        match self.tree.entry(&key) {
            entry::Entry::Occupied(inner) => Entry::Occupied(OccupiedEntry { inner }),
            entry::Entry::Vacant(inner) => Entry::Vacant(VacantEntry { key, inner }),
        }
    }

    /// Removes the value associated with `key` from the map.
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes and returns the stored key-value pair for `key`.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.tree.find_mut(key).remove_current()
    }

    /// Returns the first key-value pair in the map.
    ///
    /// The returned key is the minimum key in the map.
    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|(k, v)| (k, v))
    }

    /// Removes and returns the first key-value pair in the map.
    #[inline]
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    /// Returns the last key-value pair in the map.
    ///
    /// The returned key is the maximum key in the map.
    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|(k, v)| (k, v))
    }

    /// Removes and returns the last key-value pair in the map.
    #[inline]
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    /// Returns the first pair whose key is not less than `key`.
    pub fn lower_bound(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.lower_bound(key).get().map(|(k, v)| (k, v))
    }

    /// Returns the first pair whose key is greater than `key`.
    pub fn upper_bound(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.upper_bound(key).get().map(|(k, v)| (k, v))
    }

    /// Returns an iterator over the pairs whose keys lie between `lower` and `upper`.
    pub fn range(&self, lower: Bound<&K>, upper: Bound<&K>) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.range(lower, upper),
        }
    }

    /// Returns an iterator over the pairs of the map, in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    /// Returns an iterator over the keys of the map, in order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over the values of the map, in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Clears the map, removing all elements.
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchanges the contents of two maps in constant time.
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }
}

/// A view into a single entry of an [`RbMap`].
pub enum Entry<'a, K, V, C, A: NodeAlloc> {
    Vacant(VacantEntry<'a, K, V, C, A>),
    Occupied(OccupiedEntry<'a, K, V, C, A>),
}

impl<'a, K, V, C, A> Entry<'a, K, V, C, A>
where
    C: Compare<K>,
    A: NodeAlloc,
{
    /// Inserts `default` if the entry is vacant, and returns the entry's value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        self.or_insert_with(|| default)
    }

    /// Inserts the result of `default` if the entry is vacant, and returns the entry's value.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Inserts `V::default()` if the entry is vacant, and returns the entry's value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }

    /// Modifies the value of an occupied entry in place.
    pub fn and_modify<F: FnOnce(&mut V)>(mut self, f: F) -> Self {
        if let Entry::Occupied(entry) = &mut self {
            f(entry.get_mut());
        }
        self
    }

    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

pub struct VacantEntry<'a, K, V, C, A: NodeAlloc> {
    key: K,
    inner: entry::VacantEntry<'a, (K, V), First, C, A>,
}

impl<'a, K, V, C, A> VacantEntry<'a, K, V, C, A>
where
    C: Compare<K>,
    A: NodeAlloc,
{
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts `value` under the entry's key and returns a reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.inner.insert_mut((self.key, value)).1
    }
}

pub struct OccupiedEntry<'a, K, V, C, A: NodeAlloc> {
    inner: entry::OccupiedEntry<'a, (K, V), First, C, A>,
}

impl<'a, K, V, C, A> OccupiedEntry<'a, K, V, C, A>
where
    C: Compare<K>,
    A: NodeAlloc,
{
    pub fn key(&self) -> &K {
        &self.inner.get().0
    }

    pub fn get(&self) -> &V {
        &self.inner.get().1
    }

    pub fn get_mut(&mut self) -> &mut V {
        &mut self.inner.value_mut().1
    }

    pub fn into_mut(self) -> &'a mut V {
        &mut self.inner.into_value_mut().1
    }

    /// Replaces the entry's value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    pub fn remove(self) -> V {
        self.inner.remove().1
    }

    pub fn remove_entry(self) -> (K, V) {
        self.inner.remove()
    }
}

/// An ordered map allowing duplicate keys, based on a red-black tree.
///
/// Pairs with equivalent keys are kept in insertion order.
pub struct RbMultiMap<K, V, C = Less, A: NodeAlloc = Global> {
    tree: Tree<K, V, C, A>,
}

impl<K, V, C, A> RbMultiMap<K, V, C, A>
where
    C: Compare<K> + Default,
    A: NodeAlloc + Default,
{
    /// Creates a new, empty `RbMultiMap`.
    pub fn new() -> Self {
        Self::with_parts(C::default(), A::default())
    }
}

impl<K, V, C, A> Default for RbMultiMap<K, V, C, A>
where
    C: Compare<K> + Default,
    A: NodeAlloc + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, A> RbMultiMap<K, V, C, A>
where
    C: Compare<K>,
    A: NodeAlloc,
{
    pub const fn with_parts(compare: C, alloc: A) -> Self {
        RbMultiMap {
            tree: RbTree::with_parts(First, compare, alloc),
        }
    }

    pub fn as_tree(&self) -> &Tree<K, V, C, A> {
        &self.tree
    }

    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Inserts a key-value pair after every pair with an equivalent key.
    pub fn insert(&mut self, key: K, value: V) {
        self.tree.insert_equal((key, value));
    }

    /// Returns an iterator over every pair whose key is equivalent to `key`, in insertion order.
    pub fn get_all(&self, key: &K) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.range(Bound::Included(key), Bound::Included(key)),
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Returns the number of pairs whose key is equivalent to `key`.
    pub fn count(&self, key: &K) -> usize {
        self.tree.count(key)
    }

    /// Removes every pair whose key is equivalent to `key`, returning how many were removed.
    pub fn remove(&mut self, key: &K) -> usize {
        self.tree.remove(key)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|(k, v)| (k, v))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|(k, v)| (k, v))
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    pub fn range(&self, lower: Bound<&K>, upper: Bound<&K>) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.range(lower, upper),
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }
}

/// An iterator over the pairs of an [`RbMap`] or [`RbMultiMap`].
pub struct Iter<'a, K, V> {
    inner: crate::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

macro_rules! impl_map_traits {
    ($map:ident) => {
        impl<K, V, C, A> Clone for $map<K, V, C, A>
        where
            K: Clone,
            V: Clone,
            C: Clone,
            A: NodeAlloc + Clone,
        {
            fn clone(&self) -> Self {
                $map {
                    tree: self.tree.clone(),
                }
            }
        }

        impl<K, V, C, A> fmt::Debug for $map<K, V, C, A>
        where
            K: fmt::Debug,
            V: fmt::Debug,
            C: Compare<K>,
            A: NodeAlloc,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.iter()).finish()
            }
        }

        impl<K, V, C, A> Extend<(K, V)> for $map<K, V, C, A>
        where
            C: Compare<K>,
            A: NodeAlloc,
        {
            fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
                for (k, v) in iter {
                    self.insert(k, v);
                }
            }
        }

        impl<K, V, C, A> FromIterator<(K, V)> for $map<K, V, C, A>
        where
            C: Compare<K> + Default,
            A: NodeAlloc + Default,
        {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut map = Self::new();
                map.extend(iter);
                map
            }
        }

        impl<'a, K, V, C, A> IntoIterator for &'a $map<K, V, C, A>
        where
            C: Compare<K>,
            A: NodeAlloc,
        {
            type Item = (&'a K, &'a V);
            type IntoIter = Iter<'a, K, V>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<K, V, C, A: NodeAlloc> IntoIterator for $map<K, V, C, A> {
            type Item = (K, V);
            type IntoIter = IntoIter<(K, V), First, C, A>;

            fn into_iter(self) -> Self::IntoIter {
                self.tree.into_iter()
            }
        }
    };
}

impl_map_traits!(RbMap);
impl_map_traits!(RbMultiMap);
