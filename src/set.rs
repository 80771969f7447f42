//! Ordered sets layered on [`RbTree`].

use core::{fmt, ops::Bound};

use crate::{Compare, Global, Identity, IntoIter, Iter, Less, NodeAlloc, RbTree};

/// An ordered set based on a red-black tree.
pub struct RbSet<T, C = Less, A: NodeAlloc = Global> {
    tree: RbTree<T, Identity, C, A>,
}

/// An ordered set allowing duplicate elements, based on a red-black tree.
///
/// Equivalent elements are kept in insertion order.
pub struct RbMultiSet<T, C = Less, A: NodeAlloc = Global> {
    tree: RbTree<T, Identity, C, A>,
}

impl<T, C, A> RbSet<T, C, A>
where
    C: Compare<T>,
    A: NodeAlloc,
{
    /// Adds `value` to the set.
    ///
    /// Returns `false` and drops `value` if an equivalent element is already present.
    pub fn insert(&mut self, value: T) -> bool {
        self.tree.insert_unique(value).1
    }

    /// Returns the stored element equivalent to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.tree.get(value)
    }

    /// Removes the element equivalent to `value`, returning `true` if there was one.
    pub fn remove(&mut self, value: &T) -> bool {
        self.tree.remove(value) != 0
    }

    /// Removes and returns the element equivalent to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.tree.find_mut(value).remove_current()
    }

    /// Returns the first element not less than `value`.
    pub fn lower_bound(&self, value: &T) -> Option<&T> {
        self.tree.lower_bound(value).get()
    }

    /// Returns the first element greater than `value`.
    pub fn upper_bound(&self, value: &T) -> Option<&T> {
        self.tree.upper_bound(value).get()
    }
}

impl<T, C, A> RbMultiSet<T, C, A>
where
    C: Compare<T>,
    A: NodeAlloc,
{
    /// Adds `value` to the set, after every element equivalent to it.
    pub fn insert(&mut self, value: T) {
        self.tree.insert_equal(value);
    }

    /// Removes every element equivalent to `value`, returning how many were removed.
    pub fn remove(&mut self, value: &T) -> usize {
        self.tree.remove(value)
    }

    /// Removes one element equivalent to `value`, the earliest inserted.
    pub fn remove_one(&mut self, value: &T) -> Option<T> {
        self.tree.find_mut(value).remove_current()
    }

    /// Returns an iterator over every element equivalent to `value`, in insertion order.
    pub fn equal_range(&self, value: &T) -> Iter<'_, T> {
        self.tree.range(Bound::Included(value), Bound::Included(value))
    }
}

macro_rules! impl_set {
    ($set:ident) => {
        impl<T, C, A> $set<T, C, A>
        where
            C: Compare<T> + Default,
            A: NodeAlloc + Default,
        {
            pub fn new() -> Self {
                Self::with_parts(C::default(), A::default())
            }
        }

        impl<T, C, A> Default for $set<T, C, A>
        where
            C: Compare<T> + Default,
            A: NodeAlloc + Default,
        {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T, C, A> $set<T, C, A>
        where
            C: Compare<T>,
            A: NodeAlloc,
        {
            pub const fn with_parts(compare: C, alloc: A) -> Self {
                $set {
                    tree: RbTree::with_parts(Identity, compare, alloc),
                }
            }

            pub fn as_tree(&self) -> &RbTree<T, Identity, C, A> {
                &self.tree
            }

            pub const fn is_empty(&self) -> bool {
                self.tree.is_empty()
            }

            pub const fn len(&self) -> usize {
                self.tree.len()
            }

            pub fn contains(&self, value: &T) -> bool {
                self.tree.contains(value)
            }

            /// Returns the number of elements equivalent to `value`.
            pub fn count(&self, value: &T) -> usize {
                self.tree.count(value)
            }

            pub fn first(&self) -> Option<&T> {
                self.tree.first()
            }

            pub fn last(&self) -> Option<&T> {
                self.tree.last()
            }

            pub fn pop_first(&mut self) -> Option<T> {
                self.tree.pop_first()
            }

            pub fn pop_last(&mut self) -> Option<T> {
                self.tree.pop_last()
            }

            pub fn range(&self, lower: Bound<&T>, upper: Bound<&T>) -> Iter<'_, T> {
                self.tree.range(lower, upper)
            }

            pub fn iter(&self) -> Iter<'_, T> {
                self.tree.iter()
            }

            pub fn clear(&mut self) {
                self.tree.clear();
            }

            pub fn swap(&mut self, other: &mut Self) {
                self.tree.swap(&mut other.tree);
            }
        }

        impl<T, C, A> Clone for $set<T, C, A>
        where
            T: Clone,
            C: Clone,
            A: NodeAlloc + Clone,
        {
            fn clone(&self) -> Self {
                $set {
                    tree: self.tree.clone(),
                }
            }
        }

        impl<T: fmt::Debug, C, A: NodeAlloc> fmt::Debug for $set<T, C, A> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_set().entries(self.tree.iter()).finish()
            }
        }

        impl<T, C, A> Extend<T> for $set<T, C, A>
        where
            C: Compare<T>,
            A: NodeAlloc,
        {
            fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
                for value in iter {
                    self.insert(value);
                }
            }
        }

        impl<T, C, A> FromIterator<T> for $set<T, C, A>
        where
            C: Compare<T> + Default,
            A: NodeAlloc + Default,
        {
            fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
                let mut set = Self::new();
                set.extend(iter);
                set
            }
        }

        impl<'a, T, C, A: NodeAlloc> IntoIterator for &'a $set<T, C, A> {
            type Item = &'a T;
            type IntoIter = Iter<'a, T>;

            fn into_iter(self) -> Self::IntoIter {
                self.tree.iter()
            }
        }

        impl<T, C, A: NodeAlloc> IntoIterator for $set<T, C, A> {
            type Item = T;
            type IntoIter = IntoIter<T, Identity, C, A>;

            fn into_iter(self) -> Self::IntoIter {
                self.tree.into_iter()
            }
        }
    };
}

impl_set!(RbSet);
impl_set!(RbMultiSet);
