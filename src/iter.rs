use core::iter::FusedIterator;

use crate::{
    header::{predecessor, successor, Header, Link},
    node::Node,
    NodeAlloc, RbTree,
};

/// An in-order iterator over the elements of an [`RbTree`].
///
/// Both ends advance purely along tree links: forward by successor steps and backward by
/// predecessor steps.
pub struct Iter<'tree, V> {
    _header: &'tree Header<Node<V>>,

    head: Link<Node<V>>,
    tail: Link<Node<V>>,

    len: usize,
}

impl<'tree, V> Iter<'tree, V> {
    pub(crate) fn new(
        header: &'tree Header<Node<V>>,
        head: Link<Node<V>>,
        tail: Link<Node<V>>,
        len: usize,
    ) -> Self {
        Iter {
            _header: header,
            head,
            tail,
            len,
        }
    }
}

impl<'tree, V> Iterator for Iter<'tree, V> {
    type Item = &'tree V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let cur = self.head?;
        self.head = unsafe { successor(cur) };
        self.len -= 1;

        Some(unsafe { &(*cur.as_ptr()).value })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let cur = self.tail?;
        self.tail = unsafe { predecessor(cur) };
        self.len -= 1;

        Some(unsafe { &(*cur.as_ptr()).value })
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            _header: self._header,
            head: self.head,
            tail: self.tail,
            len: self.len,
        }
    }
}

/// An owning in-order iterator over the elements of an [`RbTree`].
pub struct IntoIter<V, KO, C, A: NodeAlloc> {
    tree: RbTree<V, KO, C, A>,
}

impl<V, KO, C, A: NodeAlloc> IntoIter<V, KO, C, A> {
    pub(crate) fn new(tree: RbTree<V, KO, C, A>) -> Self {
        IntoIter { tree }
    }
}

impl<V, KO, C, A: NodeAlloc> Iterator for IntoIter<V, KO, C, A> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.tree.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<V, KO, C, A: NodeAlloc> DoubleEndedIterator for IntoIter<V, KO, C, A> {
    fn next_back(&mut self) -> Option<V> {
        self.tree.pop_last()
    }
}

impl<V, KO, C, A: NodeAlloc> ExactSizeIterator for IntoIter<V, KO, C, A> {}

impl<V, KO, C, A: NodeAlloc> FusedIterator for IntoIter<V, KO, C, A> {}
