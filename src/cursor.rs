use core::{fmt, ptr};

use crate::{
    header::{Header, Link},
    node::Node,
    NodeAlloc, RbTree,
};

/// A cursor over an [`RbTree`].
///
/// A cursor points either to an element of the tree or to the "end" non-element, one past the
/// last element, which connects the last element to the first.
pub struct Cursor<'tree, V> {
    header: &'tree Header<Node<V>>,
    ptr: Link<Node<V>>,
}

impl<'tree, V> Cursor<'tree, V> {
    pub(crate) fn new(header: &'tree Header<Node<V>>, ptr: Link<Node<V>>) -> Cursor<'tree, V> {
        Cursor { header, ptr }
    }

    /// Moves the cursor to the next element of the `RbTree`.
    ///
    /// If the cursor is pointing to the end, this method moves it to the first element. If it is
    /// pointing to the last element, this method moves it to the end.
    pub fn move_next(&mut self) {
        self.ptr = unsafe { self.header.next(self.ptr) };
    }

    /// Moves the cursor to the previous element of the `RbTree`.
    ///
    /// If the cursor is pointing to the end, this method moves it to the last element. If it is
    /// pointing to the first element, this method moves it to the end.
    pub fn move_prev(&mut self) {
        self.ptr = unsafe { self.header.prev(self.ptr) };
    }

    /// Returns a reference to the element pointed to by the cursor.
    ///
    /// This returns `None` if the cursor is currently pointing to the end.
    pub fn get(&self) -> Option<&'tree V> {
        self.ptr.map(|p| unsafe { &(*p.as_ptr()).value })
    }

    /// Returns a reference to the next element.
    ///
    /// If the cursor is pointing to the end, this method returns the first element. If it is
    /// pointing to the last element, this method returns `None`.
    pub fn peek_next(&self) -> Option<&'tree V> {
        unsafe { self.header.next(self.ptr) }.map(|p| unsafe { &(*p.as_ptr()).value })
    }

    /// Returns a reference to the previous element.
    ///
    /// If the cursor is pointing to the end, this method returns the last element. If it is
    /// pointing to the first element, this method returns `None`.
    pub fn peek_prev(&self) -> Option<&'tree V> {
        unsafe { self.header.prev(self.ptr) }.map(|p| unsafe { &(*p.as_ptr()).value })
    }

    /// Returns `true` if the cursor is pointing to the end.
    pub fn is_end(&self) -> bool {
        self.ptr.is_none()
    }
}

impl<V> Clone for Cursor<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Cursor<'_, V> {}

/// Two cursors are equal when they point at the same position of the same tree.
impl<V> PartialEq for Cursor<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.header, other.header) && self.ptr == other.ptr
    }
}

impl<V> Eq for Cursor<'_, V> {}

impl<V: fmt::Debug> fmt::Debug for Cursor<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// A cursor over an [`RbTree`] which supports removal.
///
/// A cursor points either to an element of the tree or to the "end" non-element, one past the
/// last element, which connects the last element to the first.
pub struct CursorMut<'tree, V, KO, C, A: NodeAlloc> {
    tree: &'tree mut RbTree<V, KO, C, A>,
    ptr: Link<Node<V>>,
}

impl<'tree, V, KO, C, A: NodeAlloc> CursorMut<'tree, V, KO, C, A> {
    pub(crate) fn new(
        tree: &'tree mut RbTree<V, KO, C, A>,
        ptr: Link<Node<V>>,
    ) -> CursorMut<'tree, V, KO, C, A> {
        CursorMut { tree, ptr }
    }

    /// Returns a read-only cursor pointing to the current element.
    ///
    /// The `CursorMut` remains immutably borrowed for the lifetime of the returned `Cursor`.
    pub fn as_cursor(&self) -> Cursor<'_, V> {
        Cursor::new(self.tree.header(), self.ptr)
    }

    /// Moves the cursor to the next element of the `RbTree`.
    ///
    /// If the cursor is pointing to the end, this method will move it to the first element. If
    /// it is pointing to the last element, this method will move it to the end.
    pub fn move_next(&mut self) {
        self.ptr = unsafe { self.tree.header().next(self.ptr) };
    }

    /// Moves the cursor to the previous element of the `RbTree`.
    ///
    /// If the cursor is pointing to the end, this method will move it to the last element. If it
    /// is pointing to the first element, this method will move it to the end.
    pub fn move_prev(&mut self) {
        self.ptr = unsafe { self.tree.header().prev(self.ptr) };
    }

    /// Returns a reference to the element pointed to by the cursor.
    ///
    /// This returns `None` if the cursor is currently pointing to the end.
    pub fn get(&self) -> Option<&V> {
        self.ptr.map(|p| unsafe { &(*p.as_ptr()).value })
    }

    /// Returns a mutable reference to the element pointed to by the cursor.
    ///
    /// This returns `None` if the cursor is currently pointing to the end.
    ///
    /// # Safety
    ///
    /// The caller must ensure that modifications to the returned value do not violate the
    /// ordering of the tree. In particular, the result of comparisons between the key of the
    /// returned element and the keys of other elements in the tree must not change.
    pub unsafe fn get_mut(&mut self) -> Option<&mut V> {
        self.ptr.map(|p| unsafe { &mut (*p.as_ptr()).value })
    }

    /// Consumes the cursor, returning a reference to the current element that borrows the
    /// tree for `'tree`.
    pub fn into_ref(self) -> Option<&'tree V> {
        self.ptr.map(|p| unsafe { &(*p.as_ptr()).value })
    }

    // Used by collaborators that expose only the non-key part of a value mutably.
    pub(crate) fn into_value_mut(self) -> Option<&'tree mut V> {
        self.ptr.map(|p| unsafe { &mut (*p.as_ptr()).value })
    }

    /// Returns a reference to the next element.
    ///
    /// If the cursor is pointing to the end, this method returns the first element. If it is
    /// pointing to the last element, this method returns `None`.
    pub fn peek_next(&self) -> Option<&V> {
        unsafe { self.tree.header().next(self.ptr) }.map(|p| unsafe { &(*p.as_ptr()).value })
    }

    /// Returns a reference to the previous element.
    ///
    /// If the cursor is pointing to the end, this method returns the last element. If it is
    /// pointing to the first element, this method returns `None`.
    pub fn peek_prev(&self) -> Option<&V> {
        unsafe { self.tree.header().prev(self.ptr) }.map(|p| unsafe { &(*p.as_ptr()).value })
    }

    /// Returns `true` if the cursor is pointing to the end.
    pub fn is_end(&self) -> bool {
        self.ptr.is_none()
    }

    /// Removes the current element from the tree.
    ///
    /// This returns the removed element and moves the cursor to the next element. If the cursor is
    /// pointing to the end, this method returns `None`, and neither the tree nor the cursor is
    /// modified.
    pub fn remove_current(&mut self) -> Option<V> {
        let remove = self.ptr?;

        self.move_next();

        Some(unsafe { self.tree.remove_node(remove) })
    }

    /// Removes up to `n` elements starting at the current one, and returns how many were removed.
    ///
    /// This erases the positions from the current element up to (but not including) the element
    /// `n` steps further on, stopping early at the end. The cursor is left at the first element
    /// after the removed run, or at the end.
    pub fn remove_n(&mut self, n: usize) -> usize {
        let mut removed = 0;
        while removed < n && self.remove_current().is_some() {
            removed += 1;
        }
        removed
    }

    /// Removes the current element from the tree.
    ///
    /// This returns the removed element and moves the cursor to the previous element. If the
    /// cursor is pointing to the end, this method returns `None`, and neither the tree nor the
    /// cursor is modified.
    pub fn remove_current_and_move_prev(&mut self) -> Option<V> {
        let remove = self.ptr?;

        self.move_prev();

        Some(unsafe { self.tree.remove_node(remove) })
    }
}
