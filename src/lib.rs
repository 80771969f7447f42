//! A red-black tree engine for ordered associative containers.
//!
//! [`RbTree`] stores values ordered by a key projected out of each value ([`KeyOf`]) and
//! compared with a strict weak ordering ([`Compare`]). Nodes are obtained from a raw block
//! allocator ([`NodeAlloc`]). Sets, maps and their duplicate-key variants are thin layers over
//! the same tree; see [`set`] and [`map`].
//!
//! The tree keeps the classic red-black invariants after every insertion and erasure, so its
//! height is at most `2 * log2(n + 1)`, and caches its first and last nodes so both ends are
//! reachable in constant time.
//!
//! ```
//! use cordyceps_rbtree::RbTree;
//!
//! let mut tree: RbTree<u32> = RbTree::new();
//! for key in [10, 20, 5, 15, 25, 3] {
//!     tree.insert_unique(key);
//! }
//!
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 5, 10, 15, 20, 25]);
//! assert_eq!(tree.lower_bound(&7).get(), Some(&10));
//! assert!(tree.find(&7).is_end());
//! ```

mod alloc;
mod capability;
mod cursor;
mod debug;
mod entry;
mod error;
mod header;
mod iter;
pub mod map;
mod node;
pub mod set;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

use core::{marker::PhantomData, mem, ops::Bound, ptr::NonNull};

use crate::{
    header::{links, maximum, minimum, predecessor, successor, Dir, Header, Link},
    node::Node,
};

pub use crate::{
    alloc::{Global, NodeAlloc, OomHandler, OomRetry},
    capability::{Compare, First, FnLess, Greater, Identity, KeyOf, Less},
    cursor::{Cursor, CursorMut},
    entry::{Entry, OccupiedEntry, VacantEntry},
    error::{TreeError, TreeResult},
    header::{Color, Links},
    iter::{IntoIter, Iter},
    map::{RbMap, RbMultiMap},
    set::{RbMultiSet, RbSet},
};

/// A red-black tree of values of type `V`.
///
/// - `KO` projects the ordering key out of a value ([`Identity`] for sets, [`First`] for maps).
/// - `C` orders keys ([`Less`] by default).
/// - `A` provides node memory ([`Global`] by default).
///
/// The tree exclusively owns every node reachable from its root. Node memory is released only by
/// erasure, [`clear`](RbTree::clear), or dropping the tree.
pub struct RbTree<V, KO = Identity, C = Less, A: NodeAlloc = Global> {
    header: Header<Node<V>>,
    len: usize,
    key_of: KO,
    compare: C,
    alloc: A,
    _owns: PhantomData<V>,
}

// SAFETY: The tree owns its nodes exclusively; shared access never mutates links.
unsafe impl<V: Send, KO: Send, C: Send, A: NodeAlloc + Send> Send for RbTree<V, KO, C, A> {}
unsafe impl<V: Sync, KO: Sync, C: Sync, A: NodeAlloc + Sync> Sync for RbTree<V, KO, C, A> {}

/// Where a unique-key insertion of some key would land.
pub(crate) enum Slot<T> {
    /// No equivalent key exists; a new node belongs at `parent`'s `dir` side.
    Vacant { parent: Link<T>, dir: Dir },
    /// An equivalent key is held by this node.
    Occupied(NonNull<T>),
}

impl<V, KO, C, A> RbTree<V, KO, C, A>
where
    KO: Default,
    C: Default,
    A: NodeAlloc + Default,
{
    /// Returns a new, empty tree.
    pub fn new() -> Self {
        Self::with_parts(KO::default(), C::default(), A::default())
    }
}

impl<V, KO, C, A> Default for RbTree<V, KO, C, A>
where
    KO: Default,
    C: Default,
    A: NodeAlloc + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, KO, C, A: NodeAlloc> RbTree<V, KO, C, A> {
    /// Returns a new, empty tree using the given capabilities.
    pub const fn with_parts(key_of: KO, compare: C, alloc: A) -> Self {
        RbTree {
            header: Header::new(),
            len: 0,
            key_of,
            compare,
            alloc,
            _owns: PhantomData,
        }
    }

    /// Returns `true` if the tree contains no elements.
    pub const fn is_empty(&self) -> bool {
        let empty = self.len() == 0;

        if cfg!(debug_assertions) {
            // Can't use assert_eq!() in const fn.
            assert!(empty == self.header.root.is_none());
        }

        empty
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the key projection.
    pub fn key_of(&self) -> &KO {
        &self.key_of
    }

    /// Returns the key ordering.
    pub fn compare(&self) -> &C {
        &self.compare
    }

    /// Returns the node allocator.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the minimum element of the tree.
    ///
    /// This is a constant-time read of the cached leftmost node.
    pub fn first(&self) -> Option<&V> {
        self.header
            .leftmost
            .map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Returns the maximum element of the tree.
    ///
    /// This is a constant-time read of the cached rightmost node.
    pub fn last(&self) -> Option<&V> {
        self.header
            .rightmost
            .map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Removes and returns the minimum element. Among equivalent keys, this is the earliest
    /// inserted one.
    pub fn pop_first(&mut self) -> Option<V> {
        let node = self.header.leftmost?;
        Some(unsafe { self.remove_node(node) })
    }

    /// Removes and returns the maximum element. Among equivalent keys, this is the most recently
    /// inserted one.
    pub fn pop_last(&mut self) -> Option<V> {
        let node = self.header.rightmost?;
        Some(unsafe { self.remove_node(node) })
    }

    /// Returns an in-order iterator over the tree.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.header, self.header.leftmost, self.header.rightmost, self.len)
    }

    /// Returns a cursor pointing at the first element, or at the end if the tree is empty.
    pub fn cursor_front(&self) -> Cursor<'_, V> {
        Cursor::new(&self.header, self.header.leftmost)
    }

    /// Returns a cursor pointing at the last element, or at the end if the tree is empty.
    pub fn cursor_back(&self) -> Cursor<'_, V> {
        Cursor::new(&self.header, self.header.rightmost)
    }

    /// Returns a cursor pointing at the end position, one past the last element.
    pub fn cursor_end(&self) -> Cursor<'_, V> {
        Cursor::new(&self.header, None)
    }

    /// Returns an editing cursor pointing at the first element.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, V, KO, C, A> {
        let ptr = self.header.leftmost;
        CursorMut::new(self, ptr)
    }

    /// Returns an editing cursor pointing at the last element.
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, V, KO, C, A> {
        let ptr = self.header.rightmost;
        CursorMut::new(self, ptr)
    }

    /// Clears the tree, removing and dropping all elements.
    pub fn clear(&mut self) {
        let Some(root) = self.header.root else {
            return;
        };

        log::debug!("clearing tree of {} node(s)", self.len);

        // Detach everything first so a panicking destructor leaks rather than leaving dangling
        // links behind.
        self.header.reset();
        self.len = 0;

        unsafe { self.destroy_subtree(root) };
    }

    /// Exchanges the contents of two trees, including their capabilities.
    ///
    /// This runs in constant time; no node is touched.
    pub fn swap(&mut self, other: &mut Self) {
        log::trace!("swapping trees of {} and {} node(s)", self.len, other.len);
        mem::swap(self, other);
    }

    /// Unlinks `node`, releases its memory and returns its payload.
    ///
    /// # Safety
    ///
    /// `node` must be an element of `self`.
    pub(crate) unsafe fn remove_node(&mut self, node: NonNull<Node<V>>) -> V {
        unsafe {
            self.header.unlink(node);
            self.len -= 1;
            Node::into_value(&self.alloc, node)
        }
    }

    /// Links a freshly created node at a vacant slot.
    pub(crate) unsafe fn link_node(&mut self, parent: Link<Node<V>>, dir: Dir, node: NonNull<Node<V>>) {
        unsafe { self.header.insert_at(parent, dir, node) };
        self.len += 1;
    }

    pub(crate) fn header(&self) -> &Header<Node<V>> {
        &self.header
    }

    // Destroys a detached subtree in postorder: right subtree, left subtree, then the node.
    // Recursion depth is bounded by the tree height.
    unsafe fn destroy_subtree(&self, node: NonNull<Node<V>>) {
        unsafe {
            if let Some(right) = links(node).right() {
                self.destroy_subtree(right);
            }
            if let Some(left) = links(node).left() {
                self.destroy_subtree(left);
            }
            Node::destroy(&self.alloc, node);
        }
    }

    // Clones the children of `src` under `dst` in preorder, linking each clone before descending
    // so that a panic part-way through leaves a well-formed (if incomplete) tree to drop.
    unsafe fn clone_children(&self, src: NonNull<Node<V>>, dst: NonNull<Node<V>>)
    where
        V: Clone,
    {
        unsafe {
            for dir in [Dir::Left, Dir::Right] {
                if let Some(child) = links(src).child(dir) {
                    let copy = Node::clone_from(&self.alloc, child);
                    links(copy).set_parent(Some(dst));
                    links(dst).set_child(dir, Some(copy));
                    self.clone_children(child, copy);
                }
            }
        }
    }
}

impl<V, KO, C, A> RbTree<V, KO, C, A>
where
    KO: KeyOf<V>,
    C: Compare<KO::Key>,
    A: NodeAlloc,
{
    #[inline]
    unsafe fn node_key<'a>(&self, node: NonNull<Node<V>>) -> &'a KO::Key
    where
        V: 'a,
    {
        unsafe { self.key_of.key_of(&(*node.as_ptr()).value) }
    }

    #[inline]
    fn less(&self, a: &KO::Key, b: &KO::Key) -> bool {
        self.compare.less(a, b)
    }

    // First node whose key is not less than `key`.
    fn lower_bound_raw(&self, key: &KO::Key) -> Link<Node<V>> {
        let mut bound = None;
        let mut opt_cur = self.header.root;

        while let Some(cur) = opt_cur {
            unsafe {
                if !self.less(self.node_key(cur), key) {
                    bound = Some(cur);
                    opt_cur = links(cur).left();
                } else {
                    opt_cur = links(cur).right();
                }
            }
        }

        bound
    }

    // First node whose key is greater than `key`.
    fn upper_bound_raw(&self, key: &KO::Key) -> Link<Node<V>> {
        let mut bound = None;
        let mut opt_cur = self.header.root;

        while let Some(cur) = opt_cur {
            unsafe {
                if self.less(key, self.node_key(cur)) {
                    bound = Some(cur);
                    opt_cur = links(cur).left();
                } else {
                    opt_cur = links(cur).right();
                }
            }
        }

        bound
    }

    fn find_raw(&self, key: &KO::Key) -> Link<Node<V>> {
        self.lower_bound_raw(key)
            .filter(|&node| unsafe { !self.less(key, self.node_key(node)) })
    }

    // Descends as for a unique insertion and reports whether `key` is already present.
    //
    // Only the in-order predecessor of the insertion point needs checking: every key left of the
    // insertion point is not greater than `key`, and the predecessor is the greatest of them.
    pub(crate) fn unique_slot(&self, key: &KO::Key) -> Slot<Node<V>> {
        let mut parent = None;
        let mut dir = Dir::Left;
        let mut opt_cur = self.header.root;

        while let Some(cur) = opt_cur {
            parent = Some(cur);
            dir = if unsafe { self.less(key, self.node_key(cur)) } {
                Dir::Left
            } else {
                Dir::Right
            };
            opt_cur = unsafe { links(cur).child(dir) };
        }

        let pred = match dir {
            Dir::Left if parent == self.header.leftmost => None,
            Dir::Left => parent.and_then(|p| unsafe { predecessor(p) }),
            Dir::Right => parent,
        };

        match pred {
            Some(pred) if unsafe { !self.less(self.node_key(pred), key) } => Slot::Occupied(pred),
            _ => Slot::Vacant { parent, dir },
        }
    }

    // Descends as for a duplicate-allowing insertion. Equivalent keys go right, so a new node
    // lands after every element equivalent to it.
    fn equal_slot(&self, key: &KO::Key) -> (Link<Node<V>>, Dir) {
        let mut parent = None;
        let mut dir = Dir::Left;
        let mut opt_cur = self.header.root;

        while let Some(cur) = opt_cur {
            parent = Some(cur);
            dir = if unsafe { self.less(key, self.node_key(cur)) } {
                Dir::Left
            } else {
                Dir::Right
            };
            opt_cur = unsafe { links(cur).child(dir) };
        }

        (parent, dir)
    }

    fn try_insert_unique_raw(&mut self, value: V) -> TreeResult<(NonNull<Node<V>>, bool)> {
        match self.unique_slot(self.key_of.key_of(&value)) {
            Slot::Occupied(node) => Ok((node, false)),
            Slot::Vacant { parent, dir } => {
                let node = Node::try_create(&self.alloc, value)?;
                unsafe { self.link_node(parent, dir, node) };
                Ok((node, true))
            }
        }
    }

    fn try_insert_equal_raw(&mut self, value: V) -> TreeResult<NonNull<Node<V>>> {
        let (parent, dir) = self.equal_slot(self.key_of.key_of(&value));
        let node = Node::try_create(&self.alloc, value)?;
        unsafe { self.link_node(parent, dir, node) };
        Ok(node)
    }

    /// Inserts `value` unless an element with an equivalent key is already present.
    ///
    /// Returns a cursor at the element holding the key and `true` if `value` was inserted. If an
    /// equivalent element existed, the tree is left unchanged, `value` is dropped, and the cursor
    /// points at the existing element.
    ///
    /// Aborts the process if node allocation fails; see [`try_insert_unique`] for a fallible
    /// version.
    ///
    /// This operation completes in _O(log(n))_ time.
    ///
    /// [`try_insert_unique`]: RbTree::try_insert_unique
    pub fn insert_unique(&mut self, value: V) -> (CursorMut<'_, V, KO, C, A>, bool) {
        let (node, inserted) = self
            .try_insert_unique_raw(value)
            .unwrap_or_else(|err| Node::<V>::alloc_error(err));
        (CursorMut::new(self, Some(node)), inserted)
    }

    /// Like [`insert_unique`](RbTree::insert_unique), but reports allocation failure.
    pub fn try_insert_unique(&mut self, value: V) -> TreeResult<(CursorMut<'_, V, KO, C, A>, bool)> {
        let (node, inserted) = self.try_insert_unique_raw(value)?;
        Ok((CursorMut::new(self, Some(node)), inserted))
    }

    /// Inserts `value`, keeping any elements with equivalent keys.
    ///
    /// The new element is placed after all elements equivalent to it, so equivalent elements are
    /// visited in insertion order.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert_equal(&mut self, value: V) -> CursorMut<'_, V, KO, C, A> {
        let node = self
            .try_insert_equal_raw(value)
            .unwrap_or_else(|err| Node::<V>::alloc_error(err));
        CursorMut::new(self, Some(node))
    }

    /// Like [`insert_equal`](RbTree::insert_equal), but reports allocation failure.
    pub fn try_insert_equal(&mut self, value: V) -> TreeResult<CursorMut<'_, V, KO, C, A>> {
        let node = self.try_insert_equal_raw(value)?;
        Ok(CursorMut::new(self, Some(node)))
    }

    /// Inserts every value of `iter` with [`insert_unique`](RbTree::insert_unique) semantics.
    ///
    /// Returns the number of values actually inserted.
    pub fn extend_unique<I>(&mut self, iter: I) -> usize
    where
        I: IntoIterator<Item = V>,
    {
        let mut inserted = 0;

        for value in iter {
            if self.insert_unique(value).1 {
                inserted += 1;
            }
        }

        inserted
    }

    /// Inserts every value of `iter` with [`insert_equal`](RbTree::insert_equal) semantics.
    pub fn extend_equal<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = V>,
    {
        for value in iter {
            self.insert_equal(value);
        }
    }

    /// Looks up `key` for a unique-key insertion.
    pub fn entry(&mut self, key: &KO::Key) -> Entry<'_, V, KO, C, A> {
        match self.unique_slot(key) {
            Slot::Occupied(node) => Entry::Occupied(OccupiedEntry::new(self, node)),
            Slot::Vacant { parent, dir } => Entry::Vacant(VacantEntry::new(self, parent, dir)),
        }
    }

    /// Returns the first element whose key is equivalent to `key`.
    pub fn get(&self, key: &KO::Key) -> Option<&V> {
        self.find_raw(key)
            .map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Returns `true` if the tree holds an element whose key is equivalent to `key`.
    pub fn contains(&self, key: &KO::Key) -> bool {
        self.find_raw(key).is_some()
    }

    /// Returns a cursor at the first element whose key is equivalent to `key`, or at the end if
    /// there is none.
    pub fn find(&self, key: &KO::Key) -> Cursor<'_, V> {
        Cursor::new(&self.header, self.find_raw(key))
    }

    /// Editing version of [`find`](RbTree::find).
    pub fn find_mut(&mut self, key: &KO::Key) -> CursorMut<'_, V, KO, C, A> {
        let ptr = self.find_raw(key);
        CursorMut::new(self, ptr)
    }

    /// Returns a cursor at the first element whose key is not less than `key`.
    pub fn lower_bound(&self, key: &KO::Key) -> Cursor<'_, V> {
        Cursor::new(&self.header, self.lower_bound_raw(key))
    }

    /// Editing version of [`lower_bound`](RbTree::lower_bound).
    pub fn lower_bound_mut(&mut self, key: &KO::Key) -> CursorMut<'_, V, KO, C, A> {
        let ptr = self.lower_bound_raw(key);
        CursorMut::new(self, ptr)
    }

    /// Returns a cursor at the first element whose key is greater than `key`.
    pub fn upper_bound(&self, key: &KO::Key) -> Cursor<'_, V> {
        Cursor::new(&self.header, self.upper_bound_raw(key))
    }

    /// Editing version of [`upper_bound`](RbTree::upper_bound).
    pub fn upper_bound_mut(&mut self, key: &KO::Key) -> CursorMut<'_, V, KO, C, A> {
        let ptr = self.upper_bound_raw(key);
        CursorMut::new(self, ptr)
    }

    /// Returns `(lower_bound(key), upper_bound(key))`, delimiting every element equivalent to
    /// `key`.
    pub fn equal_range(&self, key: &KO::Key) -> (Cursor<'_, V>, Cursor<'_, V>) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Returns the number of elements whose key is equivalent to `key`.
    ///
    /// This operation completes in _O(log(n) + k)_ time, where `k` is the result.
    pub fn count(&self, key: &KO::Key) -> usize {
        let first = self.lower_bound_raw(key);
        let last = self.upper_bound_raw(key);
        unsafe { distance(first, last) }
    }

    /// Returns an iterator over the elements between `lower` and `upper`.
    ///
    /// An inverted range yields nothing.
    pub fn range(&self, lower: Bound<&KO::Key>, upper: Bound<&KO::Key>) -> Iter<'_, V> {
        let (first, last) = self.resolve_range(lower, upper);

        match first.filter(|_| first != last) {
            Some(head) => unsafe {
                let tail = self.header.prev(last);
                Iter::new(&self.header, Some(head), tail, distance(first, last))
            },
            None => Iter::new(&self.header, None, None, 0),
        }
    }

    /// Removes every element whose key is equivalent to `key`.
    ///
    /// Returns the number of elements removed, which is zero if `key` is absent.
    pub fn remove(&mut self, key: &KO::Key) -> usize {
        let first = self.lower_bound_raw(key);
        let last = self.upper_bound_raw(key);
        unsafe { self.remove_between(first, last) }
    }

    /// Removes every element between `lower` and `upper`, returning how many were removed.
    ///
    /// An inverted range removes nothing. To erase a run of positions rather than keys, use
    /// [`CursorMut::remove_n`].
    pub fn remove_range(&mut self, lower: Bound<&KO::Key>, upper: Bound<&KO::Key>) -> usize {
        let (first, last) = self.resolve_range(lower, upper);
        unsafe { self.remove_between(first, last) }
    }

    // Maps key bounds to a half-open position range `[first, last)`. Inverted ranges collapse to
    // an empty one.
    fn resolve_range(
        &self,
        lower: Bound<&KO::Key>,
        upper: Bound<&KO::Key>,
    ) -> (Link<Node<V>>, Link<Node<V>>) {
        let first = match lower {
            Bound::Included(key) => self.lower_bound_raw(key),
            Bound::Excluded(key) => self.upper_bound_raw(key),
            Bound::Unbounded => self.header.leftmost,
        };

        let last = match upper {
            Bound::Included(key) => self.upper_bound_raw(key),
            Bound::Excluded(key) => self.lower_bound_raw(key),
            Bound::Unbounded => None,
        };

        // Both positions are the first of their equivalence class (or the end), so `last`
        // precedes `first` exactly when its key is strictly less.
        let inverted = match (first, last) {
            (None, Some(_)) => true,
            (Some(f), Some(l)) => unsafe { self.less(self.node_key(l), self.node_key(f)) },
            _ => false,
        };

        if inverted {
            (last, last)
        } else {
            (first, last)
        }
    }

    // Removes `[first, last)`. The successor is computed before each unlink; unlinking never
    // relocates other nodes' identities, so it stays valid.
    unsafe fn remove_between(&mut self, first: Link<Node<V>>, last: Link<Node<V>>) -> usize {
        if first.is_some() && first == self.header.leftmost && last.is_none() {
            let removed = self.len;
            log::debug!("range covers the whole tree; clearing {removed} node(s)");
            self.clear();
            return removed;
        }

        let mut removed = 0;
        let mut opt_cur = first;

        while opt_cur != last {
            let Some(cur) = opt_cur else {
                break;
            };

            unsafe {
                opt_cur = successor(cur);
                drop(self.remove_node(cur));
            }
            removed += 1;
        }

        removed
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        unsafe {
            match self.header.root {
                None => {
                    assert_eq!(self.len, 0, "empty tree must have length 0");
                    assert!(self.header.leftmost.is_none());
                    assert!(self.header.rightmost.is_none());
                }

                Some(root) => {
                    assert_eq!(links(root).parent(), None, "root must not have a parent");
                    assert_eq!(links(root).color(), Color::Black, "root must be black");

                    let mut count = 0;
                    self.assert_invariants_at(root, &mut count);
                    assert_eq!(count, self.len, "length must match node count");

                    assert_eq!(self.header.leftmost, Some(minimum(root)), "stale leftmost");
                    assert_eq!(self.header.rightmost, Some(maximum(root)), "stale rightmost");
                }
            }

            let mut opt_prev: Link<Node<V>> = None;
            let mut opt_cur = self.header.leftmost;
            while let Some(cur) = opt_cur {
                if let Some(prev) = opt_prev {
                    assert!(
                        !self.less(self.node_key(cur), self.node_key(prev)),
                        "in-order traversal must be non-decreasing"
                    );
                }
                opt_prev = Some(cur);
                opt_cur = successor(cur);
            }
        }
    }

    // Checks the subtree at `node` and returns its black height, counting absent children as
    // one black node.
    unsafe fn assert_invariants_at(&self, node: NonNull<Node<V>>, count: &mut usize) -> usize {
        unsafe {
            *count += 1;

            let color = links(node).color();
            let mut heights = [1; 2];

            for dir in [Dir::Left, Dir::Right] {
                if let Some(child) = links(node).child(dir) {
                    // Ensure child's parent link points to this node.
                    assert_eq!(
                        links(child).parent(),
                        Some(node),
                        "child's parent pointer must point to its parent"
                    );

                    if color == Color::Red {
                        assert_eq!(
                            links(child).color(),
                            Color::Black,
                            "red node must not have a red child"
                        );
                    }

                    heights[dir as usize] = self.assert_invariants_at(child, count);
                }
            }

            assert_eq!(heights[0], heights[1], "black heights of siblings must match");

            heights[0] + usize::from(color == Color::Black)
        }
    }
}

// Counts the steps from `first` to `last`.
unsafe fn distance<V>(first: Link<Node<V>>, last: Link<Node<V>>) -> usize {
    let mut n = 0;
    let mut opt_cur = first;

    while opt_cur != last {
        let Some(cur) = opt_cur else {
            break;
        };
        opt_cur = unsafe { successor(cur) };
        n += 1;
    }

    n
}

impl<V, KO, C, A> Clone for RbTree<V, KO, C, A>
where
    V: Clone,
    KO: Clone,
    C: Clone,
    A: NodeAlloc + Clone,
{
    /// Deep-copies the tree, preserving its exact shape and colors.
    fn clone(&self) -> Self {
        let mut tree = RbTree::with_parts(
            self.key_of.clone(),
            self.compare.clone(),
            self.alloc.clone(),
        );

        if let Some(root) = self.header.root {
            unsafe {
                let copy = Node::clone_from(&tree.alloc, root);
                tree.header.root = Some(copy);
                tree.clone_children(root, copy);
                tree.header.reset_extremes();
            }
            tree.len = self.len;

            log::debug!("cloned tree of {} node(s)", self.len);
        }

        tree
    }
}

impl<V, KO, C, A: NodeAlloc> Drop for RbTree<V, KO, C, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'tree, V, KO, C, A: NodeAlloc> IntoIterator for &'tree RbTree<V, KO, C, A> {
    type Item = &'tree V;
    type IntoIter = Iter<'tree, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V, KO, C, A: NodeAlloc> IntoIterator for RbTree<V, KO, C, A> {
    type Item = V;
    type IntoIter = IntoIter<V, KO, C, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
