use core::{mem, ptr::NonNull};

use crate::{
    header::{Dir, Link},
    node::Node,
    Compare, CursorMut, KeyOf, NodeAlloc, RbTree, Slot, TreeResult,
};

/// A view into a single key position of an [`RbTree`], which may be either vacant or occupied.
///
/// Obtained from [`RbTree::entry`]; the lookup is done once and reused by the insertion.
pub enum Entry<'tree, V, KO, C, A: NodeAlloc> {
    Vacant(VacantEntry<'tree, V, KO, C, A>),
    Occupied(OccupiedEntry<'tree, V, KO, C, A>),
}

impl<'tree, V, KO, C, A> Entry<'tree, V, KO, C, A>
where
    KO: KeyOf<V>,
    C: Compare<KO::Key>,
    A: NodeAlloc,
{
    /// Inserts the value produced by `f` if the entry is vacant, and returns a cursor at the
    /// entry's element.
    pub fn or_insert_with<F>(self, f: F) -> CursorMut<'tree, V, KO, C, A>
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Vacant(entry) => entry.insert(f()),
            Entry::Occupied(entry) => entry.into_cursor(),
        }
    }

    /// Returns `true` if the entry holds an element.
    pub fn is_occupied(&self) -> bool {
        matches!(self, Entry::Occupied(_))
    }
}

pub struct VacantEntry<'tree, V, KO, C, A: NodeAlloc> {
    tree: &'tree mut RbTree<V, KO, C, A>,
    parent: Link<Node<V>>,
    dir: Dir,
}

impl<'tree, V, KO, C, A> VacantEntry<'tree, V, KO, C, A>
where
    KO: KeyOf<V>,
    C: Compare<KO::Key>,
    A: NodeAlloc,
{
    pub(crate) fn new(
        tree: &'tree mut RbTree<V, KO, C, A>,
        parent: Link<Node<V>>,
        dir: Dir,
    ) -> Self {
        VacantEntry { tree, parent, dir }
    }

    fn debug_check_slot(&self, value: &V) {
        if cfg!(debug_assertions) {
            let fits = match self.tree.unique_slot(self.tree.key_of().key_of(value)) {
                Slot::Vacant { parent, dir } => parent == self.parent && dir == self.dir,
                Slot::Occupied(_) => false,
            };
            assert!(fits, "value's key must be equivalent to the key used to look up this entry");
        }
    }

    /// Inserts `value` at this entry's position and returns a cursor pointing at it.
    ///
    /// The key of `value` must be equivalent to the key used to retrieve this entry. Any other
    /// key corrupts the ordering (but not the memory safety) of the tree; debug builds panic.
    ///
    /// Aborts the process if node allocation fails.
    pub fn insert(self, value: V) -> CursorMut<'tree, V, KO, C, A> {
        self.debug_check_slot(&value);
        let node = Node::create(self.tree.allocator(), value);
        CursorMut::new(self.link(node), Some(node))
    }

    /// Like [`insert`](VacantEntry::insert), but reports allocation failure.
    pub fn try_insert(self, value: V) -> TreeResult<CursorMut<'tree, V, KO, C, A>> {
        self.debug_check_slot(&value);
        let node = Node::try_create(self.tree.allocator(), value)?;
        Ok(CursorMut::new(self.link(node), Some(node)))
    }

    // Inserts and hands out the whole value mutably; callers only expose its non-key part.
    pub(crate) fn insert_mut(self, value: V) -> &'tree mut V {
        self.debug_check_slot(&value);
        let node = Node::create(self.tree.allocator(), value);
        self.link(node);
        unsafe { &mut (*node.as_ptr()).value }
    }

    // The slot must already have been checked against the node's key.
    fn link(self, node: NonNull<Node<V>>) -> &'tree mut RbTree<V, KO, C, A> {
        unsafe { self.tree.link_node(self.parent, self.dir, node) };
        self.tree
    }
}

pub struct OccupiedEntry<'tree, V, KO, C, A: NodeAlloc> {
    tree: &'tree mut RbTree<V, KO, C, A>,
    node: NonNull<Node<V>>,
}

impl<'tree, V, KO, C, A> OccupiedEntry<'tree, V, KO, C, A>
where
    KO: KeyOf<V>,
    C: Compare<KO::Key>,
    A: NodeAlloc,
{
    pub(crate) fn new(tree: &'tree mut RbTree<V, KO, C, A>, node: NonNull<Node<V>>) -> Self {
        OccupiedEntry { tree, node }
    }

    /// Returns a reference to the element in the entry.
    pub fn get(&self) -> &V {
        unsafe { &(*self.node.as_ptr()).value }
    }

    // Mutable access for collaborators that never touch the key part of a value.
    pub(crate) fn value_mut(&mut self) -> &mut V {
        unsafe { &mut (*self.node.as_ptr()).value }
    }

    pub(crate) fn into_value_mut(self) -> &'tree mut V {
        unsafe { &mut (*self.node.as_ptr()).value }
    }

    /// Converts the entry into a cursor pointing at its element.
    pub fn into_cursor(self) -> CursorMut<'tree, V, KO, C, A> {
        CursorMut::new(self.tree, Some(self.node))
    }

    /// Replaces the element in the entry, returning the previous one.
    ///
    /// The node keeps its position and color; only the payload is exchanged. `value`'s key must
    /// be equivalent to the current element's key; debug builds panic otherwise.
    pub fn replace(&mut self, value: V) -> V {
        if cfg!(debug_assertions) {
            let key_of = self.tree.key_of();
            let compare = self.tree.compare();
            let (old, new) = (key_of.key_of(self.get()), key_of.key_of(&value));
            assert!(
                !compare.less(old, new) && !compare.less(new, old),
                "replacement must have an equivalent key"
            );
        }

        mem::replace(self.value_mut(), value)
    }

    /// Removes and returns the element pointed to by this entry.
    pub fn remove(self) -> V {
        unsafe { self.tree.remove_node(self.node) }
    }
}
