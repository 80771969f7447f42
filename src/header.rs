//! Structural half of the tree: links, colors, and the root/leftmost/rightmost record.
//!
//! Nothing in this module looks at payloads or keys. Every routine here is generic over any
//! `T: Linked<Links<T>>`, so rotations and the two rebalancing walks only ever touch the
//! `Links` embedded in a node.
//
// Conventions used in comments follow Cormen et al.:
// - `x` is the node being repaired, `p(x)` its parent, `g(x)` its grandparent.
// - The black height `bh(x)` is the number of black nodes on any path from `x` (exclusive) down
//   to an absent child.
//
// The red-black invariants are:
// 1. Absent children are black.
// 2. A red node never has a red parent.
// 3. `bh(x)` is well defined for every node.
// 4. The root is black.

use core::{cell::UnsafeCell, marker::PhantomPinned, mem, ops::Not, ptr::NonNull};

use cordyceps::Linked;

pub(crate) type Link<T> = Option<NonNull<T>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// The structural fields of a tree node: one color bit and three links.
///
/// The parent link is a back-reference used for traversal and rotation only. Ownership flows
/// exclusively through the child links.
pub struct Links<T> {
    inner: UnsafeCell<LinksInner<T>>,
}

#[repr(C)]
struct LinksInner<T> {
    parent: Link<T>,
    children: [Link<T>; 2],
    color: Color,
    _unpin: PhantomPinned,
}

impl<T> Links<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: UnsafeCell::new(LinksInner {
                parent: None,
                children: [None; 2],
                color: Color::Red,
                _unpin: PhantomPinned,
            }),
        }
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        unsafe { (*self.inner.get()).color }
    }

    #[inline]
    pub(crate) fn parent(&self) -> Link<T> {
        unsafe { (*self.inner.get()).parent }
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Link<T> {
        unsafe { (*self.inner.get()).children[dir as usize] }
    }

    #[inline]
    pub(crate) fn left(&self) -> Link<T> {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Link<T> {
        self.child(Dir::Right)
    }

    #[inline]
    pub(crate) fn set_color(&self, color: Color) {
        unsafe { (*self.inner.get()).color = color }
    }

    #[inline]
    pub(crate) fn set_parent(&self, parent: Link<T>) -> Link<T> {
        unsafe { mem::replace(&mut (*self.inner.get()).parent, parent) }
    }

    #[inline]
    pub(crate) fn set_child(&self, dir: Dir, child: Link<T>) -> Link<T> {
        unsafe { mem::replace(&mut (*self.inner.get()).children[dir as usize], child) }
    }

    #[inline]
    pub(crate) fn set_left(&self, left: Link<T>) -> Link<T> {
        self.set_child(Dir::Left, left)
    }

    #[inline]
    pub(crate) fn set_right(&self, right: Link<T>) -> Link<T> {
        self.set_child(Dir::Right, right)
    }

    pub(crate) fn clear(&self) {
        self.set_parent(None);
        self.set_left(None);
        self.set_right(None);
        self.set_color(Color::Red);
    }
}

impl<T> Default for Links<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the links of `node`.
///
/// # Safety
///
/// `node` must point to a live node for the whole of `'a`.
#[inline]
pub(crate) unsafe fn links<'a, T>(node: NonNull<T>) -> &'a Links<T>
where
    T: Linked<Links<T>>,
{
    unsafe { T::links(node).as_ref() }
}

/// Absent children count as black.
#[inline]
pub(crate) unsafe fn is_red<T>(node: Link<T>) -> bool
where
    T: Linked<Links<T>>,
{
    node.is_some_and(|n| unsafe { links(n).color() } == Color::Red)
}

/// Returns the leftmost node of the subtree rooted at `node`.
pub(crate) unsafe fn minimum<T>(node: NonNull<T>) -> NonNull<T>
where
    T: Linked<Links<T>>,
{
    let mut cur = node;

    while let Some(left) = unsafe { links(cur).left() } {
        cur = left;
    }

    cur
}

/// Returns the rightmost node of the subtree rooted at `node`.
pub(crate) unsafe fn maximum<T>(node: NonNull<T>) -> NonNull<T>
where
    T: Linked<Links<T>>,
{
    let mut cur = node;

    while let Some(right) = unsafe { links(cur).right() } {
        cur = right;
    }

    cur
}

/// Returns the in-order successor of `node`, or `None` if `node` is the maximum.
pub(crate) unsafe fn successor<T>(node: NonNull<T>) -> Link<T>
where
    T: Linked<Links<T>>,
{
    unsafe {
        if let Some(right) = links(node).right() {
            return Some(minimum(right));
        }

        // Climb while `cur` is a right child. The first ancestor reached from its left side is
        // the successor; running off the root means `node` was the maximum.
        let mut cur = node;
        while let Some(parent) = links(cur).parent() {
            if links(parent).left() == Some(cur) {
                return Some(parent);
            }
            cur = parent;
        }

        None
    }
}

/// Returns the in-order predecessor of `node`, or `None` if `node` is the minimum.
pub(crate) unsafe fn predecessor<T>(node: NonNull<T>) -> Link<T>
where
    T: Linked<Links<T>>,
{
    unsafe {
        if let Some(left) = links(node).left() {
            return Some(maximum(left));
        }

        let mut cur = node;
        while let Some(parent) = links(cur).parent() {
            if links(parent).right() == Some(cur) {
                return Some(parent);
            }
            cur = parent;
        }

        None
    }
}

/// The tree-level anchor record.
///
/// This takes the place of a sentinel node: `root` is the root's (absent) parent, and
/// `leftmost`/`rightmost` cache the extremal nodes so that the first and last positions are
/// reachable in constant time. All three are `None` exactly when the tree is empty.
pub(crate) struct Header<T> {
    pub(crate) root: Link<T>,
    pub(crate) leftmost: Link<T>,
    pub(crate) rightmost: Link<T>,
}

impl<T> Header<T> {
    pub(crate) const fn new() -> Header<T> {
        Header {
            root: None,
            leftmost: None,
            rightmost: None,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.root = None;
        self.leftmost = None;
        self.rightmost = None;
    }
}

impl<T> Header<T>
where
    T: Linked<Links<T>>,
{
    /// Rebuilds `leftmost` and `rightmost` from `root`.
    pub(crate) unsafe fn reset_extremes(&mut self) {
        unsafe {
            self.leftmost = self.root.map(|r| minimum(r));
            self.rightmost = self.root.map(|r| maximum(r));
        }
    }

    /// Steps forward from `pos`. The end position steps to the first node.
    #[inline]
    pub(crate) unsafe fn next(&self, pos: Link<T>) -> Link<T> {
        match pos {
            Some(node) => unsafe { successor(node) },
            None => self.leftmost,
        }
    }

    /// Steps backward from `pos`. The end position steps to the cached last node, since there is
    /// no link structure to climb from there.
    #[inline]
    pub(crate) unsafe fn prev(&self, pos: Link<T>) -> Link<T> {
        match pos {
            Some(node) => unsafe { predecessor(node) },
            None => self.rightmost,
        }
    }

    // Replaces the child pointer of `parent` pointing at `old_child` with `new_child`, or the root
    // if `parent` is `None`.
    //
    // `new_child`'s parent pointer is not updated.
    #[inline]
    unsafe fn replace_child_or_set_root(
        &mut self,
        parent: Link<T>,
        old_child: NonNull<T>,
        new_child: Link<T>,
    ) {
        unsafe {
            match parent {
                Some(parent) => {
                    let dir = which_child(parent, Some(old_child));
                    debug_assert_eq!(links(parent).child(dir), Some(old_child));
                    links(parent).set_child(dir, new_child);
                }
                None => self.root = new_child,
            }
        }
    }

    // Rotates `down` one level toward `dir`, promoting its child on the opposite side.
    //
    // Rotating left at `x`:
    //
    //        x              y
    //       / \            / \
    //      a   y    =>    x   c
    //         / \        / \
    //        b   c      a   b
    //
    // Colors are not updated.
    unsafe fn rotate(&mut self, down: NonNull<T>, dir: Dir) {
        unsafe {
            let up = links(down)
                .child(!dir)
                .expect("rotation requires a child to promote");

            let across = links(up).child(dir);
            links(down).set_child(!dir, across);
            if let Some(across) = across {
                links(across).set_parent(Some(down));
            }

            let parent = links(down).parent();
            links(up).set_parent(parent);
            self.replace_child_or_set_root(parent, down, Some(up));

            links(up).set_child(dir, Some(down));
            links(down).set_parent(Some(up));
        }
    }

    /// Links the detached node `node` into the tree as the `dir` child of `parent`, or as the root
    /// if `parent` is `None`, then restores the red-black invariants.
    ///
    /// # Safety
    ///
    /// `parent`'s `dir` child must be absent, `node` must not be linked into any tree, and the
    /// position must be consistent with the tree's ordering.
    pub(crate) unsafe fn insert_at(&mut self, parent: Link<T>, dir: Dir, node: NonNull<T>) {
        unsafe {
            let node_links = links(node);
            node_links.set_parent(parent);
            node_links.set_left(None);
            node_links.set_right(None);
            node_links.set_color(Color::Red);

            match parent {
                None => {
                    debug_assert!(self.root.is_none());
                    self.root = Some(node);
                    self.leftmost = Some(node);
                    self.rightmost = Some(node);
                }

                Some(parent) => {
                    let old = links(parent).set_child(dir, Some(node));
                    debug_assert!(old.is_none(), "insertion slot must be vacant");

                    match dir {
                        Dir::Left if self.leftmost == Some(parent) => self.leftmost = Some(node),
                        Dir::Right if self.rightmost == Some(parent) => {
                            self.rightmost = Some(node)
                        }
                        _ => (),
                    }
                }
            }

            self.rebalance_inserted(node);
        }
    }

    // Performs a bottom-up repair of the tree after the red leaf `node` was linked in.
    //
    // The only possible violation is a red `x` with a red `p(x)`. A red uncle lets the violation
    // be pushed two levels up by recoloring; a black uncle is fixed by at most two rotations.
    unsafe fn rebalance_inserted(&mut self, node: NonNull<T>) {
        let mut x = node;
        let mut depth = 0usize;

        unsafe {
            while let Some(parent) = links(x).parent() {
                if links(parent).color() == Color::Black {
                    break;
                }

                // A red node is never the root, so `p(x)` has a parent.
                let grand = links(parent)
                    .parent()
                    .expect("red parent must not be the tree root");
                let parent_dir = which_child(grand, Some(parent));
                let uncle = links(grand).child(!parent_dir);

                if is_red(uncle) {
                    links(parent).set_color(Color::Black);
                    if let Some(uncle) = uncle {
                        links(uncle).set_color(Color::Black);
                    }
                    links(grand).set_color(Color::Red);

                    x = grand;
                    depth += 1;
                    continue;
                }

                let mut top = parent;
                if which_child(parent, Some(x)) != parent_dir {
                    // `x` is an inner grandchild. Rotate it into the outer position first.
                    self.rotate(parent, parent_dir);
                    top = x;
                }

                links(top).set_color(Color::Black);
                links(grand).set_color(Color::Red);
                self.rotate(grand, !parent_dir);
                break;
            }

            if let Some(root) = self.root {
                links(root).set_color(Color::Black);
            }
        }

        log::trace!("insert rebalance recolored {depth} level(s)");
    }

    /// Unlinks `node` from the tree and restores the red-black invariants.
    ///
    /// If `node` has two children, its in-order successor is relinked into `node`'s position and
    /// takes over `node`'s color. No payload moves, so every other node keeps its identity. The
    /// links of `node` are cleared on return.
    ///
    /// # Safety
    ///
    /// `node` must be linked into the tree described by `self`.
    pub(crate) unsafe fn unlink(&mut self, node: NonNull<T>) {
        unsafe {
            let node_links = links(node);
            let parent = node_links.parent();
            let left = node_links.left();
            let right = node_links.right();

            // `x` replaces the node that physically leaves its position; `x_parent` is tracked
            // separately because `x` may be absent.
            let x;
            let x_parent;
            let removed_color;

            match (left, right) {
                (Some(left), Some(right)) => {
                    let succ = minimum(right);
                    x = links(succ).right();

                    links(left).set_parent(Some(succ));
                    links(succ).set_left(Some(left));

                    if succ != right {
                        // The successor is a left child deeper in the right subtree. Splice its
                        // right child into its place, then adopt `node`'s right subtree.
                        let succ_parent = links(succ).parent();
                        if let Some(x) = x {
                            links(x).set_parent(succ_parent);
                        }
                        if let Some(sp) = succ_parent {
                            links(sp).set_left(x);
                        }
                        links(succ).set_right(Some(right));
                        links(right).set_parent(Some(succ));
                        x_parent = succ_parent;
                    } else {
                        x_parent = Some(succ);
                    }

                    self.replace_child_or_set_root(parent, node, Some(succ));
                    links(succ).set_parent(parent);

                    // The color that leaves the tree is the successor's; it inherits `node`'s.
                    removed_color = links(succ).color();
                    links(succ).set_color(node_links.color());
                }

                (child, other) => {
                    x = child.or(other);
                    x_parent = parent;

                    if let Some(x) = x {
                        links(x).set_parent(parent);
                    }
                    self.replace_child_or_set_root(parent, node, x);

                    if self.leftmost == Some(node) {
                        self.leftmost = match (right, x) {
                            (Some(_), Some(x)) => Some(minimum(x)),
                            _ => parent,
                        };
                    }

                    if self.rightmost == Some(node) {
                        self.rightmost = match (left, x) {
                            (Some(_), Some(x)) => Some(maximum(x)),
                            _ => parent,
                        };
                    }

                    removed_color = node_links.color();
                }
            }

            node_links.clear();

            if removed_color == Color::Black {
                self.rebalance_erased(x, x_parent);
            }
        }
    }

    // Restores equal black heights after a black node left the tree.
    //
    // `x` carries an extra black. Each iteration either absorbs it (recolor/rotate and stop) or
    // moves it one level up by reddening `x`'s sibling.
    unsafe fn rebalance_erased(&mut self, mut x: Link<T>, mut x_parent: Link<T>) {
        unsafe {
            while x != self.root && !is_red(x) {
                let parent = x_parent.expect("non-root position must have a parent");
                let dir = which_child(parent, x);

                // `x` is short one black, so its sibling's subtree has black height >= 1.
                let mut w = links(parent)
                    .child(!dir)
                    .expect("doubly black position must have a sibling");

                if links(w).color() == Color::Red {
                    links(w).set_color(Color::Black);
                    links(parent).set_color(Color::Red);
                    self.rotate(parent, dir);
                    w = links(parent)
                        .child(!dir)
                        .expect("doubly black position must have a sibling");
                }

                let near = links(w).child(dir);
                let far = links(w).child(!dir);

                if !is_red(near) && !is_red(far) {
                    links(w).set_color(Color::Red);
                    x = Some(parent);
                    x_parent = links(parent).parent();
                    continue;
                }

                if !is_red(far) {
                    // Near child is red: rotate it up so that `w` gains a red far child.
                    if let Some(near) = near {
                        links(near).set_color(Color::Black);
                    }
                    links(w).set_color(Color::Red);
                    self.rotate(w, !dir);
                    w = links(parent)
                        .child(!dir)
                        .expect("doubly black position must have a sibling");
                }

                links(w).set_color(links(parent).color());
                links(parent).set_color(Color::Black);
                if let Some(far) = links(w).child(!dir) {
                    links(far).set_color(Color::Black);
                }
                self.rotate(parent, dir);
                break;
            }

            if let Some(x) = x {
                links(x).set_color(Color::Black);
            }
        }
    }
}

/// Returns the side of `parent` on which `child` hangs.
///
/// An absent `child` is reported as `Left` if the left link is absent, matching how the erase
/// fixup locates an absent replacement.
#[inline]
pub(crate) unsafe fn which_child<T>(parent: NonNull<T>, child: Link<T>) -> Dir
where
    T: Linked<Links<T>>,
{
    if unsafe { links(parent).left() } == child {
        Dir::Left
    } else {
        Dir::Right
    }
}
