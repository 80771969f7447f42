use core::{alloc::Layout, ptr::NonNull};

use cordyceps::Linked;

use crate::{
    alloc::NodeAlloc,
    error::TreeError,
    header::Links,
};

/// A payload-carrying tree node.
///
/// `links` is the first field so that the structural view of a node is a prefix of it.
#[repr(C)]
pub(crate) struct Node<V> {
    pub(crate) links: Links<Node<V>>,
    pub(crate) value: V,
}

// Node memory is owned by the tree and released through its `NodeAlloc`, so the handle is the
// bare pointer rather than an owning box.
unsafe impl<V> Linked<Links<Node<V>>> for Node<V> {
    type Handle = NonNull<Node<V>>;

    fn into_ptr(r: Self::Handle) -> NonNull<Self> {
        r
    }

    unsafe fn from_ptr(ptr: NonNull<Self>) -> Self::Handle {
        ptr
    }

    unsafe fn links(ptr: NonNull<Self>) -> NonNull<Links<Node<V>>> {
        // SAFETY: Self is #[repr(C)] and `links` is first field
        ptr.cast()
    }
}

impl<V> Node<V> {
    pub(crate) const LAYOUT: Layout = Layout::new::<Node<V>>();

    /// Allocates a detached node holding `value`.
    pub(crate) fn try_create<A: NodeAlloc>(alloc: &A, value: V) -> Result<NonNull<Node<V>>, TreeError> {
        let ptr = alloc.allocate(Self::LAYOUT)?.cast::<Node<V>>();

        unsafe {
            ptr.as_ptr().write(Node {
                links: Links::new(),
                value,
            });
        }

        Ok(ptr)
    }

    /// Allocates a detached node holding `value`, aborting on allocation failure.
    pub(crate) fn create<A: NodeAlloc>(alloc: &A, value: V) -> NonNull<Node<V>> {
        Self::try_create(alloc, value).unwrap_or_else(|err| Self::alloc_error(err))
    }

    /// Reports a failed node allocation and aborts.
    pub(crate) fn alloc_error(err: TreeError) -> ! {
        log::error!("{err}");
        std::alloc::handle_alloc_error(Self::LAYOUT)
    }

    /// Allocates a detached copy of `src`'s payload and color.
    pub(crate) unsafe fn clone_from<A: NodeAlloc>(alloc: &A, src: NonNull<Node<V>>) -> NonNull<Node<V>>
    where
        V: Clone,
    {
        unsafe {
            let src = src.as_ref();
            let ptr = Self::create(alloc, src.value.clone());
            ptr.as_ref().links.set_color(src.links.color());
            ptr
        }
    }

    /// Moves the payload out of a detached node and releases its memory.
    ///
    /// # Safety
    ///
    /// `ptr` must have been produced by `create` with the same allocator and must not be linked
    /// into a tree.
    pub(crate) unsafe fn into_value<A: NodeAlloc>(alloc: &A, ptr: NonNull<Node<V>>) -> V {
        unsafe {
            let value = core::ptr::addr_of!((*ptr.as_ptr()).value).read();
            alloc.deallocate(ptr.cast(), Self::LAYOUT);
            value
        }
    }

    /// Drops the payload of a detached node in place and releases its memory.
    pub(crate) unsafe fn destroy<A: NodeAlloc>(alloc: &A, ptr: NonNull<Node<V>>) {
        unsafe {
            core::ptr::drop_in_place(core::ptr::addr_of_mut!((*ptr.as_ptr()).value));
            alloc.deallocate(ptr.cast(), Self::LAYOUT);
        }
    }
}
