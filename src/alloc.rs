//! The raw node allocator capability.
//!
//! The tree only ever requests blocks of one layout (its node type), one block at a time.

use core::{alloc::Layout, ptr::NonNull};

use crate::error::{TreeError, TreeResult};

/// Allocates and releases fixed-size node blocks.
///
/// # Safety
///
/// A block returned by `allocate` must be valid for reads and writes of `layout`, suitably
/// aligned, and remain valid until it is passed back to `deallocate` with the same layout.
pub unsafe trait NodeAlloc {
    fn allocate(&self, layout: Layout) -> TreeResult<NonNull<u8>>;

    /// # Safety
    ///
    /// `ptr` must have been returned by `self.allocate(layout)` and not yet released.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The global heap.
#[derive(Copy, Clone, Debug, Default)]
pub struct Global;

unsafe impl NodeAlloc for Global {
    fn allocate(&self, layout: Layout) -> TreeResult<NonNull<u8>> {
        debug_assert_ne!(layout.size(), 0, "node layouts are never zero-sized");

        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(TreeError::alloc_failed(layout))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

/// Decides whether a failed allocation should be retried.
///
/// The handler is expected to release memory somewhere before returning `true`.
pub trait OomHandler {
    fn on_oom(&self, layout: Layout) -> bool;
}

impl<F> OomHandler for F
where
    F: Fn(Layout) -> bool,
{
    fn on_oom(&self, layout: Layout) -> bool {
        self(layout)
    }
}

/// Wraps an allocator with an out-of-memory handler.
///
/// On failure the handler runs and the allocation is retried for as long as it returns `true`.
/// Once it returns `false`, the failure is passed on to the caller.
#[derive(Clone, Debug, Default)]
pub struct OomRetry<A, H> {
    inner: A,
    handler: H,
}

impl<A, H> OomRetry<A, H>
where
    A: NodeAlloc,
    H: OomHandler,
{
    pub const fn new(inner: A, handler: H) -> Self {
        OomRetry { inner, handler }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

unsafe impl<A, H> NodeAlloc for OomRetry<A, H>
where
    A: NodeAlloc,
    H: OomHandler,
{
    fn allocate(&self, layout: Layout) -> TreeResult<NonNull<u8>> {
        let mut attempt = 0usize;

        loop {
            match self.inner.allocate(layout) {
                Ok(ptr) => return Ok(ptr),
                Err(err) => {
                    attempt += 1;
                    log::warn!(
                        "Got an out-of-memory error on node allocation (attempt {attempt}), asking handler..."
                    );

                    if !self.handler.on_oom(layout) {
                        return Err(err);
                    }
                }
            }
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}
