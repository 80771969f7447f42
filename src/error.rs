//! Error types for tree operations.

use core::alloc::Layout;

use thiserror::Error;

/// Result type for fallible tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors that can occur in tree operations.
///
/// Duplicate keys and absent keys are not errors; they are reported through `bool`, count and
/// end-position results.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The node allocator could not provide a block.
    #[error("node allocation failed: {size} bytes (align: {align})")]
    AllocFailed {
        /// Requested block size.
        size: usize,
        /// Requested block alignment.
        align: usize,
    },
}

impl TreeError {
    pub(crate) fn alloc_failed(layout: Layout) -> Self {
        TreeError::AllocFailed {
            size: layout.size(),
            align: layout.align(),
        }
    }
}
