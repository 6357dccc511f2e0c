//! `shalloc` provides runtime-polymorphic, shared byte allocators.
//!
//! Generic containers take "an allocator" as an ordinary value: cheap to clone, comparable, and
//! default-constructible to a process-wide fallback, without being tied to one allocation
//! strategy at compile time.
//!
//! This crate exports:
//!
//! - [`ByteAlloc`]: the trait every allocation strategy implements, with a default
//!   allocate-copy-deallocate [`reallocate`](ByteAlloc::reallocate).
//! - [`Block`]: a move-only descriptor of allocated memory.
//! - [`SharedAlloc`]: a reference-counted, type-erased handle to a `ByteAlloc`.
//! - [`AllocId`]: the identity two allocators compare to decide if their blocks are
//!   interchangeable.
//! - [`registry`]: the lazily-initialized process-wide fallback.
//! - [`allocs`]: concrete adapters: [`SysAlloc`](allocs::SysAlloc),
//!   [`NullAlloc`](allocs::NullAlloc), [`StackAlloc`](allocs::StackAlloc).
//! - [`Buffer`]: a growable byte buffer that allocates through a handle.
//! - [`Error`](error::Error): the error returned by the `try_*` operations.
//!
//! # Features
//!
//! - **`logging`**: Adds the [`logging`] module: [`Logged`](logging::Logged), an adapter wrapper
//!   that reports every operation to an [`AllocLogger`](logging::AllocLogger), and several
//!   loggers.
//!
//! - **`parking_lot`**: Usage of [`parking_lot::Mutex`] instead of [`std::sync::Mutex`] in
//!   stateful adapters and loggers.
//!
//! - **`c_alloc`**: Provides [`CAlloc`](allocs::CAlloc), a ZST adapter using `libc`'s
//!   `posix_memalign`, `realloc` and `free`. Unix only.
//!
//! - **`os_err_reporting`**: Enables OS error reporting on failed allocation for supported
//!   adapters.
//!
//! # Example
//!
//! ```
//! use shalloc::{allocate_bytes, deallocate_bytes, SharedAlloc};
//!
//! let alloc = SharedAlloc::default();
//! let block = allocate_bytes(&alloc, 64, 8);
//! assert_eq!(block.size(), 64);
//! assert_eq!(block.as_ptr() as usize % 8, 0);
//! // SAFETY: `block` was just allocated through `alloc`.
//! unsafe { deallocate_bytes(&alloc, block) };
//! ```

#![allow(unknown_lints)]
#![warn(clippy::all, clippy::pedantic, clippy::undocumented_unsafe_blocks)]
#![warn(unknown_lints)]
#![allow(
    unsafe_op_in_unsafe_fn,
    rustdoc::broken_intra_doc_links,
    clippy::module_name_repetitions
)]
#![deny(missing_docs, unused_unsafe)]

macro_rules! tri {
    (do $($fallible:expr)+) => {
        match $($fallible)+ {
            Ok(s) => s,
            Err(e) => return Err(e),
        }
    };
    (Error::$n:ident($($fallible:expr)+)) => {
        match $($fallible)+ {
            Ok(s) => s,
            Err(e) => return Err(crate::error::Error::$n(e)),
        }
    };
}

mod block;
mod identity;
mod shared;
mod sync;
mod traits;

/// Errors of allocator operations.
pub mod error;

/// Alignment and layout helpers shared by the adapters.
pub mod helpers;

/// Concrete allocator adapters.
pub mod allocs;

pub mod registry;

mod buffer;

#[cfg(feature = "logging")]
/// Adapter wrappers that report allocator operations to a logger.
pub mod logging;

pub use {
    block::Block,
    buffer::Buffer,
    identity::AllocId,
    shared::SharedAlloc,
    traits::{move_reallocate, BlockStatus, ByteAlloc}
};

/// Allocates `size` bytes aligned to `align` through `alloc`.
///
/// Returns an empty block if `size == 0` or the request can't be satisfied.
#[must_use]
#[inline]
pub fn allocate_bytes(alloc: &SharedAlloc, size: usize, align: usize) -> Block {
    alloc.allocate(size, align)
}

/// Deallocates `block` through `alloc`.
///
/// # Safety
///
/// The caller must ensure `block` was produced through a handle equal to `alloc` and is still
/// live. In debug builds, handing over a block recorded as produced by another allocator
/// panics.
#[track_caller]
#[inline]
pub unsafe fn deallocate_bytes(alloc: &SharedAlloc, block: Block) {
    alloc.deallocate(block);
}
