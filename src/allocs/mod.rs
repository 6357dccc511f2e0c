mod null_alloc;
mod stack_alloc;
mod sys_alloc;

pub use {null_alloc::NullAlloc, stack_alloc::StackAlloc, sys_alloc::SysAlloc};

#[cfg(all(feature = "c_alloc", unix))]
/// An adapter which uses C's `posix_memalign`, `realloc` and `free`.
pub mod c_alloc;
#[cfg(all(feature = "c_alloc", unix))]
pub use c_alloc::CAlloc;
