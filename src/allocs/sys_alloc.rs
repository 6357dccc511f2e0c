use {
    crate::{
        block::Block,
        error::{AlignErr, Error},
        helpers::request_layout,
        identity::AllocId,
        traits::ByteAlloc
    },
    core::ptr::NonNull,
    std::alloc::{self, Layout}
};

/// The system-heap adapter, delegating to Rust's global allocator.
///
/// This is the fallback the [registry](crate::registry) hands out to default-constructed
/// handles. It holds no state, so every instance shares one identity and blocks may be freed
/// through any of them. It's safe to use from many threads at once, relying on the global
/// allocator's own synchronization.
///
/// Resizes that don't raise the alignment go through the global allocator's `realloc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SysAlloc;

impl SysAlloc {
    /// Creates a new system-heap adapter.
    #[must_use]
    #[inline]
    pub const fn new() -> SysAlloc {
        SysAlloc
    }
}

impl ByteAlloc for SysAlloc {
    #[inline]
    fn identity(&self) -> AllocId {
        AllocId::of_type::<SysAlloc>()
    }

    #[inline]
    fn max_size(&self) -> usize {
        isize::MAX as usize
    }

    #[cfg_attr(miri, track_caller)]
    fn try_allocate(&self, size: usize, align: usize) -> Result<Block, Error> {
        let layout = tri!(do request_layout(size, align, self.max_size()));
        if size == 0 {
            return Ok(Block::empty());
        }

        // SAFETY: the layout was validated and is non-zero-sized.
        match NonNull::new(unsafe { alloc::alloc(layout) }) {
            Some(ptr) => Ok(Block::acquire(ptr, size, align, self.identity())),
            None => Err(Error::os_alloc_failed(size, align))
        }
    }

    #[cfg_attr(miri, track_caller)]
    unsafe fn deallocate(&self, block: Block) {
        if let Some(ptr) = block.as_non_null() {
            let layout = Layout::from_size_align_unchecked(block.size(), block.align());
            alloc::dealloc(ptr.as_ptr(), layout);
        }
    }

    #[inline]
    fn can_reallocate(&self, block: &Block, new_size: usize, align: usize) -> bool {
        // `realloc` keeps the original alignment, so it can't raise it
        AlignErr::check(align).is_ok()
            && align <= block.align()
            && Layout::from_size_align(new_size, block.align()).is_ok()
    }

    #[cfg_attr(miri, track_caller)]
    unsafe fn resize_in_place(
        &self,
        block: &mut Block,
        new_size: usize,
        align: usize
    ) -> Result<(), Error> {
        let old_layout = Layout::from_size_align_unchecked(block.size(), block.align());
        match NonNull::new(alloc::realloc(block.as_ptr(), old_layout, new_size)) {
            Some(ptr) => {
                let kept_align = block.align();
                block.reset(ptr, new_size, kept_align);
                Ok(())
            }
            None => Err(Error::os_alloc_failed(new_size, align))
        }
    }
}
