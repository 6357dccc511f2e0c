use crate::{
    block::Block,
    error::{AlignErr, Cause, Error},
    identity::AllocId,
    traits::{BlockStatus, ByteAlloc}
};

/// An adapter that never allocates.
///
/// Every non-zero request fails with [`Cause::OutOfMemory`] and only empty blocks may be handed
/// back. Useful for components that must not allocate, and for exercising failure paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NullAlloc;

impl ByteAlloc for NullAlloc {
    #[inline]
    fn identity(&self) -> AllocId {
        AllocId::of_type::<NullAlloc>()
    }

    #[inline]
    fn max_size(&self) -> usize {
        0
    }

    #[inline]
    fn try_allocate(&self, size: usize, align: usize) -> Result<Block, Error> {
        tri!(Error::InvalidAlign(AlignErr::check(align)));
        if size == 0 {
            Ok(Block::empty())
        } else {
            Err(Error::alloc_failed(size, align, Cause::OutOfMemory))
        }
    }

    #[track_caller]
    #[inline]
    unsafe fn deallocate(&self, block: Block) {
        debug_assert!(block.is_empty(), "`NullAlloc` can't own {:?}", block);
    }

    #[inline]
    fn block_status(&self, block: &Block) -> BlockStatus {
        if block.is_empty() {
            BlockStatus::Empty
        } else {
            BlockStatus::NotOwned
        }
    }
}
