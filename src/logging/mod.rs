use crate::{
    block::Block,
    error::Error,
    identity::AllocId,
    traits::{BlockStatus, ByteAlloc}
};

mod event;
pub use event::*;

mod logger;
pub use logger::*;

/// A wrapper that delegates all [`ByteAlloc`] calls to `A` and reports each result to `L`.
///
/// The wrapper has its inner adapter's identity, so blocks may pass freely between a `Logged<A,
/// _>` and a plain `A`, and handles to both compare equal. Only operations made through the
/// wrapper are logged.
///
/// Resizes are reported as one [`Realloc`](AllocEvent::Realloc) event whether they happened in
/// place or by moving.
pub struct Logged<A, L: AllocLogger>(pub A, pub L);

impl<A, L: AllocLogger> Logged<A, L> {
    /// Wraps `inner`, reporting to `logger`.
    #[inline]
    pub const fn new(inner: A, logger: L) -> Logged<A, L> {
        Logged(inner, logger)
    }

    /// The wrapped adapter.
    #[inline]
    pub const fn inner(&self) -> &A {
        &self.0
    }

    /// The logger events go to.
    #[inline]
    pub const fn logger(&self) -> &L {
        &self.1
    }
}

impl<A: ByteAlloc, L: AllocLogger> Logged<A, L> {
    fn resized(
        &self,
        old: Region,
        block: &Block,
        new_size: usize,
        align: usize,
        res: Result<(), Error>
    ) -> Result<(), Error> {
        match res {
            Ok(()) => {
                let new = Region::of(block);
                let total = if new.size >= old.size {
                    self.1.inc_total(new.size - old.size)
                } else {
                    self.1.dec_total(old.size - new.size)
                };
                self.1.log(AllocEvent::Realloc { old, new, total });
                Ok(())
            }
            Err(err) => {
                self.1.log(AllocEvent::ReallocFailed { old, new_size, align, err });
                Err(err)
            }
        }
    }
}

impl<A: ByteAlloc, L: AllocLogger + 'static> ByteAlloc for Logged<A, L> {
    #[inline]
    fn identity(&self) -> AllocId {
        self.0.identity()
    }

    #[inline]
    fn max_size(&self) -> usize {
        self.0.max_size()
    }

    #[track_caller]
    fn try_allocate(&self, size: usize, align: usize) -> Result<Block, Error> {
        match self.0.try_allocate(size, align) {
            Ok(block) => {
                if !block.is_empty() {
                    let total = self.1.inc_total(block.size());
                    self.1.log(AllocEvent::Alloc { region: Region::of(&block), total });
                }
                Ok(block)
            }
            Err(err) => {
                self.1.log(AllocEvent::AllocFailed { size, align, err });
                Err(err)
            }
        }
    }

    #[track_caller]
    unsafe fn deallocate(&self, block: Block) {
        if block.is_empty() {
            return;
        }
        let region = Region::of(&block);
        self.0.deallocate(block);

        let total = self.1.dec_total(region.size);
        self.1.log(AllocEvent::Free { region, total });
    }

    #[inline]
    fn block_status(&self, block: &Block) -> BlockStatus {
        self.0.block_status(block)
    }

    #[inline]
    fn has_allocated(&self, block: &Block) -> bool {
        self.0.has_allocated(block)
    }

    #[inline]
    fn can_reallocate(&self, block: &Block, new_size: usize, align: usize) -> bool {
        self.0.can_reallocate(block, new_size, align)
    }

    #[track_caller]
    unsafe fn resize_in_place(
        &self,
        block: &mut Block,
        new_size: usize,
        align: usize
    ) -> Result<(), Error> {
        let old = Region::of(block);
        let res = self.0.resize_in_place(block, new_size, align);
        self.resized(old, block, new_size, align, res)
    }

    #[track_caller]
    unsafe fn try_reallocate(
        &self,
        block: &mut Block,
        new_size: usize,
        align: usize
    ) -> Result<(), Error> {
        let old = Region::of(block);
        let res = self.0.try_reallocate(block, new_size, align);
        self.resized(old, block, new_size, align, res)
    }
}
