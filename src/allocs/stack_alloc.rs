use {
    crate::{
        block::Block,
        error::{AlignErr, Cause, Error},
        helpers::{align_up, ptr_max_align, request_layout},
        identity::AllocId,
        sync::{lock_mutex, Mutex},
        traits::{BlockStatus, ByteAlloc}
    },
    core::ptr::NonNull,
    std::alloc::{self, Layout}
};

/// Alignment of the backing store; requests up to this alignment waste no space at the bottom.
const STORE_ALIGN: usize = 16;

/// A live allocation, as offsets into the store.
#[derive(Debug, Clone, Copy)]
struct Record {
    start: usize,
    size: usize
}

impl Record {
    const fn end(&self) -> usize {
        self.start + self.size
    }
}

#[derive(Debug, Default)]
struct State {
    /// Live allocations, ordered by `start`.
    live: Vec<Record>,
    /// Offset of the first free byte above the topmost live allocation.
    pos: usize
}

impl State {
    fn find(&self, start: usize) -> Result<usize, usize> {
        self.live.binary_search_by(|r| r.start.cmp(&start))
    }

    fn shrink_to_top(&mut self) {
        self.pos = self.live.last().map_or(0, Record::end);
    }
}

/// A stack (bump) adapter over a fixed, owned region of memory.
///
/// Allocations are carved from the bottom of the region upwards. Freeing the topmost allocation
/// returns its space immediately; space of allocations freed out of order is reclaimed once
/// everything above it has been freed too.
///
/// Every instance owns its region, so it has a [unique](AllocId::unique) identity: handles to
/// two stack adapters never compare equal, even when their capacities match. It tracks live
/// allocations exactly, so [`block_status`](ByteAlloc::block_status) gives precise answers.
///
/// Calls are serialized by an internal mutex, so one instance may be shared between threads.
///
/// Dropping the adapter releases the region; blocks still outstanding at that point dangle.
pub struct StackAlloc {
    base: NonNull<u8>,
    capacity: usize,
    id: AllocId,
    state: Mutex<State>
}

// SAFETY: `base` is owned exclusively by this adapter and every access to the bookkeeping goes
//  through `state`'s mutex.
unsafe impl Send for StackAlloc {}
// SAFETY: see above.
unsafe impl Sync for StackAlloc {}

impl StackAlloc {
    /// Creates a stack adapter over a new region of `capacity` bytes from the system heap.
    ///
    /// # Panics
    ///
    /// Aborts through [`handle_alloc_error`](alloc::handle_alloc_error) if the region can't be
    /// allocated, and panics if `capacity` exceeds `isize::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> StackAlloc {
        match StackAlloc::try_new(capacity) {
            Ok(stack) => stack,
            Err(Error::AllocFailed(_, _, Cause::ExceedsMaxSize)) => {
                panic!("stack capacity {} exceeds isize::MAX", capacity)
            }
            // SAFETY: any other failure happens after the layout was validated.
            Err(_) => alloc::handle_alloc_error(unsafe {
                Layout::from_size_align_unchecked(capacity, STORE_ALIGN)
            })
        }
    }

    /// Creates a stack adapter over a new region of `capacity` bytes from the system heap.
    ///
    /// # Errors
    ///
    /// - <code>Err([Error::AllocFailed]\(capacity, ..\))</code> if the region can't be
    ///   allocated.
    pub fn try_new(capacity: usize) -> Result<StackAlloc, Error> {
        let layout = tri!(do request_layout(capacity, STORE_ALIGN, isize::MAX as usize));
        let base = if capacity == 0 {
            NonNull::<u128>::dangling().cast::<u8>()
        } else {
            // SAFETY: the layout is valid and non-zero-sized.
            match NonNull::new(unsafe { alloc::alloc(layout) }) {
                Some(base) => base,
                None => return Err(Error::os_alloc_failed(capacity, STORE_ALIGN))
            }
        };

        Ok(StackAlloc {
            base,
            capacity,
            id: AllocId::unique::<StackAlloc>(),
            state: Mutex::new(State::default())
        })
    }

    /// The total size of the region.
    #[must_use]
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of bytes between the bottom of the region and the top of the stack, padding
    /// and out-of-order frees included.
    #[must_use]
    pub fn allocated_size(&self) -> usize {
        lock_mutex(&self.state).pos
    }

    /// The number of live allocations.
    #[must_use]
    pub fn live_blocks(&self) -> usize {
        lock_mutex(&self.state).live.len()
    }

    fn offset_of(&self, ptr: *const u8) -> Option<usize> {
        let base = self.base.as_ptr() as usize;
        let p = ptr as usize;
        if p >= base && p - base < self.capacity {
            Some(p - base)
        } else {
            None
        }
    }

    fn status_locked(&self, state: &State, block: &Block) -> BlockStatus {
        let Some(offset) = self.offset_of(block.as_ptr()) else {
            return BlockStatus::NotOwned;
        };

        match state.find(offset) {
            Ok(i) => {
                let record = state.live[i];
                if record.size != block.size() {
                    BlockStatus::OwnedIncomplete(Some(record.size))
                } else if (block.as_ptr() as usize) & (block.align() - 1) != 0 {
                    BlockStatus::OwnedMisaligned(ptr_max_align(block.as_ptr()))
                } else {
                    BlockStatus::Owned
                }
            }
            // the closest allocation below `offset` may enclose it
            Err(0) => BlockStatus::NotOwned,
            Err(i) => {
                let record = state.live[i - 1];
                if offset < record.end() {
                    // SAFETY: `record.start` is an offset into the region.
                    let head = unsafe { self.base.as_ptr().add(record.start) };
                    BlockStatus::OwnedNonHead(NonNull::new(head))
                } else {
                    BlockStatus::NotOwned
                }
            }
        }
    }
}

impl Drop for StackAlloc {
    fn drop(&mut self) {
        if self.capacity != 0 {
            // SAFETY: the region was allocated in `try_new` with this exact layout.
            unsafe {
                alloc::dealloc(
                    self.base.as_ptr(),
                    Layout::from_size_align_unchecked(self.capacity, STORE_ALIGN)
                );
            }
        }
    }
}

impl ByteAlloc for StackAlloc {
    #[inline]
    fn identity(&self) -> AllocId {
        self.id
    }

    fn max_size(&self) -> usize {
        self.capacity - lock_mutex(&self.state).pos
    }

    fn try_allocate(&self, size: usize, align: usize) -> Result<Block, Error> {
        tri!(Error::InvalidAlign(AlignErr::check(align)));
        if size == 0 {
            return Ok(Block::empty());
        }

        let mut state = lock_mutex(&self.state);
        let base = self.base.as_ptr() as usize;
        let start = match align_up(base + state.pos, align) {
            Some(addr) => addr - base,
            None => return Err(Error::alloc_failed(size, align, Cause::OutOfMemory))
        };
        match start.checked_add(size) {
            Some(end) if end <= self.capacity => {
                state.live.push(Record { start, size });
                state.pos = end;
            }
            _ => return Err(Error::alloc_failed(size, align, Cause::OutOfMemory))
        }

        // SAFETY: `start` is within the region.
        let ptr = unsafe { NonNull::new_unchecked(self.base.as_ptr().add(start)) };
        Ok(Block::acquire(ptr, size, align, self.id))
    }

    #[track_caller]
    unsafe fn deallocate(&self, block: Block) {
        if block.is_empty() {
            return;
        }

        let mut state = lock_mutex(&self.state);
        debug_assert_eq!(
            self.status_locked(&state, &block),
            BlockStatus::Owned,
            "{:?} isn't live in this stack adapter",
            block
        );
        let found = self.offset_of(block.as_ptr()).map(|offset| state.find(offset));
        if let Some(Ok(i)) = found {
            state.live.remove(i);
            state.shrink_to_top();
        }
    }

    fn block_status(&self, block: &Block) -> BlockStatus {
        if block.is_empty() {
            return BlockStatus::Empty;
        }
        let state = lock_mutex(&self.state);
        self.status_locked(&state, block)
    }

    fn can_reallocate(&self, block: &Block, new_size: usize, align: usize) -> bool {
        if AlignErr::check(align).is_err() {
            return false;
        }
        let state = lock_mutex(&self.state);
        match (self.offset_of(block.as_ptr()), state.live.last()) {
            (Some(offset), Some(top)) => {
                top.start == offset
                    && top.size == block.size()
                    && (block.as_ptr() as usize) & (align - 1) == 0
                    && new_size <= self.capacity - offset
            }
            _ => false
        }
    }

    unsafe fn resize_in_place(
        &self,
        block: &mut Block,
        new_size: usize,
        align: usize
    ) -> Result<(), Error> {
        let mut state = lock_mutex(&self.state);
        let offset = self.offset_of(block.as_ptr());
        match state.live.last_mut() {
            Some(top) if Some(top.start) == offset && new_size <= self.capacity - top.start => {
                top.size = new_size;
                state.shrink_to_top();
            }
            _ => return Err(Error::Unsupported)
        }

        let ptr = NonNull::new_unchecked(block.as_ptr());
        block.reset(ptr, new_size, align.max(block.align()));
        Ok(())
    }
}
