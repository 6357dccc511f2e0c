use {
    crate::{helpers::is_aligned_to, identity::AllocId},
    core::{
        fmt::{Debug, Formatter, Result as FmtResult},
        ptr::{self, NonNull},
        slice
    }
};

/// A described extent of memory: address, size and alignment.
///
/// Blocks are produced by [`allocate`](crate::ByteAlloc::allocate), transformed by
/// [`reallocate`](crate::ByteAlloc::reallocate) and consumed by
/// [`deallocate`](crate::ByteAlloc::deallocate). They are neither `Copy` nor `Clone`, so a block
/// can only be handed back to its allocator once.
///
/// The address is null if and only if the size is zero. A non-null address is always a multiple
/// of the alignment, and the alignment is always a power of two.
///
/// Dropping a block doesn't free the memory it describes.
pub struct Block {
    ptr: Option<NonNull<u8>>,
    size: usize,
    align: usize,
    owner: Option<AllocId>
}

// SAFETY: a `Block` is a plain descriptor. Whether the memory it describes may be used from
//  another thread is up to the adapter that produced it, and every access goes through `unsafe`
//  methods.
unsafe impl Send for Block {}
// SAFETY: see above; `&Block` only exposes the descriptor fields without `unsafe`.
unsafe impl Sync for Block {}

impl Block {
    /// Returns an empty block with a null address, a size of zero and an alignment of one.
    #[must_use]
    #[inline]
    pub const fn empty() -> Block {
        Block { ptr: None, size: 0, align: 1, owner: None }
    }

    /// Describes `size` bytes at `ptr`, produced by the allocator identified by `owner`.
    ///
    /// Adapters call this to hand out the memory they allocate. If `size == 0`, the result is
    /// [`empty`](Block::empty).
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `align` isn't a power of two or `ptr` isn't aligned to it.
    #[must_use]
    #[track_caller]
    pub fn acquire(ptr: NonNull<u8>, size: usize, align: usize, owner: AllocId) -> Block {
        debug_assert!(align.is_power_of_two(), "block alignment {} isn't a power of two", align);
        debug_assert!(
            is_aligned_to(ptr.as_ptr(), align),
            "block at {:p} isn't aligned to {}",
            ptr.as_ptr(),
            align
        );
        if size == 0 {
            return Block::empty();
        }
        Block { ptr: Some(ptr), size, align, owner: Some(owner) }
    }

    /// Describes `size` bytes at `ptr` without recording which allocator produced them.
    ///
    /// Blocks built this way skip the identity check on deallocation, so the caller alone is
    /// responsible for returning them to the right allocator.
    ///
    /// If `ptr` is null or `size == 0`, the result is [`empty`](Block::empty).
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    /// - `align` is a power of two, and a non-null `ptr` is aligned to it.
    /// - `ptr` points to `size` bytes previously handed out by an allocator, described with the
    ///   same size and alignment.
    #[must_use]
    pub unsafe fn from_raw_parts(ptr: *mut u8, size: usize, align: usize) -> Block {
        match NonNull::new(ptr) {
            Some(ptr) if size != 0 => Block { ptr: Some(ptr), size, align, owner: None },
            _ => Block::empty()
        }
    }

    /// Returns the start address, or null for an empty block.
    #[must_use]
    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        match self.ptr {
            Some(p) => p.as_ptr(),
            None => ptr::null_mut()
        }
    }

    /// Returns the start address, or `None` for an empty block.
    #[must_use]
    #[inline]
    pub const fn as_non_null(&self) -> Option<NonNull<u8>> {
        self.ptr
    }

    /// The number of bytes described.
    #[must_use]
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The alignment the block was allocated with, which is also the one it is deallocated with.
    ///
    /// This isn't necessarily the alignment last passed to a reallocation. A same-size
    /// reallocation whose address already satisfies a stricter alignment leaves the block as it
    /// is, so this keeps reporting the original value. The address is always aligned to at least
    /// this much.
    #[must_use]
    #[inline]
    pub const fn align(&self) -> usize {
        self.align
    }

    /// Whether the block is empty, i.e. has a size of zero and a null address.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The identity of the allocator that produced this block, if recorded.
    #[must_use]
    #[inline]
    pub const fn owner(&self) -> Option<AllocId> {
        self.owner
    }

    /// Whether `ptr` lies within this block.
    #[must_use]
    pub fn contains(&self, ptr: *const u8) -> bool {
        let start = self.as_ptr() as usize;
        let p = ptr as usize;
        !self.is_empty() && p >= start && p - start < self.size
    }

    /// Views the block's bytes.
    ///
    /// # Safety
    ///
    /// The caller must ensure the block is still live, that all `size()` bytes are initialized,
    /// and that nothing writes to them for the lifetime of the returned slice.
    #[must_use]
    pub unsafe fn as_slice(&self) -> &[u8] {
        match self.ptr {
            Some(p) => slice::from_raw_parts(p.as_ptr(), self.size),
            None => &[]
        }
    }

    /// Mutably views the block's bytes.
    ///
    /// # Safety
    ///
    /// The caller must ensure the block is still live, that all `size()` bytes are initialized,
    /// and that nothing else accesses them for the lifetime of the returned slice.
    #[must_use]
    pub unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
        match self.ptr {
            Some(p) => slice::from_raw_parts_mut(p.as_ptr(), self.size),
            None => &mut []
        }
    }

    /// Replaces the described extent in place, keeping the block's identity.
    ///
    /// Used by adapters that resize without moving ownership elsewhere.
    pub(crate) fn reset(&mut self, ptr: NonNull<u8>, size: usize, align: usize) {
        if size == 0 {
            *self = Block::empty();
        } else {
            self.ptr = Some(ptr);
            self.size = size;
            self.align = align;
        }
    }
}

impl Default for Block {
    #[inline]
    fn default() -> Block {
        Block::empty()
    }
}

impl Debug for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Block")
            .field("ptr", &self.as_ptr())
            .field("size", &self.size)
            .field("align", &self.align)
            .field("owner", &self.owner)
            .finish()
    }
}
