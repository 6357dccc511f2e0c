use {
    crate::{block::Block, error::Error, identity::AllocId},
    core::{
        any::Any,
        fmt::{Display, Formatter, Result as FmtResult},
        ptr::NonNull
    }
};

pub(crate) mod helpers;
pub use helpers::move_reallocate;

/// A byte-level memory allocation strategy.
///
/// This is the capability set every adapter provides, and the interface a
/// [`SharedAlloc`](crate::SharedAlloc) erases its adapter behind. Allocation failure is reported
/// by returning an [empty](Block::is_empty) block from [`allocate`](ByteAlloc::allocate), so
/// callers must check the block before using it. The `try_*` variants report the reason instead.
///
/// Adapters are `Send + Sync` so handles to them can cross threads. Whether concurrent calls on
/// one instance are cheap or serialized internally is up to the adapter and is documented per
/// adapter.
pub trait ByteAlloc: Any + Send + Sync {
    /// Returns this instance's identity.
    ///
    /// Must be stable for the instance's whole lifetime. Identity is the only notion of equality
    /// between adapters: two instances accept each other's blocks exactly when their identities
    /// match. An adapter whose instances should be interchangeable by value returns an identity
    /// derived from that value, like the identity of the memory source they share.
    fn identity(&self) -> AllocId;

    /// The largest size this instance can satisfy in one request.
    fn max_size(&self) -> usize;

    /// Attempts to allocate `size` bytes aligned to `align`.
    ///
    /// A `size` of zero returns an [empty](Block::empty) block without allocating.
    ///
    /// # Errors
    ///
    /// - <code>Err([Error::InvalidAlign]\(..\))</code> if `align` isn't a power of two.
    /// - <code>Err([Error::AllocFailed]\(size, align, cause\))</code> if the request can't be
    ///   satisfied. Nothing is retained by the allocator in this case.
    fn try_allocate(&self, size: usize, align: usize) -> Result<Block, Error>;

    /// Deallocates a block. Deallocating an empty block is a noop.
    ///
    /// # Safety
    ///
    /// The caller must ensure `block` was produced by this instance or one with the same
    /// [identity](ByteAlloc::identity), and that it is still live.
    unsafe fn deallocate(&self, block: Block);

    /// Allocates `size` bytes aligned to `align`, returning an empty block on failure.
    #[inline]
    fn allocate(&self, size: usize, align: usize) -> Block {
        match self.try_allocate(size, align) {
            Ok(block) => block,
            Err(_) => Block::empty()
        }
    }

    /// Reports what this instance knows about `block`.
    ///
    /// The default can't tell and returns [`BlockStatus::Unknown`] for any non-empty block.
    #[inline]
    fn block_status(&self, block: &Block) -> BlockStatus {
        if block.is_empty() {
            BlockStatus::Empty
        } else {
            BlockStatus::Unknown
        }
    }

    /// Best-effort check that `block` is currently live under this instance.
    ///
    /// Intended for debug verification. Empty blocks are never live; adapters that can't tell
    /// report `true`.
    #[inline]
    fn has_allocated(&self, block: &Block) -> bool {
        self.block_status(block).maybe_owned()
    }

    /// Whether this instance can resize `block` to `new_size` at `align` without the
    /// allocate-copy-deallocate fallback.
    ///
    /// Always `false` if `align` isn't a power of two.
    #[inline]
    fn can_reallocate(&self, block: &Block, new_size: usize, align: usize) -> bool {
        let _ = (block, new_size, align);
        false
    }

    /// Resizes `block` through the adapter's own mechanism.
    ///
    /// Only called when [`can_reallocate`](ByteAlloc::can_reallocate) returns `true`, with a
    /// non-empty block and a non-zero `new_size`.
    ///
    /// # Safety
    ///
    /// Same as [`deallocate`](ByteAlloc::deallocate).
    ///
    /// # Errors
    ///
    /// Implementation-defined. On error `block` must be left valid and unmodified. The default
    /// returns <code>Err([Error::Unsupported])</code>.
    #[inline]
    unsafe fn resize_in_place(
        &self,
        block: &mut Block,
        new_size: usize,
        align: usize
    ) -> Result<(), Error> {
        let _ = (block, new_size, align);
        Err(Error::Unsupported)
    }

    /// Resizes `block` in place to `new_size` bytes aligned to `align`.
    ///
    /// The first `min(old_size, new_size)` bytes are preserved. A `new_size` of zero deallocates
    /// the block and leaves it empty; an empty block is simply allocated.
    ///
    /// The default uses [`resize_in_place`](ByteAlloc::resize_in_place) when
    /// [`can_reallocate`](ByteAlloc::can_reallocate) allows it and otherwise falls back to
    /// [`move_reallocate`].
    ///
    /// # Safety
    ///
    /// Same as [`deallocate`](ByteAlloc::deallocate).
    ///
    /// # Errors
    ///
    /// Same as [`try_allocate`](ByteAlloc::try_allocate). On error `block` is left valid and
    /// unmodified.
    unsafe fn try_reallocate(
        &self,
        block: &mut Block,
        new_size: usize,
        align: usize
    ) -> Result<(), Error> {
        helpers::reallocate(self, block, new_size, align)
    }

    /// Resizes `block` to `new_size` bytes aligned to `align`.
    ///
    /// Returns the resized block on success. On failure the original block is returned valid and
    /// unmodified, so callers compare the result's [`size`](Block::size) with `new_size`.
    ///
    /// # Safety
    ///
    /// Same as [`deallocate`](ByteAlloc::deallocate).
    #[must_use = "the returned block replaces the one passed in"]
    unsafe fn reallocate(&self, mut block: Block, new_size: usize, align: usize) -> Block {
        // on error the block is returned as it came in
        let _ = self.try_reallocate(&mut block, new_size, align);
        block
    }
}

impl dyn ByteAlloc {
    /// Whether `other` accepts this instance's blocks and vice versa, i.e. both have the same
    /// [identity](ByteAlloc::identity).
    ///
    /// Reflexive and symmetric for the instances' whole lifetimes.
    #[must_use]
    #[inline]
    pub fn is_equal(&self, other: &dyn ByteAlloc) -> bool {
        self.identity() == other.identity()
    }

    /// Returns the concrete adapter behind this trait object, if it is an `A`.
    #[must_use]
    pub fn downcast_ref<A: ByteAlloc>(&self) -> Option<&A> {
        let any: &dyn Any = self;
        any.downcast_ref::<A>()
    }
}

/// What an allocator knows about a block.
///
/// [`Owned`](BlockStatus::Owned) signifies the block is live under the queried allocator.
/// [`Unknown`](BlockStatus::Unknown) means the allocator can't tell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlockStatus {
    /// The block is empty and describes no memory.
    Empty,

    /// The allocator can't tell whether it owns the block.
    Unknown,

    /// The block isn't owned by this allocator.
    NotOwned,

    /// The block lies within memory owned by this allocator, but the provided pointer isn't the
    /// start of a live allocation.
    ///
    /// If `self.0` is `Some`, it's the start of the enclosing allocation.
    OwnedNonHead(Option<NonNull<u8>>),

    /// The block starts a live allocation, but its size doesn't match.
    ///
    /// If `self.0` is `Some`, it's the size of the live allocation.
    OwnedIncomplete(Option<usize>),

    /// The block is owned, but its address doesn't satisfy its alignment.
    ///
    /// `self.0` is the maximum alignment the address fulfills.
    OwnedMisaligned(usize),

    /// The block is owned by this allocator.
    Owned
}

impl BlockStatus {
    /// Whether the block may be live under the queried allocator, i.e. it's
    /// [`Owned`](BlockStatus::Owned) or [`Unknown`](BlockStatus::Unknown).
    #[must_use]
    #[inline]
    pub const fn maybe_owned(self) -> bool {
        matches!(self, BlockStatus::Owned | BlockStatus::Unknown)
    }
}

impl Display for BlockStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BlockStatus::Empty => write!(f, "empty"),

            BlockStatus::Unknown => write!(f, "unknown"),

            BlockStatus::Owned => write!(f, "owned"),

            BlockStatus::OwnedMisaligned(max_align) => {
                write!(f, "owned (misaligned, max alignment: {})", max_align)
            }

            BlockStatus::OwnedIncomplete(Some(size)) => {
                write!(f, "owned (incomplete, full size: {})", size)
            }
            BlockStatus::OwnedIncomplete(None) => {
                write!(f, "owned (incomplete, full size: unknown)")
            }

            BlockStatus::OwnedNonHead(Some(ptr)) => {
                write!(f, "owned (non-head, block start: {:p})", *ptr)
            }
            BlockStatus::OwnedNonHead(None) => write!(f, "owned (non-head, block start: unknown)"),

            BlockStatus::NotOwned => write!(f, "not owned")
        }
    }
}
