use {
    crate::{
        block::Block,
        error::Error,
        identity::AllocId,
        registry,
        traits::{BlockStatus, ByteAlloc}
    },
    core::{
        any::Any,
        fmt::{Debug, Formatter, Result as FmtResult}
    },
    std::sync::Arc
};

/// A shared, type-erased handle to an allocator.
///
/// Handles are ordinary values: cloning one is O(1) and shares the same underlying adapter
/// through an atomic reference count, never copying the adapter's state. The adapter is dropped
/// together with the last handle, except for the registry's fallback, which lives for the rest
/// of the process.
///
/// A default-constructed handle binds to the process-wide [fallback](crate::registry), so code
/// that doesn't care about allocation strategy needs no setup.
///
/// Two handles compare equal when their adapters consider each other's blocks interchangeable
/// (their [identities](ByteAlloc::identity) match, checked in both directions). A block must always be handed back
/// through a handle equal to the one that produced it. Handing it to a different one is caught
/// by an assertion in debug builds and is undefined behaviour otherwise;
/// [`try_deallocate`](SharedAlloc::try_deallocate) always checks.
#[derive(Clone)]
pub struct SharedAlloc {
    inner: Arc<dyn ByteAlloc>
}

impl SharedAlloc {
    /// Wraps `alloc` in a new handle, taking shared ownership of it.
    ///
    /// Wrapping another `SharedAlloc` shares its adapter instead of nesting handles.
    #[must_use]
    pub fn new<A: ByteAlloc>(alloc: A) -> SharedAlloc {
        let any: &dyn Any = &alloc;
        if let Some(shared) = any.downcast_ref::<SharedAlloc>() {
            return shared.clone();
        }
        SharedAlloc { inner: Arc::new(alloc) }
    }

    /// Creates a handle sharing an adapter that is already reference-counted.
    #[must_use]
    #[inline]
    pub fn from_arc<A: ByteAlloc>(alloc: Arc<A>) -> SharedAlloc {
        SharedAlloc { inner: alloc }
    }

    pub(crate) fn from_dyn(inner: Arc<dyn ByteAlloc>) -> SharedAlloc {
        SharedAlloc { inner }
    }

    /// Whether both handles share the very same adapter instance.
    ///
    /// This is stricter than `==`, which only asks whether the adapters' blocks are
    /// interchangeable.
    #[must_use]
    #[inline]
    pub fn same_instance(&self, other: &SharedAlloc) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The number of handles currently sharing this handle's adapter.
    #[must_use]
    #[inline]
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Returns the concrete adapter behind this handle, if it is an `A`.
    #[must_use]
    #[inline]
    pub fn downcast_ref<A: ByteAlloc>(&self) -> Option<&A> {
        self.inner.downcast_ref::<A>()
    }

    /// The adapter behind this handle, as a trait object.
    #[must_use]
    #[inline]
    pub fn as_dyn(&self) -> &dyn ByteAlloc {
        &*self.inner
    }

    /// Checks that `block` was produced by an adapter with this handle's identity.
    ///
    /// This agrees with `==`: a block passes exactly when its producer's handle would compare
    /// equal to this one. Blocks without a recorded owner pass.
    ///
    /// # Errors
    ///
    /// <code>Err([Error::IdentityMismatch] { .. })</code> if the recorded owner differs.
    pub fn check_owner(&self, block: &Block) -> Result<(), Error> {
        let expected = self.inner.identity();
        match block.owner() {
            Some(owner) if owner != expected => Err(Error::identity_mismatch(expected, Some(owner))),
            _ => Ok(())
        }
    }

    #[track_caller]
    #[inline]
    fn debug_check_owner(&self, block: &Block) {
        #[cfg(debug_assertions)]
        {
            if let Err(e) = self.check_owner(block) {
                panic!("{}", e);
            }
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = block;
        }
    }

    /// Deallocates `block` after checking it belongs to this handle's adapter.
    ///
    /// On success `block` is left empty.
    ///
    /// # Safety
    ///
    /// The caller must ensure `block` is still live. If it carries no recorded owner, the caller
    /// must also ensure it came from an adapter equal to this handle's.
    ///
    /// # Errors
    ///
    /// <code>Err([Error::IdentityMismatch] { .. })</code> if `block` was produced by another
    /// adapter. `block` is left untouched.
    pub unsafe fn try_deallocate(&self, block: &mut Block) -> Result<(), Error> {
        tri!(do self.check_owner(block));
        self.inner.deallocate(core::mem::take(block));
        Ok(())
    }
}

impl Default for SharedAlloc {
    /// Returns a handle to the process-wide fallback adapter, initializing it on first use.
    #[inline]
    fn default() -> SharedAlloc {
        registry::default_alloc()
    }
}

impl PartialEq for SharedAlloc {
    fn eq(&self, other: &SharedAlloc) -> bool {
        self.inner.is_equal(&*other.inner) && other.inner.is_equal(&*self.inner)
    }
}

impl Eq for SharedAlloc {}

impl Debug for SharedAlloc {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SharedAlloc")
            .field("identity", &self.inner.identity())
            .field("shares", &self.share_count())
            .finish()
    }
}

#[allow(clippy::inline_always)]
impl ByteAlloc for SharedAlloc {
    #[inline(always)]
    fn identity(&self) -> AllocId {
        self.inner.identity()
    }

    #[inline(always)]
    fn max_size(&self) -> usize {
        self.inner.max_size()
    }

    #[inline(always)]
    fn try_allocate(&self, size: usize, align: usize) -> Result<Block, Error> {
        self.inner.try_allocate(size, align)
    }

    #[track_caller]
    #[inline]
    unsafe fn deallocate(&self, block: Block) {
        self.debug_check_owner(&block);
        self.inner.deallocate(block);
    }

    #[inline(always)]
    fn allocate(&self, size: usize, align: usize) -> Block {
        self.inner.allocate(size, align)
    }

    #[inline(always)]
    fn block_status(&self, block: &Block) -> BlockStatus {
        self.inner.block_status(block)
    }

    #[inline(always)]
    fn has_allocated(&self, block: &Block) -> bool {
        self.inner.has_allocated(block)
    }

    #[inline(always)]
    fn can_reallocate(&self, block: &Block, new_size: usize, align: usize) -> bool {
        self.inner.can_reallocate(block, new_size, align)
    }

    #[inline(always)]
    unsafe fn resize_in_place(
        &self,
        block: &mut Block,
        new_size: usize,
        align: usize
    ) -> Result<(), Error> {
        self.inner.resize_in_place(block, new_size, align)
    }

    /// Resizes `block` through the adapter after checking it belongs to this handle.
    ///
    /// # Errors
    ///
    /// <code>Err([Error::IdentityMismatch] { .. })</code> if `block` was produced by another
    /// adapter, otherwise whatever the adapter returns.
    #[inline]
    unsafe fn try_reallocate(
        &self,
        block: &mut Block,
        new_size: usize,
        align: usize
    ) -> Result<(), Error> {
        tri!(do self.check_owner(block));
        self.inner.try_reallocate(block, new_size, align)
    }

    #[track_caller]
    #[inline]
    unsafe fn reallocate(&self, block: Block, new_size: usize, align: usize) -> Block {
        self.debug_check_owner(&block);
        self.inner.reallocate(block, new_size, align)
    }
}
