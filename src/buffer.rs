use {
    crate::{
        block::Block,
        error::{AlignErr, Cause, Error},
        shared::SharedAlloc,
        traits::ByteAlloc
    },
    core::{
        fmt::{Debug, Formatter, Result as FmtResult},
        mem,
        ops::{Deref, DerefMut},
        ptr,
        slice
    }
};

/// Alignment of a buffer's storage unless another one is requested.
const DEFAULT_ALIGN: usize = mem::align_of::<u128>();

/// A growable byte buffer whose storage comes from a [`SharedAlloc`].
///
/// The buffer tracks its size separately from the capacity of its storage block, so shrinking
/// and [`clear`](Buffer::clear) keep the storage around for reuse. Growing goes through the
/// handle's [`try_reallocate`](ByteAlloc::try_reallocate), which preserves the contents. Bytes
/// added by growing the size are zeroed.
///
/// The storage is returned to the handle when the buffer is dropped or
/// [`free`](Buffer::free)d.
pub struct Buffer {
    storage: Block,
    size: usize,
    align: usize,
    alloc: SharedAlloc
}

impl Buffer {
    /// Creates an empty buffer over the process-wide fallback allocator.
    #[must_use]
    pub fn new() -> Buffer {
        Buffer::with_alloc(SharedAlloc::default())
    }

    /// Creates an empty buffer which allocates through `alloc`, aligned for any primitive.
    ///
    /// Nothing is allocated until the buffer grows.
    #[must_use]
    pub const fn with_alloc(alloc: SharedAlloc) -> Buffer {
        Buffer { storage: Block::empty(), size: 0, align: DEFAULT_ALIGN, alloc }
    }

    /// Creates an empty buffer which allocates storage aligned to `align` through `alloc`.
    ///
    /// # Errors
    ///
    /// <code>Err([Error::InvalidAlign]\(..\))</code> if `align` isn't a power of two.
    pub fn with_align(align: usize, alloc: SharedAlloc) -> Result<Buffer, Error> {
        tri!(Error::InvalidAlign(AlignErr::check(align)));
        Ok(Buffer { storage: Block::empty(), size: 0, align, alloc })
    }

    /// Creates an empty buffer with room for at least `capacity` bytes, allocated through
    /// `alloc`.
    ///
    /// # Errors
    ///
    /// Whatever the allocator returns for the initial reservation.
    pub fn with_capacity_in(capacity: usize, alloc: SharedAlloc) -> Result<Buffer, Error> {
        let mut buf = Buffer::with_alloc(alloc);
        tri!(do buf.reserve(capacity));
        Ok(buf)
    }

    /// The number of bytes in the buffer.
    #[must_use]
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether the buffer holds no bytes.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The number of bytes the buffer can hold without reallocating.
    #[must_use]
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.storage.size()
    }

    /// The alignment of the buffer's storage.
    #[must_use]
    #[inline]
    pub const fn align(&self) -> usize {
        self.align
    }

    /// The handle the buffer allocates through.
    #[must_use]
    #[inline]
    pub const fn allocator(&self) -> &SharedAlloc {
        &self.alloc
    }

    /// Makes sure the storage can hold at least `new_capacity` bytes.
    ///
    /// # Errors
    ///
    /// Whatever the allocator returns. The contents and capacity are unchanged in that case.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<&mut Buffer, Error> {
        if self.capacity() < new_capacity {
            // SAFETY: `storage` is empty or was produced by `alloc` and is still live.
            tri!(do unsafe {
                self.alloc.try_reallocate(&mut self.storage, new_capacity, self.align)
            });
        }
        Ok(self)
    }

    /// Sets the size to `new_size`, growing the storage if needed.
    ///
    /// Bytes up to `min(size, new_size)` are preserved; new bytes are zero.
    ///
    /// # Errors
    ///
    /// Whatever the allocator returns. The buffer is unchanged in that case.
    pub fn resize(&mut self, new_size: usize) -> Result<&mut Buffer, Error> {
        tri!(do self.reserve(new_size));
        if new_size > self.size {
            // SAFETY: `reserve` made `storage` at least `new_size` bytes long.
            unsafe {
                ptr::write_bytes(self.storage.as_ptr().add(self.size), 0, new_size - self.size);
            }
        }
        self.size = new_size;
        Ok(self)
    }

    /// Grows the size to `min_size` if it's currently smaller.
    ///
    /// # Errors
    ///
    /// See [`resize`](Buffer::resize).
    pub fn ensure(&mut self, min_size: usize) -> Result<&mut Buffer, Error> {
        if self.size < min_size {
            return self.resize(min_size);
        }
        Ok(self)
    }

    /// Grows the size by `additional` bytes.
    ///
    /// # Errors
    ///
    /// - <code>Err([Error::AllocFailed]\(.., [Cause::ExceedsMaxSize]\))</code> if the new size
    ///   overflows `usize`.
    /// - See [`resize`](Buffer::resize).
    pub fn enlarge_by(&mut self, additional: usize) -> Result<&mut Buffer, Error> {
        match self.size.checked_add(additional) {
            Some(new_size) => self.resize(new_size),
            None => Err(Error::alloc_failed(usize::MAX, self.align, Cause::ExceedsMaxSize))
        }
    }

    /// Replaces the contents with a copy of `src`.
    ///
    /// # Errors
    ///
    /// See [`resize`](Buffer::resize).
    pub fn copy_from(&mut self, src: &[u8]) -> Result<&mut Buffer, Error> {
        tri!(do self.resize(src.len()));
        self.as_mut_slice().copy_from_slice(src);
        Ok(self)
    }

    /// Appends a copy of `src` to the contents.
    ///
    /// # Errors
    ///
    /// See [`enlarge_by`](Buffer::enlarge_by).
    pub fn append(&mut self, src: &[u8]) -> Result<&mut Buffer, Error> {
        let old_size = self.size;
        tri!(do self.enlarge_by(src.len()));
        self.as_mut_slice()[old_size..].copy_from_slice(src);
        Ok(self)
    }

    /// Sets the size to zero, keeping the storage.
    pub fn clear(&mut self) -> &mut Buffer {
        self.size = 0;
        self
    }

    /// Returns the storage to the allocator, leaving the buffer empty.
    pub fn free(&mut self) {
        // SAFETY: `storage` is empty or was produced by `alloc` and is still live.
        unsafe {
            self.alloc.deallocate(mem::take(&mut self.storage));
        }
        self.size = 0;
    }

    /// The buffer's contents.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        if self.size == 0 {
            return &[];
        }
        // SAFETY: the first `size` bytes of a live storage block are initialized.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.size) }
    }

    /// The buffer's contents, mutably.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        if self.size == 0 {
            return &mut [];
        }
        // SAFETY: the first `size` bytes of a live storage block are initialized, and `&mut self`
        //  guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.storage.as_ptr(), self.size) }
    }
}

impl Default for Buffer {
    fn default() -> Buffer {
        Buffer::new()
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.free();
    }
}

impl Deref for Buffer {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl DerefMut for Buffer {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl Debug for Buffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Buffer")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .field("align", &self.align)
            .field("alloc", &self.alloc)
            .finish()
    }
}
