use {
    crate::error::{AlignErr, Cause, Error},
    std::alloc::Layout
};

/// Returns whether `ptr` is a multiple of `align`.
///
/// `align` must be a power of two.
#[must_use]
#[inline]
pub fn is_aligned_to(ptr: *const u8, align: usize) -> bool {
    (ptr as usize) & (align - 1) == 0
}

/// Returns the maximum alignment satisfied by a non-null pointer.
#[must_use]
#[inline]
pub fn ptr_max_align(ptr: *const u8) -> usize {
    let p = ptr as usize;

    p & p.wrapping_neg()
}

/// Rounds `addr` up to the next multiple of `align`, or `None` on overflow.
///
/// `align` must be a power of two.
#[must_use]
#[inline]
pub const fn align_up(addr: usize, align: usize) -> Option<usize> {
    match addr.checked_add(align - 1) {
        Some(v) => Some(v & !(align - 1)),
        None => None
    }
}

/// Validates `size` and `align` as a request against an allocator with the given `max_size`
/// and builds the matching [`Layout`].
///
/// # Errors
///
/// - <code>Err([Error::InvalidAlign]\(..\))</code> if `align` is zero or not a power of two.
/// - <code>Err([Error::AllocFailed]\(size, align, [Cause::ExceedsMaxSize]\))</code> if `size`
///   exceeds `max_size` or no valid layout exists for `size` at `align`.
pub fn request_layout(size: usize, align: usize, max_size: usize) -> Result<Layout, Error> {
    tri!(Error::InvalidAlign(AlignErr::check(align)));
    if size > max_size {
        return Err(Error::alloc_failed(size, align, Cause::ExceedsMaxSize));
    }
    match Layout::from_size_align(size, align) {
        Ok(layout) => Ok(layout),
        Err(_) => Err(Error::alloc_failed(size, align, Cause::ExceedsMaxSize))
    }
}
