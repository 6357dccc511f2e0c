use {
    crate::{
        block::Block,
        error::{AlignErr, Cause, Error},
        helpers::is_aligned_to,
        traits::ByteAlloc
    },
    core::{cmp, mem, ptr}
};

/// The default body of [`ByteAlloc::try_reallocate`].
#[cfg_attr(miri, track_caller)]
pub unsafe fn reallocate<A: ByteAlloc + ?Sized>(
    a: &A,
    block: &mut Block,
    new_size: usize,
    align: usize
) -> Result<(), Error> {
    tri!(Error::InvalidAlign(AlignErr::check(align)));

    if new_size == 0 {
        a.deallocate(mem::take(block));
        return Ok(());
    }
    if block.is_empty() {
        *block = tri!(do a.try_allocate(new_size, align));
        return Ok(());
    }
    // noop; `block.align()` keeps the alignment it was allocated with
    if new_size == block.size() && is_aligned_to(block.as_ptr(), align) {
        return Ok(());
    }

    if a.can_reallocate(block, new_size, align)
        && a.resize_in_place(block, new_size, align).is_ok()
    {
        return Ok(());
    }

    move_reallocate(a, block, new_size, align)
}

/// Resizes `block` by allocating a new block, copying `min(old_size, new_size)` bytes into it
/// and deallocating the old one.
///
/// This is the fallback every adapter gets for free. It never touches the old block until the
/// new one has been allocated, so on failure `block` is left valid and unmodified.
///
/// # Safety
///
/// The caller must ensure `block` was produced by `a` or an allocator equal to it, and that it's
/// still live.
///
/// # Errors
///
/// - <code>Err([Error::AllocFailed]\(new_size, align, [Cause::ExceedsMaxSize]\))</code> if
///   `new_size` exceeds [`ByteAlloc::max_size`].
/// - Whatever [`ByteAlloc::try_allocate`] returns for `new_size` and `align`.
#[cfg_attr(miri, track_caller)]
pub unsafe fn move_reallocate<A: ByteAlloc + ?Sized>(
    a: &A,
    block: &mut Block,
    new_size: usize,
    align: usize
) -> Result<(), Error> {
    if new_size > a.max_size() {
        return Err(Error::alloc_failed(new_size, align, Cause::ExceedsMaxSize));
    }
    let new_block = tri!(do a.try_allocate(new_size, align));

    let count = cmp::min(block.size(), new_block.size());
    if count != 0 {
        ptr::copy_nonoverlapping(block.as_ptr(), new_block.as_ptr(), count);
    }

    let old = mem::replace(block, new_block);
    a.deallocate(old);

    Ok(())
}
