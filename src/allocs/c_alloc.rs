use {
    crate::{
        block::Block,
        error::{AlignErr, Cause, Error},
        identity::AllocId,
        traits::ByteAlloc
    },
    core::{
        ffi::c_void,
        mem,
        ptr::{self, NonNull}
    }
};

/// The alignment `malloc` and `realloc` guarantee for any allocation.
const MALLOC_ALIGN: usize = 2 * mem::size_of::<usize>();

fn failed(size: usize, align: usize, code: libc::c_int) -> Error {
    #[cfg(feature = "os_err_reporting")]
    {
        Error::alloc_failed(size, align, Cause::OSErr(code))
    }
    #[cfg(not(feature = "os_err_reporting"))]
    {
        let _ = code;
        Error::alloc_failed(size, align, Cause::Unknown)
    }
}

/// An adapter over C's allocation functions: `posix_memalign`, `realloc` and `free`.
///
/// Like [`SysAlloc`](crate::allocs::SysAlloc), it holds no state, so all instances share one
/// identity, and it is as thread-safe as the platform's `malloc`.
///
/// Resizes of blocks whose alignment `malloc` already guarantees go through `realloc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CAlloc;

impl ByteAlloc for CAlloc {
    #[inline]
    fn identity(&self) -> AllocId {
        AllocId::of_type::<CAlloc>()
    }

    #[inline]
    fn max_size(&self) -> usize {
        isize::MAX as usize
    }

    fn try_allocate(&self, size: usize, align: usize) -> Result<Block, Error> {
        tri!(Error::InvalidAlign(AlignErr::check(align)));
        if size == 0 {
            return Ok(Block::empty());
        }
        if size > self.max_size() {
            return Err(Error::alloc_failed(size, align, Cause::ExceedsMaxSize));
        }

        // posix_memalign requires a multiple of `sizeof(void*)`
        let c_align = align.max(mem::size_of::<*mut c_void>());
        let mut out: *mut c_void = ptr::null_mut();
        // SAFETY: `c_align` is a power of two and a multiple of `sizeof(void*)`.
        let code = unsafe { libc::posix_memalign(&mut out, c_align, size) };
        match (code, NonNull::new(out.cast::<u8>())) {
            (0, Some(ptr)) => Ok(Block::acquire(ptr, size, align, self.identity())),
            (code, _) => Err(failed(size, align, code))
        }
    }

    unsafe fn deallocate(&self, block: Block) {
        if let Some(ptr) = block.as_non_null() {
            libc::free(ptr.as_ptr().cast::<c_void>());
        }
    }

    #[inline]
    fn can_reallocate(&self, block: &Block, new_size: usize, align: usize) -> bool {
        let _ = block;
        AlignErr::check(align).is_ok() && align <= MALLOC_ALIGN && new_size <= self.max_size()
    }

    unsafe fn resize_in_place(
        &self,
        block: &mut Block,
        new_size: usize,
        align: usize
    ) -> Result<(), Error> {
        let out = libc::realloc(block.as_ptr().cast::<c_void>(), new_size);
        match NonNull::new(out.cast::<u8>()) {
            Some(ptr) => {
                block.reset(ptr, new_size, align.max(block.align()).min(MALLOC_ALIGN));
                Ok(())
            }
            None => Err(Error::os_alloc_failed(new_size, align))
        }
    }
}
