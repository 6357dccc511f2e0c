use {
    crate::identity::AllocId,
    core::fmt::{Debug, Display, Formatter, Result as FmtResult}
};

/// Errors for allocator operations.
///
/// Only the `try_*` family of operations surfaces these. The plain operations
/// ([`allocate`](crate::ByteAlloc::allocate), [`reallocate`](crate::ByteAlloc::reallocate))
/// report failure through an empty or unchanged [`Block`](crate::Block) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The allocator couldn't satisfy a request of the contained size and alignment; see the
    /// contained cause.
    ///
    /// The cause may or may not be accurate depending on the adapter and environment.
    AllocFailed(usize, usize, Cause),
    /// The given alignment was invalid; see the contained information.
    InvalidAlign(AlignErr),
    /// A block was handed to an allocator that isn't equal to the one that produced it.
    IdentityMismatch {
        /// The identity of the allocator the block was handed to.
        expected: AllocId,
        /// The identity recorded in the block, if any.
        found: Option<AllocId>
    },
    /// The adapter doesn't support the requested operation.
    Unsupported,
    /// Any other kind of error, in the form of a string.
    Other(&'static str)
}

impl Error {
    /// Creates a new `AllocFailed` error.
    #[cold]
    #[inline(never)]
    #[must_use]
    pub const fn alloc_failed(size: usize, align: usize, cause: Cause) -> Error {
        Error::AllocFailed(size, align, cause)
    }

    /// Creates a new `IdentityMismatch` error.
    #[cold]
    #[inline(never)]
    #[must_use]
    pub const fn identity_mismatch(expected: AllocId, found: Option<AllocId>) -> Error {
        Error::IdentityMismatch { expected, found }
    }

    /// Creates a new `AllocFailed` error whose cause is the last OS error, if
    /// `os_err_reporting` is enabled.
    #[cold]
    #[inline(never)]
    #[must_use]
    pub fn os_alloc_failed(size: usize, align: usize) -> Error {
        #[cfg(feature = "os_err_reporting")]
        {
            match std::io::Error::last_os_error().raw_os_error() {
                Some(code) => Error::AllocFailed(size, align, Cause::OSErr(code)),
                None => Error::AllocFailed(size, align, Cause::Unknown)
            }
        }
        #[cfg(not(feature = "os_err_reporting"))]
        {
            Error::AllocFailed(size, align, Cause::Unknown)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        use Error::{AllocFailed, IdentityMismatch, InvalidAlign, Other, Unsupported};

        match self {
            AllocFailed(size, align, cause) => {
                write!(
                    f,
                    "allocation failed:\n\tsize: {}\n\talign: {}\n\tcause: {}",
                    size, align, cause
                )
            }
            InvalidAlign(inv_align) => write!(f, "{}", inv_align),
            IdentityMismatch { expected, found: Some(found) } => {
                write!(
                    f,
                    "block produced by allocator {:?} was handed to allocator {:?}",
                    found, expected
                )
            }
            IdentityMismatch { expected, found: None } => {
                write!(f, "block with no recorded owner was handed to allocator {:?}", expected)
            }
            Unsupported => write!(f, "operation unsupported by this allocator"),
            Other(other) => write!(f, "{}", other)
        }
    }
}

impl std::error::Error for Error {}

/// The cause of an allocation failure.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Cause {
    /// The cause is unknown.
    ///
    /// This most commonly means an [`OSErr`](Cause::OSErr) occurred, but `os_err_reporting` is
    /// disabled.
    Unknown,
    /// The allocator ran out of memory.
    ///
    /// This should only be used when the __allocator__ runs out of memory and doesn't grow, like
    /// an exhausted [`StackAlloc`](crate::allocs::StackAlloc).
    OutOfMemory,
    /// The request was larger than the allocator's [`max_size`](crate::ByteAlloc::max_size).
    ExceedsMaxSize,
    #[cfg(feature = "os_err_reporting")]
    /// The cause is described in the contained OS error.
    ///
    /// The error may or may not be accurate depending on the environment.
    OSErr(i32)
}

impl Display for Cause {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Cause::Unknown => write!(f, "unknown"),
            Cause::OutOfMemory => write!(f, "out of memory"),
            Cause::ExceedsMaxSize => write!(f, "request exceeds the allocator's maximum size"),
            #[cfg(feature = "os_err_reporting")]
            Cause::OSErr(e) => write!(f, "os error:\n\t{}", e)
        }
    }
}

impl std::error::Error for Cause {}

/// The reason for an invalid alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlignErr {
    /// The alignment is zero.
    ZeroAlign,
    /// The alignment isn't a power of two.
    NonPowerOfTwoAlign(usize)
}

impl AlignErr {
    /// Checks that `align` is a valid alignment.
    ///
    /// # Errors
    ///
    /// - <code>Err([AlignErr::ZeroAlign])</code> if `align == 0`.
    /// - <code>Err([AlignErr::NonPowerOfTwoAlign]\(align\))</code> if `align` isn't a power of
    ///   two.
    pub const fn check(align: usize) -> Result<(), AlignErr> {
        if align == 0 {
            Err(AlignErr::ZeroAlign)
        } else if !align.is_power_of_two() {
            Err(AlignErr::NonPowerOfTwoAlign(align))
        } else {
            Ok(())
        }
    }
}

impl Display for AlignErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AlignErr::ZeroAlign => write!(f, "alignment is zero"),
            AlignErr::NonPowerOfTwoAlign(align) => {
                write!(f, "alignment {} isn't a power of two", align)
            }
        }
    }
}

impl std::error::Error for AlignErr {}

impl From<AlignErr> for Error {
    fn from(e: AlignErr) -> Error {
        Error::InvalidAlign(e)
    }
}
