use {
    crate::{block::Block, error::Error},
    core::fmt::{self, Display, Formatter}
};

/// An extent of memory as seen by a logger.
///
/// The address is stored as an integer so events can be kept and sent across threads after the
/// memory is gone.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Region {
    /// The start address, or zero for an empty region.
    pub addr: usize,
    /// The size in bytes.
    pub size: usize,
    /// The alignment.
    pub align: usize
}

impl Region {
    /// Describes the memory of `block`.
    #[must_use]
    pub fn of(block: &Block) -> Region {
        Region { addr: block.as_ptr() as usize, size: block.size(), align: block.align() }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes with alignment {} at {:#x}", self.size, self.align, self.addr)
    }
}

/// One operation reported by a [`Logged`](crate::logging::Logged) adapter.
///
/// `total` is the logger's running byte count after the operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AllocEvent {
    /// A successful allocation.
    Alloc {
        /// The memory that was allocated.
        region: Region,
        /// Total bytes allocated after this call.
        total: usize
    },
    /// A failed allocation.
    AllocFailed {
        /// The requested size.
        size: usize,
        /// The requested alignment.
        align: usize,
        /// Why it failed.
        err: Error
    },
    /// A successful resize, in place or moved.
    Realloc {
        /// The memory before the call.
        old: Region,
        /// The memory after the call.
        new: Region,
        /// Total bytes allocated after this call.
        total: usize
    },
    /// A failed resize. The old memory is untouched.
    ReallocFailed {
        /// The memory the resize was attempted on.
        old: Region,
        /// The requested size.
        new_size: usize,
        /// The requested alignment.
        align: usize,
        /// Why it failed.
        err: Error
    },
    /// A deallocation.
    Free {
        /// The memory that was freed.
        region: Region,
        /// Total bytes allocated after this call.
        total: usize
    }
}

impl Display for AllocEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AllocEvent::Alloc { region, total } => {
                write!(f, "Allocated {}. ({} total bytes allocated)", region, total)
            }
            AllocEvent::AllocFailed { size, align, err } => {
                write!(
                    f,
                    "Failed allocation of {} bytes with alignment {}: {}",
                    size,
                    align,
                    err.to_string().replace("\n\t", " ")
                )
            }
            AllocEvent::Realloc { old, new, total } => {
                write!(
                    f,
                    "Reallocated {}->{} bytes with alignment {}->{}, moved {:#x}->{:#x}. ({} \
                     total bytes allocated)",
                    old.size, new.size, old.align, new.align, old.addr, new.addr, total
                )
            }
            AllocEvent::ReallocFailed { old, new_size, align, err } => {
                write!(
                    f,
                    "Failed reallocation of {} to {} bytes with alignment {}: {}",
                    old,
                    new_size,
                    align,
                    err.to_string().replace("\n\t", " ")
                )
            }
            AllocEvent::Free { region, total } => {
                write!(f, "Deallocated {}. ({} total bytes allocated)", region, total)
            }
        }
    }
}
