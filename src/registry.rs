//! The process-wide fallback allocator.
//!
//! Every default-constructed [`SharedAlloc`] binds to one [`SysAlloc`] instance created on first
//! use. Initialization is lazy, happens exactly once even when many threads race to trigger it,
//! and every thread observes the fully-constructed instance. The instance is never torn down.

use {
    crate::{allocs::SysAlloc, shared::SharedAlloc, traits::ByteAlloc},
    core::sync::atomic::{AtomicU8, AtomicUsize, Ordering},
    std::sync::{Arc, OnceLock}
};

static DEFAULT: OnceLock<Arc<dyn ByteAlloc>> = OnceLock::new();
static STATE: AtomicU8 = AtomicU8::new(RegistryState::Uninitialized as u8);
static INIT_RUNS: AtomicUsize = AtomicUsize::new(0);

/// Where the fallback allocator is in its lifecycle.
///
/// The state only moves forward: `Uninitialized`, then `Initializing`, then `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RegistryState {
    /// Nothing has asked for the fallback yet.
    Uninitialized = 0,
    /// One thread is constructing the fallback; others asking for it wait.
    Initializing = 1,
    /// The fallback exists and is returned to every caller.
    Ready = 2
}

impl RegistryState {
    const fn from_u8(v: u8) -> RegistryState {
        match v {
            0 => RegistryState::Uninitialized,
            1 => RegistryState::Initializing,
            _ => RegistryState::Ready
        }
    }
}

/// Returns the registry's current state.
#[must_use]
pub fn state() -> RegistryState {
    RegistryState::from_u8(STATE.load(Ordering::Acquire))
}

/// Returns a handle to the fallback allocator, initializing it on first use.
///
/// Safe to call from any number of threads at once; exactly one of them constructs the
/// fallback while the rest block until it's ready.
#[must_use]
pub fn default_alloc() -> SharedAlloc {
    let inner = DEFAULT.get_or_init(|| {
        STATE.store(RegistryState::Initializing as u8, Ordering::Release);
        INIT_RUNS.fetch_add(1, Ordering::AcqRel);
        let alloc: Arc<dyn ByteAlloc> = Arc::new(SysAlloc::new());
        alloc
    });
    STATE.store(RegistryState::Ready as u8, Ordering::Release);
    SharedAlloc::from_dyn(Arc::clone(inner))
}

/// How many times the fallback has been constructed in this process: 0 before first use and
/// 1 forever after.
#[must_use]
pub fn init_count() -> usize {
    INIT_RUNS.load(Ordering::Acquire)
}
