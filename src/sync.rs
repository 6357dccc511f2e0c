#[cfg(not(feature = "parking_lot"))]
pub(crate) type Mutex<T> = std::sync::Mutex<T>;
#[cfg(feature = "parking_lot")]
pub(crate) type Mutex<T> = parking_lot::Mutex<T>;

#[cfg(not(feature = "parking_lot"))]
pub(crate) type MutexGuard<'a, T> = std::sync::MutexGuard<'a, T>;
#[cfg(feature = "parking_lot")]
pub(crate) type MutexGuard<'a, T> = parking_lot::MutexGuard<'a, T>;

/// Locks `mutex`, recovering the guard if a previous holder panicked.
///
/// Every critical section in this crate leaves the protected state consistent before anything
/// that can panic, so a poisoned lock is still safe to use.
pub(crate) fn lock_mutex<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    #[cfg(not(feature = "parking_lot"))]
    {
        mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
    #[cfg(feature = "parking_lot")]
    {
        mutex.lock()
    }
}
