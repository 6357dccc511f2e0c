use {
    crate::{
        logging::AllocEvent,
        sync::{lock_mutex, Mutex}
    },
    core::sync::atomic::{AtomicUsize, Ordering},
    std::{io, sync::Arc}
};

/// A sink for [`AllocEvent`]s which also keeps a running count of allocated bytes.
///
/// Loggers are shared between threads together with the adapter they observe, so every method
/// takes `&self`.
pub trait AllocLogger: Send + Sync {
    /// Records one event.
    fn log(&self, event: AllocEvent);

    /// Adds `bytes` to the running total and returns the new total.
    fn inc_total(&self, bytes: usize) -> usize;

    /// Subtracts `bytes` from the running total and returns the new total.
    fn dec_total(&self, bytes: usize) -> usize;

    /// The running total of allocated bytes.
    fn total(&self) -> usize;
}

// noop logger
#[allow(clippy::inline_always)]
impl AllocLogger for () {
    #[inline(always)]
    fn log(&self, _: AllocEvent) {}

    #[inline(always)]
    fn inc_total(&self, _: usize) -> usize {
        0
    }

    #[inline(always)]
    fn dec_total(&self, _: usize) -> usize {
        0
    }

    #[inline(always)]
    fn total(&self) -> usize {
        0
    }
}

fn inc_atomic(atomic: &AtomicUsize, bytes: usize) -> usize {
    atomic.fetch_add(bytes, Ordering::AcqRel).wrapping_add(bytes)
}

fn dec_atomic(atomic: &AtomicUsize, bytes: usize) -> usize {
    let prev = atomic
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| Some(v.saturating_sub(bytes)))
        .unwrap_or_else(|v| v);
    prev.saturating_sub(bytes)
}

macro_rules! atomic_total_ops {
    ($($field:ident)?) => {
        #[inline]
        fn inc_total(&self, bytes: usize) -> usize {
            inc_atomic(&self$(.$field)?, bytes)
        }

        #[inline]
        fn dec_total(&self, bytes: usize) -> usize {
            dec_atomic(&self$(.$field)?, bytes)
        }

        #[inline]
        fn total(&self) -> usize {
            self$(.$field)?.load(Ordering::Acquire)
        }
    };
}

// byte counter only, no events
impl AllocLogger for AtomicUsize {
    atomic_total_ops!();

    #[inline]
    fn log(&self, _: AllocEvent) {}
}

impl<L: AllocLogger + ?Sized> AllocLogger for Arc<L> {
    #[inline]
    fn log(&self, event: AllocEvent) {
        (**self).log(event);
    }

    #[inline]
    fn inc_total(&self, bytes: usize) -> usize {
        (**self).inc_total(bytes)
    }

    #[inline]
    fn dec_total(&self, bytes: usize) -> usize {
        (**self).dec_total(bytes)
    }

    #[inline]
    fn total(&self) -> usize {
        (**self).total()
    }
}

/// A logger that writes one line per event to an [`io::Write`]r.
///
/// Write errors are ignored; logging never affects the allocation it reports on.
pub struct IOLog<W: io::Write> {
    buf: Mutex<W>,
    total: AtomicUsize
}

impl<W: io::Write> IOLog<W> {
    /// Creates a logger writing to `buf`.
    pub const fn new(buf: W) -> IOLog<W> {
        IOLog { buf: Mutex::new(buf), total: AtomicUsize::new(0) }
    }

    /// Stops logging and returns the writer.
    pub fn into_inner(self) -> W {
        #[cfg(not(feature = "parking_lot"))]
        {
            self.buf.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
        #[cfg(feature = "parking_lot")]
        {
            self.buf.into_inner()
        }
    }
}

impl<W: io::Write + Send> AllocLogger for IOLog<W> {
    atomic_total_ops!(total);

    fn log(&self, event: AllocEvent) {
        let _ = io::Write::write_fmt(&mut *lock_mutex(&self.buf), format_args!("{}\n", event));
    }
}

/// A logger that writes one line per event to a [`core::fmt::Write`]r, like a `String`.
pub struct FmtLog<W: core::fmt::Write> {
    buf: Mutex<W>,
    total: AtomicUsize
}

impl<W: core::fmt::Write> FmtLog<W> {
    /// Creates a logger writing to `buf`.
    pub const fn new(buf: W) -> FmtLog<W> {
        FmtLog { buf: Mutex::new(buf), total: AtomicUsize::new(0) }
    }

    /// Calls `f` with the writer, e.g. to inspect what was logged so far.
    pub fn with_buf<R, F: FnOnce(&mut W) -> R>(&self, f: F) -> R {
        f(&mut *lock_mutex(&self.buf))
    }
}

impl<W: core::fmt::Write + Send> AllocLogger for FmtLog<W> {
    atomic_total_ops!(total);

    fn log(&self, event: AllocEvent) {
        let _ = core::fmt::Write::write_fmt(
            &mut *lock_mutex(&self.buf),
            format_args!("{}\n", event)
        );
    }
}

/// A logger that keeps every event in memory.
#[derive(Default)]
pub struct EventCollectingLog {
    events: Mutex<Vec<AllocEvent>>,
    total: AtomicUsize
}

impl EventCollectingLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> EventCollectingLog {
        EventCollectingLog { events: Mutex::new(Vec::new()), total: AtomicUsize::new(0) }
    }

    /// A copy of the events recorded so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<AllocEvent> {
        lock_mutex(&self.events).clone()
    }

    /// Removes and returns the events recorded so far, oldest first.
    pub fn take(&self) -> Vec<AllocEvent> {
        core::mem::take(&mut *lock_mutex(&self.events))
    }
}

impl AllocLogger for EventCollectingLog {
    atomic_total_ops!(total);

    fn log(&self, event: AllocEvent) {
        lock_mutex(&self.events).push(event);
    }
}
