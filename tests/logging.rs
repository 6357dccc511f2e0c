#![allow(unknown_lints, clippy::undocumented_unsafe_blocks)]
use {
    core::sync::atomic::{AtomicUsize, Ordering},
    shalloc::{
        allocs::{NullAlloc, StackAlloc, SysAlloc},
        logging::{AllocEvent, EventCollectingLog, FmtLog, IOLog, Logged, Region},
        ByteAlloc,
        SharedAlloc
    },
    std::sync::Arc
};

#[test]
fn test_logged_counts_correct() {
    let logger = Arc::new(AtomicUsize::new(0));
    let logged = Logged::new(SysAlloc::new(), Arc::clone(&logger));

    let block = logged.allocate(16, 8);
    assert_eq!(logger.load(Ordering::SeqCst), 16, "expected total bytes = 16 after alloc");

    let block = unsafe { logged.reallocate(block, 48, 8) };
    assert_eq!(logger.load(Ordering::SeqCst), 48, "expected total bytes = 48 after realloc");

    unsafe { logged.deallocate(block) };
    assert_eq!(logger.load(Ordering::SeqCst), 0, "expected total bytes = 0 after dealloc");
}

#[test]
fn test_logged_str_logger() {
    let logged = Logged::new(SysAlloc::new(), FmtLog::new(String::new()));

    let block = logged.allocate(16, 8);
    let addr = block.as_ptr() as usize;
    unsafe { logged.deallocate(block) };

    logged.logger().with_buf(|log| {
        assert_eq!(
            *log,
            format!(
                "Allocated 16 bytes with alignment 8 at {a:#x}. (16 total bytes allocated)\n\
                 Deallocated 16 bytes with alignment 8 at {a:#x}. (0 total bytes allocated)\n",
                a = addr
            )
        );
    });
}

#[test]
fn test_logged_io_logger() {
    let logged = Logged::new(SysAlloc::new(), IOLog::new(Vec::<u8>::new()));
    let block = logged.allocate(32, 16);
    unsafe { logged.deallocate(block) };

    let Logged(_, logger) = logged;
    let out = String::from_utf8(logger.into_inner()).unwrap();
    assert_eq!(out.lines().count(), 2);
    assert!(out.starts_with("Allocated 32 bytes with alignment 16"));
}

#[test]
fn test_logged_failures() {
    let logged = Logged::new(NullAlloc, EventCollectingLog::new());
    assert!(logged.allocate(8, 8).is_empty());
    // empty requests succeed without an event
    assert!(logged.allocate(0, 8).is_empty());

    let events = logged.logger().take();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], AllocEvent::AllocFailed { size: 8, align: 8, .. }));
    assert!(logged.logger().events().is_empty());
}

#[test]
fn test_logged_realloc_events() {
    let logged = Logged::new(StackAlloc::new(64), EventCollectingLog::new());
    let block = logged.allocate(16, 8);
    let old = Region::of(&block);

    // in place: the top of the stack grows
    let block = unsafe { logged.reallocate(block, 32, 8) };
    // too big: the block comes back untouched
    let block = unsafe { logged.reallocate(block, 1024, 8) };
    assert_eq!(block.size(), 32);
    unsafe { logged.deallocate(block) };

    let events = logged.logger().events();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], AllocEvent::Alloc { total: 16, .. }));
    match events[1] {
        AllocEvent::Realloc { old: o, new, total } => {
            assert_eq!(o, old);
            assert_eq!(new.addr, old.addr);
            assert_eq!(new.size, 32);
            assert_eq!(total, 32);
        }
        e => panic!("expected a realloc event, got {:?}", e)
    }
    assert!(matches!(events[2], AllocEvent::ReallocFailed { new_size: 1024, .. }));
    assert!(matches!(events[3], AllocEvent::Free { total: 0, .. }));
}

#[test]
fn test_logged_keeps_inner_identity() {
    let logged = SharedAlloc::new(Logged::new(SysAlloc::new(), ()));
    let plain = SharedAlloc::new(SysAlloc::new());
    assert_eq!(logged, plain);

    // blocks pass freely between the wrapper and the plain adapter
    let block = logged.allocate(8, 8);
    unsafe { plain.deallocate(block) };
}

#[test]
fn test_logged_shared_handle() {
    let log = Arc::new(EventCollectingLog::new());
    let logged = SharedAlloc::new(Logged::new(SharedAlloc::default(), Arc::clone(&log)));

    let block = logged.allocate(64, 8);
    unsafe { logged.deallocate(block) };
    assert_eq!(log.events().len(), 2);
}
