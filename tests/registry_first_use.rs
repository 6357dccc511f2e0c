//! Runs in its own test binary so nothing has touched the registry before the race starts.
//! Keep it to a single test.

use {
    shalloc::{
        registry::{self, RegistryState},
        ByteAlloc, SharedAlloc
    },
    std::{
        sync::{Arc, Barrier},
        thread
    }
};

const THREADS: usize = 16;

#[test]
fn test_concurrent_first_use_initializes_once() {
    assert_eq!(registry::state(), RegistryState::Uninitialized);
    assert_eq!(registry::init_count(), 0);

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let alloc = SharedAlloc::default();
                let block = alloc.allocate(32, 8);
                assert!(!block.is_empty());
                // SAFETY: allocated just above through the same handle.
                unsafe { shalloc::deallocate_bytes(&alloc, block) };
                alloc
            })
        })
        .collect();

    let allocs: Vec<SharedAlloc> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(registry::init_count(), 1);
    assert_eq!(registry::state(), RegistryState::Ready);
    for alloc in &allocs {
        assert!(alloc.same_instance(&allocs[0]));
        assert_eq!(alloc, &allocs[0]);
    }
    assert!(registry::default_alloc().same_instance(&allocs[0]));
    assert_eq!(registry::init_count(), 1);
}
