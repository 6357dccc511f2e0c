#![allow(unknown_lints, clippy::undocumented_unsafe_blocks)]
use {
    core::{ptr, slice},
    shalloc::{
        allocs::{NullAlloc, SysAlloc},
        error::{AlignErr, Cause, Error},
        move_reallocate,
        Block,
        BlockStatus,
        ByteAlloc
    }
};

fn fill(block: &mut Block, byte: u8) {
    unsafe { ptr::write_bytes(block.as_ptr(), byte, block.size()) };
}

// only the first `n` bytes of a grown block are initialized
unsafe fn prefix(block: &Block, n: usize) -> &[u8] {
    slice::from_raw_parts(block.as_ptr(), n)
}

#[test]
fn test_alloc_and_dealloc() {
    let allocator = SysAlloc::new();
    let mut block = allocator.try_allocate(16, 8).expect("alloc failed");
    assert_eq!(block.size(), 16);
    assert_eq!(block.owner(), Some(allocator.identity()));

    fill(&mut block, 0xAB);
    unsafe {
        assert!(block.as_slice().iter().all(|&b| b == 0xAB));
        allocator.deallocate(block);
    }

    // the allocator is still usable afterwards
    let again = allocator.allocate(16, 8);
    assert!(!again.is_empty());
    unsafe { allocator.deallocate(again) };
}

#[test]
fn test_zero_size_is_empty() {
    let allocator = SysAlloc::new();
    let block = allocator.allocate(0, 8);
    assert!(block.is_empty());
    assert!(block.as_ptr().is_null());
    assert!(!allocator.has_allocated(&block));
    assert_eq!(allocator.block_status(&block), BlockStatus::Empty);
    // handing back an empty block is a noop
    unsafe { allocator.deallocate(block) };
}

#[test]
fn test_alignment_is_honored() {
    let allocator = SysAlloc::new();
    for align in [1, 2, 8, 64, 4096] {
        let block = allocator.allocate(24, align);
        assert_eq!(block.as_ptr() as usize % align, 0, "block {:?} isn't aligned", block);
        assert_eq!(block.align(), align);
        unsafe { allocator.deallocate(block) };
    }
}

#[test]
fn test_invalid_align() {
    let allocator = SysAlloc::new();
    assert_eq!(allocator.try_allocate(8, 0).unwrap_err(), Error::InvalidAlign(AlignErr::ZeroAlign));
    assert_eq!(
        allocator.try_allocate(8, 12).unwrap_err(),
        Error::InvalidAlign(AlignErr::NonPowerOfTwoAlign(12))
    );
    assert!(allocator.allocate(8, 12).is_empty());
}

#[test]
fn test_exceeding_max_size() {
    let allocator = SysAlloc::new();
    let size = allocator.max_size() + 1;
    assert_eq!(
        allocator.try_allocate(size, 1).unwrap_err(),
        Error::AllocFailed(size, 1, Cause::ExceedsMaxSize)
    );
}

#[test]
fn test_reallocate_preserves_prefix() {
    let allocator = SysAlloc::new();
    let mut block = allocator.allocate(8, 8);
    fill(&mut block, 0xCC);

    let mut block = unsafe { allocator.reallocate(block, 64, 8) };
    assert_eq!(block.size(), 64);
    unsafe {
        assert!(prefix(&block, 8).iter().all(|&b| b == 0xCC));
    }

    fill(&mut block, 0xDD);
    let block = unsafe { allocator.reallocate(block, 4, 8) };
    assert_eq!(block.size(), 4);
    unsafe {
        assert_eq!(block.as_slice(), &[0xDD; 4]);
        allocator.deallocate(block);
    }
}

#[test]
fn test_reallocate_raising_alignment_moves() {
    let allocator = SysAlloc::new();
    let mut block = allocator.allocate(32, 1);
    fill(&mut block, 0x11);

    assert!(!allocator.can_reallocate(&block, 64, 4096));
    let block = unsafe { allocator.reallocate(block, 64, 4096) };
    assert_eq!(block.as_ptr() as usize % 4096, 0);
    unsafe {
        assert!(prefix(&block, 32).iter().all(|&b| b == 0x11));
        allocator.deallocate(block);
    }
}

#[test]
fn test_reallocate_to_zero_frees() {
    let allocator = SysAlloc::new();
    let mut block = allocator.allocate(32, 8);
    unsafe {
        allocator.try_reallocate(&mut block, 0, 8).unwrap();
    }
    assert!(block.is_empty());
}

#[test]
fn test_failed_reallocate_returns_original() {
    let allocator = SysAlloc::new();
    let mut block = allocator.allocate(16, 8);
    fill(&mut block, 0x5A);
    let addr = block.as_ptr();

    let too_big = allocator.max_size() + 1;
    let block = unsafe { allocator.reallocate(block, too_big, 8) };
    assert_eq!(block.size(), 16);
    assert_eq!(block.as_ptr(), addr);
    unsafe {
        assert_eq!(block.as_slice(), &[0x5A; 16]);
        allocator.deallocate(block);
    }
}

#[test]
fn test_move_reallocate() {
    let allocator = SysAlloc::new();
    let mut block = allocator.allocate(16, 8);
    fill(&mut block, 0x42);

    unsafe {
        move_reallocate(&allocator, &mut block, 48, 16).unwrap();
    }
    assert_eq!(block.size(), 48);
    assert_eq!(block.as_ptr() as usize % 16, 0);
    unsafe {
        assert_eq!(prefix(&block, 16), &[0x42; 16]);
        allocator.deallocate(block);
    }
}

#[test]
fn test_instances_are_equal() {
    let a: &dyn ByteAlloc = &SysAlloc::new();
    let b: &dyn ByteAlloc = &SysAlloc;
    assert!(a.is_equal(a));
    assert!(a.is_equal(b) && b.is_equal(a));
    assert!(!a.is_equal(&NullAlloc));

    // blocks may be freed through any instance
    let block = a.allocate(16, 8);
    unsafe { b.deallocate(block) };
}

#[test]
fn test_null_alloc() {
    let allocator = NullAlloc;
    assert_eq!(allocator.max_size(), 0);
    assert!(allocator.allocate(0, 8).is_empty());
    assert!(allocator.allocate(1, 8).is_empty());
    assert_eq!(
        allocator.try_allocate(64, 8).unwrap_err(),
        Error::AllocFailed(64, 8, Cause::OutOfMemory)
    );
    unsafe { allocator.deallocate(Block::empty()) };

    let foreign = SysAlloc::new().allocate(8, 8);
    assert_eq!(allocator.block_status(&foreign), BlockStatus::NotOwned);
    assert!(!allocator.has_allocated(&foreign));
    unsafe { SysAlloc::new().deallocate(foreign) };
}

#[test]
fn test_null_alloc_reallocate_fails() {
    let allocator = NullAlloc;
    let mut block = Block::empty();
    let err = unsafe { allocator.try_reallocate(&mut block, 16, 8) }.unwrap_err();
    assert_eq!(err, Error::AllocFailed(16, 8, Cause::OutOfMemory));
    assert!(block.is_empty());
}
