#![allow(unknown_lints, clippy::undocumented_unsafe_blocks)]
use shalloc::{allocs::SysAlloc, AllocId, Block, ByteAlloc};

#[test]
fn test_empty_block() {
    let block = Block::empty();
    assert!(block.is_empty());
    assert!(block.as_ptr().is_null());
    assert_eq!(block.as_non_null(), None);
    assert_eq!(block.size(), 0);
    assert_eq!(block.align(), 1);
    assert_eq!(block.owner(), None);
    assert!(unsafe { block.as_slice() }.is_empty());

    let default = Block::default();
    assert!(default.is_empty());
}

#[test]
fn test_from_raw_parts() {
    let null = unsafe { Block::from_raw_parts(core::ptr::null_mut(), 16, 8) };
    assert!(null.is_empty());

    let mut storage = [0u64; 4];
    let ptr = storage.as_mut_ptr().cast::<u8>();
    let block = unsafe { Block::from_raw_parts(ptr, 32, 8) };
    assert_eq!(block.as_ptr(), ptr);
    assert_eq!(block.size(), 32);
    assert_eq!(block.owner(), None);

    let zero = unsafe { Block::from_raw_parts(ptr, 0, 8) };
    assert!(zero.is_empty());
    assert!(zero.as_ptr().is_null());
}

#[test]
fn test_contains() {
    let mut storage = [0u8; 16];
    let ptr = storage.as_mut_ptr();
    let block = unsafe { Block::from_raw_parts(ptr, 16, 1) };
    assert!(block.contains(ptr));
    assert!(block.contains(unsafe { ptr.add(15) }));
    assert!(!block.contains(unsafe { ptr.add(16) }));
    assert!(!Block::empty().contains(ptr));
}

#[test]
fn test_adapters_stamp_their_identity() {
    let sys = SysAlloc::new();
    let block = sys.allocate(8, 8);
    assert_eq!(block.owner(), Some(AllocId::of_type::<SysAlloc>()));
    assert!(format!("{:?}", block).contains("SysAlloc"));
    unsafe { sys.deallocate(block) };
}

#[test]
fn test_blocks_are_send() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Block>();
}
