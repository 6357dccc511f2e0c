#![allow(unknown_lints, clippy::undocumented_unsafe_blocks)]
use shalloc::{
    allocs::{NullAlloc, StackAlloc},
    error::{AlignErr, Cause, Error},
    Buffer,
    SharedAlloc
};

#[test]
fn test_new_buffer_is_empty() {
    let buf = Buffer::new();
    assert!(buf.is_empty());
    assert_eq!(buf.size(), 0);
    assert_eq!(buf.capacity(), 0);
    assert!(buf.as_slice().is_empty());
    assert_eq!(buf.allocator(), &SharedAlloc::default());
}

#[test]
fn test_resize_preserves_data() {
    let mut buf = Buffer::new();
    buf.copy_from(b"hello").unwrap();
    assert_eq!(buf.as_slice(), b"hello");

    buf.resize(64).unwrap();
    assert_eq!(buf.size(), 64);
    assert_eq!(&buf[..5], b"hello");
    assert!(buf[5..].iter().all(|&b| b == 0));

    buf.resize(2).unwrap();
    assert_eq!(buf.as_slice(), b"he");
    assert!(buf.capacity() >= 64);
}

#[test]
fn test_append_and_enlarge() {
    let mut buf = Buffer::new();
    buf.append(b"abc").unwrap().append(b"def").unwrap();
    assert_eq!(&*buf, b"abcdef");

    buf.enlarge_by(2).unwrap();
    assert_eq!(buf.as_slice(), b"abcdef\0\0");

    let align = buf.align();
    assert_eq!(
        buf.enlarge_by(usize::MAX).unwrap_err(),
        Error::AllocFailed(usize::MAX, align, Cause::ExceedsMaxSize)
    );
    assert_eq!(buf.size(), 8);
}

#[test]
fn test_ensure_only_grows() {
    let mut buf = Buffer::new();
    buf.resize(16).unwrap();
    buf.ensure(8).unwrap();
    assert_eq!(buf.size(), 16);
    buf.ensure(32).unwrap();
    assert_eq!(buf.size(), 32);
}

#[test]
fn test_clear_keeps_storage_and_free_releases_it() {
    let stack = StackAlloc::new(512);
    let alloc = SharedAlloc::new(stack);
    let mut buf = Buffer::with_capacity_in(128, alloc.clone()).unwrap();
    assert!(buf.capacity() >= 128);
    buf.resize(100).unwrap();

    buf.clear();
    assert!(buf.is_empty());
    assert!(buf.capacity() >= 128);

    let stack = alloc.downcast_ref::<StackAlloc>().unwrap();
    assert_eq!(stack.live_blocks(), 1);
    buf.free();
    assert_eq!(buf.capacity(), 0);
    assert_eq!(stack.live_blocks(), 0);
}

#[test]
fn test_drop_returns_storage() {
    let alloc = SharedAlloc::new(StackAlloc::new(256));
    {
        let mut buf = Buffer::with_alloc(alloc.clone());
        buf.resize(64).unwrap();
        assert_eq!(alloc.downcast_ref::<StackAlloc>().unwrap().live_blocks(), 1);
    }
    assert_eq!(alloc.downcast_ref::<StackAlloc>().unwrap().live_blocks(), 0);
}

#[test]
fn test_failed_growth_keeps_contents() {
    let mut buf = Buffer::with_alloc(SharedAlloc::new(StackAlloc::new(64)));
    buf.copy_from(&[7; 32]).unwrap();

    assert!(buf.resize(1024).is_err());
    assert_eq!(buf.as_slice(), &[7; 32]);

    let mut null = Buffer::with_alloc(SharedAlloc::new(NullAlloc));
    assert!(null.resize(1).is_err());
    assert!(null.is_empty());
}

#[test]
fn test_custom_alignment() {
    let mut buf = Buffer::with_align(256, SharedAlloc::default()).unwrap();
    buf.resize(10).unwrap();
    assert_eq!(buf.as_ptr() as usize % 256, 0);

    assert_eq!(
        Buffer::with_align(3, SharedAlloc::default()).unwrap_err(),
        Error::InvalidAlign(AlignErr::NonPowerOfTwoAlign(3))
    );
}
