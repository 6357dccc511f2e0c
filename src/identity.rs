use {
    crate::ByteAlloc,
    core::{
        any::{type_name, TypeId},
        fmt::{Debug, Formatter, Result as FmtResult},
        sync::atomic::{AtomicU64, Ordering}
    }
};

/// Instance number shared by every instance of a type-wide identity.
const TYPE_WIDE: u64 = 0;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(TYPE_WIDE + 1);

/// An opaque, comparable allocator identity.
///
/// Two allocators with equal identities consider each other's blocks interchangeable: a block
/// produced by one may be deallocated or reallocated by the other.
///
/// Stateless adapters that only forward to a process-wide backend use
/// [`of_type`](AllocId::of_type), so every instance compares equal. Stateful adapters own their
/// memory and use [`unique`](AllocId::unique), so two independently constructed instances never
/// compare equal, even if they are structurally identical.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct AllocId {
    ty: TypeId,
    instance: u64,
    name: &'static str
}

impl AllocId {
    /// Returns the identity shared by every instance of `A`.
    #[must_use]
    #[inline]
    pub fn of_type<A: ByteAlloc>() -> AllocId {
        AllocId { ty: TypeId::of::<A>(), instance: TYPE_WIDE, name: type_name::<A>() }
    }

    /// Returns a fresh identity for a new instance of `A`.
    ///
    /// Every call returns an identity unequal to any other identity in the process.
    #[must_use]
    pub fn unique<A: ByteAlloc>() -> AllocId {
        let instance = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        AllocId { ty: TypeId::of::<A>(), instance, name: type_name::<A>() }
    }

    /// Whether this identity is shared by every instance of its adapter type.
    #[must_use]
    #[inline]
    pub const fn is_type_wide(&self) -> bool {
        self.instance == TYPE_WIDE
    }

    /// The type name of the adapter this identity belongs to.
    #[must_use]
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.name
    }
}

impl Debug for AllocId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.is_type_wide() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}#{}", self.name, self.instance)
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::AllocId,
        crate::allocs::{NullAlloc, SysAlloc}
    };

    #[test]
    fn type_wide_identities_match() {
        assert_eq!(AllocId::of_type::<SysAlloc>(), AllocId::of_type::<SysAlloc>());
        assert!(AllocId::of_type::<SysAlloc>().is_type_wide());
    }

    #[test]
    fn different_types_differ() {
        assert_ne!(AllocId::of_type::<SysAlloc>(), AllocId::of_type::<NullAlloc>());
    }

    #[test]
    fn unique_identities_differ() {
        let a = AllocId::unique::<SysAlloc>();
        let b = AllocId::unique::<SysAlloc>();
        assert_ne!(a, b);
        assert_ne!(a, AllocId::of_type::<SysAlloc>());
        assert!(!a.is_type_wide());
    }

    #[test]
    fn debug_names_the_adapter() {
        let id = AllocId::of_type::<SysAlloc>();
        assert!(format!("{:?}", id).ends_with("SysAlloc"));

        let unique = AllocId::unique::<SysAlloc>();
        assert!(format!("{:?}", unique).contains("SysAlloc#"));
    }
}
