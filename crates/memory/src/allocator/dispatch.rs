//! Copyable handle selecting one backend at construction

use core::alloc::Layout;
use core::ptr::NonNull;

use super::{Allocator, HeapAllocator};
use crate::arena::Arena;
use crate::error::MemoryResult;

/// Allocator handle bound to either an arena or the heap
///
/// Cheap to copy and carries no state of its own: every call is forwarded to
/// the backend chosen when the handle was made. Containers take one of these
/// (or any `A: Allocator`) and stay agnostic of the strategy behind it.
///
/// # Examples
/// ```
/// use core::alloc::Layout;
/// use groundwork_memory::{Allocator, AllocatorRef, Arena};
///
/// let mut buffer = [0u8; 256];
/// let arena = Arena::new(&mut buffer);
///
/// for allocator in [arena.allocator(), AllocatorRef::heap()] {
///     let layout = Layout::from_size_align(32, 8).unwrap();
///     let block = allocator.allocate(layout)?;
///     assert_eq!(block.len(), 32);
///     // SAFETY: block was just allocated with layout.
///     unsafe { allocator.deallocate(block.cast(), layout) };
/// }
/// # Ok::<(), groundwork_memory::MemoryError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub enum AllocatorRef<'a> {
    /// Backed by a linear arena
    Arena(&'a Arena<'a>),
    /// Backed by the platform heap
    Heap(HeapAllocator),
}

impl<'a> AllocatorRef<'a> {
    /// Handle bound to `arena`
    #[inline]
    #[must_use]
    pub fn arena(arena: &'a Arena<'a>) -> Self {
        Self::Arena(arena)
    }

    /// Handle bound to the platform heap
    #[inline]
    #[must_use]
    pub const fn heap() -> Self {
        Self::Heap(HeapAllocator::new())
    }

    /// Name of the backend: `"arena"` or `"heap"`
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Arena(_) => "arena",
            Self::Heap(_) => "heap",
        }
    }
}

impl Arena<'_> {
    /// Allocator handle bound to this arena
    #[inline]
    #[must_use]
    pub fn allocator(&self) -> AllocatorRef<'_> {
        AllocatorRef::Arena(self)
    }
}

// SAFETY: every call forwards to a backend that upholds the contract itself.
unsafe impl Allocator for AllocatorRef<'_> {
    #[inline]
    #[track_caller]
    fn allocate(&self, layout: Layout) -> MemoryResult<NonNull<[u8]>> {
        match self {
            Self::Arena(arena) => arena.allocate(layout),
            Self::Heap(heap) => heap.allocate(layout),
        }
    }

    #[inline]
    #[track_caller]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the caller's contract is passed through unchanged.
        unsafe {
            match self {
                Self::Arena(arena) => arena.deallocate(ptr, layout),
                Self::Heap(heap) => heap.deallocate(ptr, layout),
            }
        }
    }

    #[inline]
    #[track_caller]
    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_layout: Layout,
    ) -> MemoryResult<NonNull<[u8]>> {
        // SAFETY: the caller's contract is passed through unchanged.
        unsafe {
            match self {
                Self::Arena(arena) => arena.reallocate(ptr, old_size, new_layout),
                Self::Heap(heap) => heap.reallocate(ptr, old_size, new_layout),
            }
        }
    }

    #[track_caller]
    fn free_all(&self) {
        match self {
            Self::Arena(arena) => arena.free_all(),
            Self::Heap(heap) => heap.free_all(),
        }
    }

    fn supports_free_all(&self) -> bool {
        match self {
            Self::Arena(arena) => arena.supports_free_all(),
            Self::Heap(heap) => heap.supports_free_all(),
        }
    }
}

impl Default for AllocatorRef<'_> {
    fn default() -> Self {
        Self::heap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        let mut buffer = [0u8; 16];
        let arena = Arena::new(&mut buffer);

        assert_eq!(arena.allocator().backend(), "arena");
        assert_eq!(AllocatorRef::arena(&arena).backend(), "arena");
        assert_eq!(AllocatorRef::heap().backend(), "heap");
        assert_eq!(AllocatorRef::default().backend(), "heap");
    }

    #[test]
    fn test_free_all_support() {
        let mut buffer = [0u8; 16];
        let arena = Arena::new(&mut buffer);

        assert!(arena.allocator().supports_free_all());
        assert!(!AllocatorRef::heap().supports_free_all());
    }

    #[test]
    fn test_handle_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<AllocatorRef<'_>>();
    }
}
