//! Heap backend
//!
//! Thin pass-through to the platform allocator (`std::alloc::System`) with
//! the same zero-fill contract as the arena.

use core::alloc::{GlobalAlloc, Layout};
use core::ptr::{self, NonNull};
use std::alloc::System;

#[cfg(feature = "logging")]
use tracing::trace;

use super::Allocator;
use crate::core::traits::MemoryUsage;
use crate::core::types::alignment::MAX_NATURAL_ALIGN;
use crate::error::{MemoryError, MemoryResult};
use crate::utils::{dangling_aligned, precondition_failed};

/// Allocator backed by the platform heap
///
/// Alignments above [`MAX_NATURAL_ALIGN`] are refused with
/// [`MemoryError::UnsupportedAlignment`] rather than rounded. There is no
/// bulk release: [`Allocator::free_all`] is fatal.
///
/// # Thread Safety
/// Stateless; inherits the thread safety of the platform allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapAllocator;

impl HeapAllocator {
    /// Creates a new `HeapAllocator`
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Largest alignment this backend accepts
    #[inline]
    #[must_use]
    pub const fn max_alignment() -> usize {
        MAX_NATURAL_ALIGN
    }

    fn check_alignment(layout: Layout) -> MemoryResult<()> {
        if layout.align() > MAX_NATURAL_ALIGN {
            return Err(MemoryError::unsupported_alignment(
                layout.align(),
                MAX_NATURAL_ALIGN,
            ));
        }
        Ok(())
    }
}

// SAFETY: blocks come straight from System with the requested layout and are
// zeroed before being returned; System never hands out overlapping blocks.
unsafe impl Allocator for HeapAllocator {
    fn allocate(&self, layout: Layout) -> MemoryResult<NonNull<[u8]>> {
        Self::check_alignment(layout)?;

        if layout.size() == 0 {
            return Ok(NonNull::slice_from_raw_parts(
                dangling_aligned(layout.align()),
                0,
            ));
        }

        // SAFETY: layout has a non-zero size.
        let raw = unsafe { System.alloc_zeroed(layout) };
        let ptr =
            NonNull::new(raw).ok_or_else(|| MemoryError::allocation_failed_with_layout(layout))?;

        #[cfg(feature = "logging")]
        trace!(size = layout.size(), align = layout.align(), "heap allocation");

        Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }

        // SAFETY: the caller guarantees ptr was allocated here with layout.
        unsafe { System.dealloc(ptr.as_ptr(), layout) };
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_layout: Layout,
    ) -> MemoryResult<NonNull<[u8]>> {
        Self::check_alignment(new_layout)?;

        let Some(ptr) = ptr.filter(|_| old_size != 0) else {
            return self.allocate(new_layout);
        };

        let new_size = new_layout.size();
        // SAFETY: the caller guarantees old_size and the alignment are the ones
        // the block was allocated with, which Layout accepted then.
        let old_layout =
            unsafe { Layout::from_size_align_unchecked(old_size, new_layout.align()) };

        if new_size == 0 {
            // SAFETY: ptr is live with old_layout (caller contract).
            unsafe { self.deallocate(ptr, old_layout) };
            return Ok(NonNull::slice_from_raw_parts(
                dangling_aligned(new_layout.align()),
                0,
            ));
        }

        // SAFETY: ptr is live with old_layout and new_size is non-zero and
        // fits isize (new_layout is a valid Layout).
        let raw = unsafe { System.realloc(ptr.as_ptr(), old_layout, new_size) };
        let Some(moved) = NonNull::new(raw) else {
            return Err(MemoryError::allocation_failed_with_layout(new_layout));
        };

        if new_size > old_size {
            // SAFETY: moved is valid for new_size bytes; the tail past
            // old_size is uninitialized.
            unsafe { ptr::write_bytes(moved.as_ptr().add(old_size), 0, new_size - old_size) };
        }

        #[cfg(feature = "logging")]
        trace!(old_size, new_size, "heap reallocation");

        Ok(NonNull::slice_from_raw_parts(moved, new_size))
    }

    #[track_caller]
    fn free_all(&self) {
        precondition_failed(
            "HeapAllocator::free_all",
            "the heap backend cannot release all allocations at once",
        );
    }

    fn supports_free_all(&self) -> bool {
        false
    }
}

// The heap doesn't track its allocations
impl MemoryUsage for HeapAllocator {
    fn used_memory(&self) -> usize {
        0
    }

    fn available_memory(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_allocation() {
        let heap = HeapAllocator::new();
        let layout = Layout::new::<u64>();

        let block = heap.allocate(layout).unwrap();
        assert_eq!(block.len(), 8);
        // SAFETY: block was just allocated with layout.
        unsafe { heap.deallocate(block.cast(), layout) };
    }

    #[test]
    fn test_zero_sized_allocation() {
        let heap = HeapAllocator::new();
        let layout = Layout::from_size_align(0, 16).unwrap();

        let block = heap.allocate(layout).unwrap();
        assert_eq!(block.len(), 0);
        assert_eq!(block.cast::<u8>().as_ptr().addr() % 16, 0);
        // SAFETY: zero-size deallocation is a no-op.
        unsafe { heap.deallocate(block.cast(), layout) };
    }

    #[test]
    fn test_over_aligned_is_refused() {
        let heap = HeapAllocator::new();
        let layout = Layout::from_size_align(64, MAX_NATURAL_ALIGN * 2).unwrap();

        assert_eq!(
            heap.allocate(layout).unwrap_err(),
            MemoryError::unsupported_alignment(MAX_NATURAL_ALIGN * 2, MAX_NATURAL_ALIGN)
        );
    }

    #[test]
    fn test_memory_usage_unknown() {
        let usage = HeapAllocator::new().memory_usage();
        assert_eq!(usage.used, 0);
        assert_eq!(usage.total, None);
        assert_eq!(usage.usage_percent, None);
    }

    #[test]
    fn test_thread_safety_markers() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<HeapAllocator>();
        assert_sync::<HeapAllocator>();
    }
}
