//! The allocator capability
//!
//! A single trait generic containers are written against, so the same code
//! runs on an arena or on the heap.
//!
//! # Safety
//!
//! `Allocator` is an unsafe trait: implementors promise that every block they
//! return is valid for reads and writes of its length, aligned as requested,
//! zero-filled, and disjoint from every other live block they handed out.
//! Callers in turn promise to pass back only pointers obtained from the same
//! allocator together with the size they were allocated with.

use core::alloc::Layout;
use core::ptr::NonNull;

use crate::error::{MemoryError, MemoryResult};

/// Uniform allocate / free / reallocate / free-all over one backend
///
/// # Safety
/// Implementors must ensure that:
/// - Returned blocks are valid for reads and writes of their length
/// - Blocks are aligned to `layout.align()` and zero-filled
/// - A block stays valid until it is freed, reallocated away, or released in
///   bulk by [`Allocator::free_all`] (or the backend's equivalent)
/// - Zero-size requests return an empty block that owns no memory
pub unsafe trait Allocator {
    /// Allocates a zeroed block for `layout`
    ///
    /// # Errors
    /// A recoverable [`MemoryError`] when the backend has no room or cannot
    /// honour the alignment.
    fn allocate(&self, layout: Layout) -> MemoryResult<NonNull<[u8]>>;

    /// Frees a block
    ///
    /// Backends may ignore the request (an arena can only reclaim its most
    /// recent block). Zero-size blocks are always ignored.
    ///
    /// # Safety
    /// - `ptr` must have been returned by this allocator and still be live
    /// - `layout` must have the size and alignment it was allocated with
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Resizes a block, moving it when needed
    ///
    /// `ptr == None` (or `old_size == 0`) allocates a fresh block. Contents up
    /// to `min(old_size, new_layout.size())` are preserved; bytes past
    /// `old_size` are zeroed on the heap, and on an arena when the block moves
    /// (see [`ArenaConfig::zero_on_grow`] for in-place growth).
    ///
    /// On failure the old block is left untouched and still owned by the
    /// caller.
    ///
    /// # Errors
    /// A recoverable [`MemoryError`] when no block of the new size is
    /// available.
    ///
    /// # Safety
    /// - `ptr`, when present, must have been returned by this allocator and
    ///   still be live
    /// - `old_size` must be the size it was allocated (or last resized) with
    /// - `new_layout.align()` must equal the alignment it was allocated with
    ///
    /// [`ArenaConfig::zero_on_grow`]: crate::arena::ArenaConfig::zero_on_grow
    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_layout: Layout,
    ) -> MemoryResult<NonNull<[u8]>>;

    /// Releases every block at once
    ///
    /// Backends that cannot do this treat the call as a fatal precondition
    /// violation; check [`Allocator::supports_free_all`] first.
    fn free_all(&self);

    /// Whether [`Allocator::free_all`] is supported
    fn supports_free_all(&self) -> bool;

    /// Allocates zeroed storage for `count` values of `T`
    ///
    /// # Errors
    /// [`MemoryError::SizeOverflow`] if the array layout overflows, otherwise
    /// as [`Allocator::allocate`].
    fn allocate_array<T>(&self, count: usize) -> MemoryResult<NonNull<[T]>>
    where
        Self: Sized,
    {
        let layout = Layout::array::<T>(count)
            .map_err(|_| MemoryError::size_overflow("Allocator::allocate_array"))?;
        let block = self.allocate(layout)?;
        Ok(NonNull::slice_from_raw_parts(block.cast::<T>(), count))
    }
}
