//! Linear arena over a caller-owned buffer
//!
//! # Safety
//!
//! The arena hands out raw pointers into a buffer it borrows mutably for
//! `'buf`. All bookkeeping lives in `Cell`/`RefCell`, so every operation takes
//! `&self` and the arena can be shared freely on one thread.
//!
//! ## Invariants
//!
//! - `0 <= offset <= capacity` at all times
//! - Bytes in `[0, offset)` belong to live allocations (or padding)
//! - `last` is `None` or the start of the most recent successful allocation
//!   or resize, and that allocation ends at `offset`
//! - Every entry of `regions` is a saved offset no greater than the one above
//!   it; the region stack is released strictly top first
//! - The buffer is never moved, copied or freed by the arena

use core::alloc::Layout;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::marker::PhantomData;
use core::mem::{align_of, size_of};
use core::ptr::{self, NonNull};

#[cfg(feature = "logging")]
use tracing::{debug, trace, warn};

use super::{ArenaConfig, ArenaRegion, ArenaStats};
use crate::allocator::Allocator;
use crate::core::traits::{MemoryUsage, Resettable};
use crate::error::{MemoryError, MemoryResult};
use crate::macros::ensure;
use crate::utils::{
    checked_align_up, dangling_aligned, is_aligned, is_valid_alignment, precondition_failed,
};

/// Bump-pointer allocator over a borrowed byte buffer
///
/// Allocations are carved from the buffer at increasing offsets and are
/// zero-filled. Only the most recent allocation can be resized in place;
/// everything else is reclaimed in bulk with [`Arena::reset`] or by ending a
/// region opened with [`Arena::begin_region`].
///
/// # Memory Layout
/// ```text
/// base                      base + offset             base + capacity
///  |  alloc 1  |pad| alloc 2 |        free               |
///  [---------- used ---------][------ remaining ---------]
/// ```
///
/// # Examples
/// ```
/// use groundwork_memory::Arena;
///
/// let mut buffer = [0u8; 256];
/// let arena = Arena::new(&mut buffer);
///
/// let block = arena.alloc(32, 8)?;
/// assert_eq!(block.len(), 32);
/// assert!(arena.try_resize_in_place(block.cast(), 64));
/// # Ok::<(), groundwork_memory::MemoryError>(())
/// ```
pub struct Arena<'buf> {
    base: NonNull<u8>,
    capacity: usize,
    offset: Cell<usize>,
    last: Cell<Option<NonNull<u8>>>,
    regions: RefCell<Vec<usize>>,
    config: ArenaConfig,
    stats: Cell<ArenaStats>,
    _buffer: PhantomData<&'buf mut [u8]>,
}

// SAFETY: The arena holds the only access path to its buffer (it was borrowed
// mutably for 'buf) and none of its state is tied to a thread. It stays !Sync
// because the bookkeeping uses Cell.
unsafe impl Send for Arena<'_> {}

impl<'buf> Arena<'buf> {
    /// Creates an arena over `buffer` with the default configuration
    #[must_use]
    pub fn new(buffer: &'buf mut [u8]) -> Self {
        Self::from_parts(buffer, ArenaConfig::default())
    }

    /// Creates an arena over `buffer` after validating `config`
    pub fn with_config(buffer: &'buf mut [u8], config: ArenaConfig) -> MemoryResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(buffer, config))
    }

    fn from_parts(buffer: &'buf mut [u8], config: ArenaConfig) -> Self {
        let capacity = buffer.len();
        let base = NonNull::from(buffer).cast::<u8>();

        #[cfg(feature = "logging")]
        trace!(capacity, "arena created");

        Self {
            base,
            capacity,
            offset: Cell::new(0),
            last: Cell::new(None),
            regions: RefCell::new(Vec::new()),
            config,
            stats: Cell::new(ArenaStats::default()),
            _buffer: PhantomData,
        }
    }

    // ============================================================================
    // Allocation
    // ============================================================================

    /// Allocates `size` zeroed bytes aligned to `align`
    ///
    /// A zero-size request consumes nothing and returns an empty, well-aligned
    /// slice that must not be dereferenced.
    ///
    /// # Errors
    /// [`MemoryError::ArenaExhausted`] when the aligned block does not fit.
    /// The arena is left untouched.
    ///
    /// # Panics
    /// If `align` is not a power of two.
    #[track_caller]
    pub fn alloc(&self, size: usize, align: usize) -> MemoryResult<NonNull<[u8]>> {
        ensure!(
            is_valid_alignment(align),
            "Arena::alloc",
            "alignment must be a power of two greater than zero"
        );

        if size == 0 {
            return Ok(NonNull::slice_from_raw_parts(dangling_aligned(align), 0));
        }

        let Some(start) = self.fit(size, align) else {
            self.record(|stats| stats.failed_allocations += 1);

            #[cfg(feature = "logging")]
            trace!(
                size,
                align,
                available = self.remaining(),
                "arena allocation refused"
            );

            return Err(MemoryError::arena_exhausted(size, self.remaining()));
        };

        let end = start + size;
        // SAFETY: fit() guarantees start + size <= capacity.
        // - base is valid for writes of capacity bytes for 'buf
        // - the range lies past every live allocation
        let ptr = unsafe {
            let ptr = self.base.add(start);
            ptr::write_bytes(ptr.as_ptr(), 0, size);
            ptr
        };

        self.offset.set(end);
        self.last.set(Some(ptr));
        self.record(|stats| {
            stats.allocations += 1;
            stats.record_offset(end);
        });

        #[cfg(feature = "logging")]
        trace!(size, align, offset = end, "arena allocation");

        Ok(NonNull::slice_from_raw_parts(ptr, size))
    }

    /// Offset at which `size` bytes aligned to `align` would start, if they fit
    fn fit(&self, size: usize, align: usize) -> Option<usize> {
        let base = self.base.as_ptr().addr();
        let current = base + self.offset.get();
        let start = checked_align_up(current, align)? - base;
        let end = start.checked_add(size)?;
        (end <= self.capacity).then_some(start)
    }

    /// Grows or shrinks the most recent allocation without moving it
    ///
    /// Returns `false`, changing nothing, when `ptr` is not the last
    /// allocation or when `new_size` bytes from `ptr` would run past the end
    /// of the buffer. Resizing to zero frees the last allocation.
    ///
    /// Grown bytes are not zeroed unless [`ArenaConfig::zero_on_grow`] is
    /// set: they hold whatever the buffer contained there.
    ///
    /// # Panics
    /// If `ptr` does not point into this arena's buffer.
    #[track_caller]
    pub fn try_resize_in_place(&self, ptr: NonNull<u8>, new_size: usize) -> bool {
        ensure!(
            self.owns(ptr.as_ptr()),
            "Arena::try_resize_in_place",
            "pointer does not belong to this arena"
        );

        if self.last.get() != Some(ptr) {
            return false;
        }

        let start = self.offset_of(ptr);
        let Some(end) = start
            .checked_add(new_size)
            .filter(|&end| end <= self.capacity)
        else {
            return false;
        };

        let old_end = self.offset.get();
        if end > old_end {
            if self.config.zero_on_grow {
                // SAFETY: old_end < end <= capacity, so the range is inside
                // the buffer and past every live allocation.
                unsafe { ptr::write_bytes(self.base.as_ptr().add(old_end), 0, end - old_end) };
            }
        } else {
            self.scrub(end, old_end);
        }

        self.offset.set(end);
        self.record(|stats| {
            stats.in_place_resizes += 1;
            stats.record_offset(end);
        });

        #[cfg(feature = "logging")]
        trace!(from = old_end, to = end, "arena resized in place");

        true
    }

    /// Resizes an allocation, moving it only when it cannot change in place
    ///
    /// - `ptr == None` behaves like [`Arena::alloc`]
    /// - the last allocation (aligned to `align`) is resized in place and
    ///   keeps its address
    /// - anything else gets a fresh block holding the first
    ///   `min(old_size, new_size)` bytes; the old block is not reclaimed
    ///
    /// # Errors
    /// [`MemoryError::ArenaExhausted`] when a fresh block is needed and does
    /// not fit. The old block is untouched.
    ///
    /// # Panics
    /// If `align` is not a power of two, or `ptr` does not point into this
    /// arena's buffer.
    ///
    /// # Safety
    /// When `ptr` is `Some`, it must come from this arena, still be live
    /// (not released by a reset or region end) and be valid for reads of
    /// `old_size` bytes.
    #[track_caller]
    pub unsafe fn realloc(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
        align: usize,
    ) -> MemoryResult<NonNull<[u8]>> {
        let Some(ptr) = ptr else {
            return self.alloc(new_size, align);
        };

        ensure!(
            is_valid_alignment(align),
            "Arena::realloc",
            "alignment must be a power of two greater than zero"
        );
        ensure!(
            self.owns(ptr.as_ptr()),
            "Arena::realloc",
            "pointer does not belong to this arena"
        );

        if is_aligned(ptr.as_ptr().addr(), align) && self.try_resize_in_place(ptr, new_size) {
            return Ok(NonNull::slice_from_raw_parts(ptr, new_size));
        }

        let fresh = self.alloc(new_size, align)?;
        let count = old_size.min(new_size);
        // SAFETY: the caller guarantees ptr is readable for old_size bytes and
        // fresh was just allocated with new_size bytes. ptr::copy tolerates
        // overlap.
        unsafe { ptr::copy(ptr.as_ptr(), fresh.cast::<u8>().as_ptr(), count) };

        self.record(|stats| stats.relocations += 1);

        #[cfg(feature = "logging")]
        debug!(old_size, new_size, align, "arena reallocation moved block");

        Ok(fresh)
    }

    // ============================================================================
    // Bulk reclamation
    // ============================================================================

    /// Releases every allocation at once
    ///
    /// Pointers obtained before the reset must not be used afterwards.
    ///
    /// # Panics
    /// If any region is still open.
    #[track_caller]
    pub fn reset(&self) {
        ensure!(
            self.open_regions() == 0,
            "Arena::reset",
            "arena has dangling regions"
        );

        let used = self.offset.get();
        self.scrub(0, used);
        self.offset.set(0);
        self.last.set(None);
        self.record(|stats| stats.resets += 1);

        #[cfg(feature = "logging")]
        debug!(released = used, "arena reset");
    }

    /// Opens a region; ending it rewinds the arena to the current offset
    ///
    /// Regions nest and must be ended innermost first, either with
    /// [`ArenaRegion::end`], [`Arena::end_region`] or by dropping the guard.
    ///
    /// # Panics
    /// If a limit was set with [`ArenaConfig::with_max_regions`] and that
    /// many regions are already open. The default config has no limit.
    #[track_caller]
    pub fn begin_region(&self) -> ArenaRegion<'_> {
        let depth = self.open_regions();
        ensure!(
            depth < self.config.max_regions,
            "Arena::begin_region",
            "too many open regions"
        );

        let saved = self.offset.get();
        self.regions.borrow_mut().push(saved);

        #[cfg(feature = "logging")]
        debug!(depth, saved, "arena region opened");

        ArenaRegion::new(self, saved, depth)
    }

    /// Ends `region`, rewinding the arena to where the region began
    ///
    /// # Panics
    /// If `region` belongs to another arena, is not the innermost open
    /// region, or the arena's offset has dropped below the region's start.
    #[track_caller]
    pub fn end_region(&self, region: ArenaRegion<'_>) {
        ensure!(
            ptr::addr_eq(ptr::from_ref(region.arena()), ptr::from_ref(self)),
            "Arena::end_region",
            "region belongs to a different arena"
        );
        region.end();
    }

    /// Pops the region at `depth` and rewinds to `saved`
    ///
    /// With `strict` unset, violations are logged and ignored; region guards
    /// use that while the thread is already panicking.
    #[track_caller]
    pub(crate) fn release_region(&self, depth: usize, saved: usize, strict: bool) {
        let open = self.open_regions();
        let violation = if open == 0 {
            Some("no region is open")
        } else if open != depth + 1 {
            Some("region is not the innermost open region")
        } else if self.offset.get() < saved {
            Some("arena offset is below the region's saved offset")
        } else {
            None
        };

        if let Some(message) = violation {
            if strict {
                precondition_failed("Arena::end_region", message);
            }

            #[cfg(feature = "logging")]
            warn!(depth, saved, open, "skipping region release: {message}");

            return;
        }

        self.regions.borrow_mut().pop();

        let released = self.offset.get();
        self.scrub(saved, released);
        self.offset.set(saved);
        if let Some(last) = self.last.get()
            && self.offset_of(last) >= saved
        {
            self.last.set(None);
        }

        #[cfg(feature = "logging")]
        debug!(depth, saved, released, "arena region ended");
    }

    // ============================================================================
    // Typed helpers
    // ============================================================================

    /// Allocates a zeroed slot for one `T`
    ///
    /// The slot is not a valid `T` unless all-zero bytes are one; write it
    /// before reading.
    pub fn make<T>(&self) -> MemoryResult<NonNull<T>> {
        let block = self.alloc(size_of::<T>(), align_of::<T>())?;
        Ok(block.cast::<T>())
    }

    /// Allocates zeroed storage for `count` values of `T`
    ///
    /// # Errors
    /// [`MemoryError::SizeOverflow`] if `count * size_of::<T>()` overflows,
    /// [`MemoryError::ArenaExhausted`] if it does not fit.
    pub fn make_slice<T>(&self, count: usize) -> MemoryResult<NonNull<[T]>> {
        let size = size_of::<T>()
            .checked_mul(count)
            .ok_or_else(|| MemoryError::size_overflow("Arena::make_slice"))?;
        let block = self.alloc(size, align_of::<T>())?;
        Ok(NonNull::slice_from_raw_parts(block.cast::<T>(), count))
    }

    /// Copies `bytes` into the arena
    pub fn alloc_bytes(&self, bytes: &[u8]) -> MemoryResult<NonNull<[u8]>> {
        let block = self.alloc(bytes.len(), 1)?;
        // SAFETY: block is a fresh allocation of bytes.len() bytes, disjoint
        // from any live data the caller can hold a reference to.
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), block.cast::<u8>().as_ptr(), bytes.len());
        }
        Ok(block)
    }

    /// Copies `text` into the arena
    pub fn alloc_str(&self, text: &str) -> MemoryResult<NonNull<str>> {
        let block = self.alloc_bytes(text.as_bytes())?;
        // SAFETY: block is non-null and holds a byte-for-byte copy of valid
        // UTF-8.
        Ok(unsafe { NonNull::new_unchecked(block.as_ptr() as *mut str) })
    }

    /// Copies `text` into the arena followed by a NUL byte
    ///
    /// The returned slice includes the terminator. Interior NUL bytes are
    /// copied as they are.
    pub fn alloc_cstr(&self, text: &str) -> MemoryResult<NonNull<[u8]>> {
        let len = text.len();
        let size = len
            .checked_add(1)
            .ok_or_else(|| MemoryError::size_overflow("Arena::alloc_cstr"))?;
        let block = self.alloc(size, 1)?;
        // SAFETY: block holds len + 1 zeroed bytes; the last one stays zero.
        unsafe {
            ptr::copy_nonoverlapping(text.as_ptr(), block.cast::<u8>().as_ptr(), len);
        }
        Ok(block)
    }

    // ============================================================================
    // Introspection
    // ============================================================================

    /// Total size of the backing buffer
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current bump offset from the start of the buffer
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset.get()
    }

    /// Bytes consumed, padding included; same as [`Arena::offset`]
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        self.offset.get()
    }

    /// Bytes left between the offset and the end of the buffer
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity - self.offset.get()
    }

    /// Start of the allocation that can currently be resized in place
    #[inline]
    #[must_use]
    pub fn last_allocation(&self) -> Option<NonNull<u8>> {
        self.last.get()
    }

    /// Number of regions currently open
    #[inline]
    #[must_use]
    pub fn open_regions(&self) -> usize {
        self.regions.borrow().len()
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Snapshot of the collected statistics (all zero unless
    /// [`ArenaConfig::track_stats`] is set)
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        self.stats.get()
    }

    /// Whether `ptr` lies inside the buffer
    ///
    /// The one-past-the-end address counts as owned, so an empty block
    /// handed out at the very end of the buffer is recognised.
    #[inline]
    #[must_use]
    pub fn owns<T: ?Sized>(&self, ptr: *const T) -> bool {
        let addr = ptr.addr();
        let base = self.base.as_ptr().addr();
        addr >= base && addr - base <= self.capacity
    }

    fn offset_of(&self, ptr: NonNull<u8>) -> usize {
        ptr.as_ptr().addr() - self.base.as_ptr().addr()
    }

    /// Overwrites `[start, end)` with the dealloc pattern, if configured
    fn scrub(&self, start: usize, end: usize) {
        if let Some(pattern) = self.config.dealloc_pattern
            && end > start
        {
            debug_assert!(end <= self.capacity);
            // SAFETY: start < end <= capacity and the range holds no live
            // allocation.
            unsafe { ptr::write_bytes(self.base.as_ptr().add(start), pattern, end - start) };
        }
    }

    fn record(&self, update: impl FnOnce(&mut ArenaStats)) {
        if self.config.track_stats {
            let mut stats = self.stats.get();
            update(&mut stats);
            self.stats.set(stats);
        }
    }
}

// SAFETY: blocks come from alloc()/realloc(), which hand out zeroed, aligned,
// non-overlapping ranges of the borrowed buffer.
unsafe impl Allocator for Arena<'_> {
    #[inline]
    #[track_caller]
    fn allocate(&self, layout: Layout) -> MemoryResult<NonNull<[u8]>> {
        self.alloc(layout.size(), layout.align())
    }

    /// Frees `ptr` only if it is the last allocation; other blocks stay
    /// allocated until the next reset or region end.
    #[track_caller]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            self.try_resize_in_place(ptr, 0);
        }
    }

    #[track_caller]
    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_layout: Layout,
    ) -> MemoryResult<NonNull<[u8]>> {
        // Empty blocks sit at dangling addresses outside the buffer.
        let ptr = ptr.filter(|ptr| old_size != 0 || self.owns(ptr.as_ptr()));
        // SAFETY: the caller guarantees ptr is live with old_size bytes.
        unsafe { self.realloc(ptr, old_size, new_layout.size(), new_layout.align()) }
    }

    #[track_caller]
    fn free_all(&self) {
        self.reset();
    }

    fn supports_free_all(&self) -> bool {
        true
    }
}

impl fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("offset", &self.offset.get())
            .field("last_allocation", &self.last.get())
            .field("open_regions", &self.open_regions())
            .finish_non_exhaustive()
    }
}

impl MemoryUsage for Arena<'_> {
    fn used_memory(&self) -> usize {
        self.offset()
    }

    fn available_memory(&self) -> Option<usize> {
        Some(self.remaining())
    }

    fn total_memory(&self) -> Option<usize> {
        Some(self.capacity)
    }
}

impl Resettable for Arena<'_> {
    #[track_caller]
    fn reset(&self) {
        Arena::reset(self);
    }

    fn can_reset(&self) -> bool {
        self.open_regions() == 0
    }
}
