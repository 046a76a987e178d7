//! Scoped rewind points over an arena

use super::Arena;

/// Open region of an [`Arena`]
///
/// Created by [`Arena::begin_region`]. Ending it (explicitly with
/// [`ArenaRegion::end`] or by dropping it) rewinds the arena to the offset it
/// had when the region began, releasing everything allocated since.
///
/// Regions form a stack: only the innermost open region may end. Ending any
/// other one is fatal.
///
/// # Examples
/// ```
/// use groundwork_memory::Arena;
///
/// let mut buffer = [0u8; 128];
/// let arena = Arena::new(&mut buffer);
/// arena.alloc(16, 1)?;
///
/// let region = arena.begin_region();
/// arena.alloc(64, 1)?;
/// assert_eq!(arena.offset(), 80);
/// region.end();
///
/// assert_eq!(arena.offset(), 16);
/// # Ok::<(), groundwork_memory::MemoryError>(())
/// ```
#[must_use = "a region ends as soon as it is dropped"]
pub struct ArenaRegion<'a> {
    arena: &'a Arena<'a>,
    saved: usize,
    depth: usize,
    active: bool,
}

impl<'a> ArenaRegion<'a> {
    pub(super) fn new(arena: &'a Arena<'a>, saved: usize, depth: usize) -> Self {
        Self {
            arena,
            saved,
            depth,
            active: true,
        }
    }

    /// Offset the arena returns to when this region ends
    #[must_use]
    pub fn saved_offset(&self) -> usize {
        self.saved
    }

    /// Nesting depth, `0` for the outermost region
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Arena this region belongs to
    #[must_use]
    pub fn arena(&self) -> &'a Arena<'a> {
        self.arena
    }

    /// Ends the region and rewinds the arena
    ///
    /// # Panics
    /// If this is not the innermost open region, or the arena's offset has
    /// dropped below [`ArenaRegion::saved_offset`] (by shrinking an
    /// allocation made before the region began).
    #[track_caller]
    pub fn end(mut self) {
        self.active = false;
        self.arena.release_region(self.depth, self.saved, true);
    }
}

impl Drop for ArenaRegion<'_> {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            self.arena
                .release_region(self.depth, self.saved, !std::thread::panicking());
        }
    }
}

impl core::fmt::Debug for ArenaRegion<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArenaRegion")
            .field("saved", &self.saved)
            .field("depth", &self.depth)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
