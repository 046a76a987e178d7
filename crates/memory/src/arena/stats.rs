//! Arena statistics

use core::fmt;

/// Counters collected by an arena when [`ArenaConfig::track_stats`] is set
///
/// [`ArenaConfig::track_stats`]: super::ArenaConfig::track_stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Successful non-empty allocations, including relocations
    pub allocations: usize,
    /// Allocations refused for lack of space
    pub failed_allocations: usize,
    /// Successful resizes of the last allocation
    pub in_place_resizes: usize,
    /// Reallocations that had to copy into a fresh block
    pub relocations: usize,
    /// Number of resets
    pub resets: usize,
    /// Highest offset ever reached
    pub peak_offset: usize,
}

impl ArenaStats {
    pub(crate) fn record_offset(&mut self, offset: usize) {
        self.peak_offset = self.peak_offset.max(offset);
    }
}

impl fmt::Display for ArenaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allocations: {}, failed: {}, resized: {}, relocated: {}, resets: {}, peak: {} bytes",
            self.allocations,
            self.failed_allocations,
            self.in_place_resizes,
            self.relocations,
            self.resets,
            self.peak_offset
        )
    }
}
