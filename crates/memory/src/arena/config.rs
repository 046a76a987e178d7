//! Arena configuration

use crate::error::{MemoryError, MemoryResult};

/// Default bound on simultaneously open regions: no limit
pub const DEFAULT_MAX_REGIONS: usize = usize::MAX;

/// Configuration for [`Arena`](super::Arena)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Enable statistics tracking
    pub track_stats: bool,

    /// Byte written over memory given back by region end, reset or an
    /// in-place shrink. Fresh allocations are still zero-filled.
    pub dealloc_pattern: Option<u8>,

    /// Zero the bytes exposed when the last allocation grows in place.
    ///
    /// Off by default: growing in place leaves whatever the buffer held
    /// there (zeroes after a fresh start, old data after a shrink or a
    /// region end).
    pub zero_on_grow: bool,

    /// Maximum number of regions open at the same time.
    ///
    /// Unbounded by default. Setting a lower value turns runaway nesting
    /// into a fatal error at [`Arena::begin_region`](super::Arena::begin_region).
    pub max_regions: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            track_stats: cfg!(debug_assertions),
            dealloc_pattern: None,
            zero_on_grow: false,
            max_regions: DEFAULT_MAX_REGIONS,
        }
    }
}

impl ArenaConfig {
    /// Production configuration - optimized for performance
    #[must_use]
    pub fn production() -> Self {
        Self {
            track_stats: false,
            dealloc_pattern: None,
            zero_on_grow: false,
            max_regions: DEFAULT_MAX_REGIONS,
        }
    }

    /// Debug configuration - stats on, released memory scribbled with `0xDD`
    #[must_use]
    pub fn debug() -> Self {
        Self {
            track_stats: true,
            dealloc_pattern: Some(0xDD),
            zero_on_grow: false,
            max_regions: DEFAULT_MAX_REGIONS,
        }
    }

    /// Builder-style toggle for [`ArenaConfig::zero_on_grow`]
    #[must_use]
    pub fn with_zero_on_grow(mut self, enabled: bool) -> Self {
        self.zero_on_grow = enabled;
        self
    }

    /// Builder-style setter for [`ArenaConfig::max_regions`]
    #[must_use]
    pub fn with_max_regions(mut self, max_regions: usize) -> Self {
        self.max_regions = max_regions;
        self
    }

    /// Check the configuration for values the arena cannot work with
    pub fn validate(&self) -> MemoryResult<()> {
        if self.max_regions == 0 {
            return Err(MemoryError::invalid_config(
                "max_regions must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(!ArenaConfig::production().track_stats);
        assert_eq!(ArenaConfig::debug().dealloc_pattern, Some(0xDD));
        assert!(!ArenaConfig::default().zero_on_grow);
        assert_eq!(ArenaConfig::default().max_regions, usize::MAX);
        assert_eq!(ArenaConfig::debug().max_regions, DEFAULT_MAX_REGIONS);
    }

    #[test]
    fn test_validate() {
        assert!(ArenaConfig::default().validate().is_ok());

        let error = ArenaConfig::default()
            .with_max_regions(0)
            .validate()
            .unwrap_err();
        assert_eq!(error.code(), "MEM:CONFIG:INVALID");
    }
}
