//! Recoverable error types for groundwork-memory
//!
//! Only conditions a caller is expected to handle live here: running out of
//! arena space, the platform allocator refusing a request, alignments the heap
//! cannot honour, size arithmetic overflow and bad configuration.
//!
//! Programming errors (invalid alignment arguments, foreign pointers,
//! unbalanced regions, resetting with regions open, heap `free_all`) are not
//! represented here. They are fatal: the failure is logged with the operation
//! and caller location, then the thread panics.

use core::alloc::Layout;
use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::warn;

/// Recoverable memory errors
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The arena has fewer bytes left than the (aligned) request needs
    #[error("Arena exhausted: requested {requested} bytes, available {available}")]
    ArenaExhausted {
        /// Bytes requested by the caller
        requested: usize,
        /// Bytes left between the bump pointer and the end of the buffer
        available: usize,
    },

    /// The platform allocator returned no memory
    #[error("Memory allocation failed: {size} bytes with {align} byte alignment")]
    AllocationFailed {
        /// Requested size
        size: usize,
        /// Requested alignment
        align: usize,
    },

    /// Alignment above what the backend can guarantee
    #[error("Unsupported alignment: {align} (maximum supported is {max})")]
    UnsupportedAlignment {
        /// Requested alignment
        align: usize,
        /// Largest alignment the backend supports
        max: usize,
    },

    /// Size computation overflowed `usize` or `isize::MAX`
    #[error("Size overflow during operation: {operation}")]
    SizeOverflow {
        /// Operation that overflowed
        operation: &'static str,
    },

    /// Configuration failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with it
        reason: String,
    },
}

impl MemoryError {
    /// Check if the same request may succeed later (after a reset, a region
    /// release or a free)
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ArenaExhausted { .. } | Self::AllocationFailed { .. }
        )
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArenaExhausted { .. } => "MEM:ARENA:EXHAUSTED",
            Self::AllocationFailed { .. } => "MEM:ALLOC:FAILED",
            Self::UnsupportedAlignment { .. } => "MEM:ALLOC:ALIGN",
            Self::SizeOverflow { .. } => "MEM:ALLOC:OVERFLOW",
            Self::InvalidConfig { .. } => "MEM:CONFIG:INVALID",
        }
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create arena exhausted error
    #[must_use]
    pub fn arena_exhausted(requested: usize, available: usize) -> Self {
        Self::ArenaExhausted {
            requested,
            available,
        }
    }

    /// Create allocation failed error
    pub fn allocation_failed(size: usize, align: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(size, align, "platform allocation failed");

        Self::AllocationFailed { size, align }
    }

    /// Create allocation failed error from layout
    pub fn allocation_failed_with_layout(layout: Layout) -> Self {
        Self::allocation_failed(layout.size(), layout.align())
    }

    /// Create unsupported alignment error
    #[must_use]
    pub fn unsupported_alignment(align: usize, max: usize) -> Self {
        Self::UnsupportedAlignment { align, max }
    }

    /// Create size overflow error
    #[must_use]
    pub fn size_overflow(operation: &'static str) -> Self {
        Self::SizeOverflow { operation }
    }

    /// Create invalid config error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result type for memory operations
pub type MemoryResult<T> = core::result::Result<T, MemoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_exhausted_message() {
        let error = MemoryError::arena_exhausted(1000, 924);
        let text = error.to_string();
        assert!(text.contains("1000"));
        assert!(text.contains("924"));
    }

    #[test]
    fn test_error_with_layout() {
        let layout = Layout::new::<u64>();
        let error = MemoryError::allocation_failed_with_layout(layout);
        assert_eq!(
            error,
            MemoryError::AllocationFailed {
                size: 8,
                align: layout.align()
            }
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            MemoryError::arena_exhausted(1, 0).code(),
            "MEM:ARENA:EXHAUSTED"
        );
        assert_eq!(
            MemoryError::unsupported_alignment(64, 16).code(),
            "MEM:ALLOC:ALIGN"
        );
        assert_eq!(
            MemoryError::size_overflow("make_slice").code(),
            "MEM:ALLOC:OVERFLOW"
        );
        assert_eq!(
            MemoryError::invalid_config("max_regions").code(),
            "MEM:CONFIG:INVALID"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(MemoryError::arena_exhausted(8, 0).is_retryable());
        assert!(MemoryError::allocation_failed(8, 8).is_retryable());
        assert!(!MemoryError::unsupported_alignment(4096, 16).is_retryable());
        assert!(!MemoryError::invalid_config("bad").is_retryable());
    }
}
