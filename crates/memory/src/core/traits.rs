//! Core traits for memory management
//!
//! Backend-independent views over an allocator: how much memory it uses and
//! whether it can drop everything at once.

/// Byte accounting for a backend
///
/// The arena reports exact figures against its buffer. The heap backend
/// keeps no books, so it reports nothing in use and `None` for every
/// capacity figure.
pub trait MemoryUsage {
    /// Bytes handed out and not yet reclaimed, alignment padding included
    fn used_memory(&self) -> usize;

    /// Bytes that can still be handed out, or `None` without a fixed capacity
    fn available_memory(&self) -> Option<usize>;

    /// Size of the backing buffer, or `None` without a fixed capacity
    fn total_memory(&self) -> Option<usize> {
        self.available_memory()
            .map(|available| self.used_memory() + available)
    }

    /// Share of the buffer in use, from 0.0 to 100.0
    ///
    /// An empty buffer reports `0.0`.
    fn memory_usage_percent(&self) -> Option<f32> {
        self.total_memory().map(|total| {
            if total == 0 {
                0.0
            } else {
                (self.used_memory() as f32 / total as f32) * 100.0
            }
        })
    }

    /// Snapshot of all four figures
    fn memory_usage(&self) -> BasicMemoryUsage {
        BasicMemoryUsage {
            used: self.used_memory(),
            available: self.available_memory(),
            total: self.total_memory(),
            usage_percent: self.memory_usage_percent(),
        }
    }
}

/// Point-in-time copy of [`MemoryUsage`] figures
///
/// Formats as `256 of 1024 bytes in use (25.0%)` for an arena and
/// `0 bytes in use` for the heap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicMemoryUsage {
    /// Bytes currently handed out
    pub used: usize,
    /// Bytes left in the arena buffer; `None` for the heap backend
    pub available: Option<usize>,
    /// Arena buffer size; `None` for the heap backend
    pub total: Option<usize>,
    /// `used` over `total`; `None` whenever `total` is
    pub usage_percent: Option<f32>,
}

impl core::fmt::Display for BasicMemoryUsage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.total {
            Some(total) => write!(f, "{} of {total} bytes in use", self.used)?,
            None => write!(f, "{} bytes in use", self.used)?,
        }

        if let Some(percent) = self.usage_percent {
            write!(f, " ({percent:.1}%)")?;
        }

        Ok(())
    }
}

/// Bulk reclamation of every allocation at once
pub trait Resettable {
    /// Release every allocation.
    ///
    /// Pointers handed out before the reset must not be used afterwards.
    /// Implementations may treat a reset they cannot honour as a fatal
    /// precondition violation; check [`Resettable::can_reset`] first.
    fn reset(&self);

    /// Whether [`Resettable::reset`] would currently succeed
    fn can_reset(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        used: usize,
        capacity: Option<usize>,
    }

    impl MemoryUsage for Fixed {
        fn used_memory(&self) -> usize {
            self.used
        }

        fn available_memory(&self) -> Option<usize> {
            self.capacity.map(|capacity| capacity - self.used)
        }
    }

    #[test]
    fn test_usage_percent() {
        let half = Fixed {
            used: 512,
            capacity: Some(1024),
        };
        assert_eq!(half.total_memory(), Some(1024));
        assert_eq!(half.memory_usage_percent(), Some(50.0));
        assert_eq!(
            half.memory_usage().to_string(),
            "512 of 1024 bytes in use (50.0%)"
        );

        let empty = Fixed {
            used: 0,
            capacity: Some(0),
        };
        assert_eq!(empty.memory_usage_percent(), Some(0.0));
    }

    #[test]
    fn test_unbounded_usage() {
        let unbounded = Fixed {
            used: 0,
            capacity: None,
        };
        let usage = unbounded.memory_usage();
        assert_eq!(usage.total, None);
        assert_eq!(usage.usage_percent, None);
        assert_eq!(usage.to_string(), "0 bytes in use");
    }
}
