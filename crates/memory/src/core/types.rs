//! Common types and constants for memory management

/// Memory alignment requirements
pub mod alignment {
    /// Largest alignment the platform heap guarantees for every allocation.
    ///
    /// Matches `alignof(max_align_t)` on the mainstream 32- and 64-bit
    /// targets (8 and 16 bytes respectively).
    pub const MAX_NATURAL_ALIGN: usize = 2 * core::mem::size_of::<usize>();
}

/// Memory size constants
pub mod size {
    /// 1 Kilobyte
    pub const KB: usize = 1024;

    /// 1 Megabyte
    pub const MB: usize = 1024 * KB;
}
