//! Core building blocks shared by the arena and the allocator handles:
//! - usage/reset traits
//! - size and alignment constants

pub mod traits;
pub mod types;

// Re-export commonly used items
pub use crate::error::{MemoryError, MemoryResult};
pub use traits::{BasicMemoryUsage, MemoryUsage, Resettable};
pub use types::*;
