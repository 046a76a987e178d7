//! # groundwork-memory
//!
//! Linear arena allocation over caller-owned buffers, and one allocator
//! capability that generic code can run on either an arena or the heap.
//!
//! - [`Arena`]: bump allocator over a borrowed `&mut [u8]`. Zero-filled
//!   blocks, in-place resize of the most recent block, bulk reset.
//! - [`ArenaRegion`]: stack-ordered rewind points for scratch allocations.
//! - [`Allocator`] / [`AllocatorRef`]: allocate, free, reallocate and
//!   free-all, dispatched to an arena or to [`HeapAllocator`].
//!
//! ## Quick Start
//!
//! ```rust
//! use core::alloc::Layout;
//! use groundwork_memory::prelude::*;
//!
//! let mut buffer = [0u8; 1024];
//! let arena = Arena::new(&mut buffer);
//!
//! // Direct arena use
//! let block = arena.alloc(100, 1)?;
//! assert_eq!(arena.offset(), 100);
//! assert!(arena.try_resize_in_place(block.cast(), 900));
//! assert_eq!(arena.offset(), 900);
//!
//! // Scratch space released in one step
//! let region = arena.begin_region();
//! arena.alloc(64, 1)?;
//! region.end();
//! assert_eq!(arena.offset(), 900);
//!
//! // Same calls through the capability
//! let allocator = arena.allocator();
//! allocator.free_all();
//! let whole = allocator.allocate(Layout::from_size_align(1024, 1).unwrap())?;
//! assert_eq!(whole.len(), 1024);
//! # Ok::<(), MemoryError>(())
//! ```
//!
//! ## Errors
//!
//! Two separate channels:
//! - running out of space (or the heap refusing a request) is a
//!   [`MemoryError`] the caller must handle
//! - misuse (bad alignment, foreign pointers, regions ended out of order,
//!   resetting with regions open, heap `free_all`) is logged and panics;
//!   release builds abort
//!
//! ## Features
//!
//! - `logging` (default): structured `tracing` events for allocation, reset,
//!   region and relocation activity, and for precondition failures

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(unsafe_code)]
#![warn(rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Precision loss in usize -> f32 casts is acceptable for usage percentages
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::return_self_not_must_use)]

mod macros;

// Error types
pub mod error;

// Core modules
pub mod allocator;
pub mod arena;
pub mod core;
pub mod utils;

// Re-export core types for convenience
pub use crate::allocator::{Allocator, AllocatorRef, HeapAllocator};
pub use crate::arena::{Arena, ArenaConfig, ArenaRegion, ArenaStats};
pub use crate::core::traits::{BasicMemoryUsage, MemoryUsage, Resettable};
pub use crate::error::{MemoryError, MemoryResult};

// Public API exports
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    // Core traits
    pub use crate::core::traits::{MemoryUsage, Resettable};

    // Error types
    pub use crate::error::{MemoryError, MemoryResult};

    // Arena
    pub use crate::arena::{Arena, ArenaConfig, ArenaRegion, ArenaStats};

    // Allocator capability
    pub use crate::allocator::{Allocator, AllocatorRef, HeapAllocator};
}
