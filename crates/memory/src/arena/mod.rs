//! Linear (bump) arena over a caller-owned buffer
//!
//! - [`Arena`]: zero-filling bump allocator with in-place resize of the most
//!   recent allocation and bulk reset
//! - [`ArenaRegion`]: stack-ordered rewind points for temporary allocations
//! - [`ArenaConfig`] / [`ArenaStats`]: tuning and counters
//!
//! The arena never owns its memory. Callers keep the buffer alive for as long
//! as the arena and any pointer it returned are in use; the borrow checker
//! enforces the first half of that.

mod allocator;
mod config;
mod region;
mod stats;

pub use allocator::Arena;
pub use config::{ArenaConfig, DEFAULT_MAX_REGIONS};
pub use region::ArenaRegion;
pub use stats::ArenaStats;
