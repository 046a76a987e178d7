//! Allocator capability and its backends
//!
//! - [`Allocator`]: the trait generic code is written against
//! - [`HeapAllocator`]: platform heap backend
//! - [`AllocatorRef`]: copyable handle bound to an arena or the heap
//!
//! The arena implements [`Allocator`] directly; see
//! [`Arena`](crate::arena::Arena).

mod dispatch;
mod heap;
mod traits;

pub use dispatch::AllocatorRef;
pub use heap::HeapAllocator;
pub use traits::Allocator;

pub use crate::core::traits::{BasicMemoryUsage, MemoryUsage, Resettable};
pub use crate::error::{MemoryError, MemoryResult};
