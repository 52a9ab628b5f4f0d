//! Reserve/commit arena allocator: a chained bump allocator over raw OS
//! virtual memory, with LIFO checkpointing and free-list recycling.

pub mod arena;
pub mod page;

pub use arena::{Arena, Scratch};
pub use page::{OsPageAllocator, PageAllocator};
