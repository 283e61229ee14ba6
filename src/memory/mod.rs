/*!
 * Memory Module
 * Simulated heap allocation and bookkeeping
 */

pub mod heap;
pub mod shared;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use heap::{BlockList, BlockReport, Heap, HeapReport};
pub use shared::SharedHeap;
pub use traits::*;
pub use types::*;
