/*!
 * tinyheap
 * Bookkeeping heap allocator over a simulated, fixed-size address space
 */

pub mod core;
pub mod memory;
pub mod monitoring;

// Re-exports
pub use crate::core::{Address, ByteCount, HeapConfig, Size};
pub use memory::{
    Allocator, AllocatorExt, Block, BlockKind, BlockReport, Heap, HeapError, HeapInfo,
    HeapReport, HeapResult, HeapStats, MemoryPressure, SharedHeap,
};
pub use monitoring::{init_tracing, span_operation};
