/*!
 * Memory Types
 * Common types for heap bookkeeping
 */

use crate::core::limits::{MEMORY_PRESSURE_CRITICAL, MEMORY_PRESSURE_HIGH, MEMORY_PRESSURE_MEDIUM};
use crate::core::types::{Address, ByteCount, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Heap operation result
pub type HeapResult<T> = Result<T, HeapError>;

/// Heap errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum HeapError {
    #[error("Invalid argument: cannot allocate {requested} bytes")]
    #[diagnostic(
        code(heap::invalid_argument),
        help("Byte counts passed to allocate must be zero or positive.")
    )]
    InvalidArgument { requested: ByteCount },

    #[error("Out of memory: requested {requested} bytes, largest free block {largest_free} bytes ({free_bytes} bytes free in total)")]
    #[diagnostic(
        code(heap::out_of_memory),
        help("Free space may be fragmented. Free adjacent blocks or use a larger heap.")
    )]
    OutOfMemory {
        requested: Size,
        largest_free: Size,
        free_bytes: Size,
    },

    #[error("No allocated block starts at 0x{0:x}")]
    #[diagnostic(
        code(heap::block_not_found),
        help("Only the exact address returned by allocate can be freed, and only once.")
    )]
    BlockNotFound(Address),

    #[error("Free and allocated blocks overlap at 0x{0:x}")]
    #[diagnostic(
        code(heap::overlap_detected),
        help("The block lists are inconsistent. This indicates a bug in the allocator.")
    )]
    OverlapDetected(Address),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(heap::config), help("Check the TINYHEAP_* environment variables."))]
    Config(String),
}

/// Contiguous byte range `[start_address, start_address + size)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub start_address: Address,
    pub size: Size,
}

impl Block {
    pub const fn new(start_address: Address, size: Size) -> Self {
        Self {
            start_address,
            size,
        }
    }

    /// One past the last address covered by the block
    #[inline]
    pub const fn end_address(&self) -> Address {
        self.start_address + self.size
    }

    /// True when `other` starts exactly where this block ends
    #[inline]
    pub const fn precedes(&self, other: &Block) -> bool {
        self.end_address() == other.start_address
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl From<(Address, Size)> for Block {
    fn from((start_address, size): (Address, Size)) -> Self {
        Self::new(start_address, size)
    }
}

/// Whether a reported block is free or allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Free,
    Allocated,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BlockKind::Free => write!(f, "free"),
            BlockKind::Allocated => write!(f, "allocated"),
        }
    }
}

/// Heap statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapStats {
    pub total_size: Size,
    pub allocated_bytes: Size,
    pub free_bytes: Size,
    pub usage_percentage: f64,
    pub allocated_blocks: usize,
    pub free_blocks: usize,
    pub largest_free_block: Size,
}

impl HeapStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.usage_percentage / 100.0)
    }

    /// Share of free space unusable by a single request of maximal size
    ///
    /// 0.0 when all free space is one block (or there is none), approaching
    /// 1.0 as free space splinters.
    pub fn fragmentation(&self) -> f64 {
        if self.free_bytes == 0 {
            return 0.0;
        }
        1.0 - self.largest_free_block as f64 / self.free_bytes as f64
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= MEMORY_PRESSURE_CRITICAL {
            MemoryPressure::Critical
        } else if ratio >= MEMORY_PRESSURE_HIGH {
            MemoryPressure::High
        } else if ratio >= MEMORY_PRESSURE_MEDIUM {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
