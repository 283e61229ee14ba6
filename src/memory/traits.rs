/*!
 * Memory Traits
 * Allocator abstractions
 */

use super::heap::HeapReport;
use super::types::*;
use crate::core::types::{Address, ByteCount, Size};

/// Allocator interface over a simulated address space
pub trait Allocator {
    /// Reserve `nb_bytes`, returning the block start or `None` when no single
    /// free block is large enough
    fn allocate(&mut self, nb_bytes: ByteCount) -> HeapResult<Option<Address>>;

    /// Release the block starting exactly at `address`
    fn free(&mut self, address: Address) -> HeapResult<()>;

    /// Check if a block currently starts at `address`
    fn is_allocated(&self, address: Address) -> bool;

    /// Get the size of the allocated block starting at `address`
    fn block_size(&self, address: Address) -> Option<Size>;
}

/// Heap statistics and reporting provider
pub trait HeapInfo {
    /// Get overall heap statistics
    fn stats(&self) -> HeapStats;

    /// Address-ordered listing of every block
    fn inspect(&self) -> HeapResult<HeapReport>;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}

/// Convenience for callers that treat exhaustion as an error
pub trait AllocatorExt: Allocator + HeapInfo {
    /// Like `allocate`, but the null-sentinel becomes `HeapError::OutOfMemory`
    fn allocate_or_oom(&mut self, nb_bytes: ByteCount) -> HeapResult<Address> {
        match self.allocate(nb_bytes)? {
            Some(address) => Ok(address),
            None => {
                let stats = self.stats();
                Err(HeapError::OutOfMemory {
                    // allocate has already rejected negative counts
                    requested: nb_bytes.unsigned_abs(),
                    largest_free: stats.largest_free_block,
                    free_bytes: stats.free_bytes,
                })
            }
        }
    }
}

impl<T> AllocatorExt for T where T: Allocator + HeapInfo {}
