/*!
 * Heap
 *
 * Bookkeeping allocator over a fixed-size, flat simulated address space.
 * No bytes are stored; only the block layout is tracked.
 *
 * ## Layout
 *
 * Two address-ordered block lists tile `[0, total_size)` between them:
 * - **Free blocks**: never zero-sized, never address-adjacent to each other
 * - **Allocated blocks**: one entry per live allocation
 *
 * ## Policy
 *
 * - **First-fit**: the lowest-addressed free block that is large enough wins
 * - **Splitting**: the allocation is carved from the front of that block
 * - **Coalescing**: a freed block merges with touching free neighbours on
 *   both sides in the same call
 *
 * There is no internal locking. Share a heap across threads through
 * [`crate::memory::SharedHeap`] or another external lock.
 */

mod allocator;
mod block_list;
mod inspect;

pub use block_list::BlockList;
pub use inspect::{BlockReport, HeapReport};

use super::traits::{Allocator, HeapInfo};
use super::types::{Block, HeapResult, HeapStats};
use crate::core::config::HeapConfig;
use crate::core::types::{Address, ByteCount, Size};
use log::info;

/// Simulated heap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heap {
    pub(super) total_size: Size,
    pub(super) free_blocks: BlockList,
    pub(super) allocated_blocks: BlockList,
    // Maintained on every allocate/free, never recomputed
    pub(super) allocated_bytes: Size,
}

impl Heap {
    /// Create a heap with one free block spanning `[0, size)`
    pub fn new(size: Size) -> Self {
        info!("Heap initialized with {} bytes (first-fit, coalescing)", size);
        Self {
            total_size: size,
            free_blocks: Self::initial_free_list(size),
            allocated_blocks: BlockList::new(),
            allocated_bytes: 0,
        }
    }

    pub fn from_config(config: &HeapConfig) -> Self {
        Self::new(config.size)
    }

    /// Release the simulated arena
    ///
    /// Both lists are emptied and the size drops to zero, so every later
    /// allocation fails until [`Heap::reinitialize`]. Calling it twice is a no-op.
    pub fn teardown(&mut self) {
        if self.total_size == 0 && self.free_blocks.is_empty() && self.allocated_blocks.is_empty() {
            return;
        }
        info!(
            "Heap torn down: released {} bytes ({} still allocated in {} blocks)",
            self.total_size,
            self.allocated_bytes,
            self.allocated_blocks.len()
        );
        self.free_blocks.clear();
        self.allocated_blocks.clear();
        self.total_size = 0;
        self.allocated_bytes = 0;
    }

    /// Reset to a fresh heap of `size` bytes, discarding all blocks
    pub fn reinitialize(&mut self, size: Size) {
        *self = Self::new(size);
    }

    fn initial_free_list(size: Size) -> BlockList {
        if size == 0 {
            BlockList::new()
        } else {
            BlockList::single(Block::new(0, size))
        }
    }

    pub fn total_size(&self) -> Size {
        self.total_size
    }

    pub fn allocated_bytes(&self) -> Size {
        self.allocated_bytes
    }

    pub fn free_bytes(&self) -> Size {
        self.total_size - self.allocated_bytes
    }

    pub fn free_blocks(&self) -> &BlockList {
        &self.free_blocks
    }

    pub fn allocated_blocks(&self) -> &BlockList {
        &self.allocated_blocks
    }

    /// Check if an allocated block starts exactly at `address`
    pub fn is_allocated(&self, address: Address) -> bool {
        self.allocated_blocks.find_start(address).is_some()
    }

    /// Get the size of the allocated block starting at `address`
    pub fn block_size(&self, address: Address) -> Option<Size> {
        self.allocated_blocks
            .find_start(address)
            .and_then(|idx| self.allocated_blocks.get(idx))
            .map(|b| b.size)
    }

    pub fn largest_free_block(&self) -> Size {
        self.free_blocks.iter().map(|b| b.size).max().unwrap_or(0)
    }

    /// Allocated share of the arena, 0.0 for an empty arena
    pub fn usage_ratio(&self) -> f64 {
        if self.total_size == 0 {
            return 0.0;
        }
        self.allocated_bytes as f64 / self.total_size as f64
    }

    pub fn stats(&self) -> HeapStats {
        HeapStats {
            total_size: self.total_size,
            allocated_bytes: self.allocated_bytes,
            free_bytes: self.free_bytes(),
            usage_percentage: self.usage_ratio() * 100.0,
            allocated_blocks: self.allocated_blocks.len(),
            free_blocks: self.free_blocks.len(),
            largest_free_block: self.largest_free_block(),
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::from_config(&HeapConfig::default())
    }
}

// Implement trait interfaces
impl Allocator for Heap {
    fn allocate(&mut self, nb_bytes: ByteCount) -> HeapResult<Option<Address>> {
        Heap::allocate(self, nb_bytes)
    }

    fn free(&mut self, address: Address) -> HeapResult<()> {
        Heap::free(self, address)
    }

    fn is_allocated(&self, address: Address) -> bool {
        Heap::is_allocated(self, address)
    }

    fn block_size(&self, address: Address) -> Option<Size> {
        Heap::block_size(self, address)
    }
}

impl HeapInfo for Heap {
    fn stats(&self) -> HeapStats {
        Heap::stats(self)
    }

    fn inspect(&self) -> HeapResult<HeapReport> {
        Heap::inspect(self)
    }
}
