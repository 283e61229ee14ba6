/*!
 * Heap Allocator Implementation
 * First-fit allocation and coalescing free
 */

use super::super::types::{Block, HeapError, HeapResult, MemoryPressure};
use super::Heap;
use crate::core::types::{Address, ByteCount, Size};
use log::{debug, warn};

impl Heap {
    /// Reserve `nb_bytes` from the lowest-addressed free block that can hold them
    ///
    /// Returns `Ok(None)` when no single free block is large enough, even if
    /// the free space adds up. The heap is left untouched in that case.
    /// A zero-byte request succeeds without consuming space; the returned
    /// address must not be treated as owning any bytes.
    pub fn allocate(&mut self, nb_bytes: ByteCount) -> HeapResult<Option<Address>> {
        let size: Size = usize::try_from(nb_bytes)
            .map_err(|_| HeapError::InvalidArgument { requested: nb_bytes })?;

        let Some(free_idx) = self.free_blocks.first_fit(size) else {
            debug!(
                "No free block can hold {} bytes ({} bytes free across {} blocks)",
                size,
                self.free_bytes(),
                self.free_blocks.len()
            );
            return Ok(None);
        };

        let address = self.free_blocks.take_front(free_idx, size);
        self.allocated_blocks.insert_sorted(Block::new(address, size));
        self.allocated_bytes += size;

        match self.check_memory_pressure() {
            Some(level) if level >= MemoryPressure::High => warn!(
                "Memory pressure {}: allocated {} bytes at 0x{:x} ({:.1}% used: {} / {})",
                level,
                size,
                address,
                self.usage_ratio() * 100.0,
                self.allocated_bytes,
                self.total_size
            ),
            _ => debug!("Allocated {} bytes at 0x{:x}", size, address),
        }

        Ok(Some(address))
    }

    /// Release the allocated block starting exactly at `address`
    ///
    /// The freed range is merged with an address-adjacent free block above
    /// and/or below it, so free space never sits in two touching entries.
    ///
    /// Blocks are identified by address only. Once an address has been freed
    /// and handed out again, a stale second free of it releases the new
    /// owner's block; keeping addresses unique to one owner is up to the
    /// caller.
    pub fn free(&mut self, address: Address) -> HeapResult<()> {
        let Some(alloc_idx) = self.allocated_blocks.find_start(address) else {
            warn!(
                "Attempted to free invalid or already freed address: 0x{:x}",
                address
            );
            return Err(HeapError::BlockNotFound(address));
        };

        let freed = self.allocated_blocks.remove_at(alloc_idx);
        self.allocated_bytes -= freed.size;

        if freed.is_empty() {
            debug!("Freed zero-size block at 0x{:x}", address);
            return Ok(());
        }

        self.release(freed);
        debug!(
            "Freed {} bytes at 0x{:x} ({} free blocks, {} bytes free)",
            freed.size,
            address,
            self.free_blocks.len(),
            self.free_bytes()
        );
        Ok(())
    }

    /// Return `freed` to the free list, coalescing with its neighbours
    fn release(&mut self, freed: Block) {
        let upper_idx = self.free_blocks.upper_bound(freed.start_address);

        let merged_upper = match self.free_blocks.get(upper_idx) {
            Some(upper) if freed.precedes(upper) => {
                self.free_blocks.grow_down(upper_idx, freed.start_address);
                true
            }
            _ => false,
        };

        if upper_idx > 0 {
            let lower_idx = upper_idx - 1;
            let touches_lower = self
                .free_blocks
                .get(lower_idx)
                .map_or(false, |lower| lower.precedes(&freed));

            if touches_lower {
                let absorbed = if merged_upper {
                    self.free_blocks.remove_at(upper_idx).size
                } else {
                    freed.size
                };
                self.free_blocks.grow_up(lower_idx, absorbed);
                return;
            }
        }

        if !merged_upper {
            self.free_blocks.insert_at(upper_idx, freed);
        }
    }

    /// Check memory pressure level
    pub(super) fn check_memory_pressure(&self) -> Option<MemoryPressure> {
        match MemoryPressure::from_ratio(self.usage_ratio()) {
            MemoryPressure::Low => None,
            level => Some(level),
        }
    }
}
