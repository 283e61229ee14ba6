/*!
 * Heap Inspection
 * Read-only, address-ordered projection of the block lists
 */

use super::super::types::{Block, BlockKind, HeapError, HeapResult};
use super::Heap;
use crate::core::types::{Address, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One block in a heap report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockReport {
    pub kind: BlockKind,
    pub start_address: Address,
    pub size: Size,
}

impl BlockReport {
    fn new(kind: BlockKind, block: &Block) -> Self {
        Self {
            kind,
            start_address: block.start_address,
            size: block.size,
        }
    }
}

/// Snapshot of the heap layout for external rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapReport {
    pub total_size: Size,
    pub allocated_bytes: Size,
    /// `allocated_bytes / total_size`
    pub utilization: f64,
    pub blocks: Vec<BlockReport>,
}

impl HeapReport {
    pub fn free(&self) -> impl Iterator<Item = &BlockReport> {
        self.blocks.iter().filter(|b| b.kind == BlockKind::Free)
    }

    pub fn allocated(&self) -> impl Iterator<Item = &BlockReport> {
        self.blocks.iter().filter(|b| b.kind == BlockKind::Allocated)
    }
}

impl Heap {
    /// Interleave free and allocated blocks in ascending address order
    ///
    /// A zero-size allocation is listed ahead of the block that shares its
    /// address. Any other shared start address means the lists overlap and
    /// is reported as `HeapError::OverlapDetected`.
    pub fn inspect(&self) -> HeapResult<HeapReport> {
        let allocated = self.allocated_blocks.as_slice();
        let free = self.free_blocks.as_slice();
        let mut blocks = Vec::with_capacity(allocated.len() + free.len());

        let (mut a, mut f) = (0, 0);
        while a < allocated.len() && f < free.len() {
            let (alloc, fb) = (&allocated[a], &free[f]);
            if (alloc.start_address, !alloc.is_empty()) <= (fb.start_address, !fb.is_empty()) {
                blocks.push(BlockReport::new(BlockKind::Allocated, alloc));
                a += 1;
            } else {
                blocks.push(BlockReport::new(BlockKind::Free, fb));
                f += 1;
            }
        }
        blocks.extend(allocated[a..].iter().map(|b| BlockReport::new(BlockKind::Allocated, b)));
        blocks.extend(free[f..].iter().map(|b| BlockReport::new(BlockKind::Free, b)));

        if let Some(pair) = blocks
            .windows(2)
            .find(|w| w[0].start_address == w[1].start_address && w[0].size != 0)
        {
            log::error!(
                "Overlapping blocks at 0x{:x}: {} ({} bytes) and {} ({} bytes)",
                pair[0].start_address,
                pair[0].kind,
                pair[0].size,
                pair[1].kind,
                pair[1].size
            );
            return Err(HeapError::OverlapDetected(pair[0].start_address));
        }

        Ok(HeapReport {
            total_size: self.total_size,
            allocated_bytes: self.allocated_bytes,
            utilization: self.usage_ratio(),
            blocks,
        })
    }
}

impl fmt::Display for HeapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Heap size is {} bytes", self.total_size)?;
        for block in &self.blocks {
            writeln!(
                f,
                "Block @{} is {} ({} bytes)",
                block.start_address, block.kind, block.size
            )?;
        }
        writeln!(f, "{} bytes allocated", self.allocated_bytes)?;
        write!(f, "Peak utilization: {}%", self.utilization * 100.0)
    }
}
