/*!
 * Block List
 * Address-ordered block sequence with positional edits
 */

use super::super::types::Block;
use crate::core::types::{Address, Size};

/// Blocks sorted ascending by start address
///
/// Every mutation goes through a positional insert or remove so callers must
/// name where a block lands; out-of-order placement trips a debug assertion.
/// Zero-size blocks may share a start address with their successor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    blocks: Vec<Block>,
}

impl BlockList {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// List holding a single block
    pub fn single(block: Block) -> Self {
        Self {
            blocks: vec![block],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn as_slice(&self) -> &[Block] {
        &self.blocks
    }

    /// Sum of all block sizes
    pub fn total_size(&self) -> Size {
        self.blocks.iter().map(|b| b.size).sum()
    }

    /// Index of the lowest-address block holding at least `size` bytes
    pub fn first_fit(&self, size: Size) -> Option<usize> {
        self.blocks.iter().position(|b| b.size >= size)
    }

    /// Index of the first block starting exactly at `address`
    pub fn find_start(&self, address: Address) -> Option<usize> {
        let idx = self.blocks.partition_point(|b| b.start_address < address);
        self.blocks
            .get(idx)
            .filter(|b| b.start_address == address)
            .map(|_| idx)
    }

    /// Index of the first block starting strictly above `address`,
    /// or `len()` when there is none
    pub fn upper_bound(&self, address: Address) -> usize {
        self.blocks.partition_point(|b| b.start_address <= address)
    }

    /// Insert `block` at `index`
    pub fn insert_at(&mut self, index: usize, block: Block) {
        debug_assert!(
            self.fits_at(index, &block),
            "block {:?} out of order at index {}",
            block,
            index
        );
        self.blocks.insert(index, block);
    }

    /// Insert `block` after every block starting at or below its address
    pub fn insert_sorted(&mut self, block: Block) -> usize {
        let index = self.upper_bound(block.start_address);
        self.insert_at(index, block);
        index
    }

    pub fn remove_at(&mut self, index: usize) -> Block {
        self.blocks.remove(index)
    }

    /// Shrink the block at `index` from the front, dropping it when emptied.
    /// Returns the block's start before shrinking.
    pub fn take_front(&mut self, index: usize, size: Size) -> Address {
        let block = &mut self.blocks[index];
        debug_assert!(block.size >= size);
        let start = block.start_address;
        block.start_address += size;
        block.size -= size;
        if block.size == 0 {
            self.blocks.remove(index);
        }
        start
    }

    /// Extend the block at `index` downward so it starts at `new_start`
    pub fn grow_down(&mut self, index: usize, new_start: Address) {
        let block = &mut self.blocks[index];
        debug_assert!(new_start <= block.start_address);
        block.size += block.start_address - new_start;
        block.start_address = new_start;
    }

    /// Extend the block at `index` upward by `size` bytes
    pub fn grow_up(&mut self, index: usize, size: Size) {
        self.blocks[index].size += size;
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    fn fits_at(&self, index: usize, block: &Block) -> bool {
        if index > self.blocks.len() {
            return false;
        }
        let after_lower = index == 0 || self.blocks[index - 1].start_address <= block.start_address;
        let before_upper = self
            .blocks
            .get(index)
            .map_or(true, |upper| block.start_address <= upper.start_address);
        after_lower && before_upper
    }
}

impl<'a> IntoIterator for &'a BlockList {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
