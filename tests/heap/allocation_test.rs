/*!
 * Allocation Tests
 * First-fit placement, splitting, exhaustion and teardown
 */

use super::common::*;
use pretty_assertions::assert_eq;
use tinyheap::{Allocator, AllocatorExt, Heap, HeapConfig, HeapError};

#[test]
fn test_heap_initialization() {
    let heap = Heap::new(1024);

    assert_eq!(heap.total_size(), 1024);
    assert_eq!(heap.allocated_bytes(), 0);
    assert_eq!(free_layout(&heap), vec![(0, 1024)]);
    assert!(heap.allocated_blocks().is_empty());
    assert_invariants(&heap);
}

#[test]
fn test_heap_from_config() {
    let heap = Heap::from_config(&HeapConfig::new(64));
    assert_eq!(heap.total_size(), 64);
    assert_eq!(Heap::default().total_size(), 1024);
}

#[test]
fn test_teardown_releases_everything() {
    let mut heap = Heap::new(1024);
    heap.allocate(100).unwrap();
    heap.teardown();

    assert_eq!(heap.total_size(), 0);
    assert_eq!(heap.allocated_bytes(), 0);
    assert!(heap.free_blocks().is_empty());
    assert!(heap.allocated_blocks().is_empty());

    // Second call is a no-op
    let before = heap.clone();
    heap.teardown();
    assert_eq!(heap, before);
}

#[test]
fn test_no_allocation_after_teardown_until_reinitialized() {
    let mut heap = Heap::new(1024);
    heap.teardown();

    assert_eq!(heap.allocate(1).unwrap(), None);
    assert_eq!(heap.allocate(0).unwrap(), None);

    heap.reinitialize(512);
    assert_eq!(heap, Heap::new(512));
    assert_eq!(heap.allocate(1).unwrap(), Some(0));
}

#[test]
fn test_sequential_allocations() {
    let mut heap = Heap::new(1024);

    let ptrs: Vec<_> = [2, 128, 256, 7]
        .iter()
        .map(|&n| heap.allocate(n).unwrap().unwrap())
        .collect();

    assert_eq!(ptrs, vec![0, 2, 130, 386]);
    assert_eq!(heap.total_size(), 1024);
    assert_eq!(heap.allocated_bytes(), 2 + 128 + 256 + 7);
    assert_eq!(
        allocated_layout(&heap),
        vec![(0, 2), (2, 128), (130, 256), (386, 7)]
    );
    assert_eq!(free_layout(&heap), vec![(393, 631)]);
    assert_invariants(&heap);
}

#[test]
fn test_oversized_request_returns_null() {
    let mut heap = Heap::new(1024);

    assert_eq!(heap.allocate(1025).unwrap(), None);
    assert_eq!(heap.total_size(), 1024);
    assert_eq!(heap.allocated_bytes(), 0);
    assert_eq!(free_layout(&heap), vec![(0, 1024)]);
    assert!(heap.allocated_blocks().is_empty());
}

#[test]
fn test_fragmented_space_is_not_combined() {
    let mut heap = four_block_heap();
    heap.free(block_no(1)).unwrap();
    heap.free(block_no(3)).unwrap();

    // 512 bytes free in total, but no single block of 300
    assert_eq!(heap.free_bytes(), 512);
    let before = heap.clone();
    assert_eq!(heap.allocate(300).unwrap(), None);
    assert_eq!(heap, before);
}

#[test]
fn test_allocate_or_oom_reports_capacity() {
    let mut heap = four_block_heap();
    heap.free(block_no(1)).unwrap();
    heap.free(block_no(3)).unwrap();

    match heap.allocate_or_oom(300) {
        Err(HeapError::OutOfMemory {
            requested,
            largest_free,
            free_bytes,
        }) => {
            assert_eq!(requested, 300);
            assert_eq!(largest_free, 256);
            assert_eq!(free_bytes, 512);
        }
        other => panic!("Expected OutOfMemory error, got {:?}", other),
    }

    assert_eq!(heap.allocate_or_oom(256), Ok(0));
}

#[test]
fn test_negative_request_is_invalid() {
    let mut heap = Heap::new(1024);

    assert_eq!(
        heap.allocate(-1),
        Err(HeapError::InvalidArgument { requested: -1 })
    );
    assert_eq!(
        heap.allocate_or_oom(-8),
        Err(HeapError::InvalidArgument { requested: -8 })
    );
    assert_eq!(heap, Heap::new(1024));
}

#[test]
fn test_first_fit_prefers_lowest_address() {
    let mut heap = Heap::new(1024);
    let a = heap.allocate(100).unwrap().unwrap();
    let _b = heap.allocate(50).unwrap().unwrap();
    let c = heap.allocate(300).unwrap().unwrap();
    let _d = heap.allocate(10).unwrap().unwrap();
    heap.free(a).unwrap();
    heap.free(c).unwrap();

    // Both holes fit 80 bytes; the lower one wins even though the upper
    // one would leave less waste elsewhere
    assert_eq!(heap.allocate(80).unwrap(), Some(0));
    assert_eq!(heap.allocate(80).unwrap(), Some(150));
    assert_invariants(&heap);
}

#[test]
fn test_zero_byte_allocation() {
    let mut heap = Heap::new(1024);

    let zero = heap.allocate(0).unwrap();
    assert_eq!(zero, Some(0));
    assert_eq!(heap.allocated_bytes(), 0);
    assert_eq!(free_layout(&heap), vec![(0, 1024)]);
    assert_eq!(allocated_layout(&heap), vec![(0, 0)]);
    assert_eq!(heap.block_size(0), Some(0));

    // The next real allocation lands on the same address
    assert_eq!(heap.allocate(16).unwrap(), Some(0));
    assert_eq!(allocated_layout(&heap), vec![(0, 0), (0, 16)]);
    assert_invariants(&heap);

    // The zero-size block is released first and leaves nothing behind
    heap.free(0).unwrap();
    assert_eq!(allocated_layout(&heap), vec![(0, 16)]);
    assert_eq!(free_layout(&heap), vec![(16, 1008)]);
    assert_invariants(&heap);
}

#[test]
fn test_block_queries() {
    let mut heap = Heap::new(64);
    let addr = heap.allocate(24).unwrap().unwrap();

    assert!(heap.is_allocated(addr));
    assert_eq!(heap.block_size(addr), Some(24));
    assert!(!heap.is_allocated(addr + 1));
    assert_eq!(heap.block_size(24), None);
    assert_eq!(heap.largest_free_block(), 40);
}

#[test]
fn test_stats() {
    let mut heap = Heap::new(1000);
    heap.allocate(850).unwrap();

    let stats = heap.stats();
    assert_eq!(stats.total_size, 1000);
    assert_eq!(stats.allocated_bytes, 850);
    assert_eq!(stats.free_bytes, 150);
    assert_eq!(stats.allocated_blocks, 1);
    assert_eq!(stats.free_blocks, 1);
    assert_eq!(stats.largest_free_block, 150);
    assert!((stats.usage_percentage - 85.0).abs() < 1e-9);
    assert_eq!(stats.memory_pressure(), tinyheap::MemoryPressure::High);
    assert_eq!(stats.fragmentation(), 0.0);
}

#[test]
fn test_trait_objects_share_semantics() {
    fn drive(allocator: &mut dyn Allocator) -> Vec<Option<usize>> {
        [2, 128, 256, 7]
            .iter()
            .map(|&n| allocator.allocate(n).unwrap())
            .collect()
    }

    let mut heap = Heap::new(1024);
    let mut shared = tinyheap::SharedHeap::with_size(1024);

    assert_eq!(drive(&mut heap), drive(&mut shared));
    assert_eq!(shared.snapshot(), heap);
}
