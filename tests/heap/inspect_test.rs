/*!
 * Inspection Tests
 * Address-ordered reports, rendering and serialization
 */

use super::common::*;
use pretty_assertions::assert_eq;
use tinyheap::{BlockKind, Heap, HeapInfo, HeapReport};

fn kinds(report: &HeapReport) -> Vec<(BlockKind, usize, usize)> {
    report
        .blocks
        .iter()
        .map(|b| (b.kind, b.start_address, b.size))
        .collect()
}

#[test]
fn test_report_after_sequential_allocations() {
    let mut heap = Heap::new(1024);
    for n in [2, 128, 256, 7] {
        heap.allocate(n).unwrap();
    }

    let report = heap.inspect().unwrap();
    assert_eq!(
        kinds(&report),
        vec![
            (BlockKind::Allocated, 0, 2),
            (BlockKind::Allocated, 2, 128),
            (BlockKind::Allocated, 130, 256),
            (BlockKind::Allocated, 386, 7),
            (BlockKind::Free, 393, 631),
        ]
    );
    assert_eq!(report.allocated_bytes, 393);
    assert_eq!(report.total_size, 1024);
    assert!((report.utilization - 393.0 / 1024.0).abs() < 1e-12);
    assert_eq!(report.free().count(), 1);
    assert_eq!(report.allocated().count(), 4);
}

#[test]
fn test_report_interleaves_free_and_allocated() {
    let mut heap = four_block_heap();
    heap.free(block_no(1)).unwrap();
    heap.free(block_no(3)).unwrap();

    let report = heap.inspect().unwrap();
    assert_eq!(
        kinds(&report),
        vec![
            (BlockKind::Free, 0, 256),
            (BlockKind::Allocated, 256, 256),
            (BlockKind::Free, 512, 256),
            (BlockKind::Allocated, 768, 256),
        ]
    );
    assert_eq!(report.utilization, 0.5);
}

#[test]
fn test_report_renders_as_text() {
    let mut heap = Heap::new(16);
    let a = heap.allocate(4).unwrap().unwrap();
    heap.allocate(4).unwrap();
    heap.free(a).unwrap();

    let text = heap.inspect().unwrap().to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Heap size is 16 bytes",
            "Block @0 is free (4 bytes)",
            "Block @4 is allocated (4 bytes)",
            "Block @8 is free (8 bytes)",
            "4 bytes allocated",
            "Peak utilization: 25%",
        ]
    );
}

#[test]
fn test_report_serializes_to_json() {
    let mut heap = Heap::new(8);
    heap.allocate(8).unwrap();

    let json = serde_json::to_value(HeapInfo::inspect(&heap).unwrap()).unwrap();
    assert_eq!(json["total_size"], 8);
    assert_eq!(json["utilization"], 1.0);
    assert_eq!(json["blocks"][0]["kind"], "allocated");
    assert_eq!(json["blocks"][0]["start_address"], 0);
    assert_eq!(json["blocks"][0]["size"], 8);
}

#[test]
fn test_inspect_does_not_mutate() {
    let mut heap = four_block_heap();
    heap.free(block_no(2)).unwrap();
    let before = heap.clone();

    heap.inspect().unwrap();
    heap.inspect().unwrap();
    assert_eq!(heap, before);
}
