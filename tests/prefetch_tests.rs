//! Integration tests for the stride prefetcher.

use memsim::cache::{Cache, CacheKind, CachePolicy};
use memsim::common::Operation;
use memsim::config::{HierarchyConfig, ReplacementPolicy};
use memsim::mem::PagedMemory;
use memsim::sim::{Hierarchy, StridePrefetcher};

fn prefetching_hierarchy() -> Hierarchy {
    let config = HierarchyConfig {
        prefetch: true,
        ..Default::default()
    };
    Hierarchy::new(&config).unwrap()
}

/// Tests that the predictor stays inactive while calibrating.
#[test]
fn test_calibration_issues_no_prefetch() {
    let mut hierarchy = prefetching_hierarchy();

    for addr in [0x00, 0x40, 0x80, 0xC0, 0x100] {
        hierarchy.process(Operation::Read, addr).unwrap();
    }

    assert!(!hierarchy.prefetcher().unwrap().is_active());
    assert!(!hierarchy.l1().in_cache(0x140));
}

/// Tests activation after the same-stride streak and the fetch on the
/// following access.
#[test]
fn test_activation_and_prefetch() {
    let mut hierarchy = prefetching_hierarchy();

    for addr in [0x00, 0x40, 0x80, 0xC0, 0x100, 0x140] {
        hierarchy.process(Operation::Read, addr).unwrap();
    }

    // The streak is long enough now, but no fetch has fired yet.
    assert!(hierarchy.prefetcher().unwrap().is_active());
    assert!(!hierarchy.l1().in_cache(0x180));

    // The next access prefetches one stride ahead of itself.
    hierarchy.process(Operation::Read, 0x180).unwrap();
    assert!(hierarchy.l1().in_cache(0x1C0));
}

/// Tests that prefetching reduces top-level misses without inflating
/// top-level reads, while the fill is accounted below.
#[test]
fn test_prefetch_accounting_asymmetry() {
    let mut hierarchy = prefetching_hierarchy();

    for addr in [0x00, 0x40, 0x80, 0xC0, 0x100, 0x140, 0x180, 0x1C0] {
        hierarchy.process(Operation::Read, addr).unwrap();
    }

    let l1 = hierarchy.l1().statistics();
    assert_eq!(l1.num_read, 8);
    assert_eq!(l1.num_miss, 7, "the prefetched line must hit");
    assert_eq!(l1.num_hit, 1);

    // Seven demand fills plus two prefetch fills (one ahead of 0x180,
    // one ahead of 0x1c0) probed L2.
    let l2 = hierarchy.levels().nth(1).unwrap().raw_statistics();
    assert_eq!(l2.num_read, 9);
}

/// Tests deactivation after a run of inconsistent strides.
#[test]
fn test_deactivation_after_erratic_strides() {
    let mut hierarchy = prefetching_hierarchy();

    for addr in [0x00, 0x40, 0x80, 0xC0, 0x100, 0x140] {
        hierarchy.process(Operation::Read, addr).unwrap();
    }
    assert!(hierarchy.prefetcher().unwrap().is_active());

    for addr in [0x1000, 0x3000, 0x6000, 0xA000] {
        hierarchy.process(Operation::Read, addr).unwrap();
    }
    assert!(!hierarchy.prefetcher().unwrap().is_active());
}

/// Tests the zero-stride bias: a trace sitting on one small address
/// activates the predictor immediately.
#[test]
fn test_initial_zero_stride_bias() {
    let mut memory = PagedMemory::new();
    memory.add_page(0);
    let mut cache = Cache::new(
        CachePolicy::with_geometry(256, 16, 4, 1, 10),
        ReplacementPolicy::Lru,
        CacheKind::Data,
        None,
    )
    .unwrap();
    let mut prefetcher = StridePrefetcher::new();

    for _ in 0..4 {
        prefetcher.step(&mut memory, &mut cache, 0).unwrap();
    }
    assert!(prefetcher.is_active());
    assert_eq!(prefetcher.stride(), 0);

    // The fifth step fetches addr + 0, installing the line untouched by
    // any demand access.
    prefetcher.step(&mut memory, &mut cache, 0).unwrap();
    assert!(cache.in_cache(0));
    assert_eq!(cache.statistics().accesses(), 0);
}

/// Tests stride detection on a unit-stride walk.
#[test]
fn test_stride_detection() {
    let mut memory = PagedMemory::new();
    memory.add_page(0);
    let mut cache = Cache::new(
        CachePolicy::with_geometry(256, 16, 4, 1, 10),
        ReplacementPolicy::Lru,
        CacheKind::Data,
        None,
    )
    .unwrap();
    let mut prefetcher = StridePrefetcher::new();

    for addr in [0x10, 0x20, 0x30, 0x40, 0x50, 0x60] {
        prefetcher.step(&mut memory, &mut cache, addr).unwrap();
    }

    assert!(prefetcher.is_active());
    assert_eq!(prefetcher.stride(), 0x10);
    assert!(cache.in_cache(0x70));
}
