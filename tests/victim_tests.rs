//! Integration tests for victim-cache integration.

use memsim::cache::victim::{VICTIM_CACHE_SIZE, VICTIM_HIT_LATENCY, VICTIM_MISS_LATENCY};
use memsim::cache::{Cache, CacheKind, CachePolicy};
use memsim::config::ReplacementPolicy;
use memsim::mem::PagedMemory;

/// Direct-mapped parent so two conflicting addresses hammer one slot.
fn parent_with_victim() -> Cache {
    let policy = CachePolicy::with_geometry(256, 16, 1, 1, 10);
    let mut cache = Cache::new(policy, ReplacementPolicy::Lru, CacheKind::Data, None).unwrap();
    cache.attach_victim().unwrap();
    cache
}

fn backing_memory() -> PagedMemory {
    let mut memory = PagedMemory::new();
    memory.add_page(0);
    memory
}

/// Tests the fixed victim-cache geometry.
#[test]
fn test_victim_geometry() {
    let cache = parent_with_victim();
    let victim = cache.victim().unwrap().policy();

    assert_eq!(victim.cache_size, VICTIM_CACHE_SIZE);
    assert_eq!(victim.block_size, 16);
    assert_eq!(victim.associativity, victim.block_num);
    assert_eq!(victim.num_sets(), 1);
    assert_eq!(victim.hit_latency, VICTIM_HIT_LATENCY);
    assert_eq!(victim.miss_latency, VICTIM_MISS_LATENCY);
}

/// Tests that a conflict pair turns into victim hits at steady state.
#[test]
fn test_conflict_pair_hits_in_victim() {
    let mut memory = backing_memory();
    let mut cache = parent_with_victim();

    for addr in [0x00, 0x100, 0x00, 0x100] {
        cache.read(&mut memory, addr).unwrap();
    }

    let raw = cache.raw_statistics();
    assert_eq!(raw.num_read, 4);
    assert_eq!(raw.num_miss, 4);
    assert_eq!(raw.num_hit, 0);

    let victim = cache.victim().unwrap().raw_statistics();
    assert_eq!(victim.num_read, 4);
    assert_eq!(victim.num_hit, 2);
    assert_eq!(victim.num_miss, 2);

    // Misses satisfied by the victim are observed as hits here.
    let observed = cache.statistics();
    assert_eq!(observed.num_hit, 2);
    assert_eq!(observed.num_miss, 2);
}

/// Tests that observed hits conserve the raw parent and victim hits.
#[test]
fn test_victim_hit_conservation() {
    let mut memory = backing_memory();
    let mut cache = parent_with_victim();

    for i in 0..100u32 {
        let addr = (i % 3) * 0x100;
        if i % 4 == 0 {
            cache.write(&mut memory, addr, i as u8).unwrap();
        } else {
            cache.read(&mut memory, addr).unwrap();
        }
    }

    let raw = cache.raw_statistics();
    let victim = cache.victim().unwrap().raw_statistics();
    let observed = cache.statistics();

    assert_eq!(observed.num_hit, raw.num_hit + victim.num_hit);
    assert_eq!(observed.num_hit + observed.num_miss, raw.num_read + raw.num_write);
}

/// Tests that dirty evictions are absorbed and restored with their data.
#[test]
fn test_dirty_line_absorbed_and_restored() {
    let mut memory = backing_memory();
    let mut cache = parent_with_victim();

    cache.write(&mut memory, 0x00, 0xEE).unwrap();
    cache.read(&mut memory, 0x100).unwrap();

    // The dirty line sits in the victim, not in memory.
    assert!(!cache.in_cache(0x00));
    assert!(cache.victim().unwrap().in_cache(0x00));
    assert_eq!(memory.get_byte(0x00), 0);

    // Pulling it back restores the written byte.
    assert_eq!(cache.read(&mut memory, 0x00).unwrap(), 0xEE);
    assert!(!cache.victim().unwrap().in_cache(0x00));
    assert_eq!(memory.get_byte(0x00), 0);
}

/// Tests that a full victim cache flushes its dirty evictions to memory.
#[test]
fn test_victim_overflow_flushes_dirty_to_memory() {
    let mut memory = backing_memory();
    let mut cache = parent_with_victim();

    cache.write(&mut memory, 0x00, 0xAB).unwrap();

    // 600 conflicting lines push the dirty line out of the 512-entry
    // victim eventually.
    for i in 1..=600u32 {
        let addr = i * 0x100;
        if !memory.page_exists(addr) {
            memory.add_page(addr);
        }
        cache.read(&mut memory, addr).unwrap();
    }

    assert_eq!(memory.get_byte(0x00), 0xAB);
}
