//! Integration tests for configuration parsing.

use memsim::config::{HierarchyConfig, ReplacementPolicy};

/// Tests the built-in default geometry.
#[test]
fn test_default_config() {
    let config = HierarchyConfig::default();

    assert_eq!(config.l1.size_bytes, 16 * 1024);
    assert_eq!(config.l1.ways, 1);
    assert_eq!(config.l1.hit_latency, 1);
    assert_eq!(config.l1.miss_latency, 8);

    assert_eq!(config.l2.size_bytes, 128 * 1024);
    assert_eq!(config.l2.ways, 8);
    assert_eq!(config.l2.hit_latency, 8);
    assert_eq!(config.l2.miss_latency, 20);

    assert_eq!(config.l3.size_bytes, 2048 * 1024);
    assert_eq!(config.l3.ways, 16);
    assert_eq!(config.l3.hit_latency, 20);
    assert_eq!(config.l3.miss_latency, 100);

    for level in [&config.l1, &config.l2, &config.l3] {
        assert_eq!(level.line_bytes, 64);
        assert_eq!(level.policy, ReplacementPolicy::Lru);
        assert!(!level.victim);
    }
    assert!(!config.prefetch);
}

/// Tests that an empty TOML document yields the defaults.
#[test]
fn test_empty_toml_is_default() {
    let config: HierarchyConfig = toml::from_str("").unwrap();
    assert_eq!(config.l1.size_bytes, 16 * 1024);
    assert_eq!(config.l3.ways, 16);
    assert!(!config.prefetch);
}

/// Tests partial overrides with per-field defaults filling the rest.
#[test]
fn test_partial_toml_override() {
    let config: HierarchyConfig = toml::from_str(
        r#"
        prefetch = true

        [l1]
        size_bytes = 32768
        ways = 2
        policy = "FIFO"
        victim = true
        "#,
    )
    .unwrap();

    assert!(config.prefetch);
    assert_eq!(config.l1.size_bytes, 32768);
    assert_eq!(config.l1.ways, 2);
    assert_eq!(config.l1.line_bytes, 64);
    assert_eq!(config.l1.policy, ReplacementPolicy::Fifo);
    assert!(config.l1.victim);

    assert_eq!(config.l2.size_bytes, 128 * 1024);
    assert_eq!(config.l3.size_bytes, 2048 * 1024);
}

/// Tests the derived block count of a cache policy.
#[test]
fn test_cache_policy_block_count() {
    let config = HierarchyConfig::default();
    let policy = config.l1.cache_policy();

    assert_eq!(policy.block_num, 256);
    assert_eq!(policy.num_sets(), 256);
    assert_eq!(policy.offset_bits(), 6);
    assert_eq!(policy.set_bits(), 8);
}
