use serde::Deserialize;

use crate::cache::CachePolicy;

const LINE_BYTES: usize = 64;

const L1_SIZE: usize = 16 * 1024;
const L2_SIZE: usize = 128 * 1024;
const L3_SIZE: usize = 2048 * 1024;

#[derive(Debug, Deserialize, Clone)]
pub struct HierarchyConfig {
    #[serde(default = "default_l1")]
    pub l1: CacheConfig,

    #[serde(default = "default_l2")]
    pub l2: CacheConfig,

    #[serde(default = "default_l3")]
    pub l3: CacheConfig,

    #[serde(default)]
    pub prefetch: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            l1: default_l1(),
            l2: default_l2(),
            l3: default_l3(),
            prefetch: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub size_bytes: usize,

    #[serde(default = "d_c_line")]
    pub line_bytes: usize,

    #[serde(default = "d_c_ways")]
    pub ways: usize,

    #[serde(default = "d_c_hit")]
    pub hit_latency: u64,

    #[serde(default = "d_c_miss")]
    pub miss_latency: u64,

    #[serde(default)]
    pub policy: ReplacementPolicy,

    #[serde(default)]
    pub victim: bool,
}

impl CacheConfig {
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            cache_size: self.size_bytes,
            block_size: self.line_bytes,
            block_num: self.size_bytes / self.line_bytes.max(1),
            associativity: self.ways,
            hit_latency: self.hit_latency,
            miss_latency: self.miss_latency,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    #[default]
    Lru,
    Fifo,
}

fn default_l1() -> CacheConfig {
    CacheConfig {
        size_bytes: L1_SIZE,
        line_bytes: LINE_BYTES,
        ways: 1,
        hit_latency: 1,
        miss_latency: 8,
        policy: ReplacementPolicy::Lru,
        victim: false,
    }
}

fn default_l2() -> CacheConfig {
    CacheConfig {
        size_bytes: L2_SIZE,
        line_bytes: LINE_BYTES,
        ways: 8,
        hit_latency: 8,
        miss_latency: 20,
        policy: ReplacementPolicy::Lru,
        victim: false,
    }
}

fn default_l3() -> CacheConfig {
    CacheConfig {
        size_bytes: L3_SIZE,
        line_bytes: LINE_BYTES,
        ways: 16,
        hit_latency: 20,
        miss_latency: 100,
        policy: ReplacementPolicy::Lru,
        victim: false,
    }
}

fn d_c_line() -> usize {
    LINE_BYTES
}

fn d_c_ways() -> usize {
    1
}

fn d_c_hit() -> u64 {
    1
}

fn d_c_miss() -> u64 {
    8
}
