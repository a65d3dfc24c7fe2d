//! Set-associative cache level.
//!
//! One `Cache` models a single level of the hierarchy: a block-indexed,
//! set-associative store with valid/dirty bits sitting over a lower level,
//! which is either another `Cache` or the paged memory itself. Replacement
//! is LRU or FIFO, writes are write-allocate write-back, and misses resolve
//! recursively through the lower levels. A level may additionally own a
//! small fully-associative victim cache that intercepts its evictions.

pub mod victim;

use crate::common::{SimError, SimResult};
use crate::config::ReplacementPolicy;
use crate::mem::PagedMemory;
use crate::stats::Statistics;

/// Geometry and timing of one cache level.
///
/// Invariants are checked at cache construction: `cache_size` and
/// `block_size` are powers of two, `cache_size % block_size == 0`,
/// `block_num * block_size == cache_size`, and
/// `block_num % associativity == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Total capacity in bytes.
    pub cache_size: usize,
    /// Line size in bytes.
    pub block_size: usize,
    /// Total number of blocks.
    pub block_num: usize,
    /// Number of blocks per set.
    pub associativity: usize,
    /// Cycles charged for a hit.
    pub hit_latency: u64,
    /// Cycles charged for a miss.
    pub miss_latency: u64,
}

impl CachePolicy {
    /// Builds a policy from capacity, line size, and associativity,
    /// deriving the block count.
    pub fn with_geometry(
        cache_size: usize,
        block_size: usize,
        associativity: usize,
        hit_latency: u64,
        miss_latency: u64,
    ) -> Self {
        Self {
            cache_size,
            block_size,
            block_num: cache_size / block_size.max(1),
            associativity,
            hit_latency,
            miss_latency,
        }
    }

    pub(crate) fn validate(&self) -> SimResult<()> {
        let checks: [(bool, String); 6] = [
            (
                self.cache_size.is_power_of_two(),
                format!("Invalid Cache Size {}", self.cache_size),
            ),
            (
                self.block_size.is_power_of_two(),
                format!("Invalid Block Size {}", self.block_size),
            ),
            (
                self.block_size > 0 && self.cache_size % self.block_size == 0,
                "cacheSize % blockSize != 0".to_string(),
            ),
            (
                self.block_num * self.block_size == self.cache_size,
                "blockNum * blockSize != cacheSize".to_string(),
            ),
            (
                self.associativity > 0,
                format!("Invalid Associativity {}", self.associativity),
            ),
            (
                self.associativity > 0 && self.block_num % self.associativity == 0,
                "blockNum % associativity != 0".to_string(),
            ),
        ];

        for (condition, message) in checks {
            if !condition {
                return Err(SimError::InvalidPolicy(message));
            }
        }
        Ok(())
    }

    /// Number of low address bits selecting the byte within a block.
    pub fn offset_bits(&self) -> u32 {
        self.block_size.trailing_zeros()
    }

    /// Number of address bits selecting the set.
    pub fn set_bits(&self) -> u32 {
        (self.block_num / self.associativity).trailing_zeros()
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.block_num / self.associativity
    }

    /// Tag field of `addr`.
    pub fn tag_of(&self, addr: u32) -> u32 {
        let shift = self.offset_bits() + self.set_bits();
        let mask = (1u64 << (32 - shift)) - 1;
        ((addr as u64 >> shift) & mask) as u32
    }

    /// Set index of `addr`.
    pub fn set_of(&self, addr: u32) -> u32 {
        let mask = (1u64 << self.set_bits()) - 1;
        ((addr as u64 >> self.offset_bits()) & mask) as u32
    }

    /// Byte offset of `addr` within its block.
    pub fn offset_of(&self, addr: u32) -> usize {
        (addr as usize) & (self.block_size - 1)
    }

    /// Base address of the block containing `addr`.
    pub fn base_of(&self, addr: u32) -> u32 {
        addr & !(self.block_size as u32 - 1)
    }

    /// Reconstructs a block's base address from its tag and set index.
    pub fn block_addr(&self, tag: u32, set_id: u32) -> u32 {
        let shift = self.offset_bits() + self.set_bits();
        (((tag as u64) << shift) | ((set_id as u64) << self.offset_bits())) as u32
    }
}

/// One block (line) of cache storage.
#[derive(Debug, Clone)]
pub struct Block {
    /// `false` means the slot is empty.
    pub valid: bool,
    /// Dirty bit; a modified block must be written back before replacement.
    pub modified: bool,
    pub tag: u32,
    /// Structural set index of the slot, fixed at construction.
    pub set_id: u32,
    /// Reference-counter value at the most recent touch (LRU key).
    pub last_reference: u64,
    /// Reference-counter value at the most recent (re)load (FIFO key).
    pub created_at: u64,
    pub data: Vec<u8>,
}

/// Behavioral variant of a cache level.
///
/// An instruction cache differs from a data cache in exactly one way:
/// its write-back hook is a no-op, so dirty instruction lines are
/// silently discarded on eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Data,
    Instruction,
}

/// A single set-associative cache level.
pub struct Cache {
    policy: CachePolicy,
    replacement: ReplacementPolicy,
    kind: CacheKind,
    blocks: Vec<Block>,
    reference_counter: u64,
    stats: Statistics,
    lower: Option<Box<Cache>>,
    victim: Option<Box<Cache>>,
}

impl Cache {
    /// Creates a cache level over `lower` (or over the paged memory when
    /// `lower` is `None`).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidPolicy`] when the policy violates a
    /// geometry invariant.
    pub fn new(
        policy: CachePolicy,
        replacement: ReplacementPolicy,
        kind: CacheKind,
        lower: Option<Box<Cache>>,
    ) -> SimResult<Self> {
        policy.validate()?;

        let blocks = (0..policy.block_num)
            .map(|idx| Block {
                valid: false,
                modified: false,
                tag: 0,
                set_id: (idx / policy.associativity) as u32,
                last_reference: 0,
                created_at: 0,
                data: vec![0; policy.block_size],
            })
            .collect();

        Ok(Self {
            policy,
            replacement,
            kind,
            blocks,
            reference_counter: 0,
            stats: Statistics::default(),
            lower,
            victim: None,
        })
    }

    /// The level's geometry and timing.
    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// The next-lower cache level, if any.
    pub fn lower(&self) -> Option<&Cache> {
        self.lower.as_deref()
    }

    /// The attached victim cache, if any.
    pub fn victim(&self) -> Option<&Cache> {
        self.victim.as_deref()
    }

    /// Raw counters, without the victim-cache adjustment.
    pub fn raw_statistics(&self) -> Statistics {
        self.stats
    }

    /// Observed statistics of this level.
    ///
    /// When a victim cache is attached, misses it satisfied are counted
    /// as hits at this level: `num_miss - victim.num_hit`,
    /// `num_hit + victim.num_hit`. The raw counters stay unmodified.
    pub fn statistics(&self) -> Statistics {
        let mut stats = self.stats;
        if let Some(victim) = &self.victim {
            stats.num_hit += victim.stats.num_hit;
            stats.num_miss = stats.num_miss.saturating_sub(victim.stats.num_hit);
        }
        stats
    }

    /// Accounted byte read.
    ///
    /// Counts one read; a hit charges the hit latency and touches the
    /// block's reference stamp, a miss charges the miss latency and
    /// resolves through the lower level before serving the byte.
    pub fn read(&mut self, mem: &mut PagedMemory, addr: u32) -> SimResult<u8> {
        self.reference_counter += 1;
        self.stats.num_read += 1;

        if let Some(idx) = self.block_id_of(addr)? {
            self.stats.num_hit += 1;
            self.stats.total_cycles += self.policy.hit_latency;
            let offset = self.policy.offset_of(addr);
            let block = &mut self.blocks[idx];
            block.last_reference = self.reference_counter;
            return Ok(block.data[offset]);
        }

        self.stats.num_miss += 1;
        self.stats.total_cycles += self.policy.miss_latency;
        self.load_from_lower(mem, addr, true)?;

        let idx = self.resident_block(addr)?;
        let offset = self.policy.offset_of(addr);
        let block = &mut self.blocks[idx];
        block.last_reference = self.reference_counter;
        Ok(block.data[offset])
    }

    /// Accounted byte write (write-allocate, write-back).
    ///
    /// Counts one write; on a miss the line is first fetched from the
    /// lower level, then the byte is stored and the block marked dirty.
    pub fn write(&mut self, mem: &mut PagedMemory, addr: u32, val: u8) -> SimResult<()> {
        self.reference_counter += 1;
        self.stats.num_write += 1;

        if let Some(idx) = self.block_id_of(addr)? {
            self.stats.num_hit += 1;
            self.stats.total_cycles += self.policy.hit_latency;
            let offset = self.policy.offset_of(addr);
            let block = &mut self.blocks[idx];
            block.modified = true;
            block.last_reference = self.reference_counter;
            block.data[offset] = val;
            return Ok(());
        }

        self.stats.num_miss += 1;
        self.stats.total_cycles += self.policy.miss_latency;
        self.load_from_lower(mem, addr, false)?;

        let idx = self.resident_block(addr)?;
        let offset = self.policy.offset_of(addr);
        let block = &mut self.blocks[idx];
        block.modified = true;
        block.last_reference = self.reference_counter;
        block.data[offset] = val;
        Ok(())
    }

    /// Prefetch entry point.
    ///
    /// Loads the line containing `addr` if it is absent, updating no
    /// read/write/hit/miss counters at this level. Lower-level probes and
    /// loads triggered by the fill are accounted at their own levels.
    pub fn fetch(&mut self, mem: &mut PagedMemory, addr: u32) -> SimResult<()> {
        if self.block_id_of(addr)?.is_none() {
            self.load_from_lower(mem, addr, true)?;
        }
        Ok(())
    }

    /// Pure lookup: is the line containing `addr` resident?
    ///
    /// Touches no counters and performs no structural checks.
    pub fn in_cache(&self, addr: u32) -> bool {
        let tag = self.policy.tag_of(addr);
        let set = self.policy.set_of(addr);
        let begin = set as usize * self.policy.associativity;
        self.blocks[begin..begin + self.policy.associativity]
            .iter()
            .any(|b| b.valid && b.tag == tag)
    }

    /// Invalidates the slot holding the line containing `addr`, if any.
    pub fn set_invalid(&mut self, addr: u32) {
        let tag = self.policy.tag_of(addr);
        let set = self.policy.set_of(addr);
        let begin = set as usize * self.policy.associativity;
        for block in &mut self.blocks[begin..begin + self.policy.associativity] {
            if block.valid && block.tag == tag {
                block.valid = false;
                return;
            }
        }
    }

    /// Finds the slot holding the line containing `addr`.
    ///
    /// Scans the decoded set's slots, verifying each slot's structural
    /// set index along the way.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Inconsistency`] when a slot's structural set
    /// index disagrees with the decoded set.
    fn block_id_of(&self, addr: u32) -> SimResult<Option<usize>> {
        let tag = self.policy.tag_of(addr);
        let set = self.policy.set_of(addr);
        let begin = set as usize * self.policy.associativity;

        for idx in begin..begin + self.policy.associativity {
            let block = &self.blocks[idx];
            if block.set_id != set {
                return Err(SimError::Inconsistency {
                    addr,
                    detail: format!("block {idx} holds set {} for decoded set {set}", block.set_id),
                });
            }
            if block.valid && block.tag == tag {
                return Ok(Some(idx));
            }
        }
        Ok(None)
    }

    /// Looks up a line that must be resident after a fill.
    fn resident_block(&self, addr: u32) -> SimResult<usize> {
        self.block_id_of(addr)?.ok_or_else(|| SimError::Inconsistency {
            addr,
            detail: "line absent after fill".to_string(),
        })
    }

    /// Raw byte accessor for a resident line; no counters are touched.
    fn byte_at(&self, addr: u32) -> SimResult<u8> {
        let idx = self.resident_block(addr)?;
        Ok(self.blocks[idx].data[self.policy.offset_of(addr)])
    }

    /// Accounted probe performed by the level above during a fill.
    ///
    /// Counts one access (read or write per `is_read`) against this
    /// level; a miss recurses into this level's own fill path so the
    /// requested line becomes resident.
    fn probe(&mut self, mem: &mut PagedMemory, addr: u32, is_read: bool) -> SimResult<()> {
        self.reference_counter += 1;
        if is_read {
            self.stats.num_read += 1;
        } else {
            self.stats.num_write += 1;
        }

        match self.block_id_of(addr)? {
            Some(idx) => {
                self.stats.num_hit += 1;
                self.stats.total_cycles += self.policy.hit_latency;
                self.blocks[idx].last_reference = self.reference_counter;
            }
            None => {
                self.stats.num_miss += 1;
                self.stats.total_cycles += self.policy.miss_latency;
                self.load_from_lower(mem, addr, is_read)?;
            }
        }
        Ok(())
    }

    /// Resolves a miss: fetches the line containing `addr`, evicting the
    /// replacement choice of its set.
    ///
    /// The fill source is, in order of preference, the victim cache (on a
    /// victim hit the lower-level fetch is skipped entirely), the lower
    /// cache (one accounted probe, then a raw block copy), or the paged
    /// memory. A dirty evictee is written back to the lower level and
    /// charges this level one extra miss latency; a clean evictee moves
    /// into the victim cache when one is attached.
    fn load_from_lower(&mut self, mem: &mut PagedMemory, addr: u32, is_read: bool) -> SimResult<()> {
        let block_size = self.policy.block_size;
        let base = self.policy.base_of(addr);
        let set = self.policy.set_of(addr);
        let begin = set as usize * self.policy.associativity;
        let end = begin + self.policy.associativity;

        let slot = self.choose_victim(begin, end);
        let evicted = self.blocks[slot].clone();

        let mut incoming = Block {
            valid: true,
            modified: false,
            tag: self.policy.tag_of(addr),
            set_id: set,
            last_reference: self.reference_counter,
            created_at: self.reference_counter,
            data: vec![0; block_size],
        };

        let mut filled = false;
        if let Some(victim) = self.victim.as_deref_mut() {
            victim.reference_counter += 1;
            if is_read {
                victim.stats.num_read += 1;
            } else {
                victim.stats.num_write += 1;
            }
            if let Some(vidx) = victim.block_id_of(base)? {
                victim.stats.num_hit += 1;
                victim.stats.total_cycles += victim.policy.hit_latency;
                incoming.data.copy_from_slice(&victim.blocks[vidx].data);
                incoming.modified = victim.blocks[vidx].modified;
                victim.set_invalid(base);
                filled = true;
            } else {
                victim.stats.num_miss += 1;
                victim.stats.total_cycles += victim.policy.miss_latency;
            }
        }

        if !filled {
            if let Some(lower) = self.lower.as_deref_mut() {
                lower.probe(mem, base, is_read)?;
                for (i, byte) in incoming.data.iter_mut().enumerate() {
                    *byte = lower.byte_at(base + i as u32)?;
                }
            } else {
                for (i, byte) in incoming.data.iter_mut().enumerate() {
                    *byte = mem.get_byte(base + i as u32);
                }
            }
        }

        if evicted.valid && evicted.modified {
            self.write_block_to_lower(mem, &evicted)?;
            self.stats.total_cycles += self.policy.miss_latency;
        } else if evicted.valid {
            let evicted_base = self.policy.block_addr(evicted.tag, evicted.set_id);
            if self.victim.is_some() {
                self.move_line_to_victim(mem, evicted_base, &evicted.data, false)?;
            }
        }

        self.blocks[slot] = incoming;
        Ok(())
    }

    /// Picks the replacement slot within `[begin, end)`.
    ///
    /// First invalid slot, else minimum FIFO or LRU key; ties go to the
    /// lowest index.
    fn choose_victim(&self, begin: usize, end: usize) -> usize {
        for idx in begin..end {
            if !self.blocks[idx].valid {
                return idx;
            }
        }

        let key = |block: &Block| match self.replacement {
            ReplacementPolicy::Fifo => block.created_at,
            ReplacementPolicy::Lru => block.last_reference,
        };

        let mut chosen = begin;
        for idx in begin + 1..end {
            if key(&self.blocks[idx]) < key(&self.blocks[chosen]) {
                chosen = idx;
            }
        }
        chosen
    }

    /// Flushes a dirty block to the level below.
    ///
    /// The victim cache absorbs the line when attached; otherwise the
    /// bytes go through the lower cache's accounted write path, or
    /// straight into the paged memory at the terminal level. For an
    /// instruction cache this is a no-op and the dirty data is discarded.
    fn write_block_to_lower(&mut self, mem: &mut PagedMemory, block: &Block) -> SimResult<()> {
        if self.kind == CacheKind::Instruction {
            return Ok(());
        }

        let base = self.policy.block_addr(block.tag, block.set_id);
        if self.victim.is_some() {
            self.move_line_to_victim(mem, base, &block.data, true)?;
        } else if let Some(lower) = self.lower.as_deref_mut() {
            for (i, &byte) in block.data.iter().enumerate() {
                lower.write(mem, base + i as u32, byte)?;
            }
        } else {
            for (i, &byte) in block.data.iter().enumerate() {
                mem.set_byte(base + i as u32, byte);
            }
        }
        Ok(())
    }

    /// Prints the level's geometry, and per-block state when `verbose`.
    pub fn print_info(&self, verbose: bool) {
        println!("---------- Cache Info -----------");
        println!("Cache Size: {} bytes", self.policy.cache_size);
        println!("Block Size: {} bytes", self.policy.block_size);
        println!("Block Num: {}", self.policy.block_num);
        println!("Associativity: {}", self.policy.associativity);
        println!("Hit Latency: {}", self.policy.hit_latency);
        println!("Miss Latency: {}", self.policy.miss_latency);

        if verbose {
            for (idx, block) in self.blocks.iter().enumerate() {
                println!(
                    "Block {}: tag {:#x} set {} {} {} (last ref {})",
                    idx,
                    block.tag,
                    block.set_id,
                    if block.valid { "valid" } else { "invalid" },
                    if block.modified { "modified" } else { "unmodified" },
                    block.last_reference
                );
            }
        }
    }

    /// Prints this level's statistics, then recurses into the level below.
    pub fn print_statistics(&self) {
        self.statistics().print();
        if let Some(lower) = &self.lower {
            println!("---------- LOWER CACHE ----------");
            lower.print_statistics();
        }
    }
}
