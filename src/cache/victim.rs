//! Victim-cache integration.
//!
//! A victim cache is a small, fully-associative [`Cache`] owned by exactly
//! one parent level. It holds recently evicted lines: on a parent miss the
//! victim is consulted before the lower level, and parent evictions (clean
//! or dirty) move into it. It is never part of the normal lower-level
//! chain; the parent drives it explicitly and performs all of its probe
//! accounting, so the victim's hit counter reflects exactly the parent
//! misses it satisfied.

use super::{Block, Cache, CacheKind, CachePolicy};
use crate::common::SimResult;
use crate::config::ReplacementPolicy;
use crate::mem::PagedMemory;

/// Capacity of a victim cache in bytes.
pub const VICTIM_CACHE_SIZE: usize = 8 * 1024;

/// Hit latency of a victim cache in cycles.
pub const VICTIM_HIT_LATENCY: u64 = 1;

/// Miss latency of a victim cache in cycles.
pub const VICTIM_MISS_LATENCY: u64 = 8;

/// Builds the policy of a victim cache for `parent`: 8 KiB of the
/// parent's line size in a single fully-associative set.
pub fn victim_policy(parent: &CachePolicy) -> CachePolicy {
    let block_num = VICTIM_CACHE_SIZE / parent.block_size;
    CachePolicy {
        cache_size: VICTIM_CACHE_SIZE,
        block_size: parent.block_size,
        block_num,
        associativity: block_num,
        hit_latency: VICTIM_HIT_LATENCY,
        miss_latency: VICTIM_MISS_LATENCY,
    }
}

impl Cache {
    /// Attaches a victim cache to this level.
    ///
    /// The victim shares the same paged memory as its terminal backing
    /// store; it is consulted on every subsequent miss of this level and
    /// receives this level's evictions.
    pub fn attach_victim(&mut self) -> SimResult<()> {
        let policy = victim_policy(&self.policy);
        let side = Cache::new(policy, ReplacementPolicy::Lru, CacheKind::Data, None)?;
        self.victim = Some(Box::new(side));
        Ok(())
    }

    pub(super) fn move_line_to_victim(
        &mut self,
        mem: &mut PagedMemory,
        base: u32,
        data: &[u8],
        modified: bool,
    ) -> SimResult<()> {
        if let Some(victim) = self.victim.as_deref_mut() {
            victim.install_line(mem, base, data, modified)?;
        }
        Ok(())
    }

    /// Installs a line moved in from the owning parent.
    ///
    /// A raw copy: no read/write/hit/miss accounting happens here. If the
    /// single set is full, this cache's own replacement choice is evicted
    /// first, flushing its bytes to memory when dirty.
    fn install_line(
        &mut self,
        mem: &mut PagedMemory,
        base: u32,
        data: &[u8],
        modified: bool,
    ) -> SimResult<()> {
        self.reference_counter += 1;

        if let Some(idx) = self.block_id_of(base)? {
            let counter = self.reference_counter;
            let block = &mut self.blocks[idx];
            block.data.copy_from_slice(data);
            block.modified |= modified;
            block.last_reference = counter;
            return Ok(());
        }

        let set = self.policy.set_of(base);
        let begin = set as usize * self.policy.associativity;
        let slot = self.choose_victim(begin, begin + self.policy.associativity);
        let old = self.blocks[slot].clone();
        if old.valid && old.modified {
            self.write_block_to_lower(mem, &old)?;
            self.stats.total_cycles += self.policy.miss_latency;
        }

        self.blocks[slot] = Block {
            valid: true,
            modified,
            tag: self.policy.tag_of(base),
            set_id: set,
            last_reference: self.reference_counter,
            created_at: self.reference_counter,
            data: data.to_vec(),
        };
        Ok(())
    }
}
