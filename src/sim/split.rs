//! Split Instruction/Data Cache Pair.
//!
//! A single-level arrangement for `op addr class` traces: one instruction
//! cache and one data cache side by side over a shared paged memory. The
//! instruction cache's write-back hook is a no-op, so a trace that writes
//! into the instruction stream dirties a block whose data is silently
//! discarded on eviction.

use crate::cache::{Cache, CacheKind};
use crate::common::{AccessClass, Operation, SimResult};
use crate::config::CacheConfig;
use crate::mem::PagedMemory;

/// An instruction cache and a data cache over one memory.
pub struct SplitHierarchy {
    memory: PagedMemory,
    icache: Cache,
    dcache: Cache,
}

impl SplitHierarchy {
    /// Builds both caches with the same geometry, directly over memory.
    pub fn new(config: &CacheConfig) -> SimResult<Self> {
        let icache = Cache::new(
            config.cache_policy(),
            config.policy,
            CacheKind::Instruction,
            None,
        )?;
        let dcache = Cache::new(config.cache_policy(), config.policy, CacheKind::Data, None)?;
        Ok(Self {
            memory: PagedMemory::new(),
            icache,
            dcache,
        })
    }

    /// Processes one trace record, routed by its access class.
    pub fn process(&mut self, op: Operation, addr: u32, class: AccessClass) -> SimResult<()> {
        if !self.memory.page_exists(addr) {
            self.memory.add_page(addr);
        }

        let cache = match class {
            AccessClass::Instruction => &mut self.icache,
            AccessClass::Data => &mut self.dcache,
        };
        match op {
            Operation::Read => {
                cache.read(&mut self.memory, addr)?;
            }
            Operation::Write => cache.write(&mut self.memory, addr, 0)?,
        }
        Ok(())
    }

    /// The instruction cache.
    pub fn icache(&self) -> &Cache {
        &self.icache
    }

    /// The data cache.
    pub fn dcache(&self) -> &Cache {
        &self.dcache
    }

    /// The backing memory.
    pub fn memory(&self) -> &PagedMemory {
        &self.memory
    }

    /// Prints the statistics of both caches.
    pub fn print_statistics(&self) {
        println!("\n=== Instruction Cache ===");
        self.icache.print_statistics();
        println!("\n=== Data Cache ===");
        self.dcache.print_statistics();
    }
}
