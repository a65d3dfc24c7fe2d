//! Multi-Level Cache Hierarchy.
//!
//! Composes the paged memory and the L3 → L2 → L1 cache chain, in that
//! construction order, with each level owning the one below it. The top
//! level (L1) is the only level the driver addresses; the hierarchy also
//! owns the optional stride prefetcher that rides on the L1 access
//! stream.

use crate::cache::{Cache, CacheKind};
use crate::common::{Operation, SimResult};
use crate::config::HierarchyConfig;
use crate::mem::PagedMemory;
use crate::sim::prefetch::StridePrefetcher;

/// A three-level cache hierarchy over one paged memory.
pub struct Hierarchy {
    memory: PagedMemory,
    l1: Cache,
    prefetcher: Option<StridePrefetcher>,
}

impl Hierarchy {
    /// Builds the hierarchy described by `config`.
    ///
    /// L3 is constructed over the memory, L2 over L3, and L1 over L2. A
    /// victim cache is attached to any level whose configuration asks
    /// for one, and the prefetcher is created when enabled.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::SimError::InvalidPolicy`] when any
    /// level's geometry is invalid.
    pub fn new(config: &HierarchyConfig) -> SimResult<Self> {
        let memory = PagedMemory::new();

        let mut l3 = Cache::new(config.l3.cache_policy(), config.l3.policy, CacheKind::Data, None)?;
        if config.l3.victim {
            l3.attach_victim()?;
        }

        let mut l2 = Cache::new(
            config.l2.cache_policy(),
            config.l2.policy,
            CacheKind::Data,
            Some(Box::new(l3)),
        )?;
        if config.l2.victim {
            l2.attach_victim()?;
        }

        let mut l1 = Cache::new(
            config.l1.cache_policy(),
            config.l1.policy,
            CacheKind::Data,
            Some(Box::new(l2)),
        )?;
        if config.l1.victim {
            l1.attach_victim()?;
        }

        Ok(Self {
            memory,
            l1,
            prefetcher: config.prefetch.then(StridePrefetcher::new),
        })
    }

    /// Processes one trace record.
    ///
    /// Ensures the backing page exists, steps the prefetcher when
    /// enabled, and dispatches the access to L1. Writes store a zero
    /// byte, matching the trace format's lack of data values.
    pub fn process(&mut self, op: Operation, addr: u32) -> SimResult<()> {
        if !self.memory.page_exists(addr) {
            self.memory.add_page(addr);
        }

        if let Some(prefetcher) = self.prefetcher.as_mut() {
            prefetcher.step(&mut self.memory, &mut self.l1, addr)?;
        }

        match op {
            Operation::Read => {
                self.l1.read(&mut self.memory, addr)?;
            }
            Operation::Write => self.l1.write(&mut self.memory, addr, 0)?,
        }
        Ok(())
    }

    /// The top-level cache.
    pub fn l1(&self) -> &Cache {
        &self.l1
    }

    /// The cache levels from L1 down to the terminal level.
    pub fn levels(&self) -> impl Iterator<Item = &Cache> {
        std::iter::successors(Some(&self.l1), |cache| cache.lower())
    }

    /// The backing memory.
    pub fn memory(&self) -> &PagedMemory {
        &self.memory
    }

    /// The prefetcher, when enabled.
    pub fn prefetcher(&self) -> Option<&StridePrefetcher> {
        self.prefetcher.as_ref()
    }

    /// Prints the statistics of every level, top down.
    pub fn print_statistics(&self) {
        println!("\n=== Cache Hierarchy Statistics ===");
        self.l1.print_statistics();
    }
}
