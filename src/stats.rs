//! Simulation statistics collection.
//!
//! Tracks per-level access counts, hit/miss counts, and accumulated cycle
//! counts. Counters are monotonically non-decreasing over a run; derived
//! figures (miss rate) are computed on demand so the raw counters stay
//! untouched.

/// Per-level cache statistics.
///
/// One instance is owned by every cache level, including victim caches.
/// The counters track accesses performed against that level only; totals
/// across the hierarchy are obtained by walking the level chain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub num_read: u64,
    pub num_write: u64,
    pub num_hit: u64,
    pub num_miss: u64,
    pub total_cycles: u64,
}

impl Statistics {
    /// Total number of accesses counted against this level.
    pub fn accesses(&self) -> u64 {
        self.num_hit + self.num_miss
    }

    /// Miss rate as a unit fraction; `0.0` for a level with no accesses.
    pub fn miss_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.num_miss as f64 / total as f64
        }
    }

    /// Prints the statistics block for one level.
    pub fn print(&self) {
        println!("-------- STATISTICS ----------");
        println!("Num Read: {}", self.num_read);
        println!("Num Write: {}", self.num_write);
        println!("Num Hit: {}", self.num_hit);
        println!("Num Miss: {}", self.num_miss);
        println!("Miss Rate: {:.2}%", self.miss_rate() * 100.0);
        println!("Total Cycles: {}", self.total_cycles);
    }
}
