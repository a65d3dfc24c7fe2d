//! One-Stride Next-Line Prefetcher.
//!
//! Watches the top-level access stream for a stable arithmetic stride
//! between consecutive addresses. Once the same signed delta has persisted
//! for more than three accesses the predictor activates and, on each
//! subsequent access, fetches `address + stride` into the top-level cache
//! through the non-accounted fetch path. More than three inconsistent
//! strides in a row deactivate it again.

use crate::cache::Cache;
use crate::common::SimResult;
use crate::mem::PagedMemory;

/// Stride-detector state, keyed on the top-level address stream.
///
/// The predictor is unconditional on access type; it sees only the
/// address sequence. Initial state has a zero stride and a zero last
/// address, so the first few events are spent calibrating (a trace that
/// starts near address zero scores an immediate same-stride match).
#[derive(Debug, Default)]
pub struct StridePrefetcher {
    active: bool,
    stride: i64,
    same_stride: u32,
    diff_stride: u32,
    last_addr: u32,
}

impl StridePrefetcher {
    /// Creates a prefetcher in its calibration state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the predictor is currently issuing prefetches.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The last observed signed address delta.
    pub fn stride(&self) -> i64 {
        self.stride
    }

    /// Observes one access and, when active, prefetches the predicted
    /// next line into `l1`.
    ///
    /// The fetch allocates the backing page for the predicted address if
    /// needed and updates no counters at the top level; recursive loads
    /// at lower levels still count there.
    pub fn step(&mut self, mem: &mut PagedMemory, l1: &mut Cache, addr: u32) -> SimResult<()> {
        if self.active {
            let target = (addr as i64).wrapping_add(self.stride) as u32;
            if !mem.page_exists(target) {
                mem.add_page(target);
            }
            l1.fetch(mem, target)?;
        }

        let current = addr as i64 - self.last_addr as i64;
        if current == self.stride {
            self.same_stride += 1;
            self.diff_stride = 0;
        } else {
            self.diff_stride += 1;
            self.same_stride = 0;
            self.stride = current;
        }

        if self.same_stride > 3 {
            self.active = true;
        }
        if self.diff_stride > 3 {
            self.active = false;
        }

        self.last_addr = addr;
        Ok(())
    }
}
