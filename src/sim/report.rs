//! CSV Report Writers.
//!
//! Each driver persists its results as a CSV file derived from the trace
//! path. Rows are written with plain formatted output; the files are the
//! only state the simulator leaves behind.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cache::Cache;
use crate::common::SimResult;
use crate::sim::hierarchy::Hierarchy;
use crate::sim::split::SplitHierarchy;

/// Writes one row per hierarchy level to `<trace>_multi_level.csv`.
///
/// The miss rate is a percentage with two fractional digits; a level
/// with no accesses prints `0.00`. Returns the CSV path.
pub fn write_multi_level_csv(hierarchy: &Hierarchy, trace_path: &Path) -> SimResult<PathBuf> {
    let csv_path = PathBuf::from(format!("{}_multi_level.csv", trace_path.display()));
    let mut file = File::create(&csv_path)?;

    writeln!(
        file,
        "Level,NumReads,NumWrites,NumHits,NumMisses,MissRate,TotalCycles"
    )?;
    for (idx, cache) in hierarchy.levels().enumerate() {
        let stats = cache.statistics();
        writeln!(
            file,
            "L{},{},{},{},{},{:.2},{}",
            idx + 1,
            stats.num_read,
            stats.num_write,
            stats.num_hit,
            stats.num_miss,
            stats.miss_rate() * 100.0,
            stats.total_cycles
        )?;
    }
    Ok(csv_path)
}

/// Appends one sweep row for a simulated single-level geometry.
///
/// The miss rate is a unit fraction.
pub fn write_sweep_row(file: &mut File, cache: &Cache) -> SimResult<()> {
    let policy = cache.policy();
    let stats = cache.statistics();
    writeln!(
        file,
        "{},{},{},{},{}",
        policy.cache_size,
        policy.block_size,
        policy.associativity,
        stats.miss_rate(),
        stats.total_cycles
    )?;
    Ok(())
}

/// Writes the sweep CSV header.
pub fn write_sweep_header(file: &mut File) -> SimResult<()> {
    writeln!(file, "cacheSize,blockSize,associativity,missRate,totalCycles")?;
    Ok(())
}

/// Writes the instruction/data rows to `<trace>_split.csv`.
///
/// The `MissRate` column preserves the historical miss-per-cycle figure
/// (`NumMisses / TotalCycles`) rather than a true miss rate. Returns the
/// CSV path.
pub fn write_split_csv(split: &SplitHierarchy, trace_path: &Path) -> SimResult<PathBuf> {
    let csv_path = PathBuf::from(format!("{}_split.csv", trace_path.display()));
    let mut file = File::create(&csv_path)?;

    writeln!(
        file,
        "Cache,NumReads,NumWrites,NumHits,NumMisses,MissRate,TotalCycles"
    )?;
    for (label, cache) in [("I", split.icache()), ("D", split.dcache())] {
        let stats = cache.statistics();
        let miss_per_cycle = if stats.total_cycles == 0 {
            0.0
        } else {
            stats.num_miss as f64 / stats.total_cycles as f64
        };
        writeln!(
            file,
            "{},{},{},{},{},{:.4},{}",
            label,
            stats.num_read,
            stats.num_write,
            stats.num_hit,
            stats.num_miss,
            miss_per_cycle,
            stats.total_cycles
        )?;
    }
    Ok(csv_path)
}
