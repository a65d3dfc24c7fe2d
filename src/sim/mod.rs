//! Simulation harness.
//!
//! This module composes the cache levels and the paged memory into a
//! hierarchy, steps the stride prefetcher, reads trace files, and writes
//! the CSV reports.

/// Multi-level hierarchy composition and per-access dispatch.
pub mod hierarchy;

/// One-stride next-line prefetcher.
pub mod prefetch;

/// CSV report writers.
pub mod report;

/// Split instruction/data cache pair.
pub mod split;

/// Trace-file readers.
pub mod trace;

pub use hierarchy::Hierarchy;
pub use prefetch::StridePrefetcher;
pub use split::SplitHierarchy;
pub use trace::{TraceReader, TraceRecord};
