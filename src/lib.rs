//! Multi-Level Cache Hierarchy Simulator Library.
//!
//! This crate implements a trace-driven simulator for a demand-paged main
//! memory and a chain of set-associative caches in front of it. Given a
//! stream of byte-granular reads and writes of 32-bit addresses, it models
//! block fetch, write-allocate write-back, LRU/FIFO replacement, stride
//! prefetching, and an optional victim cache, producing per-level access
//! counts, hit/miss counts, miss rates, and accumulated cycle counts.
//!
//! # Architecture
//!
//! * **Memory**: sparse byte-addressable 32-bit space backed by a two-level
//!   page directory with 4 KiB zero-filled pages.
//! * **Caches**: set-associative levels composed into an L1 → L2 → L3 chain,
//!   each owning the level below it.
//! * **Harness**: trace readers, the hierarchy driver, the stride
//!   prefetcher, and CSV reporting.
//!
//! # Modules
//!
//! * `cache`: set-associative cache level and victim-cache integration.
//! * `common`: shared access types and error handling.
//! * `config`: configuration loading and parsing.
//! * `mem`: paged main memory model.
//! * `sim`: simulation harness (hierarchy, prefetcher, traces, reports).
//! * `stats`: per-level statistics collection.

/// Set-associative cache level and victim-cache integration.
///
/// Implements block storage with valid/dirty bits, tag/set/offset address
/// decoding, LRU and FIFO replacement, write-allocate write-back semantics,
/// and the miss-resolution protocol down to the paged memory.
pub mod cache;

/// Shared types and error handling.
///
/// Provides the access operation and access class enumerations and the
/// simulator error taxonomy used throughout the crate.
pub mod common;

/// Configuration system for the cache hierarchy.
///
/// Loads and parses TOML configuration files describing per-level cache
/// geometry, latencies, replacement policy, and optional features.
pub mod config;

/// Paged main memory model.
///
/// Implements a sparse 32-bit address space as a lazily allocated two-level
/// page directory of 4 KiB zero-filled pages.
pub mod mem;

/// Simulation harness and drivers.
///
/// Composes the cache levels into a hierarchy, steps the stride prefetcher,
/// reads trace files, and writes CSV reports.
pub mod sim;

/// Per-level statistics collection.
///
/// Tracks read/write/hit/miss counts and accumulated cycles for each cache
/// level during simulation.
pub mod stats;
