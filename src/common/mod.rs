//! Common types used throughout the cache simulator.
//!
//! This module provides the fundamental access classifications and the
//! error types shared across the memory model, the cache levels, and the
//! simulation harness.

/// Memory access type definitions.
pub mod data;

/// Error types for configuration, structural, trace, and I/O failures.
pub mod error;

pub use data::{AccessClass, Operation};
pub use error::{SimError, SimResult};
