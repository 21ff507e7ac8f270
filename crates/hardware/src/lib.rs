//! Multi-level cache hierarchy simulator library.
//!
//! This crate replays a trace of loads and stores through a configurable chain
//! of cache levels and reports per-level hits, misses, and access time:
//! 1. **Core:** Cache levels (direct-mapped, fully associative, N-way LRU), write
//!    policies, dirty write-backs, and the hierarchy that chains levels to main memory.
//! 2. **Configuration:** Level blocks, policies, and validation of cache geometry.
//! 3. **Simulation:** Configuration and trace loaders, and the replay driver.
//! 4. **Statistics:** Per-level counters and the text/JSON report.

/// Common types and constants (address layout, access kinds, errors).
pub mod common;
/// Hierarchy configuration (level identities, policies, validated geometry).
pub mod config;
/// Cache-access engine (cache levels and the hierarchy).
pub mod core;
/// Input loaders and the trace replay driver.
pub mod sim;
/// Per-level statistics and reporting.
pub mod stats;

/// Root configuration type; parse with [`sim::loader::parse_config`] or [`HierarchyConfig::from_json`].
pub use crate::config::HierarchyConfig;
/// The cache hierarchy; construct with [`CacheHierarchy::new`].
pub use crate::core::CacheHierarchy;
/// Trace replay driver.
pub use crate::sim::Simulator;
