//! Cache hierarchy core.
//!
//! This module contains the cache-access engine: the per-level probe,
//! eviction, and write-policy logic, and the hierarchy that chains levels
//! from the fastest cache down to main memory.

/// Ordered chain of levels terminated by main memory.
pub mod hierarchy;

/// Hierarchy building blocks (cache levels and their backing stores).
pub mod units;

pub use self::hierarchy::CacheHierarchy;
pub use self::units::cache::CacheLevel;
