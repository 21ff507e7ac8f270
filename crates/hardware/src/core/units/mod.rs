//! Hierarchy building blocks.
//!
//! This module contains the per-level cache model: line storage under the
//! direct-mapped, fully associative, and set-associative organisations, and
//! the load/store state machine that resolves requests against slower levels.

/// Cache level (probe, eviction, write policies, retries).
pub mod cache;
