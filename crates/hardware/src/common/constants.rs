//! Global Simulator Constants.
//!
//! This module defines constants shared by the configuration loaders and the engine. It includes:
//! 1. **Size Constants:** Multipliers for the `K`, `M`, and `G` size suffixes.
//! 2. **Level Constants:** Bounds on numbered cache levels.
//! 3. **Keywords:** Configuration keys and values recognised by the text loader.

/// Multiplier for the `K` size suffix.
pub const KIB: u64 = 1024;

/// Multiplier for the `M` size suffix.
pub const MIB: u64 = 1024 * KIB;

/// Multiplier for the `G` size suffix.
pub const GIB: u64 = 1024 * MIB;

/// Lowest numbered cache level.
pub const MIN_LEVEL: u8 = 1;

/// Highest numbered cache level (255 is reserved for main memory).
pub const MAX_LEVEL: u8 = 254;

/// Hit latency charged by main memory when none is configured.
pub const MAIN_HIT_LATENCY: u64 = 0;

/// Configuration keys.
pub mod keys {
    /// Starts a level block; value is `MAIN` or `L<n>`.
    pub const LEVEL: &str = "LEVEL";
    /// Line size in bytes.
    pub const LINE: &str = "LINE";
    /// Associativity; an integer or `FULL`.
    pub const WAY: &str = "WAY";
    /// Capacity in bytes with optional `K`/`M`/`G` suffix.
    pub const SIZE: &str = "SIZE";
    /// Hit latency.
    pub const HIT_TIME: &str = "HITTIME";
    /// Write-hit policy.
    pub const WRITE_POLICY: &str = "WRITEPOLICY";
    /// Write-miss policy.
    pub const ALLOC_POLICY: &str = "ALLOCATIONPOLICY";
}

/// Configuration values.
pub mod values {
    /// Main memory level.
    pub const MAIN: &str = "MAIN";
    /// Fully associative (`WAY:FULL`).
    pub const FULL: &str = "FULL";
    /// Write-back hit policy.
    pub const WRITE_BACK: &str = "WRITEBACK";
    /// Write-through hit policy.
    pub const WRITE_THROUGH: &str = "WRITETHROUGH";
    /// Write-allocate miss policy.
    pub const WRITE_ALLOCATE: &str = "WRITEALLOCATE";
    /// No-write-allocate miss policy.
    pub const NO_WRITE_ALLOCATE: &str = "NOWRITEALLOCATE";
}
