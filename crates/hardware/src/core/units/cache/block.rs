//! Cache lines and probe results.
//!
//! This module defines the value types exchanged inside a cache level. It provides:
//! 1. **Blocks:** The identity of one cached line (tag, originating address, dirty bit).
//! 2. **Access Status:** The three outcomes of probing a level.
//! 3. **Access Results:** A status plus the latency accumulated while resolving a request.

/// One cached line.
///
/// Two blocks are the same line iff their tags match. The originating address
/// is kept only so a dirty eviction can name the address to write back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Address of the request that brought this line in.
    pub original_address: u32,
    /// High-order address bits identifying the line within its set.
    pub tag: u32,
    /// Set by a write-back store hit; cleared once the line has been written back.
    pub dirty: bool,
}

impl Block {
    /// Creates a clean block for `addr` with the given tag.
    #[inline(always)]
    pub const fn new(original_address: u32, tag: u32) -> Self {
        Self {
            original_address,
            tag,
            dirty: false,
        }
    }

    /// Returns `true` if this block holds the line with `tag`.
    #[inline(always)]
    pub const fn matches(&self, tag: u32) -> bool {
        self.tag == tag
    }
}

/// Outcome of probing one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    /// The line is present.
    Hit,
    /// The line is absent; a load has installed it where no write-back was needed.
    Miss,
    /// Installing the line requires writing back a dirty victim first.
    Dirty,
}

/// Result of a probe, threaded through the recursive resolution of one request.
///
/// `elapsed_time` grows as the result passes back up through each level that
/// took part; every participating level adds its hit latency exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessResult {
    /// What the probe found.
    pub status: AccessStatus,
    /// Original address of the dirty victim, present only for [`AccessStatus::Dirty`].
    pub evicted_address: Option<u32>,
    /// Latency accumulated so far for this request.
    pub elapsed_time: u64,
}

impl AccessResult {
    /// A hit with no accumulated time.
    pub const fn hit() -> Self {
        Self {
            status: AccessStatus::Hit,
            evicted_address: None,
            elapsed_time: 0,
        }
    }

    /// A miss with no accumulated time.
    pub const fn miss() -> Self {
        Self {
            status: AccessStatus::Miss,
            evicted_address: None,
            elapsed_time: 0,
        }
    }

    /// A dirty eviction of the line brought in by `victim`.
    pub const fn dirty(victim: u32) -> Self {
        Self {
            status: AccessStatus::Dirty,
            evicted_address: Some(victim),
            elapsed_time: 0,
        }
    }

    /// Returns `true` for [`AccessStatus::Hit`].
    pub const fn is_hit(&self) -> bool {
        matches!(self.status, AccessStatus::Hit)
    }

    /// Adds `time` to the accumulated latency.
    #[inline(always)]
    pub const fn add_time(&mut self, time: u64) {
        self.elapsed_time += time;
    }
}
