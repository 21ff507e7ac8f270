//! Least Recently Used (LRU) Line Set.
//!
//! Holds the lines of one associative set in recency order. When a line is
//! accessed it moves to the front (Most Recently Used position). The back of
//! the sequence holds the Least Recently Used line, which is the victim when a
//! load needs room.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `probe()`: O(W) where W is the number of ways (associativity)
//! - **Space Complexity:** O(W) per set; sets are only created when first referenced
//! - **Best Case:** Working sets that fit within W lines
//! - **Worst Case:** Cyclic scans over W + 1 lines (every access misses)

use std::collections::VecDeque;

use super::block::{AccessResult, Block};
use crate::common::data::AccessKind;
use crate::config::WriteHitPolicy;

/// One associative set under LRU replacement.
#[derive(Debug, Clone)]
pub struct LruSet {
    /// Index 0 is MRU, last index is LRU.
    blocks: VecDeque<Block>,
    capacity: usize,
}

impl LruSet {
    /// Creates an empty set holding at most `capacity` lines.
    ///
    /// # Arguments
    ///
    /// * `capacity` - The associativity (number of ways) of the set.
    pub fn new(capacity: usize) -> Self {
        Self {
            blocks: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of resident lines.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if no line is resident.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Maximum number of resident lines.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Resident lines, most recently used first.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Returns the resident line with `tag`, if any.
    pub fn get(&self, tag: u32) -> Option<&Block> {
        self.blocks.iter().find(|b| b.matches(tag))
    }

    /// Probes the set for `tag`.
    ///
    /// A hit promotes the line to MRU and, for a write-back store, marks it
    /// dirty. A load miss installs a clean line at MRU, first evicting the LRU
    /// line if the set is full. A dirty LRU line is not evicted: it is marked
    /// clean and reported as [`AccessResult::dirty`] so the caller can write
    /// it back and retry, at which point it is evicted cleanly. A store miss
    /// changes nothing.
    ///
    /// # Arguments
    ///
    /// * `kind` - Load or store.
    /// * `addr` - Address of the request (kept in an installed line).
    /// * `tag` - Tag of `addr` under the owning level's layout.
    /// * `policy` - Write-hit policy of the owning level.
    pub fn probe(
        &mut self,
        kind: AccessKind,
        addr: u32,
        tag: u32,
        policy: WriteHitPolicy,
    ) -> AccessResult {
        if let Some(pos) = self.blocks.iter().position(|b| b.matches(tag)) {
            if let Some(mut block) = self.blocks.remove(pos) {
                if kind.is_store() && policy == WriteHitPolicy::WriteBack {
                    block.dirty = true;
                }
                self.blocks.push_front(block);
            }
            return AccessResult::hit();
        }

        if kind.is_store() {
            return AccessResult::miss();
        }

        if self.blocks.len() >= self.capacity {
            if let Some(victim) = self.blocks.back_mut() {
                if victim.dirty {
                    victim.dirty = false;
                    return AccessResult::dirty(victim.original_address);
                }
            }
            let _ = self.blocks.pop_back();
        }
        self.blocks.push_front(Block::new(addr, tag));
        AccessResult::miss()
    }
}
