//! Backing stores for a cache level.
//!
//! Each level holds exactly one of three line organisations, chosen once from
//! its geometry. Main memory has no lines at all and always hits. All four
//! expose the same `probe` operation.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::block::{AccessResult, Block};
use super::lru::LruSet;
use crate::common::data::AccessKind;
use crate::config::{CacheGeometry, Organization, WriteHitPolicy};

/// Line storage of one level.
#[derive(Debug, Clone)]
pub enum BackingStore {
    /// Main memory: no lines, every probe hits.
    Main,
    /// Set index to its single line.
    DirectMapped(HashMap<u32, Block>),
    /// One LRU set shared by every address.
    FullyAssociative(LruSet),
    /// Set index to that set's LRU lines; sets appear on first reference.
    SetAssociative {
        /// Sets referenced so far.
        sets: HashMap<u32, LruSet>,
        /// Lines per set.
        ways: usize,
    },
}

impl BackingStore {
    /// Creates an empty store organised for `geometry`.
    pub fn new(geometry: &CacheGeometry) -> Self {
        let ways = geometry.ways as usize;
        match geometry.organization() {
            Organization::DirectMapped => Self::DirectMapped(HashMap::new()),
            Organization::FullyAssociative => Self::FullyAssociative(LruSet::new(ways)),
            Organization::SetAssociative => Self::SetAssociative {
                sets: HashMap::new(),
                ways,
            },
        }
    }

    /// Probes for the line `(tag, set)`.
    ///
    /// Store misses never allocate and stores never evict. Under
    /// [`WriteHitPolicy::WriteThrough`] a store hit leaves the line clean.
    ///
    /// # Arguments
    ///
    /// * `kind` - Load or store.
    /// * `addr` - Address of the request.
    /// * `tag` - Tag of `addr`.
    /// * `set` - Set index of `addr`.
    /// * `policy` - Write-hit policy of the owning level.
    pub fn probe(
        &mut self,
        kind: AccessKind,
        addr: u32,
        tag: u32,
        set: u32,
        policy: WriteHitPolicy,
    ) -> AccessResult {
        match self {
            Self::Main => AccessResult::hit(),
            Self::DirectMapped(slots) => probe_direct(slots, kind, addr, tag, set, policy),
            Self::FullyAssociative(lines) => lines.probe(kind, addr, tag, policy),
            Self::SetAssociative { sets, ways } => match sets.entry(set) {
                Entry::Occupied(mut e) => e.get_mut().probe(kind, addr, tag, policy),
                Entry::Vacant(e) => {
                    if kind.is_store() {
                        return AccessResult::miss();
                    }
                    e.insert(LruSet::new(*ways)).probe(kind, addr, tag, policy)
                }
            },
        }
    }

    /// Returns the resident line `(tag, set)`, if any.
    pub fn get(&self, tag: u32, set: u32) -> Option<&Block> {
        match self {
            Self::Main => None,
            Self::DirectMapped(slots) => slots.get(&set).filter(|b| b.matches(tag)),
            Self::FullyAssociative(lines) => lines.get(tag),
            Self::SetAssociative { sets, .. } => sets.get(&set).and_then(|s| s.get(tag)),
        }
    }

    /// Number of resident lines.
    pub fn resident_lines(&self) -> usize {
        match self {
            Self::Main => 0,
            Self::DirectMapped(slots) => slots.len(),
            Self::FullyAssociative(lines) => lines.len(),
            Self::SetAssociative { sets, .. } => sets.values().map(LruSet::len).sum(),
        }
    }
}

/// Direct-mapped probe: at most one line per set, so a load miss into an
/// empty set installs without eviction.
fn probe_direct(
    slots: &mut HashMap<u32, Block>,
    kind: AccessKind,
    addr: u32,
    tag: u32,
    set: u32,
    policy: WriteHitPolicy,
) -> AccessResult {
    match slots.entry(set) {
        Entry::Vacant(e) => {
            if !kind.is_store() {
                let _ = e.insert(Block::new(addr, tag));
            }
            AccessResult::miss()
        }
        Entry::Occupied(mut e) => {
            let block = e.get_mut();
            if block.matches(tag) {
                if kind.is_store() && policy == WriteHitPolicy::WriteBack {
                    block.dirty = true;
                }
                return AccessResult::hit();
            }
            if kind.is_store() {
                return AccessResult::miss();
            }
            if block.dirty {
                // Cleared so the retry after the write-back replaces the line.
                block.dirty = false;
                return AccessResult::dirty(block.original_address);
            }
            *block = Block::new(addr, tag);
            AccessResult::miss()
        }
    }
}
