//! Cache Level Simulator.
//!
//! This module implements one level of a multi-level cache hierarchy. A level
//! probes its own backing store (direct-mapped, fully associative, or N-way
//! set-associative, all LRU) and resolves misses, write-through stores, and
//! dirty write-backs against the slower levels below it.
//!
//! Levels below are passed in as a slice ordered fastest first, so a request
//! recurses through `below.split_first_mut()` and terminates at main memory.
//! Every logical request charges each level it touches exactly one hit latency
//! and exactly one hit or miss, including requests that retry internally after a
//! dirty write-back or a write-allocate fill.

/// Cache lines and probe results.
pub mod block;

/// LRU-ordered line sets.
pub mod lru;

/// Backing-store organisations.
pub mod store;

use tracing::{debug, trace};

pub use self::block::{AccessResult, AccessStatus, Block};
use self::store::BackingStore;
use crate::common::addr::AddressLayout;
use crate::common::data::AccessKind;
use crate::config::{CacheGeometry, LevelId, ResolvedLevel, WriteHitPolicy, WriteMissPolicy};
use crate::stats::LevelStats;

/// One level of the hierarchy: configuration, backing store, and counters.
#[derive(Debug, Clone)]
pub struct CacheLevel {
    id: LevelId,
    geometry: Option<CacheGeometry>,
    layout: AddressLayout,
    hit_latency: u64,
    write_hit_policy: WriteHitPolicy,
    write_miss_policy: WriteMissPolicy,
    store: BackingStore,
    hits: u64,
    misses: u64,
    access_time: u64,
}

impl CacheLevel {
    /// Creates an empty cache level.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Validated geometry and policies of the level.
    pub fn new(geometry: &CacheGeometry) -> Self {
        Self {
            id: LevelId::Cache(geometry.level),
            geometry: Some(*geometry),
            layout: geometry.layout(),
            hit_latency: geometry.hit_latency,
            write_hit_policy: geometry.write_hit_policy,
            write_miss_policy: geometry.write_miss_policy,
            store: BackingStore::new(geometry),
            hits: 0,
            misses: 0,
            access_time: 0,
        }
    }

    /// Creates the main-memory level.
    ///
    /// Main memory hits every request and charges `hit_latency` for each.
    pub fn main(hit_latency: u64) -> Self {
        Self {
            id: LevelId::Main,
            geometry: None,
            layout: AddressLayout::default(),
            hit_latency,
            write_hit_policy: WriteHitPolicy::WriteBack,
            write_miss_policy: WriteMissPolicy::NoWriteAllocate,
            store: BackingStore::Main,
            hits: 0,
            misses: 0,
            access_time: 0,
        }
    }

    /// Creates a level from a validated configuration block.
    pub fn from_resolved(level: &ResolvedLevel) -> Self {
        match level {
            ResolvedLevel::Cache(geometry) => Self::new(geometry),
            ResolvedLevel::Main { hit_latency } => Self::main(*hit_latency),
        }
    }

    /// Identity of this level.
    pub const fn id(&self) -> LevelId {
        self.id
    }

    /// Geometry of this level; `None` for main memory.
    pub const fn geometry(&self) -> Option<&CacheGeometry> {
        self.geometry.as_ref()
    }

    /// Latency charged for every probe.
    pub const fn hit_latency(&self) -> u64 {
        self.hit_latency
    }

    /// Requests that hit at this level.
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Requests that missed at this level.
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Latency accumulated by requests entering this level, including time
    /// spent below it on their behalf.
    pub const fn access_time(&self) -> u64 {
        self.access_time
    }

    /// Counter snapshot for reporting.
    pub const fn stats(&self) -> LevelStats {
        LevelStats {
            level: self.id,
            hits: self.hits,
            misses: self.misses,
            access_time: self.access_time,
        }
    }

    /// Returns `true` if the line holding `addr` is resident.
    ///
    /// Main memory holds every line.
    pub fn contains(&self, addr: u32) -> bool {
        if self.id.is_main() {
            return true;
        }
        let (tag, set) = self.layout.decompose(addr);
        self.store.get(tag, set).is_some()
    }

    /// Returns `Some(dirty)` if the line holding `addr` is resident.
    pub fn is_dirty(&self, addr: u32) -> Option<bool> {
        let (tag, set) = self.layout.decompose(addr);
        self.store.get(tag, set).map(|b| b.dirty)
    }

    /// Number of lines currently resident.
    pub fn resident_lines(&self) -> usize {
        self.store.resident_lines()
    }

    /// Probes this level's backing store without touching counters or time.
    ///
    /// Main memory always hits and never changes state.
    pub fn access(&mut self, kind: AccessKind, addr: u32) -> AccessResult {
        let (tag, set) = self.layout.decompose(addr);
        let result = self
            .store
            .probe(kind, addr, tag, set, self.write_hit_policy);
        trace!(level = %self.id, %kind, addr, tag, set, status = ?result.status, "probe");
        result
    }

    /// Loads `addr` through this level.
    ///
    /// A hit stops here. A miss descends to the next level. A dirty victim is
    /// stored to the next level and the load is then retried here.
    ///
    /// # Arguments
    ///
    /// * `below` - The slower levels, fastest first.
    /// * `addr` - Byte address to load.
    ///
    /// # Returns
    ///
    /// The probe result with `elapsed_time` covering every level that took part.
    pub fn load(&mut self, below: &mut [Self], addr: u32) -> AccessResult {
        let mut result = self.access(AccessKind::Load, addr);
        self.charge(&mut result, self.hit_latency);

        match result.status {
            AccessStatus::Hit => self.hits += 1,
            AccessStatus::Miss => {
                self.misses += 1;
                let time = forward(below, AccessKind::Load, addr);
                self.charge(&mut result, time);
            }
            AccessStatus::Dirty => {
                if let Some(victim) = result.evicted_address {
                    debug!(level = %self.id, victim, addr, "writing back dirty victim");
                    let time = forward(below, AccessKind::Store, victim);
                    self.charge(&mut result, time);
                }
                let time = self.retry(below, AccessKind::Load, addr, Counters::Keep);
                result.add_time(time);
            }
        }
        result
    }

    /// Stores to `addr` through this level.
    ///
    /// A hit marks the line dirty under write-back or forwards the store under
    /// write-through. A miss either allocates the line with a load and retries
    /// the store as a hit, or forwards the store without allocating.
    ///
    /// # Arguments
    ///
    /// * `below` - The slower levels, fastest first.
    /// * `addr` - Byte address to store to.
    ///
    /// # Returns
    ///
    /// The probe result with `elapsed_time` covering every level that took part.
    pub fn store(&mut self, below: &mut [Self], addr: u32) -> AccessResult {
        let mut result = self.access(AccessKind::Store, addr);
        self.charge(&mut result, self.hit_latency);

        match result.status {
            AccessStatus::Hit => {
                self.hits += 1;
                if self.write_hit_policy == WriteHitPolicy::WriteThrough {
                    let time = forward(below, AccessKind::Store, addr);
                    self.charge(&mut result, time);
                }
            }
            AccessStatus::Miss => {
                self.misses += 1;
                match self.write_miss_policy {
                    WriteMissPolicy::WriteAllocate => {
                        debug!(level = %self.id, addr, "allocating line for store miss");
                        let time = self.retry(below, AccessKind::Load, addr, Counters::Restore);
                        result.add_time(time);
                        let time = self.retry(below, AccessKind::Store, addr, Counters::Restore);
                        result.add_time(time);
                    }
                    WriteMissPolicy::NoWriteAllocate => {
                        let time = forward(below, AccessKind::Store, addr);
                        self.charge(&mut result, time);
                    }
                }
            }
            // Stores never evict.
            AccessStatus::Dirty => {}
        }
        result
    }

    /// Adds `time` to both this level's access time and the request's elapsed time.
    #[inline(always)]
    const fn charge(&mut self, result: &mut AccessResult, time: u64) {
        self.access_time += time;
        result.add_time(time);
    }

    /// Re-issues a request at this level as part of resolving an outer one.
    ///
    /// The nested request charges its own hit latency, which the outer request
    /// has already paid, so one hit latency is removed from this level's
    /// access time and from the returned time. With [`Counters::Restore`] the
    /// hit/miss counters are reset to their values before the retry, since the
    /// outer request has already been counted.
    ///
    /// # Returns
    ///
    /// Time the retry adds to the outer request.
    fn retry(
        &mut self,
        below: &mut [Self],
        kind: AccessKind,
        addr: u32,
        counters: Counters,
    ) -> u64 {
        let snapshot = (self.hits, self.misses);
        let elapsed = match kind {
            AccessKind::Load => self.load(below, addr),
            AccessKind::Store => self.store(below, addr),
        }
        .elapsed_time;

        self.access_time = self.access_time.saturating_sub(self.hit_latency);
        if counters == Counters::Restore {
            (self.hits, self.misses) = snapshot;
        }
        elapsed.saturating_sub(self.hit_latency)
    }
}

/// Whether a retry's hit/miss increment stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counters {
    /// The retry is the first counted outcome of the outer request.
    Keep,
    /// The outer request was already counted.
    Restore,
}

/// Issues a request to the next level and returns the time it took.
///
/// An empty slice stands in for main memory with no latency.
fn forward(below: &mut [CacheLevel], kind: AccessKind, addr: u32) -> u64 {
    match below.split_first_mut() {
        Some((next, rest)) => match kind {
            AccessKind::Load => next.load(rest, addr),
            AccessKind::Store => next.store(rest, addr),
        }
        .elapsed_time,
        None => 0,
    }
}
