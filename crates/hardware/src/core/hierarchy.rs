//! Cache hierarchy.
//!
//! Owns every level, fastest first, with main memory last. Requests enter at
//! the head level and recurse downward through the remaining levels.

use tracing::info;

use super::units::cache::{AccessResult, CacheLevel};
use crate::common::data::{AccessKind, TraceOp};
use crate::common::error::ConfigError;
use crate::config::{HierarchyConfig, LevelId, ResolvedLevel};
use crate::stats::Report;

/// An ordered chain of cache levels terminated by main memory.
///
/// Topology is fixed at construction; only line contents and counters change
/// while a trace is replayed.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::HierarchyConfig;
/// use cachesim_core::core::CacheHierarchy;
/// use cachesim_core::sim::loader::parse_config;
///
/// let text = "LEVEL:L1\nLINE:4\nWAY:1\nSIZE:16\nHITTIME:1\n\
///             WRITEPOLICY:WRITEBACK\nALLOCATIONPOLICY:WRITEALLOCATE\n\
///             LEVEL:MAIN\n";
/// let config: HierarchyConfig = parse_config(text).unwrap();
/// let mut hierarchy = CacheHierarchy::new(&config).unwrap();
///
/// assert!(!hierarchy.load(0).is_hit());
/// assert!(!hierarchy.load(4).is_hit());
/// assert!(hierarchy.load(0).is_hit());
/// ```
#[derive(Debug, Clone)]
pub struct CacheHierarchy {
    levels: Vec<CacheLevel>,
}

impl CacheHierarchy {
    /// Builds a hierarchy from a configuration.
    ///
    /// Blocks are validated, sorted by level (main memory last), and linked
    /// in that order.
    ///
    /// # Errors
    ///
    /// Returns the first invalid block's error, [`ConfigError::MissingMain`] or
    /// [`ConfigError::DuplicateMain`] unless exactly one main-memory block is
    /// present, and [`ConfigError::DuplicateLevel`] if a cache level repeats.
    pub fn new(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        Self::from_resolved(config.resolve()?)
    }

    /// Builds a hierarchy from already validated levels, in any order.
    ///
    /// # Errors
    ///
    /// As [`CacheHierarchy::new`], minus per-block validation.
    pub fn from_resolved(mut levels: Vec<ResolvedLevel>) -> Result<Self, ConfigError> {
        levels.sort_by_key(ResolvedLevel::id);

        match levels.iter().filter(|l| l.id().is_main()).count() {
            0 => return Err(ConfigError::MissingMain),
            1 => {}
            _ => return Err(ConfigError::DuplicateMain),
        }
        if let Some(pair) = levels.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(ConfigError::DuplicateLevel(pair[0].id().to_string()));
        }

        let levels: Vec<CacheLevel> = levels.iter().map(CacheLevel::from_resolved).collect();
        info!(
            levels = levels.len(),
            chain = %levels
                .iter()
                .map(|l| l.id().to_string())
                .collect::<Vec<_>>()
                .join(" -> "),
            "built cache hierarchy"
        );
        Ok(Self { levels })
    }

    /// Loads `addr` through the hierarchy.
    pub fn load(&mut self, addr: u32) -> AccessResult {
        self.access(AccessKind::Load, addr)
    }

    /// Stores to `addr` through the hierarchy.
    pub fn store(&mut self, addr: u32) -> AccessResult {
        self.access(AccessKind::Store, addr)
    }

    /// Issues one request at the head level.
    pub fn access(&mut self, kind: AccessKind, addr: u32) -> AccessResult {
        match self.levels.split_first_mut() {
            Some((head, rest)) => match kind {
                AccessKind::Load => head.load(rest, addr),
                AccessKind::Store => head.store(rest, addr),
            },
            None => AccessResult::hit(),
        }
    }

    /// Replays one trace instruction.
    pub fn execute(&mut self, op: TraceOp) -> AccessResult {
        self.access(op.kind, op.addr)
    }

    /// Levels, fastest first.
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// The level `id`, if it is part of the hierarchy.
    pub fn level(&self, id: LevelId) -> Option<&CacheLevel> {
        self.levels.iter().find(|l| l.id() == id)
    }

    /// Per-level counters, fastest first.
    pub fn report(&self) -> Report {
        Report {
            levels: self.levels.iter().map(CacheLevel::stats).collect(),
        }
    }
}
