//! Simulation statistics collection and reporting.
//!
//! This module tracks per-level performance counters for the cache hierarchy. It provides:
//! 1. **Level counters:** Hits, misses, and accumulated access time for one level.
//! 2. **Derived metrics:** Total accesses and hit rate.
//! 3. **Report:** The per-level text report, in hierarchy order, and its JSON form.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::LevelId;

/// Counters of one hierarchy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Level the counters belong to.
    #[serde(serialize_with = "serialize_level")]
    pub level: LevelId,
    /// Requests that hit.
    pub hits: u64,
    /// Requests that missed.
    pub misses: u64,
    /// Latency accumulated by requests entering the level.
    pub access_time: u64,
}

impl LevelStats {
    /// Total requests seen (`hits + misses`).
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of requests that hit, or `0.0` before any request.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for LevelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            LevelId::Main => writeln!(f, "Level: Main")?,
            LevelId::Cache(n) => writeln!(f, "Level: {n}")?,
        }
        writeln!(f, "Hits: {}", self.hits)?;
        writeln!(f, "Misses: {}", self.misses)?;
        writeln!(f, "Total: {}", self.accesses())?;
        write!(f, "AccessTime: {}", self.access_time)
    }
}

fn serialize_level<S: Serializer>(level: &LevelId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(level)
}

/// Counters of every level, fastest first.
///
/// `Display` renders the text report: five lines per level, levels separated
/// by a blank line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Per-level counters in hierarchy order.
    pub levels: Vec<LevelStats>,
}

impl Report {
    /// Counters of the level `id`, if it is part of the hierarchy.
    pub fn level(&self, id: LevelId) -> Option<&LevelStats> {
        self.levels.iter().find(|s| s.level == id)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stats) in self.levels.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{stats}")?;
        }
        Ok(())
    }
}
