//! Simulator: owns the cache hierarchy and replays traces through it.

use std::path::Path;

use tracing::info;

use crate::common::data::{AccessKind, TraceOp};
use crate::common::error::SimError;
use crate::config::HierarchyConfig;
use crate::core::CacheHierarchy;
use crate::sim::loader;
use crate::stats::Report;

/// Totals of one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Loads replayed.
    pub loads: u64,
    /// Stores replayed.
    pub stores: u64,
    /// Sum of every request's elapsed time.
    pub total_time: u64,
}

/// Top-level simulator.
#[derive(Debug, Clone)]
pub struct Simulator {
    /// The hierarchy requests are replayed through.
    pub hierarchy: CacheHierarchy,
}

impl Simulator {
    /// Creates a simulator around an already built hierarchy.
    pub const fn new(hierarchy: CacheHierarchy) -> Self {
        Self { hierarchy }
    }

    /// Builds a simulator from a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigIo`] if the file cannot be read and
    /// [`SimError::Config`] if it is malformed or describes an invalid hierarchy.
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let config: HierarchyConfig = loader::load_config(path)?;
        let hierarchy = CacheHierarchy::new(&config).map_err(|source| SimError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(hierarchy))
    }

    /// Replays `ops` in order, each fully resolved before the next.
    pub fn run(&mut self, ops: &[TraceOp]) -> RunSummary {
        let mut summary = RunSummary::default();
        for op in ops {
            let result = self.hierarchy.execute(*op);
            summary.total_time += result.elapsed_time;
            match op.kind {
                AccessKind::Load => summary.loads += 1,
                AccessKind::Store => summary.stores += 1,
            }
        }
        info!(
            loads = summary.loads,
            stores = summary.stores,
            total_time = summary.total_time,
            "trace replay complete"
        );
        summary
    }

    /// Reads a trace file and replays it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::TraceIo`] or [`SimError::Trace`]; nothing is
    /// replayed unless the whole trace parses.
    pub fn run_path(&mut self, path: impl AsRef<Path>) -> Result<RunSummary, SimError> {
        let ops = loader::load_trace(path)?;
        Ok(self.run(&ops))
    }

    /// Per-level counters, fastest first.
    pub fn report(&self) -> Report {
        self.hierarchy.report()
    }
}
