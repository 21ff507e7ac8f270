//! Simulation utilities and input loading.
//!
//! Provides loaders for the configuration and trace formats, and the driver
//! that replays a trace through a cache hierarchy.

pub mod loader;

pub mod simulator;

pub use self::simulator::{RunSummary, Simulator};
