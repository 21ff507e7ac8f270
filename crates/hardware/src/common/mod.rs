//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Address Layout:** Tag and set-index extraction for a cache geometry.
//! 2. **Constants:** Size multipliers and configuration keywords.
//! 3. **Memory Access:** Load/store request kinds and trace operations.
//! 4. **Error Handling:** Configuration, trace, and file-level error types.

/// Address decomposition (tag, set index, offset widths).
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types and exit codes.
pub mod error;

pub use addr::AddressLayout;
pub use data::{AccessKind, TraceOp};
pub use error::{ConfigError, SimError, TraceError};
