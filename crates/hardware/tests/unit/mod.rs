//! # Unit Components
//!
//! Unit tests grouped by the source module they exercise.


/// Unit tests for configuration parsing and validation.
pub mod config;
