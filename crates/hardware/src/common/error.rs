//! Error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Configuration Errors:** Malformed keys, values, and hierarchy topologies.
//! 2. **Trace Errors:** Unparsable addresses and unknown instruction mnemonics.
//! 3. **Top-level Errors:** File-scoped wrappers that carry the offending path and map to exit codes.
//!
//! The cache engine itself is infallible: once a hierarchy has been built, every
//! 32-bit address is a valid request.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while interpreting a hierarchy configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A key other than the recognised configuration keys.
    #[error("unrecognized key '{0}'")]
    UnrecognizedKey(String),

    /// A value that could not be parsed for its key.
    #[error("'{key}' could not be parsed from '{value}'")]
    InvalidValue {
        /// Key the value belongs to.
        key: String,
        /// Raw value text.
        value: String,
    },

    /// A write or allocation policy keyword that is not recognised.
    #[error("unrecognized {kind} '{value}'")]
    UnrecognizedPolicy {
        /// Which policy was being parsed.
        kind: &'static str,
        /// Raw value text.
        value: String,
    },

    /// A cache level is missing a field it needs to serve requests.
    #[error("level {level} is missing required field '{field}'")]
    MissingField {
        /// Level name (`L1`, `L2`, ...).
        level: String,
        /// Missing field.
        field: &'static str,
    },

    /// A cache level whose fields are set but inconsistent.
    #[error("level {level} is invalid: {reason}")]
    InvalidLevel {
        /// Level name (`L1`, `L2`, ...).
        level: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A configuration key appeared before any `LEVEL` key.
    #[error("'{0}' appears before any LEVEL key")]
    ValueBeforeLevel(String),

    /// A level block without a `LEVEL` key.
    #[error("level block is missing its LEVEL key")]
    MissingLevel,

    /// Two blocks declared the same cache level.
    #[error("level {0} is declared more than once")]
    DuplicateLevel(String),

    /// No `LEVEL:MAIN` block was given.
    #[error("no MAIN level is configured")]
    MissingMain,

    /// More than one `LEVEL:MAIN` block was given.
    #[error("more than one MAIN level is configured")]
    DuplicateMain,

    /// The configuration has no level blocks at all.
    #[error("configuration is empty")]
    Empty,

    /// JSON configuration could not be deserialized.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while reading a load/store trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// An address that is not a base-10 integer fitting in 32 bits.
    #[error("'address' could not be parsed from '{token}' on line {line}")]
    InvalidAddress {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// A mnemonic other than `LD` or `ST`.
    #[error("unrecognized instruction '{token}' on line {line}")]
    UnknownInstruction {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// An instruction with no address following it.
    #[error("instruction on line {line} has no address")]
    MissingAddress {
        /// 1-based line number.
        line: usize,
    },
}

/// Top-level simulator error, scoped to the file that caused it.
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration file could not be opened or read.
    #[error("'{}' could not be opened: {source}", .path.display())]
    ConfigIo {
        /// Configuration path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The configuration file is malformed.
    #[error("{source} in '{}'", .path.display())]
    Config {
        /// Configuration path.
        path: PathBuf,
        /// What is wrong with it.
        source: ConfigError,
    },

    /// The trace file could not be opened or read.
    #[error("'{}' could not be opened: {source}", .path.display())]
    TraceIo {
        /// Trace path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The trace file is malformed.
    #[error("{source} in '{}'", .path.display())]
    Trace {
        /// Trace path.
        path: PathBuf,
        /// What is wrong with it.
        source: TraceError,
    },
}

/// Process exit codes for the command-line front end.
pub mod exit_code {
    /// Trace replayed and report printed.
    pub const OKAY: i32 = 0;
    /// Wrong number or shape of arguments.
    pub const USAGE: i32 = 1;
    /// Configuration file missing or malformed.
    pub const CONFIG: i32 = 2;
    /// Trace file missing or malformed.
    pub const TRACE: i32 = 3;
}

impl SimError {
    /// Exit code for this error.
    ///
    /// Configuration failures and trace failures map to distinct codes so
    /// scripts can tell which input was rejected.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigIo { .. } | Self::Config { .. } => exit_code::CONFIG,
            Self::TraceIo { .. } | Self::Trace { .. } => exit_code::TRACE,
        }
    }
}
