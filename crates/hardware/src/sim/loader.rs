//! Configuration and Trace Loading.
//!
//! This module turns input files into the structures the engine consumes. It performs:
//! 1. **Configuration parsing:** `KEY:VALUE` level blocks, each started by a `LEVEL` key.
//! 2. **JSON configuration:** The same blocks as a serde document, for `.json` paths.
//! 3. **Trace parsing:** Whitespace-separated `LD`/`ST` address pairs.
//!
//! Errors from files are wrapped in [`SimError`] together with the offending path.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::constants::keys;
use crate::common::data::{AccessKind, TraceOp};
use crate::common::error::{ConfigError, SimError, TraceError};
use crate::config::{HierarchyConfig, LevelConfig};

/// Parses the text configuration format.
///
/// Input is case-insensitive. Within a line, only ASCII letters and digits
/// are significant: a `:` ends the key and the end of the line ends the value.
/// Every `LEVEL` key starts a new level block. Lines without a `:` are ignored.
///
/// ```text
/// LEVEL: L1
/// LINE: 64
/// WAY: 4          (or FULL)
/// SIZE: 32K
/// HITTIME: 1
/// WRITEPOLICY: WRITEBACK
/// ALLOCATIONPOLICY: WRITEALLOCATE
/// LEVEL: MAIN
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::ValueBeforeLevel`] for a key preceding the first
/// `LEVEL` key, or the error of the first key or value that fails to parse.
/// Completeness of each block is checked later, by [`LevelConfig::resolve`].
pub fn parse_config(text: &str) -> Result<HierarchyConfig, ConfigError> {
    let mut levels = Vec::new();
    let mut current: Option<LevelConfig> = None;
    let mut key = String::new();
    let mut buffer = String::new();

    for c in text.chars().chain(std::iter::once('\n')) {
        match c {
            '\n' => {
                if !key.is_empty() {
                    let block = current
                        .as_mut()
                        .ok_or_else(|| ConfigError::ValueBeforeLevel(key.clone()))?;
                    block.apply(&key, &buffer)?;
                    key.clear();
                }
                buffer.clear();
            }
            ':' => {
                if buffer == keys::LEVEL {
                    if let Some(block) = current.replace(LevelConfig::default()) {
                        levels.push(block);
                    }
                }
                key = std::mem::take(&mut buffer);
            }
            c if c.is_ascii_alphanumeric() => buffer.push(c.to_ascii_uppercase()),
            _ => {}
        }
    }
    if let Some(block) = current {
        levels.push(block);
    }

    debug!(blocks = levels.len(), "parsed configuration");
    Ok(HierarchyConfig { levels })
}

/// Parses a load/store trace.
///
/// Tokens are whitespace separated and read in pairs, `INSTR ADDR`, where
/// `INSTR` is `LD` or `ST` in any case and `ADDR` is a base-10 `u32`. A pair
/// may span lines.
///
/// # Errors
///
/// Returns [`TraceError::InvalidAddress`], [`TraceError::UnknownInstruction`],
/// or [`TraceError::MissingAddress`] for the first malformed pair.
///
/// # Examples
///
/// ```
/// use cachesim_core::common::TraceOp;
/// use cachesim_core::sim::loader::parse_trace;
///
/// let ops = parse_trace("LD 0\nst 64\n").unwrap();
/// assert_eq!(ops, vec![TraceOp::load(0), TraceOp::store(64)]);
/// ```
pub fn parse_trace(text: &str) -> Result<Vec<TraceOp>, TraceError> {
    let mut tokens = text
        .lines()
        .enumerate()
        .flat_map(|(i, line)| line.split_whitespace().map(move |t| (i + 1, t)));
    let mut ops = Vec::new();

    while let Some((line, instr)) = tokens.next() {
        let Some((addr_line, token)) = tokens.next() else {
            return Err(TraceError::MissingAddress { line });
        };
        let addr = token.parse::<u32>().map_err(|_| TraceError::InvalidAddress {
            line: addr_line,
            token: token.to_string(),
        })?;
        let kind = instr
            .parse::<AccessKind>()
            .map_err(|()| TraceError::UnknownInstruction {
                line,
                token: instr.to_string(),
            })?;
        ops.push(TraceOp { kind, addr });
    }
    Ok(ops)
}

/// Reads a configuration file.
///
/// Paths ending in `.json` are read as JSON; anything else uses the text format.
///
/// # Errors
///
/// Returns [`SimError::ConfigIo`] if the file cannot be read and
/// [`SimError::Config`] if it cannot be parsed.
pub fn load_config(path: impl AsRef<Path>) -> Result<HierarchyConfig, SimError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        HierarchyConfig::from_json(&text)
    } else {
        parse_config(&text)
    };
    parsed.map_err(|source| SimError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a trace file.
///
/// # Errors
///
/// Returns [`SimError::TraceIo`] if the file cannot be read and
/// [`SimError::Trace`] if it cannot be parsed.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<TraceOp>, SimError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SimError::TraceIo {
        path: path.to_path_buf(),
        source,
    })?;
    let ops = parse_trace(&text).map_err(|source| SimError::Trace {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(ops = ops.len(), path = %path.display(), "loaded trace");
    Ok(ops)
}
