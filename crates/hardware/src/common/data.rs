//! Memory Access Types.
//!
//! This module defines the classification of memory requests used throughout the simulator.
//! These types are used for the following:
//! 1. **Trace Replay:** Each trace instruction is a load or a store of one address.
//! 2. **Write Policies:** Stores are the only requests that consult write-hit and write-miss policies.
//! 3. **Retries:** Internal re-issues at a level name the kind of request being repeated.

use std::fmt;
use std::str::FromStr;

/// Kind of memory request issued to a cache level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Data read (`LD`).
    Load,

    /// Data write (`ST`).
    ///
    /// Subject to the level's write-hit and write-miss policies.
    Store,
}

impl AccessKind {
    /// Returns `true` for [`AccessKind::Store`].
    #[inline(always)]
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Store)
    }

    /// Trace mnemonic for this kind of request.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Load => "LD",
            Self::Store => "ST",
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for AccessKind {
    type Err = ();

    /// Parses a trace mnemonic, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("LD") {
            Ok(Self::Load)
        } else if s.eq_ignore_ascii_case("ST") {
            Ok(Self::Store)
        } else {
            Err(())
        }
    }
}

/// One trace instruction: a request kind and the byte address it targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceOp {
    /// Load or store.
    pub kind: AccessKind,
    /// Target byte address.
    pub addr: u32,
}

impl TraceOp {
    /// Creates a load of `addr`.
    pub const fn load(addr: u32) -> Self {
        Self {
            kind: AccessKind::Load,
            addr,
        }
    }

    /// Creates a store to `addr`.
    pub const fn store(addr: u32) -> Self {
        Self {
            kind: AccessKind::Store,
            addr,
        }
    }
}

impl fmt::Display for TraceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.addr)
    }
}
