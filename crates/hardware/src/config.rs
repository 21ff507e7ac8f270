//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures and enums used to build a
//! cache hierarchy. It provides:
//! 1. **Level Identity:** Numbered cache levels and the main-memory sentinel, ordered fastest first.
//! 2. **Policies:** Write-hit (write-back/write-through) and write-miss (allocate/no-allocate) policies.
//! 3. **Builders:** Partially populated [`LevelConfig`] blocks as produced by a loader.
//! 4. **Validation:** [`LevelConfig::resolve`] turns a block into an immutable [`ResolvedLevel`].
//!
//! Configuration is supplied in the `KEY:VALUE` text format (see [`crate::sim::loader`])
//! or as JSON via [`HierarchyConfig::from_json`].

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::addr::AddressLayout;
use crate::common::constants::{GIB, KIB, MAIN_HIT_LATENCY, MAX_LEVEL, MIB, MIN_LEVEL, keys, values};
use crate::common::error::ConfigError;

/// Position of a level in the hierarchy.
///
/// Cache levels are numbered from 1 (fastest). [`LevelId::Main`] is the
/// terminating main-memory level; it orders after every numbered level.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::LevelId;
///
/// let l2: LevelId = "L2".parse().unwrap();
/// assert_eq!(l2, LevelId::Cache(2));
/// assert!(LevelId::Cache(254) < LevelId::Main);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum LevelId {
    /// Numbered cache level (1..=254).
    Cache(u8),
    /// Main memory; always hits.
    Main,
}

impl LevelId {
    /// Returns `true` for the main-memory level.
    pub const fn is_main(self) -> bool {
        matches!(self, Self::Main)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache(n) => write!(f, "L{n}"),
            Self::Main => f.write_str(values::MAIN),
        }
    }
}

impl FromStr for LevelId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidValue {
            key: keys::LEVEL.to_string(),
            value: s.to_string(),
        };
        if s.eq_ignore_ascii_case(values::MAIN) {
            return Ok(Self::Main);
        }
        let digits = s
            .strip_prefix('L')
            .or_else(|| s.strip_prefix('l'))
            .ok_or_else(invalid)?;
        let n: u8 = digits.parse().map_err(|_| invalid())?;
        if (MIN_LEVEL..=MAX_LEVEL).contains(&n) {
            Ok(Self::Cache(n))
        } else {
            Err(invalid())
        }
    }
}

impl TryFrom<String> for LevelId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Behaviour of a store that hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WriteHitPolicy {
    /// Mark the line dirty and stop; the write reaches the next level on eviction.
    #[default]
    #[serde(alias = "WriteBack")]
    WriteBack,
    /// Propagate the write to the next level immediately.
    #[serde(alias = "WriteThrough")]
    WriteThrough,
}

impl FromStr for WriteHitPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            values::WRITE_BACK => Ok(Self::WriteBack),
            values::WRITE_THROUGH => Ok(Self::WriteThrough),
            _ => Err(ConfigError::UnrecognizedPolicy {
                kind: "write policy",
                value: s.to_string(),
            }),
        }
    }
}

/// Behaviour of a store that misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WriteMissPolicy {
    /// Pull the line into this level, then perform the store as a hit.
    #[default]
    #[serde(alias = "WriteAllocate")]
    WriteAllocate,
    /// Forward the store to the next level without caching it here.
    #[serde(alias = "NoWriteAllocate")]
    NoWriteAllocate,
}

impl FromStr for WriteMissPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            values::WRITE_ALLOCATE => Ok(Self::WriteAllocate),
            values::NO_WRITE_ALLOCATE => Ok(Self::NoWriteAllocate),
            _ => Err(ConfigError::UnrecognizedPolicy {
                kind: "allocation policy",
                value: s.to_string(),
            }),
        }
    }
}

/// Associativity as written in a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "WayRepr")]
pub enum Associativity {
    /// Fixed number of lines per set (1 = direct-mapped).
    Ways(u32),
    /// Fully associative: one set holding every line.
    Full,
}

/// Raw JSON form of the `way` field: a count or the `FULL` keyword.
#[derive(Deserialize)]
#[serde(untagged)]
enum WayRepr {
    Count(u32),
    Keyword(String),
}

impl TryFrom<WayRepr> for Associativity {
    type Error = ConfigError;

    fn try_from(value: WayRepr) -> Result<Self, Self::Error> {
        match value {
            WayRepr::Count(n) => Ok(Self::Ways(n)),
            WayRepr::Keyword(s) => s.parse(),
        }
    }
}

impl FromStr for Associativity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(values::FULL) {
            return Ok(Self::Full);
        }
        s.parse().map(Self::Ways).map_err(|_| ConfigError::InvalidValue {
            key: keys::WAY.to_string(),
            value: s.to_string(),
        })
    }
}

/// How a cache level's backing store is organised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Organization {
    /// One line per set.
    DirectMapped,
    /// A single set; every line competes under LRU.
    FullyAssociative,
    /// Several sets of `ways` lines, each under its own LRU order.
    SetAssociative,
}

/// One level block, possibly incomplete.
///
/// Loaders fill this in key by key; [`LevelConfig::resolve`] validates it.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{LevelConfig, ResolvedLevel};
///
/// let mut block = LevelConfig::default();
/// block.apply("LEVEL", "L1").unwrap();
/// block.apply("LINE", "16").unwrap();
/// block.apply("WAY", "2").unwrap();
/// block.apply("SIZE", "1K").unwrap();
/// block.apply("HITTIME", "1").unwrap();
/// block.apply("WRITEPOLICY", "WRITEBACK").unwrap();
/// block.apply("ALLOCATIONPOLICY", "WRITEALLOCATE").unwrap();
///
/// match block.resolve().unwrap() {
///     ResolvedLevel::Cache(geometry) => assert_eq!(geometry.set_count, 32),
///     ResolvedLevel::Main { .. } => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    /// Level identity (`MAIN` or `L<n>`).
    pub level: Option<LevelId>,
    /// Line size in bytes.
    #[serde(alias = "line")]
    pub line_size: Option<u32>,
    /// Associativity.
    pub way: Option<Associativity>,
    /// Capacity in bytes.
    #[serde(alias = "size")]
    pub capacity: Option<u64>,
    /// Hit latency charged for every probe of this level.
    #[serde(alias = "hit_time")]
    pub hit_latency: Option<u64>,
    /// Behaviour of a store hit.
    pub write_hit_policy: Option<WriteHitPolicy>,
    /// Behaviour of a store miss.
    pub write_miss_policy: Option<WriteMissPolicy>,
}

impl LevelConfig {
    /// Returns `true` if no field has been set yet.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Sets one field from a text `KEY:VALUE` pair.
    ///
    /// Keys are matched case-insensitively against the recognised configuration keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnrecognizedKey`] for an unknown key,
    /// [`ConfigError::InvalidValue`] for an unparsable number or level, and
    /// [`ConfigError::UnrecognizedPolicy`] for an unknown policy keyword.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key.to_ascii_uppercase().as_str() {
            keys::LEVEL => self.level = Some(value.parse()?),
            keys::LINE => self.line_size = Some(value.parse().map_err(|_| invalid())?),
            keys::WAY => self.way = Some(value.parse()?),
            keys::SIZE => self.capacity = Some(parse_size(value).ok_or_else(invalid)?),
            keys::HIT_TIME => self.hit_latency = Some(value.parse().map_err(|_| invalid())?),
            keys::WRITE_POLICY => self.write_hit_policy = Some(value.parse()?),
            keys::ALLOC_POLICY => self.write_miss_policy = Some(value.parse()?),
            _ => return Err(ConfigError::UnrecognizedKey(key.to_string())),
        }
        Ok(())
    }

    /// Validates this block and derives the level's geometry.
    ///
    /// Main memory needs no fields; an optional hit latency defaults to
    /// zero. Every numbered level needs all seven fields, a power-of-two line
    /// size, a capacity that divides evenly into `line_size * way`, and a
    /// power-of-two set count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingLevel`], [`ConfigError::MissingField`], or
    /// [`ConfigError::InvalidLevel`] describing the first problem found.
    pub fn resolve(&self) -> Result<ResolvedLevel, ConfigError> {
        let n = match self.level.ok_or(ConfigError::MissingLevel)? {
            LevelId::Main => {
                return Ok(ResolvedLevel::Main {
                    hit_latency: self.hit_latency.unwrap_or(MAIN_HIT_LATENCY),
                });
            }
            LevelId::Cache(n) => n,
        };
        let name = LevelId::Cache(n).to_string();
        let missing = |field| ConfigError::MissingField {
            level: name.clone(),
            field,
        };
        let bad = |reason: String| ConfigError::InvalidLevel {
            level: name.clone(),
            reason,
        };

        let line_size = self.line_size.ok_or_else(|| missing("LINE"))?;
        let way = self.way.ok_or_else(|| missing("WAY"))?;
        let capacity = self.capacity.ok_or_else(|| missing("SIZE"))?;
        let hit_latency = self.hit_latency.ok_or_else(|| missing("HITTIME"))?;
        let write_hit_policy = self.write_hit_policy.ok_or_else(|| missing("WRITEPOLICY"))?;
        let write_miss_policy = self
            .write_miss_policy
            .ok_or_else(|| missing("ALLOCATIONPOLICY"))?;

        if !line_size.is_power_of_two() {
            return Err(bad(format!("line size {line_size} is not a power of two")));
        }
        if capacity == 0 {
            return Err(bad("capacity must be positive".to_string()));
        }
        if hit_latency == 0 {
            return Err(bad("hit latency must be positive".to_string()));
        }
        let line_count = capacity / u64::from(line_size);
        if line_count == 0 || capacity % u64::from(line_size) != 0 {
            return Err(bad(format!(
                "capacity {capacity} is not a multiple of line size {line_size}"
            )));
        }

        let ways = match way {
            Associativity::Full => line_count,
            Associativity::Ways(0) => return Err(bad("associativity must be positive".to_string())),
            Associativity::Ways(w) => u64::from(w),
        };
        if line_count % ways != 0 {
            return Err(bad(format!(
                "capacity {capacity} does not divide into {ways}-way sets of {line_size}-byte lines"
            )));
        }
        let set_count = line_count / ways;
        let (Ok(ways), Ok(set_count)) = (u32::try_from(ways), u32::try_from(set_count)) else {
            return Err(bad(format!("capacity {capacity} is too large")));
        };
        if !set_count.is_power_of_two() {
            return Err(bad(format!("set count {set_count} is not a power of two")));
        }

        Ok(ResolvedLevel::Cache(CacheGeometry {
            level: n,
            line_size,
            ways,
            set_count,
            capacity,
            hit_latency,
            write_hit_policy,
            write_miss_policy,
        }))
    }
}

/// Parses a size with an optional `K`, `M`, or `G` suffix (powers of 1024).
///
/// Returns `None` if the digits do not parse or the product overflows.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::parse_size;
///
/// assert_eq!(parse_size("512"), Some(512));
/// assert_eq!(parse_size("4K"), Some(4096));
/// assert_eq!(parse_size("2m"), Some(2 * 1024 * 1024));
/// assert_eq!(parse_size("K"), None);
/// ```
pub fn parse_size(value: &str) -> Option<u64> {
    let (digits, multiplier) = match value.chars().last()?.to_ascii_uppercase() {
        'K' => (&value[..value.len() - 1], KIB),
        'M' => (&value[..value.len() - 1], MIB),
        'G' => (&value[..value.len() - 1], GIB),
        _ => (value, 1),
    };
    digits.parse::<u64>().ok()?.checked_mul(multiplier)
}

/// Validated, immutable geometry and policies of one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    /// Level number (1 = fastest).
    pub level: u8,
    /// Line size in bytes (power of two).
    pub line_size: u32,
    /// Lines per set.
    pub ways: u32,
    /// Number of sets (power of two); `capacity / line_size / ways`.
    pub set_count: u32,
    /// Capacity in bytes.
    pub capacity: u64,
    /// Latency charged for every probe of this level.
    pub hit_latency: u64,
    /// Behaviour of a store hit.
    pub write_hit_policy: WriteHitPolicy,
    /// Behaviour of a store miss.
    pub write_miss_policy: WriteMissPolicy,
}

impl CacheGeometry {
    /// Address layout (offset and set-index widths) for this geometry.
    pub const fn layout(&self) -> AddressLayout {
        AddressLayout::new(self.line_size, self.set_count)
    }

    /// Backing-store organisation implied by `ways` and `set_count`.
    ///
    /// A single way is direct-mapped even when there is only one set.
    pub const fn organization(&self) -> Organization {
        if self.ways == 1 {
            Organization::DirectMapped
        } else if self.set_count == 1 {
            Organization::FullyAssociative
        } else {
            Organization::SetAssociative
        }
    }
}

/// A level block after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedLevel {
    /// A numbered cache level.
    Cache(CacheGeometry),
    /// Main memory.
    Main {
        /// Latency charged for every request main memory serves.
        hit_latency: u64,
    },
}

impl ResolvedLevel {
    /// Identity of this level.
    pub const fn id(&self) -> LevelId {
        match self {
            Self::Cache(geometry) => LevelId::Cache(geometry.level),
            Self::Main { .. } => LevelId::Main,
        }
    }
}

/// Root configuration: every level block in declaration order.
///
/// Blocks may be declared in any order; the hierarchy sorts them.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{HierarchyConfig, LevelId};
///
/// let json = r#"{
///     "levels": [
///         { "level": "MAIN" },
///         {
///             "level": "L1",
///             "line_size": 64,
///             "way": "FULL",
///             "capacity": 4096,
///             "hit_latency": 2,
///             "write_hit_policy": "WRITETHROUGH",
///             "write_miss_policy": "NOWRITEALLOCATE"
///         }
///     ]
/// }"#;
///
/// let config = HierarchyConfig::from_json(json).unwrap();
/// assert_eq!(config.levels.len(), 2);
/// assert_eq!(config.levels[1].level, Some(LevelId::Cache(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HierarchyConfig {
    /// Level blocks, in the order they were declared.
    pub levels: Vec<LevelConfig>,
}

impl HierarchyConfig {
    /// Deserializes a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the text is not a valid configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates every block.
    ///
    /// # Errors
    ///
    /// Returns the first block's validation error, or [`ConfigError::Empty`]
    /// when there are no blocks.
    pub fn resolve(&self) -> Result<Vec<ResolvedLevel>, ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::Empty);
        }
        self.levels.iter().map(LevelConfig::resolve).collect()
    }
}
