//! # Configuration Tests
//!
//! Tests for level identities, policy keywords, size suffixes, block
//! validation, and JSON deserialization.

use cachesim_core::common::ConfigError;
use cachesim_core::config::*;
use rstest::rstest;

use crate::common::builder::{LevelBuilder, main_level};

fn geometry(block: LevelConfig) -> CacheGeometry {
    match block.resolve().unwrap() {
        ResolvedLevel::Cache(g) => g,
        ResolvedLevel::Main { .. } => panic!("expected a cache level"),
    }
}

#[rstest]
#[case("L1", LevelId::Cache(1))]
#[case("l7", LevelId::Cache(7))]
#[case("L254", LevelId::Cache(254))]
#[case("MAIN", LevelId::Main)]
#[case("main", LevelId::Main)]
fn level_ids_parse(#[case] text: &str, #[case] expected: LevelId) {
    assert_eq!(text.parse::<LevelId>().unwrap(), expected);
}

#[rstest]
#[case("1")]
#[case("L0")]
#[case("L255")]
#[case("LX")]
#[case("")]
fn level_ids_reject(#[case] text: &str) {
    assert!(matches!(
        text.parse::<LevelId>(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn main_orders_after_every_cache_level() {
    let mut ids = vec![
        LevelId::Main,
        LevelId::Cache(3),
        LevelId::Cache(254),
        LevelId::Cache(1),
    ];
    ids.sort();
    assert_eq!(
        ids,
        vec![
            LevelId::Cache(1),
            LevelId::Cache(3),
            LevelId::Cache(254),
            LevelId::Main
        ]
    );
}

#[test]
fn policies_parse() {
    assert_eq!("writeback".parse::<WriteHitPolicy>().unwrap(), WriteHitPolicy::WriteBack);
    assert_eq!(
        "WRITETHROUGH".parse::<WriteHitPolicy>().unwrap(),
        WriteHitPolicy::WriteThrough
    );
    assert_eq!(
        "WRITEALLOCATE".parse::<WriteMissPolicy>().unwrap(),
        WriteMissPolicy::WriteAllocate
    );
    assert_eq!(
        "NoWriteAllocate".parse::<WriteMissPolicy>().unwrap(),
        WriteMissPolicy::NoWriteAllocate
    );
    assert!(matches!(
        "WRITEAROUND".parse::<WriteHitPolicy>(),
        Err(ConfigError::UnrecognizedPolicy { .. })
    ));
}

#[rstest]
#[case("0", Some(0))]
#[case("1024", Some(1024))]
#[case("8K", Some(8 * 1024))]
#[case("8k", Some(8 * 1024))]
#[case("3M", Some(3 * 1024 * 1024))]
#[case("4G", Some(4 * 1024 * 1024 * 1024))]
#[case("", None)]
#[case("G", None)]
#[case("12KB", None)]
#[case("99999999999999999999G", None)]
fn sizes_parse(#[case] text: &str, #[case] expected: Option<u64>) {
    assert_eq!(parse_size(text), expected);
}

#[test]
fn apply_rejects_unknown_key() {
    let mut block = LevelConfig::default();
    assert!(matches!(
        block.apply("ASSOC", "4"),
        Err(ConfigError::UnrecognizedKey(k)) if k == "ASSOC"
    ));
}

#[test]
fn apply_rejects_unparsable_numbers() {
    let mut block = LevelConfig::default();
    assert!(matches!(
        block.apply("LINE", "SIXTYFOUR"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        block.apply("HITTIME", ""),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        block.apply("WAY", "MANY"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(block.is_empty());
}

#[test]
fn direct_mapped_geometry() {
    let g = geometry(LevelBuilder::cache(1).build());
    assert_eq!(g.set_count, 4);
    assert_eq!(g.ways, 1);
    assert_eq!(g.organization(), Organization::DirectMapped);
}

#[test]
fn single_way_single_set_is_direct_mapped() {
    let g = geometry(LevelBuilder::cache(1).size(4).build());
    assert_eq!(g.set_count, 1);
    assert_eq!(g.organization(), Organization::DirectMapped);
}

#[test]
fn full_associativity_resolves_to_one_set() {
    let g = geometry(LevelBuilder::cache(2).line(64).full().size(4096).build());
    assert_eq!(g.ways, 64);
    assert_eq!(g.set_count, 1);
    assert_eq!(g.organization(), Organization::FullyAssociative);
}

#[test]
fn n_way_geometry() {
    let g = geometry(LevelBuilder::cache(1).line(32).ways(4).size(8 * 1024).build());
    assert_eq!(g.set_count, 64);
    assert_eq!(g.organization(), Organization::SetAssociative);
    assert_eq!(g.layout().offset_bits(), 5);
    assert_eq!(g.layout().set_bits(), 6);
}

#[test]
fn main_needs_no_fields() {
    let block = LevelConfig {
        level: Some(LevelId::Main),
        ..LevelConfig::default()
    };
    assert_eq!(block.resolve().unwrap(), ResolvedLevel::Main { hit_latency: 0 });
    assert_eq!(
        main_level(100).resolve().unwrap(),
        ResolvedLevel::Main { hit_latency: 100 }
    );
}

#[test]
fn block_without_level_is_rejected() {
    assert!(matches!(
        LevelConfig::default().resolve(),
        Err(ConfigError::MissingLevel)
    ));
}

#[rstest]
#[case::line(LevelConfig { line_size: None, ..LevelBuilder::cache(1).build() }, "LINE")]
#[case::way(LevelConfig { way: None, ..LevelBuilder::cache(1).build() }, "WAY")]
#[case::size(LevelConfig { capacity: None, ..LevelBuilder::cache(1).build() }, "SIZE")]
#[case::hit(LevelConfig { hit_latency: None, ..LevelBuilder::cache(1).build() }, "HITTIME")]
#[case::write(LevelConfig { write_hit_policy: None, ..LevelBuilder::cache(1).build() }, "WRITEPOLICY")]
#[case::alloc(LevelConfig { write_miss_policy: None, ..LevelBuilder::cache(1).build() }, "ALLOCATIONPOLICY")]
fn every_cache_field_is_required(#[case] block: LevelConfig, #[case] missing: &str) {
    match block.resolve() {
        Err(ConfigError::MissingField { level, field }) => {
            assert_eq!(level, "L1");
            assert_eq!(field, missing);
        }
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[rstest]
#[case::line_not_power_of_two(LevelBuilder::cache(1).line(12).size(48))]
#[case::zero_line(LevelBuilder::cache(1).line(0))]
#[case::zero_ways(LevelBuilder::cache(1).ways(0))]
#[case::zero_size(LevelBuilder::cache(1).size(0))]
#[case::zero_hit(LevelBuilder::cache(1).hit(0))]
#[case::size_not_multiple_of_line(LevelBuilder::cache(1).size(18))]
#[case::size_smaller_than_line(LevelBuilder::cache(1).line(64).size(32))]
#[case::size_not_multiple_of_set(LevelBuilder::cache(1).ways(3).size(16))]
#[case::sets_not_power_of_two(LevelBuilder::cache(1).size(12))]
fn inconsistent_geometry_is_rejected(#[case] block: LevelBuilder) {
    assert!(matches!(
        block.build().resolve(),
        Err(ConfigError::InvalidLevel { .. })
    ));
}

#[test]
fn json_configuration() {
    let json = r#"{
        "levels": [
            {
                "level": "L2",
                "line_size": 64,
                "way": 8,
                "capacity": 262144,
                "hit_latency": 10,
                "write_hit_policy": "WRITEBACK",
                "write_miss_policy": "WRITEALLOCATE"
            },
            { "level": "MAIN", "hit_latency": 100 },
            {
                "level": "L1",
                "line": 64,
                "way": "FULL",
                "size": 4096,
                "hit_time": 1,
                "write_hit_policy": "WriteThrough",
                "write_miss_policy": "NoWriteAllocate"
            }
        ]
    }"#;

    let config = HierarchyConfig::from_json(json).unwrap();
    let resolved = config.resolve().unwrap();
    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved[0].id(), LevelId::Cache(2));
    assert_eq!(resolved[1], ResolvedLevel::Main { hit_latency: 100 });

    let ResolvedLevel::Cache(l1) = resolved[2] else {
        panic!("expected L1 geometry");
    };
    assert_eq!(l1.ways, 64);
    assert_eq!(l1.write_hit_policy, WriteHitPolicy::WriteThrough);
    assert_eq!(l1.write_miss_policy, WriteMissPolicy::NoWriteAllocate);
}

#[test]
fn json_rejects_unknown_fields_and_bad_levels() {
    assert!(matches!(
        HierarchyConfig::from_json(r#"{ "levels": [ { "level": "MAIN", "colour": 1 } ] }"#),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        HierarchyConfig::from_json(r#"{ "levels": [ { "level": "L0" } ] }"#),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn empty_configuration_is_rejected() {
    assert!(matches!(
        HierarchyConfig::default().resolve(),
        Err(ConfigError::Empty)
    ));
}
