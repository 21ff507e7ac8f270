//! End-to-end access scenarios.
//!
//! Short request sequences with hand-computed outcomes for every
//! organisation and policy combination.

use cachesim_core::config::LevelId;
use cachesim_core::core::units::cache::AccessStatus;
use pretty_assertions::assert_eq;

use crate::common::builder::{LevelBuilder, hierarchy, main_level, single};

const L1: LevelId = LevelId::Cache(1);
const L2: LevelId = LevelId::Cache(2);

#[test]
fn cold_misses_then_hit() {
    let mut h = single(LevelBuilder::cache(1), 10);

    let first = h.load(0);
    let second = h.load(4);
    let third = h.load(0);
    assert_eq!(
        (first.status, second.status, third.status),
        (AccessStatus::Miss, AccessStatus::Miss, AccessStatus::Hit)
    );
    assert_eq!(
        (first.elapsed_time, second.elapsed_time, third.elapsed_time),
        (11, 11, 1)
    );

    let report = h.report();
    let l1 = report.level(L1).unwrap();
    assert_eq!((l1.hits, l1.misses, l1.access_time), (1, 2, 23));
    let main = report.level(LevelId::Main).unwrap();
    assert_eq!((main.hits, main.misses, main.access_time), (2, 0, 20));
}

#[test]
fn store_allocates_dirty_line_then_load_hits() {
    let mut h = single(LevelBuilder::cache(1), 10);

    let store = h.store(0);
    assert_eq!(store.status, AccessStatus::Miss);
    assert_eq!(store.elapsed_time, 11);
    assert_eq!(h.level(L1).unwrap().is_dirty(0), Some(true));

    let load = h.load(0);
    assert!(load.is_hit());
    assert_eq!(load.elapsed_time, 1);

    let l1 = h.level(L1).unwrap();
    assert_eq!((l1.hits(), l1.misses(), l1.access_time()), (1, 1, 12));
    let main = h.level(LevelId::Main).unwrap();
    assert_eq!((main.hits(), main.access_time()), (1, 10));
}

#[test]
fn single_line_cache_replaces_clean_line() {
    let mut h = single(LevelBuilder::cache(1).size(4), 10);
    assert_eq!(h.load(0).status, AccessStatus::Miss);
    assert_eq!(h.load(4).status, AccessStatus::Miss);

    let l1 = h.level(L1).unwrap();
    assert!(l1.contains(4));
    assert!(!l1.contains(0));
    assert_eq!(l1.misses(), 2);
    assert_eq!(h.level(LevelId::Main).unwrap().hits(), 2);
}

#[test]
fn dirty_conflict_writes_back_before_refill() {
    let mut h = single(LevelBuilder::cache(1).size(4), 10);
    let _ = h.store(0);

    let result = h.load(4);
    assert_eq!(result.status, AccessStatus::Dirty);
    assert_eq!(result.evicted_address, Some(0));
    assert_eq!(result.elapsed_time, 21);

    let l1 = h.level(L1).unwrap();
    assert_eq!((l1.hits(), l1.misses(), l1.access_time()), (0, 2, 32));
    assert!(l1.contains(4));
    assert_eq!(l1.is_dirty(4), Some(false));
    let main = h.level(LevelId::Main).unwrap();
    assert_eq!((main.hits(), main.access_time()), (3, 30));
}

#[test]
fn write_through_with_allocate() {
    let mut h = single(LevelBuilder::cache(1).write_through(), 10);

    let result = h.store(0);
    assert_eq!(result.status, AccessStatus::Miss);
    // Probe, allocate-load from main, then the write-through.
    assert_eq!(result.elapsed_time, 21);
    assert_eq!(h.level(L1).unwrap().is_dirty(0), Some(false));
    assert_eq!(h.level(L1).unwrap().misses(), 1);
    assert_eq!(h.level(LevelId::Main).unwrap().hits(), 2);
}

#[test]
fn no_write_allocate_store_bypasses_level() {
    let mut h = single(LevelBuilder::cache(1).no_write_allocate(), 10);

    let result = h.store(0);
    assert_eq!(result.status, AccessStatus::Miss);
    assert_eq!(result.elapsed_time, 11);
    assert!(!h.level(L1).unwrap().contains(0));
    assert_eq!(h.level(LevelId::Main).unwrap().hits(), 1);

    // A store miss into an occupied set must not disturb the occupant.
    let _ = h.load(0);
    assert_eq!(h.store(16).status, AccessStatus::Miss);
    let l1 = h.level(L1).unwrap();
    assert!(l1.contains(0));
    assert!(!l1.contains(16));
}

#[test]
fn fully_associative_evicts_least_recently_used() {
    let mut h = single(LevelBuilder::cache(1).full(), 10);
    for addr in [0, 4, 8, 12] {
        let _ = h.load(addr);
    }
    let _ = h.load(16);

    let l1 = h.level(L1).unwrap();
    assert!(!l1.contains(0));
    for addr in [4, 8, 12, 16] {
        assert!(l1.contains(addr), "{addr} should be resident");
    }
}

#[test]
fn fully_associative_hit_refreshes_recency() {
    let mut h = single(LevelBuilder::cache(1).full(), 10);
    for addr in [0, 4, 8, 12] {
        let _ = h.load(addr);
    }
    assert!(h.load(0).is_hit());
    let _ = h.load(16);

    let l1 = h.level(L1).unwrap();
    assert!(l1.contains(0));
    assert!(!l1.contains(4));
}

#[test]
fn n_way_eviction_stays_within_set() {
    // 2 ways, 2 sets: 0, 8 and 16 all map to set 0.
    let mut h = single(LevelBuilder::cache(1).ways(2), 10);
    for addr in [0, 4, 8, 16] {
        let _ = h.load(addr);
    }

    let l1 = h.level(L1).unwrap();
    assert!(!l1.contains(0));
    assert!(l1.contains(4));
    assert!(l1.contains(8));
    assert!(l1.contains(16));
}

#[test]
fn n_way_dirty_victim() {
    let mut h = single(LevelBuilder::cache(1).ways(2), 10);
    let _ = h.store(0);
    let _ = h.load(8);

    let result = h.load(16);
    assert_eq!(result.status, AccessStatus::Dirty);
    assert_eq!(result.evicted_address, Some(0));
    assert!(!h.level(L1).unwrap().contains(0));
}

#[test]
fn dirty_victim_lands_in_next_cache_level() {
    let mut h = hierarchy(vec![
        LevelBuilder::cache(1).size(4).build(),
        LevelBuilder::cache(2).full().size(64).hit(5).build(),
        main_level(20),
    ]);
    let _ = h.store(0);

    let result = h.load(4);
    assert_eq!(result.status, AccessStatus::Dirty);
    // L1 probe, write-back hit in L2, refill through L2 from main.
    assert_eq!(result.elapsed_time, 1 + 5 + 25);

    let l2 = h.level(L2).unwrap();
    assert_eq!((l2.hits(), l2.misses()), (1, 2));
    assert_eq!(l2.is_dirty(0), Some(true));
    assert_eq!(l2.is_dirty(4), Some(false));
}
