//! End-to-end scenarios: construction, searching, erasure, copying.
//!
//! These follow fixed insertion scripts (with deliberate duplicate keys)
//! and check the full observable surface after every step, with the
//! structural invariant checker run after each mutation.

mod common;

use listmap::ListMap;
use std::collections::BTreeMap;

/// The canonical script: nine distinct keys with four duplicate re-inserts
/// mixed in. Duplicates must be no-ops.
const SCRIPT: [(i32, i32); 13] = [
    (0, 0),
    (-3, 9),
    (-4, 16),
    (-1, 1),
    (-2, 4),
    (2, 4),
    (0, 0),
    (-1, 1),
    (-3, 9),
    (5, 25),
    (-3, 9),
    (7, 49),
    (6, 36),
];

fn scripted_map() -> ListMap<i32, i32> {
    SCRIPT.into_iter().collect()
}

fn as_pairs(map: &ListMap<i32, i32>) -> Vec<(i32, i32)> {
    map.iter().map(|(k, v)| (*k, *v)).collect()
}

#[test]
fn scripted_insertions_iterate_sorted() {
    common::init_tracing();
    let map = scripted_map();
    map.check_invariants();

    assert_eq!(map.len(), 9);
    let keys: Vec<i32> = map.keys().copied().collect();
    assert_eq!(keys, [-4, -3, -2, -1, 0, 2, 5, 6, 7]);

    let reverse: Vec<i32> = map.keys().rev().copied().collect();
    assert_eq!(reverse, [7, 6, 5, 2, 0, -1, -2, -3, -4]);
}

#[test]
fn duplicate_inserts_are_no_ops() {
    let mut map = scripted_map();
    let before = as_pairs(&map);
    for key in [0, -1, -3] {
        let (cursor, inserted) = map.insert(key, 12345);
        assert!(!inserted);
        assert_eq!(cursor.key(), Some(&key));
        // Stored value untouched.
        assert_ne!(cursor.value(), Some(&12345));
    }
    assert_eq!(as_pairs(&map), before);
    map.check_invariants();
}

#[test]
fn bounds_and_find_contracts() {
    let map = scripted_map();

    assert_eq!(map.lower_bound(&1).key(), Some(&2));
    assert_eq!(map.lower_bound(&2).key(), Some(&2));
    assert_eq!(map.upper_bound(&2).key(), Some(&5));
    assert_eq!(map.upper_bound(&1).key(), Some(&2));
    assert!(map.find(&3).is_end());
    assert_eq!(map.find(&-4).value(), Some(&16));

    // Bounds outside the key range hit the ends.
    assert_eq!(map.lower_bound(&-100).key(), Some(&-4));
    assert!(map.lower_bound(&100).is_end());
    assert!(map.upper_bound(&7).is_end());
}

#[test]
fn erase_then_iterate() {
    let mut map = scripted_map();
    assert_eq!(map.remove(&2), Some(4));
    map.check_invariants();

    let keys: Vec<i32> = map.keys().copied().collect();
    assert_eq!(keys, [-4, -3, -2, -1, 0, 5, 6, 7]);

    // Absent key: no-op.
    assert_eq!(map.remove(&2), None);
    assert_eq!(map.len(), 8);
}

#[test]
fn erase_by_cursor_returns_successor() {
    let mut map = scripted_map();
    let mut cursor = map.find_mut(&-2);
    assert_eq!(cursor.remove(), Some((-2, 4)));
    assert_eq!(cursor.key(), Some(&-1));
    map.check_invariants();
}

#[test]
fn full_range_erase_empties_the_map() {
    let mut map = scripted_map();
    let mut cursor = map.cursor_first_mut();
    while cursor.remove().is_some() {}
    assert!(cursor.is_end());
    drop(cursor);

    assert!(map.is_empty());
    assert_eq!(map.iter().count(), 0);
    map.check_invariants();
}

#[test]
fn interior_range_erase_keeps_the_ends() {
    // Erase [second, last) - everything but the first and last entries.
    let mut map = scripted_map();
    let (&last_key, _) = map.last_key_value().unwrap();

    let mut cursor = map.cursor_first_mut();
    cursor.move_next();
    while cursor.key().is_some_and(|k| *k < last_key) {
        cursor.remove();
    }
    drop(cursor);
    map.check_invariants();

    assert_eq!(as_pairs(&map), [(-4, 16), (7, 49)]);
}

#[test]
fn matches_btreemap_on_the_script() {
    // First-occurrence-wins matches BTreeMap built with or_insert.
    let map = scripted_map();
    let mut oracle = BTreeMap::new();
    for (k, v) in SCRIPT {
        oracle.entry(k).or_insert(v);
    }
    assert!(map.iter().map(|(k, v)| (*k, *v)).eq(oracle.into_iter()));
}

#[test]
fn copy_round_trip_is_equal_and_independent() {
    let mut original = scripted_map();
    let copy = original.clone();
    copy.check_invariants();
    assert_eq!(original, copy);

    // Mutating one side never shows through on the other.
    original.remove(&0);
    assert_ne!(original, copy);
    assert_eq!(copy.get(&0), Some(&0));

    let moved = copy;
    assert_eq!(moved.len(), 9);
    assert_eq!(moved.keys().copied().collect::<Vec<_>>(), [-4, -3, -2, -1, 0, 2, 5, 6, 7]);
}

#[test]
fn emptiness_contracts() {
    let map: ListMap<i32, i32> = ListMap::new();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.cursor_first(), map.cursor_end());
    assert!(map.lower_bound(&0).is_end());
    assert!(map.upper_bound(&0).is_end());
    assert!(map.find(&0).is_end());
    map.check_invariants();
}

#[test]
fn entry_api_as_indexing() {
    // The insert-if-absent indexing idiom over the script.
    let mut map: ListMap<i32, i32> = ListMap::new();
    for (i, (k, v)) in SCRIPT.into_iter().enumerate() {
        if i % 2 == 0 {
            *map.entry(k).or_default() = v;
        } else {
            map.insert(k, v);
        }
        map.check_invariants();
    }
    // or_default never disturbed already-present values for this script
    // (every duplicate re-insert carries the original value).
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [-4, -3, -2, -1, 0, 2, 5, 6, 7]);
}

#[test]
fn stress_alternating_inserts_and_removes() {
    let mut map: ListMap<u32, u32> = ListMap::new();
    let mut oracle: BTreeMap<u32, u32> = BTreeMap::new();

    // Deterministic pseudo-random walk, no duplicated rng machinery.
    let mut state = 0x243F_6A88_u32;
    for step in 0..2_000 {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let key = state % 256;
        if step % 3 == 2 {
            assert_eq!(map.remove(&key), oracle.remove(&key));
        } else {
            let (_, inserted) = map.insert(key, step);
            let expected = !oracle.contains_key(&key);
            oracle.entry(key).or_insert(step);
            assert_eq!(inserted, expected);
        }
        if step % 64 == 0 {
            map.check_invariants();
        }
    }
    map.check_invariants();
    assert!(map.iter().map(|(k, v)| (*k, *v)).eq(oracle.into_iter()));
}
