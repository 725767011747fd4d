//! Tests for the keyed-map engine: recorded changes, no-op suppression and
//! range semantics.

use indexmap::IndexMap;

use rill::{
    ChangeSetKind, ChangeTracking, ChangeTrackingMap, Error, KeyedChange, KeyedChangeSet,
};

/// Applies a captured change set to a replica seeded with the pre-capture
/// state; the result must equal the post-capture state.
fn apply(state: &mut IndexMap<&'static str, u32>, changes: &KeyedChangeSet<&'static str, u32>) {
    for change in changes {
        match change {
            KeyedChange::Addition { key, item } => {
                assert!(
                    state.insert(*key, *item).is_none(),
                    "addition of a key already present"
                );
            }
            KeyedChange::Removal { key, item } => {
                assert_eq!(
                    state.shift_remove(key),
                    Some(*item),
                    "removal did not match the stored value"
                );
            }
            KeyedChange::Replacement {
                key,
                old_item,
                new_item,
            } => {
                assert_eq!(
                    state.insert(*key, *new_item),
                    Some(*old_item),
                    "replacement did not match the stored value"
                );
            }
        }
    }
}

#[test]
fn noop_replace_publishes_nothing() {
    let mut map: ChangeTrackingMap<&str, u32> = [("a", 1)].into_iter().collect();
    assert!(!map.add_or_replace("a", 1));
    assert!(!map.is_dirty());
    assert!(map.capture_changes().is_empty());
}

#[test]
fn reset_emits_removals_then_additions() {
    let mut map: ChangeTrackingMap<&str, u32> = [("a", 1), ("b", 2)].into_iter().collect();
    map.reset([("c", 3), ("d", 4)]);

    let changes = map.capture_changes();
    assert_eq!(changes.kind(), ChangeSetKind::Reset);
    assert_eq!(
        changes.changes(),
        [
            KeyedChange::Removal { key: "a", item: 1 },
            KeyedChange::Removal { key: "b", item: 2 },
            KeyedChange::Addition { key: "c", item: 3 },
            KeyedChange::Addition { key: "d", item: 4 },
        ]
    );
}

#[test]
fn captured_changes_replay_onto_the_pre_state() {
    let mut map = ChangeTrackingMap::new();
    let mut replica = IndexMap::new();

    map.add_or_replace("a", 1);
    map.add_or_replace("b", 2);
    map.add_or_replace("a", 10);
    map.remove(&"b");
    apply(&mut replica, &map.capture_changes());
    let expected: IndexMap<&str, u32> = map.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(replica, expected);

    map.reset([("x", 7), ("y", 8)]);
    apply(&mut replica, &map.capture_changes());
    let expected: IndexMap<&str, u32> = map.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(replica, expected);
}

#[test]
fn add_range_is_best_effort_up_to_the_duplicate() {
    let mut map: ChangeTrackingMap<&str, u32> = [("b", 2)].into_iter().collect();
    let result = map.add_range([("a", 1), ("b", 20), ("c", 3)]);
    assert_eq!(result, Err(Error::DuplicateKey));
    // The entry before the duplicate went in; the rest did not.
    assert_eq!(map.get(&"a"), Some(&1));
    assert_eq!(map.get(&"b"), Some(&2));
    assert!(!map.contains_key(&"c"));
}

#[test]
fn remove_range_ignores_absent_keys() {
    let mut map: ChangeTrackingMap<&str, u32> = [("a", 1), ("b", 2)].into_iter().collect();
    assert!(map.remove_range(["a", "missing"]));
    assert_eq!(map.len(), 1);
    assert_eq!(
        map.capture_changes().changes(),
        [KeyedChange::Removal { key: "a", item: 1 }]
    );
}

#[test]
fn remove_range_emptying_the_map_classifies_as_clear() {
    let mut map: ChangeTrackingMap<&str, u32> = [("a", 1), ("b", 2)].into_iter().collect();
    map.remove_range(["b", "a"]);
    assert_eq!(map.capture_changes().kind(), ChangeSetKind::Clear);
}

#[test]
fn replacement_carries_old_and_new_values() {
    let mut map: ChangeTrackingMap<&str, u32> = [("a", 1)].into_iter().collect();
    map.add_or_replace("a", 2);
    let changes = map.capture_changes();
    assert_eq!(
        changes.changes(),
        [KeyedChange::Replacement {
            key: "a",
            old_item: 1,
            new_item: 2,
        }]
    );
}

#[test]
fn disabled_window_records_nothing_but_dirty_tracks() {
    let mut map = ChangeTrackingMap::new();
    map.set_change_collection_enabled(false);
    map.add_or_replace("a", 1);
    assert!(map.is_dirty());
    assert!(map.capture_changes().is_empty());
    assert_eq!(map.get(&"a"), Some(&1));
}

#[test]
fn snapshot_describes_the_full_contents() {
    let map: ChangeTrackingMap<&str, u32> = [("a", 1), ("b", 2)].into_iter().collect();
    let mut replica = IndexMap::new();
    apply(&mut replica, &map.snapshot_changes());
    assert_eq!(replica, IndexMap::from([("a", 1), ("b", 2)]));
}
