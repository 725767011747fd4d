//! Tests for the Update/Clear/Reset classification across collection shapes.

use rill::{ChangeSetKind, ChangeTracking, ChangeTrackingList, ChangeTrackingMap, ChangeTrackingSet};

#[test]
fn point_mutations_classify_as_update() {
    let mut set = ChangeTrackingSet::new();
    set.insert(1);
    set.insert(2);
    set.remove(&1);
    assert_eq!(set.capture_changes().kind(), ChangeSetKind::Update);
}

#[test]
fn clear_classifies_as_clear() {
    let mut set: ChangeTrackingSet<u32> = [1, 2, 3].into_iter().collect();
    set.clear();
    let changes = set.capture_changes();
    assert_eq!(changes.kind(), ChangeSetKind::Clear);
    assert_eq!(changes.len(), 3);
    assert!(set.is_empty());
}

#[test]
fn clear_on_empty_collection_publishes_nothing() {
    let mut set = ChangeTrackingSet::<u32>::new();
    set.clear();
    assert!(!set.is_dirty());
    assert!(set.capture_changes().is_empty());
}

#[test]
fn reset_with_prior_contents_classifies_as_reset() {
    let mut map: ChangeTrackingMap<&str, u32> = [("a", 1), ("b", 2)].into_iter().collect();
    map.reset([("c", 3), ("d", 4)]);
    let changes = map.capture_changes();
    assert_eq!(changes.kind(), ChangeSetKind::Reset);
    // Two removals emptying the map, then two additions.
    assert_eq!(changes.len(), 4);
    assert!(changes.changes()[..2].iter().all(|c| c.as_removal().is_ok()));
    assert!(changes.changes()[2..].iter().all(|c| c.as_addition().is_ok()));
}

#[test]
fn reset_to_nothing_classifies_as_clear() {
    let mut list: ChangeTrackingList<u8> = [1, 2].into_iter().collect();
    list.reset([]);
    assert_eq!(list.capture_changes().kind(), ChangeSetKind::Clear);
}

#[test]
fn reset_on_empty_collection_classifies_as_update() {
    let mut list = ChangeTrackingList::new();
    list.reset([1, 2]);
    assert_eq!(list.capture_changes().kind(), ChangeSetKind::Update);
}

#[test]
fn emptying_removal_without_refill_classifies_as_clear() {
    let mut map: ChangeTrackingMap<&str, u32> = [("a", 1), ("b", 2)].into_iter().collect();
    map.remove(&"a");
    map.remove(&"b");
    assert_eq!(map.capture_changes().kind(), ChangeSetKind::Clear);
}

#[test]
fn addition_after_emptying_removal_classifies_as_reset() {
    let mut map: ChangeTrackingMap<&str, u32> = [("a", 1)].into_iter().collect();
    map.remove(&"a");
    map.add_or_replace("b", 2);
    assert_eq!(map.capture_changes().kind(), ChangeSetKind::Reset);
}

#[test]
fn capture_starts_a_fresh_classification() {
    let mut set: ChangeTrackingSet<u32> = [1].into_iter().collect();
    set.clear();
    assert_eq!(set.capture_changes().kind(), ChangeSetKind::Clear);

    set.insert(2);
    assert_eq!(set.capture_changes().kind(), ChangeSetKind::Update);
}
