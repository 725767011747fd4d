//! Tests for the list engine, above all the index-ordering rules that keep
//! every recorded index valid during sequential application.

use rill::{ChangeSetKind, ChangeTracking, ChangeTrackingList, SortedChange, SortedChangeSet};

/// Applies a captured change set to a replica seeded with the pre-capture
/// state, asserting every index is valid at its point in the sequence.
fn apply(state: &mut Vec<u32>, changes: &SortedChangeSet<u32>) {
    for change in changes {
        match change {
            SortedChange::Insertion { index, item } => {
                assert!(*index <= state.len(), "insertion index out of bounds");
                state.insert(*index, *item);
            }
            SortedChange::Removal { index, item } => {
                assert!(*index < state.len(), "removal index out of bounds");
                assert_eq!(state.remove(*index), *item);
            }
            SortedChange::Movement {
                old_index,
                new_index,
                item,
            } => {
                assert!(*old_index < state.len());
                let moved = state.remove(*old_index);
                assert_eq!(moved, *item);
                assert!(*new_index <= state.len());
                state.insert(*new_index, moved);
            }
            SortedChange::Replacement {
                index,
                old_item,
                new_item,
            } => {
                assert!(*index < state.len());
                assert_eq!(state[*index], *old_item);
                state[*index] = *new_item;
            }
            SortedChange::Update {
                old_index,
                old_item,
                new_index,
                new_item,
            } => {
                assert!(*old_index < state.len());
                assert_eq!(state.remove(*old_index), *old_item);
                assert!(*new_index <= state.len());
                state.insert(*new_index, *new_item);
            }
        }
    }
}

#[test]
fn remove_range_records_descending_indices() {
    let mut list: ChangeTrackingList<u32> = [10, 20, 30, 40, 50].into_iter().collect();
    list.remove_range(1, 3).unwrap();

    let changes = list.capture_changes();
    assert_eq!(changes.kind(), ChangeSetKind::Update);
    assert_eq!(
        changes.changes(),
        [
            SortedChange::Removal { index: 3, item: 40 },
            SortedChange::Removal { index: 2, item: 30 },
            SortedChange::Removal { index: 1, item: 20 },
        ]
    );
    assert_eq!(list.as_slice(), [10, 50]);
}

#[test]
fn remove_range_indices_stay_valid_during_replay() {
    let mut list: ChangeTrackingList<u32> = [10, 20, 30, 40, 50].into_iter().collect();
    let mut replica = list.as_slice().to_vec();
    list.remove_range(1, 3).unwrap();
    apply(&mut replica, &list.capture_changes());
    assert_eq!(replica, list.as_slice());
}

#[test]
fn clear_records_descending_indices() {
    let mut list: ChangeTrackingList<u32> = [1, 2, 3].into_iter().collect();
    let mut replica = list.as_slice().to_vec();
    list.clear();

    let changes = list.capture_changes();
    assert_eq!(changes.kind(), ChangeSetKind::Clear);
    assert_eq!(
        changes.changes(),
        [
            SortedChange::Removal { index: 2, item: 3 },
            SortedChange::Removal { index: 1, item: 2 },
            SortedChange::Removal { index: 0, item: 1 },
        ]
    );
    apply(&mut replica, &changes);
    assert!(replica.is_empty());
}

#[test]
fn remove_range_of_everything_classifies_as_clear() {
    let mut list: ChangeTrackingList<u32> = [1, 2].into_iter().collect();
    list.remove_range(0, 2).unwrap();
    assert_eq!(list.capture_changes().kind(), ChangeSetKind::Clear);
}

#[test]
fn insertions_record_ascending_indices() {
    let mut list = ChangeTrackingList::new();
    list.push_range([1, 2]);
    list.insert_range(1, [8, 9]).unwrap();

    let mut replica = Vec::new();
    apply(&mut replica, &list.capture_changes());
    assert_eq!(replica, [1, 8, 9, 2]);
    assert_eq!(list.as_slice(), [1, 8, 9, 2]);
}

#[test]
fn mixed_operations_replay_onto_the_pre_state() {
    let mut list: ChangeTrackingList<u32> = [1, 2, 3].into_iter().collect();
    let mut replica = list.as_slice().to_vec();

    list.push(4);
    list.set(0, 9).unwrap();
    list.move_item(3, 0).unwrap();
    list.remove_at(2).unwrap();
    list.remove(&3);

    apply(&mut replica, &list.capture_changes());
    assert_eq!(replica, list.as_slice());
}

#[test]
fn reset_replays_as_remove_all_then_insert() {
    let mut list: ChangeTrackingList<u32> = [1, 2].into_iter().collect();
    let mut replica = list.as_slice().to_vec();
    list.reset([7, 8, 9]);

    let changes = list.capture_changes();
    assert_eq!(changes.kind(), ChangeSetKind::Reset);
    apply(&mut replica, &changes);
    assert_eq!(replica, [7, 8, 9]);
}

#[test]
fn errors_leave_the_list_untouched() {
    let mut list: ChangeTrackingList<u32> = [1, 2].into_iter().collect();
    assert!(list.insert(9, 0).is_err());
    assert!(list.remove_at(5).is_err());
    assert!(list.remove_range(1, 4).is_err());
    assert!(list.set(7, 0).is_err());
    assert!(list.move_item(0, 9).is_err());
    assert_eq!(list.as_slice(), [1, 2]);
    assert!(!list.is_dirty());
    assert!(list.capture_changes().is_empty());
}

#[test]
fn disabled_window_records_nothing_but_dirty_tracks() {
    let mut list = ChangeTrackingList::new();
    list.set_change_collection_enabled(false);
    list.push(1);
    assert!(list.is_dirty());
    assert!(list.capture_changes().is_empty());
    assert_eq!(list.as_slice(), [1]);
}
