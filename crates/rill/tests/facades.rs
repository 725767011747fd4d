//! Tests for the read/write capability facades.

use rill::traits::{ListRead, ListWrite, MapRead, MapWrite, SetRead, SetWrite};
use rill::{ChangeTrackingList, ChangeTrackingMap, ChangeTrackingSet};

/// A consumer that only holds the read capability.
fn summarize<T: Clone>(list: &impl ListRead<T>) -> (usize, Option<T>) {
    (list.len(), list.get(0).cloned())
}

/// A consumer that applies a batch through the write capability.
fn drain_into<T>(set: &mut impl SetWrite<T>, items: Vec<T>) -> bool {
    set.union_with(items)
}

#[test]
fn list_reads_through_the_facade() {
    let list: ChangeTrackingList<u32> = [10, 20].into_iter().collect();
    assert_eq!(summarize(&list), (2, Some(10)));
}

#[test]
fn set_writes_through_the_facade() {
    let mut set = ChangeTrackingSet::new();
    assert!(drain_into(&mut set, vec![1, 2, 2]));
    assert_eq!(SetRead::len(&set), 2);
    assert!(SetRead::contains(&set, &1));
}

#[test]
fn map_round_trip_through_the_facade() {
    fn fill(map: &mut impl MapWrite<&'static str, u32>) {
        map.add_or_replace("a", 1);
        map.add_or_replace("b", 2);
        map.remove(&"a");
    }

    let mut map = ChangeTrackingMap::new();
    fill(&mut map);
    assert_eq!(MapRead::len(&map), 1);
    assert_eq!(MapRead::get(&map, &"b"), Some(&2));
    assert!(MapRead::keys(&map).eq([&"b"]));
}

#[test]
fn list_writes_through_the_facade() {
    fn reshape(list: &mut impl ListWrite<u32>) {
        list.push(1);
        list.push(2);
        list.set(0, 9).unwrap();
        list.move_item(0, 1).unwrap();
    }

    let mut list = ChangeTrackingList::new();
    reshape(&mut list);
    assert_eq!(list.as_slice(), [2, 9]);
}
