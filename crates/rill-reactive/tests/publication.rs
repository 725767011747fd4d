//! Tests for the publish-per-mutation protocol.

use futures_core::Stream;
use futures_util::{FutureExt, StreamExt};
use rill::{ChangeSetKind, DistinctChange, KeyedChange};
use rill_reactive::{ObservableCollection, SubjectMap, SubjectSet};

fn next_now<S: Stream + Unpin>(stream: &mut S) -> Option<S::Item> {
    stream.next().now_or_never().flatten()
}

#[test]
fn each_mutation_publishes_one_change_set() {
    let mut set = SubjectSet::new();
    let mut changes = set.subscribe();

    // First delivery is the snapshot; empty subject, empty snapshot.
    let snapshot = next_now(&mut changes).unwrap();
    assert!(snapshot.is_empty());

    set.insert(1);
    let first = next_now(&mut changes).unwrap();
    assert_eq!(first.changes(), [DistinctChange::Addition(1)]);

    set.insert(2);
    let second = next_now(&mut changes).unwrap();
    assert_eq!(second.changes(), [DistinctChange::Addition(2)]);

    // Nothing pending beyond what was published.
    assert!(next_now(&mut changes).is_none());
}

#[test]
fn noop_mutations_publish_nothing() {
    let mut map = SubjectMap::new();
    map.add_or_replace("a", 1);

    let mut changes = map.subscribe();
    let mut ticks = map.collection_changed();
    next_now(&mut changes).unwrap();

    // Idempotent write: suppressed before it reaches the builder.
    map.add_or_replace("a", 1);
    assert!(next_now(&mut changes).is_none());
    assert!(next_now(&mut ticks).is_none());
}

#[test]
fn clear_publishes_a_clear_batch() {
    let mut map = SubjectMap::new();
    map.add_or_replace("a", 1);
    map.add_or_replace("b", 2);

    let mut changes = map.subscribe();
    next_now(&mut changes).unwrap();

    map.clear();
    let batch = next_now(&mut changes).unwrap();
    assert_eq!(batch.kind(), ChangeSetKind::Clear);
    assert_eq!(
        batch.changes(),
        [
            KeyedChange::Removal { key: "a", item: 1 },
            KeyedChange::Removal { key: "b", item: 2 },
        ]
    );
}

#[test]
fn failed_mutations_publish_nothing() {
    let mut map = SubjectMap::new();
    map.try_insert("a", 1).unwrap();

    let mut changes = map.subscribe();
    next_now(&mut changes).unwrap();

    assert!(map.try_insert("a", 2).is_err());
    assert_eq!(map.get(&"a"), Some(1));
    assert!(next_now(&mut changes).is_none());
}

#[test]
fn collection_changed_ticks_once_per_batch() {
    let mut set = SubjectSet::new();
    let mut ticks = set.collection_changed();

    set.insert(1);
    set.insert(2);
    set.insert(2);

    assert_eq!(next_now(&mut ticks), Some(()));
    assert_eq!(next_now(&mut ticks), Some(()));
    // The duplicate insert changed nothing, so only two ticks.
    assert!(next_now(&mut ticks).is_none());
}

#[test]
fn ticks_fire_even_without_change_subscribers() {
    let mut set = SubjectSet::new();
    let mut ticks = set.collection_changed();

    set.insert(1);
    assert_eq!(next_now(&mut ticks), Some(()));
}

#[test]
fn dropping_the_subject_completes_its_streams() {
    let mut set = SubjectSet::new();
    set.insert(1);
    let mut changes = set.subscribe();
    let mut ticks = set.collection_changed();
    next_now(&mut changes).unwrap();

    drop(set);
    assert_eq!(changes.next().now_or_never(), Some(None));
    assert_eq!(ticks.next().now_or_never(), Some(None));
}

#[test]
fn the_observable_facade_is_shape_independent() {
    fn snapshot_len<O: ObservableCollection>(subject: &O) -> usize {
        let mut changes = subject.subscribe();
        changes
            .next()
            .now_or_never()
            .flatten()
            .map(|snapshot| snapshot.len())
            .unwrap_or_default()
    }

    let mut set = SubjectSet::new();
    set.union_with([1, 2, 3]);
    let mut map = SubjectMap::new();
    map.add_or_replace("a", 1);

    assert_eq!(snapshot_len(&set), 3);
    assert_eq!(snapshot_len(&map), 1);
    assert_eq!(ObservableCollection::len(&set), 3);
}
