use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use rill::{ChangeTrackingMap, Result};

use crate::hub::{Handle, SuspendGuard};
use crate::streams::{ChangeSets, ObservedEntry, Ticks};
use crate::traits::ObservableCollection;

/// A keyed map addressed by explicit keys that publishes its mutations as a
/// stream of change sets and supports per-key value observation.
pub struct SubjectMap<K, V, S = RandomState>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    handle: Handle<ChangeTrackingMap<K, V, S>>,
}

impl<K, V> SubjectMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    pub fn new() -> Self {
        SubjectMap {
            handle: Handle::new(ChangeTrackingMap::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        SubjectMap {
            handle: Handle::new(ChangeTrackingMap::with_capacity(capacity)),
        }
    }
}

impl<K, V, S> SubjectMap<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        SubjectMap {
            handle: Handle::new(ChangeTrackingMap::with_hasher(hasher)),
        }
    }

    /// Inserts a new entry, failing with `DuplicateKey` when present. On
    /// failure nothing is published.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<()> {
        self.handle.mutate(|map| map.try_insert(key, value))
    }

    /// Inserts or replaces; an equal value is a no-op and publishes nothing.
    pub fn add_or_replace(&mut self, key: K, value: V) -> bool {
        self.handle.mutate(|map| map.add_or_replace(key, value))
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.handle.mutate(|map| map.remove(key))
    }

    /// Removes the entry only when the stored value equals `value`.
    pub fn remove_pair(&mut self, key: &K, value: &V) -> bool {
        self.handle.mutate(|map| map.remove_pair(key, value))
    }

    /// Inserts every entry as one published batch, failing on the first
    /// duplicate key (prior entries stay inserted and are published).
    pub fn add_range<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.handle.mutate(|map| map.add_range(entries))
    }

    pub fn add_or_replace_range<I>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.handle.mutate(|map| map.add_or_replace_range(entries))
    }

    /// Removes every present key as one published batch.
    pub fn remove_range<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        self.handle.mutate(|map| map.remove_range(keys))
    }

    pub fn clear(&mut self) {
        self.handle.mutate(|map| map.clear());
    }

    /// Replaces the whole contents with `entries` as one published batch.
    pub fn reset<I>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.handle.mutate(|map| map.reset(entries))
    }

    /// Snapshot of the value under `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.handle.read(|map| map.get(key).cloned())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.handle.read(|map| map.contains_key(key))
    }

    pub fn contains_pair(&self, key: &K, value: &V) -> bool {
        self.handle.read(|map| map.contains_pair(key, value))
    }

    pub fn len(&self) -> usize {
        self.handle.read(|map| map.len())
    }

    pub fn is_empty(&self) -> bool {
        self.handle.read(|map| map.is_empty())
    }

    /// Snapshot of the keys in iteration order.
    pub fn keys(&self) -> Vec<K> {
        self.handle.read(|map| map.keys().cloned().collect())
    }

    /// Snapshot of the entries in iteration order.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.handle
            .read(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    pub fn subscribe(&self) -> ChangeSets<ChangeTrackingMap<K, V, S>> {
        self.handle.subscribe()
    }

    /// Stream of the values stored under `key`; see
    /// [`ObservedEntry`](crate::ObservedEntry) for the lifecycle.
    pub fn observe_value(&self, key: K) -> ObservedEntry<K, V, ChangeTrackingMap<K, V, S>> {
        ObservedEntry::new(self.handle.subscribe(), key)
    }

    pub fn collection_changed(&self) -> Ticks {
        self.handle.collection_changed()
    }

    pub fn notifications_resumed(&self) -> Ticks {
        self.handle.notifications_resumed()
    }

    pub fn suspend_notifications(&self) -> SuspendGuard<ChangeTrackingMap<K, V, S>> {
        self.handle.suspend_notifications()
    }

    pub fn is_suspended(&self) -> bool {
        self.handle.is_suspended()
    }
}

impl<K, V, S> ObservableCollection for SubjectMap<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    type Tracking = ChangeTrackingMap<K, V, S>;

    fn len(&self) -> usize {
        SubjectMap::len(self)
    }

    fn subscribe(&self) -> ChangeSets<Self::Tracking> {
        SubjectMap::subscribe(self)
    }

    fn collection_changed(&self) -> Ticks {
        SubjectMap::collection_changed(self)
    }

    fn notifications_resumed(&self) -> Ticks {
        SubjectMap::notifications_resumed(self)
    }

    fn suspend_notifications(&self) -> SuspendGuard<Self::Tracking> {
        SubjectMap::suspend_notifications(self)
    }

    fn is_suspended(&self) -> bool {
        SubjectMap::is_suspended(self)
    }
}

impl<K, V> Default for SubjectMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> fmt::Debug for SubjectMap<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubjectMap")
            .field("len", &self.len())
            .field("suspended", &self.is_suspended())
            .finish()
    }
}
