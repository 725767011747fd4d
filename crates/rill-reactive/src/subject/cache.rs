use std::fmt;
use std::hash::Hash;

use rill::{ChangeTrackingCache, Result};

use crate::hub::{Handle, SuspendGuard};
use crate::streams::{ChangeSets, ObservedEntry, Ticks};
use crate::traits::ObservableCollection;

/// A keyed cache whose keys are derived from the items by a selector,
/// publishing its mutations as a stream of change sets.
///
/// Behaves exactly like [`SubjectMap`](crate::SubjectMap) once the key is
/// derived; operations accept items instead of `(key, value)` pairs.
pub struct SubjectCache<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    handle: Handle<ChangeTrackingCache<K, V>>,
}

impl<K, V> SubjectCache<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    pub fn new(key_of: impl Fn(&V) -> K + 'static) -> Self {
        SubjectCache {
            handle: Handle::new(ChangeTrackingCache::new(key_of)),
        }
    }

    pub fn with_capacity(capacity: usize, key_of: impl Fn(&V) -> K + 'static) -> Self {
        SubjectCache {
            handle: Handle::new(ChangeTrackingCache::with_capacity(capacity, key_of)),
        }
    }

    /// Inserts `item` under its derived key, failing with `DuplicateKey`.
    pub fn try_insert(&mut self, item: V) -> Result<()> {
        self.handle.mutate(|cache| cache.try_insert(item))
    }

    /// Inserts or replaces `item` under its derived key; an equal stored
    /// item is a no-op and publishes nothing.
    pub fn add_or_replace(&mut self, item: V) -> bool {
        self.handle.mutate(|cache| cache.add_or_replace(item))
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.handle.mutate(|cache| cache.remove(key))
    }

    /// Removes `item` when the entry under its derived key equals it.
    pub fn remove_item(&mut self, item: &V) -> bool {
        self.handle.mutate(|cache| cache.remove_item(item))
    }

    pub fn add_or_replace_range<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        self.handle.mutate(|cache| cache.add_or_replace_range(items))
    }

    pub fn remove_range<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        self.handle.mutate(|cache| cache.remove_range(keys))
    }

    pub fn clear(&mut self) {
        self.handle.mutate(|cache| cache.clear());
    }

    /// Replaces the whole contents with `items` as one published batch.
    pub fn reset<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        self.handle.mutate(|cache| cache.reset(items))
    }

    /// Snapshot of the item under `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.handle.read(|cache| cache.get(key).cloned())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.handle.read(|cache| cache.contains_key(key))
    }

    pub fn len(&self) -> usize {
        self.handle.read(|cache| cache.len())
    }

    pub fn is_empty(&self) -> bool {
        self.handle.read(|cache| cache.is_empty())
    }

    /// Snapshot of the items in iteration order.
    pub fn items(&self) -> Vec<V> {
        self.handle.read(|cache| cache.values().cloned().collect())
    }

    pub fn subscribe(&self) -> ChangeSets<ChangeTrackingCache<K, V>> {
        self.handle.subscribe()
    }

    /// Stream of the items stored under `key`.
    pub fn observe_value(&self, key: K) -> ObservedEntry<K, V, ChangeTrackingCache<K, V>> {
        ObservedEntry::new(self.handle.subscribe(), key)
    }

    pub fn collection_changed(&self) -> Ticks {
        self.handle.collection_changed()
    }

    pub fn notifications_resumed(&self) -> Ticks {
        self.handle.notifications_resumed()
    }

    pub fn suspend_notifications(&self) -> SuspendGuard<ChangeTrackingCache<K, V>> {
        self.handle.suspend_notifications()
    }

    pub fn is_suspended(&self) -> bool {
        self.handle.is_suspended()
    }
}

impl<K, V> ObservableCollection for SubjectCache<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    type Tracking = ChangeTrackingCache<K, V>;

    fn len(&self) -> usize {
        SubjectCache::len(self)
    }

    fn subscribe(&self) -> ChangeSets<Self::Tracking> {
        SubjectCache::subscribe(self)
    }

    fn collection_changed(&self) -> Ticks {
        SubjectCache::collection_changed(self)
    }

    fn notifications_resumed(&self) -> Ticks {
        SubjectCache::notifications_resumed(self)
    }

    fn suspend_notifications(&self) -> SuspendGuard<Self::Tracking> {
        SubjectCache::suspend_notifications(self)
    }

    fn is_suspended(&self) -> bool {
        SubjectCache::is_suspended(self)
    }
}

impl<K, V> fmt::Debug for SubjectCache<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubjectCache")
            .field("len", &self.len())
            .field("suspended", &self.is_suspended())
            .finish()
    }
}
