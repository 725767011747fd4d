use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::change::KeyedChange;
use crate::change_set::KeyedChangeSet;
use crate::error::Result;
use crate::tracking::{ChangeTracking, ChangeTrackingMap};
use crate::traits::{CacheWrite, MapRead};

/// A keyed collection whose keys are derived from the items themselves.
///
/// Operations accept items rather than `(key, value)` pairs; the injected
/// key selector derives the key. Once the key is in hand the behaviour is
/// exactly that of [`ChangeTrackingMap`], to which this delegates.
pub struct ChangeTrackingCache<K, V, S = RandomState> {
    entries: ChangeTrackingMap<K, V, S>,
    key_of: Box<dyn Fn(&V) -> K>,
}

impl<K, V> ChangeTrackingCache<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    pub fn new(key_of: impl Fn(&V) -> K + 'static) -> Self {
        ChangeTrackingCache {
            entries: ChangeTrackingMap::new(),
            key_of: Box::new(key_of),
        }
    }

    pub fn with_capacity(capacity: usize, key_of: impl Fn(&V) -> K + 'static) -> Self {
        ChangeTrackingCache {
            entries: ChangeTrackingMap::with_capacity(capacity),
            key_of: Box::new(key_of),
        }
    }
}

impl<K, V, S> ChangeTrackingCache<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S, key_of: impl Fn(&V) -> K + 'static) -> Self {
        ChangeTrackingCache {
            entries: ChangeTrackingMap::with_hasher(hasher),
            key_of: Box::new(key_of),
        }
    }

    /// The key the selector derives for `item`.
    pub fn key_of(&self, item: &V) -> K {
        (self.key_of)(item)
    }

    /// Inserts `item` under its derived key, failing with `DuplicateKey`.
    pub fn try_insert(&mut self, item: V) -> Result<()> {
        let key = (self.key_of)(&item);
        self.entries.try_insert(key, item)
    }

    /// Inserts or replaces `item` under its derived key, suppressing the
    /// change when an equal item is already stored.
    pub fn add_or_replace(&mut self, item: V) -> bool {
        let key = (self.key_of)(&item);
        self.entries.add_or_replace(key, item)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    /// Removes `item` when the entry under its derived key equals it.
    pub fn remove_item(&mut self, item: &V) -> bool {
        let key = (self.key_of)(item);
        self.entries.remove_pair(&key, item)
    }

    pub fn add_or_replace_range<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        let mut changed = false;
        for item in items {
            changed |= self.add_or_replace(item);
        }
        changed
    }

    pub fn remove_range<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        self.entries.remove_range(keys)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replaces the whole contents with `items`.
    pub fn reset<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        let removed = !self.entries.is_empty();
        self.entries.clear();
        let changed = self.add_or_replace_range(items);
        removed || changed
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn try_get(&self, key: &K) -> Result<&V> {
        self.entries.try_get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether the entry under the item's derived key equals `item`.
    pub fn contains_item(&self, item: &V) -> bool {
        let key = (self.key_of)(item);
        self.entries.contains_pair(&key, item)
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, K, V> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, K, V> {
        self.entries.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V, S> ChangeTracking for ChangeTrackingCache<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    type Change = KeyedChange<K, V>;

    fn is_dirty(&self) -> bool {
        self.entries.is_dirty()
    }

    fn is_change_collection_enabled(&self) -> bool {
        self.entries.is_change_collection_enabled()
    }

    fn set_change_collection_enabled(&mut self, enabled: bool) {
        self.entries.set_change_collection_enabled(enabled);
    }

    fn capture_changes(&mut self) -> KeyedChangeSet<K, V> {
        self.entries.capture_changes()
    }

    fn snapshot_changes(&self) -> KeyedChangeSet<K, V> {
        self.entries.snapshot_changes()
    }

    fn len(&self) -> usize {
        ChangeTrackingCache::len(self)
    }
}

impl<K, V, S> MapRead<K, V> for ChangeTrackingCache<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        ChangeTrackingCache::len(self)
    }

    fn contains_key(&self, key: &K) -> bool {
        ChangeTrackingCache::contains_key(self, key)
    }

    fn get(&self, key: &K) -> Option<&V> {
        ChangeTrackingCache::get(self, key)
    }

    fn keys<'a>(&'a self) -> impl Iterator<Item = &'a K>
    where
        K: 'a,
    {
        ChangeTrackingCache::keys(self)
    }

    fn values<'a>(&'a self) -> impl Iterator<Item = &'a V>
    where
        V: 'a,
    {
        ChangeTrackingCache::values(self)
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        ChangeTrackingCache::iter(self)
    }
}

impl<K, V, S> CacheWrite<K, V> for ChangeTrackingCache<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    fn try_insert(&mut self, item: V) -> Result<()> {
        ChangeTrackingCache::try_insert(self, item)
    }

    fn add_or_replace(&mut self, item: V) -> bool {
        ChangeTrackingCache::add_or_replace(self, item)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        ChangeTrackingCache::remove(self, key)
    }

    fn remove_item(&mut self, item: &V) -> bool {
        ChangeTrackingCache::remove_item(self, item)
    }

    fn add_or_replace_range<I: IntoIterator<Item = V>>(&mut self, items: I) -> bool {
        ChangeTrackingCache::add_or_replace_range(self, items)
    }

    fn remove_range<I: IntoIterator<Item = K>>(&mut self, keys: I) -> bool {
        ChangeTrackingCache::remove_range(self, keys)
    }

    fn clear(&mut self) {
        ChangeTrackingCache::clear(self)
    }

    fn reset<I: IntoIterator<Item = V>>(&mut self, items: I) -> bool {
        ChangeTrackingCache::reset(self, items)
    }
}

impl<K, V, S> fmt::Debug for ChangeTrackingCache<K, V, S>
where
    ChangeTrackingMap<K, V, S>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeTrackingCache")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}
