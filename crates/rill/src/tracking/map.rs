use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;

use crate::change::KeyedChange;
use crate::change_set::{ChangeSetBuilder, KeyedChangeSet};
use crate::error::{Error, Result};
use crate::tracking::ChangeTracking;
use crate::traits::{MapRead, MapWrite};

/// A keyed collection addressed by explicit keys that records every mutation
/// as a [`KeyedChange`].
///
/// Value equality (`PartialEq`) gates replacements: writing a value equal to
/// the stored one records nothing and leaves the dirty flag untouched, which
/// keeps idempotent writes invisible to subscribers.
#[derive(Debug)]
pub struct ChangeTrackingMap<K, V, S = RandomState> {
    entries: IndexMap<K, V, S>,
    builder: ChangeSetBuilder<KeyedChange<K, V>>,
    collect_changes: bool,
    dirty: bool,
}

impl<K, V> ChangeTrackingMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> ChangeTrackingMap<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        ChangeTrackingMap {
            entries: IndexMap::with_hasher(hasher),
            builder: ChangeSetBuilder::new(),
            collect_changes: true,
            dirty: false,
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        ChangeTrackingMap {
            entries: IndexMap::with_capacity_and_hasher(capacity, hasher),
            builder: ChangeSetBuilder::new(),
            collect_changes: true,
            dirty: false,
        }
    }

    /// Inserts a new entry, failing with `DuplicateKey` when the key is
    /// already present. On failure nothing changes.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<()> {
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateKey);
        }
        if self.collect_changes {
            self.builder.add(KeyedChange::Addition {
                key: key.clone(),
                item: value.clone(),
            });
        }
        self.entries.insert(key, value);
        self.dirty = true;
        Ok(())
    }

    /// Inserts or replaces the entry for `key`.
    ///
    /// Replacing with an equal value is a no-op. Returns whether anything
    /// changed.
    pub fn add_or_replace(&mut self, key: K, value: V) -> bool {
        if let Some(existing) = self.entries.get_mut(&key) {
            if *existing == value {
                return false;
            }
            if self.collect_changes {
                self.builder.add(KeyedChange::Replacement {
                    key: key.clone(),
                    old_item: existing.clone(),
                    new_item: value.clone(),
                });
            }
            *existing = value;
            self.dirty = true;
            return true;
        }
        if self.collect_changes {
            self.builder.add(KeyedChange::Addition {
                key: key.clone(),
                item: value.clone(),
            });
        }
        self.entries.insert(key, value);
        self.dirty = true;
        true
    }

    /// Removes the entry for `key`, preserving the order of the remaining
    /// entries. Emptying the map refines the pending batch to `Clear`.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (taken_key, removed) = self.entries.shift_remove_entry(key)?;
        if self.collect_changes {
            self.builder.add(KeyedChange::Removal {
                key: taken_key,
                item: removed.clone(),
            });
            if self.entries.is_empty() {
                self.builder.source_cleared();
            }
        }
        self.dirty = true;
        Some(removed)
    }

    /// Removes the entry only when the stored value equals `value`.
    pub fn remove_pair(&mut self, key: &K, value: &V) -> bool {
        match self.entries.get(key) {
            Some(existing) if existing == value => self.remove(key).is_some(),
            _ => false,
        }
    }

    /// Inserts every entry, failing on the first duplicate key.
    ///
    /// Per-element best-effort: entries before the failing one stay
    /// inserted.
    pub fn add_range<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries.into_iter();
        let (low, _) = entries.size_hint();
        self.entries.reserve(low);
        if self.collect_changes {
            self.builder.reserve(low);
        }
        for (key, value) in entries {
            self.try_insert(key, value)?;
        }
        Ok(())
    }

    /// Applies [`add_or_replace`](Self::add_or_replace) per entry.
    pub fn add_or_replace_range<I>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries.into_iter();
        let (low, _) = entries.size_hint();
        self.entries.reserve(low);
        if self.collect_changes {
            self.builder.reserve(low);
        }
        let mut changed = false;
        for (key, value) in entries {
            changed |= self.add_or_replace(key, value);
        }
        changed
    }

    /// Removes every present key, silently ignoring absent ones.
    pub fn remove_range<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let mut changed = false;
        for key in keys {
            changed |= self.remove(&key).is_some();
        }
        changed
    }

    /// Empties the map, recording one removal per entry in iteration order.
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        for (key, item) in self.entries.drain(..) {
            if self.collect_changes {
                self.builder.add(KeyedChange::Removal { key, item });
            }
        }
        if self.collect_changes {
            self.builder.source_cleared();
        }
        self.dirty = true;
    }

    /// Replaces the whole contents with `entries`.
    pub fn reset<I>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let removed = !self.entries.is_empty();
        self.clear();
        let changed = self.add_or_replace_range(entries);
        removed || changed
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Like [`get`](Self::get) but failing with `KeyNotFound`.
    pub fn try_get(&self, key: &K) -> Result<&V> {
        self.entries.get(key).ok_or(Error::KeyNotFound)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether `key` maps to a value equal to `value`.
    pub fn contains_pair(&self, key: &K, value: &V) -> bool {
        self.entries.get(key) == Some(value)
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

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }
}

impl<K, V, S> ChangeTracking for ChangeTrackingMap<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    type Change = KeyedChange<K, V>;

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn is_change_collection_enabled(&self) -> bool {
        self.collect_changes
    }

    fn set_change_collection_enabled(&mut self, enabled: bool) {
        if self.collect_changes && !enabled {
            self.builder.clear();
        }
        self.collect_changes = enabled;
    }

    fn capture_changes(&mut self) -> KeyedChangeSet<K, V> {
        self.dirty = false;
        if self.collect_changes {
            self.builder.finish()
        } else {
            KeyedChangeSet::empty()
        }
    }

    fn snapshot_changes(&self) -> KeyedChangeSet<K, V> {
        KeyedChangeSet::additions(self.entries.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K, V, S> MapRead<K, V> for ChangeTrackingMap<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    fn keys<'a>(&'a self) -> impl Iterator<Item = &'a K>
    where
        K: 'a,
    {
        self.entries.keys()
    }

    fn values<'a>(&'a self) -> impl Iterator<Item = &'a V>
    where
        V: 'a,
    {
        self.entries.values()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.entries.iter()
    }
}

impl<K, V, S> MapWrite<K, V> for ChangeTrackingMap<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher,
{
    fn try_insert(&mut self, key: K, value: V) -> Result<()> {
        ChangeTrackingMap::try_insert(self, key, value)
    }

    fn add_or_replace(&mut self, key: K, value: V) -> bool {
        ChangeTrackingMap::add_or_replace(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        ChangeTrackingMap::remove(self, key)
    }

    fn remove_pair(&mut self, key: &K, value: &V) -> bool {
        ChangeTrackingMap::remove_pair(self, key, value)
    }

    fn add_range<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) -> Result<()> {
        ChangeTrackingMap::add_range(self, entries)
    }

    fn add_or_replace_range<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) -> bool {
        ChangeTrackingMap::add_or_replace_range(self, entries)
    }

    fn remove_range<I: IntoIterator<Item = K>>(&mut self, keys: I) -> bool {
        ChangeTrackingMap::remove_range(self, keys)
    }

    fn clear(&mut self) {
        ChangeTrackingMap::clear(self)
    }

    fn reset<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) -> bool {
        ChangeTrackingMap::reset(self, entries)
    }
}

impl<K, V> Default for ChangeTrackingMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for ChangeTrackingMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    /// Builds a map seeded with `entries`: not dirty, nothing recorded.
    /// Later entries win on duplicate keys.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        ChangeTrackingMap {
            entries: entries.into_iter().collect(),
            builder: ChangeSetBuilder::new(),
            collect_changes: true,
            dirty: false,
        }
    }
}
