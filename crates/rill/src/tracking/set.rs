use std::collections::HashSet;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use indexmap::IndexSet;

use crate::change::DistinctChange;
use crate::change_set::{ChangeSetBuilder, DistinctChangeSet};
use crate::tracking::ChangeTracking;
use crate::traits::{SetRead, SetWrite};

/// A distinct-element set that records every mutation as a
/// [`DistinctChange`].
///
/// Backed by an [`IndexSet`], so iteration (and therefore the order of the
/// removals emitted by [`clear`](Self::clear)) follows insertion order
/// deterministically.
#[derive(Debug)]
pub struct ChangeTrackingSet<T, S = RandomState> {
    items: IndexSet<T, S>,
    builder: ChangeSetBuilder<DistinctChange<T>>,
    collect_changes: bool,
    dirty: bool,
}

impl<T> ChangeTrackingSet<T>
where
    T: Clone + Hash + Eq,
{
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<T, S> ChangeTrackingSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        ChangeTrackingSet {
            items: IndexSet::with_hasher(hasher),
            builder: ChangeSetBuilder::new(),
            collect_changes: true,
            dirty: false,
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        ChangeTrackingSet {
            items: IndexSet::with_capacity_and_hasher(capacity, hasher),
            builder: ChangeSetBuilder::new(),
            collect_changes: true,
            dirty: false,
        }
    }

    /// Inserts `item`, returning whether it was newly added.
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        if self.collect_changes {
            self.builder.add(DistinctChange::Addition(item.clone()));
        }
        self.items.insert(item);
        self.dirty = true;
        true
    }

    /// Removes `item`, returning whether it was present.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(taken) = self.items.shift_take(item) else {
            return false;
        };
        if self.collect_changes {
            self.builder.add(DistinctChange::Removal(taken));
        }
        self.dirty = true;
        true
    }

    /// Empties the set, recording one removal per element in iteration
    /// order.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        for item in self.items.drain(..) {
            if self.collect_changes {
                self.builder.add(DistinctChange::Removal(item));
            }
        }
        if self.collect_changes {
            self.builder.source_cleared();
        }
        self.dirty = true;
    }

    /// Inserts every element of `items` not already present.
    pub fn union_with<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut changed = false;
        for item in items {
            changed |= self.insert(item);
        }
        changed
    }

    /// Removes every element of `items` that is present.
    pub fn except_with<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut changed = false;
        for item in items {
            if let Some(taken) = self.items.shift_take(&item) {
                if self.collect_changes {
                    self.builder.add(DistinctChange::Removal(taken));
                }
                changed = true;
            }
        }
        if changed {
            self.dirty = true;
            if self.items.is_empty() && self.collect_changes {
                self.builder.source_cleared();
            }
        }
        changed
    }

    /// Retains only the elements also present in `items`.
    pub fn intersect_with<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let keep: HashSet<T> = items.into_iter().collect();
        let dropped: Vec<T> = self
            .items
            .iter()
            .filter(|item| !keep.contains(*item))
            .cloned()
            .collect();
        if dropped.is_empty() {
            return false;
        }
        for item in &dropped {
            if let Some(taken) = self.items.shift_take(item) {
                if self.collect_changes {
                    self.builder.add(DistinctChange::Removal(taken));
                }
            }
        }
        if self.items.is_empty() && self.collect_changes {
            self.builder.source_cleared();
        }
        self.dirty = true;
        true
    }

    /// Toggles membership of every element of `items`.
    pub fn symmetric_except_with<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut changed = false;
        for item in items {
            if let Some(taken) = self.items.shift_take(&item) {
                if self.collect_changes {
                    self.builder.add(DistinctChange::Removal(taken));
                }
            } else {
                if self.collect_changes {
                    self.builder.add(DistinctChange::Addition(item.clone()));
                }
                self.items.insert(item);
            }
            changed = true;
        }
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Replaces the whole contents with `items`. Classifies as `Clear` when
    /// `items` is empty, `Reset` when the set had prior contents, plain
    /// `Update` otherwise.
    pub fn reset<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let removed = !self.items.is_empty();
        self.clear();
        let added = self.union_with(items);
        removed || added
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn get(&self, item: &T) -> Option<&T> {
        self.items.get(item)
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }
}

impl<T, S> ChangeTracking for ChangeTrackingSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher,
{
    type Change = DistinctChange<T>;

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

    fn capture_changes(&mut self) -> DistinctChangeSet<T> {
        self.dirty = false;
        if self.collect_changes {
            self.builder.finish()
        } else {
            DistinctChangeSet::empty()
        }
    }

    fn snapshot_changes(&self) -> DistinctChangeSet<T> {
        DistinctChangeSet::additions(self.items.iter().cloned())
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T, S> SetRead<T> for ChangeTrackingSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        self.items.len()
    }

    fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.items.iter()
    }
}

impl<T, S> SetWrite<T> for ChangeTrackingSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher,
{
    fn insert(&mut self, item: T) -> bool {
        ChangeTrackingSet::insert(self, item)
    }

    fn remove(&mut self, item: &T) -> bool {
        ChangeTrackingSet::remove(self, item)
    }

    fn clear(&mut self) {
        ChangeTrackingSet::clear(self)
    }

    fn union_with<I: IntoIterator<Item = T>>(&mut self, items: I) -> bool {
        ChangeTrackingSet::union_with(self, items)
    }

    fn except_with<I: IntoIterator<Item = T>>(&mut self, items: I) -> bool {
        ChangeTrackingSet::except_with(self, items)
    }

    fn intersect_with<I: IntoIterator<Item = T>>(&mut self, items: I) -> bool {
        ChangeTrackingSet::intersect_with(self, items)
    }

    fn symmetric_except_with<I: IntoIterator<Item = T>>(&mut self, items: I) -> bool {
        ChangeTrackingSet::symmetric_except_with(self, items)
    }

    fn reset<I: IntoIterator<Item = T>>(&mut self, items: I) -> bool {
        ChangeTrackingSet::reset(self, items)
    }
}

impl<T> Default for ChangeTrackingSet<T>
where
    T: Clone + Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for ChangeTrackingSet<T>
where
    T: Clone + Hash + Eq,
{
    /// Builds a set seeded with `items`: not dirty, nothing recorded.
    fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
        ChangeTrackingSet {
            items: items.into_iter().collect(),
            builder: ChangeSetBuilder::new(),
            collect_changes: true,
            dirty: false,
        }
    }
}

impl<T, S> Extend<T> for ChangeTrackingSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.union_with(items);
    }
}
