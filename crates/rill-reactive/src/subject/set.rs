use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use rill::ChangeTrackingSet;

use crate::hub::{Handle, SuspendGuard};
use crate::streams::{ChangeSets, Ticks};
use crate::traits::ObservableCollection;

/// A distinct-element set that publishes its mutations as a stream of
/// change sets.
pub struct SubjectSet<T, S = RandomState>
where
    T: Clone + Hash + Eq,
    S: BuildHasher,
{
    handle: Handle<ChangeTrackingSet<T, S>>,
}

impl<T> SubjectSet<T>
where
    T: Clone + Hash + Eq,
{
    pub fn new() -> Self {
        SubjectSet {
            handle: Handle::new(ChangeTrackingSet::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        SubjectSet {
            handle: Handle::new(ChangeTrackingSet::with_capacity(capacity)),
        }
    }
}

impl<T, S> SubjectSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        SubjectSet {
            handle: Handle::new(ChangeTrackingSet::with_hasher(hasher)),
        }
    }

    /// Inserts `item`, publishing when it was newly added.
    pub fn insert(&mut self, item: T) -> bool {
        self.handle.mutate(|set| set.insert(item))
    }

    /// Removes `item`, publishing when it was present.
    pub fn remove(&mut self, item: &T) -> bool {
        self.handle.mutate(|set| set.remove(item))
    }

    pub fn clear(&mut self) {
        self.handle.mutate(|set| set.clear());
    }

    pub fn union_with<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        self.handle.mutate(|set| set.union_with(items))
    }

    pub fn except_with<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        self.handle.mutate(|set| set.except_with(items))
    }

    pub fn intersect_with<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        self.handle.mutate(|set| set.intersect_with(items))
    }

    pub fn symmetric_except_with<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        self.handle.mutate(|set| set.symmetric_except_with(items))
    }

    /// Replaces the whole contents with `items` as one published batch.
    pub fn reset<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        self.handle.mutate(|set| set.reset(items))
    }

    pub fn contains(&self, item: &T) -> bool {
        self.handle.read(|set| set.contains(item))
    }

    pub fn len(&self) -> usize {
        self.handle.read(|set| set.len())
    }

    pub fn is_empty(&self) -> bool {
        self.handle.read(|set| set.is_empty())
    }

    /// Snapshot of the contents in iteration order.
    pub fn to_vec(&self) -> Vec<T> {
        self.handle.read(|set| set.iter().cloned().collect())
    }

    /// Attaches a change-set subscriber (snapshot first, then the live
    /// stream).
    pub fn subscribe(&self) -> ChangeSets<ChangeTrackingSet<T, S>> {
        self.handle.subscribe()
    }

    pub fn collection_changed(&self) -> Ticks {
        self.handle.collection_changed()
    }

    pub fn notifications_resumed(&self) -> Ticks {
        self.handle.notifications_resumed()
    }

    pub fn suspend_notifications(&self) -> SuspendGuard<ChangeTrackingSet<T, S>> {
        self.handle.suspend_notifications()
    }

    pub fn is_suspended(&self) -> bool {
        self.handle.is_suspended()
    }
}

impl<T, S> ObservableCollection for SubjectSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher,
{
    type Tracking = ChangeTrackingSet<T, S>;

    fn len(&self) -> usize {
        SubjectSet::len(self)
    }

    fn subscribe(&self) -> ChangeSets<Self::Tracking> {
        SubjectSet::subscribe(self)
    }

    fn collection_changed(&self) -> Ticks {
        SubjectSet::collection_changed(self)
    }

    fn notifications_resumed(&self) -> Ticks {
        SubjectSet::notifications_resumed(self)
    }

    fn suspend_notifications(&self) -> SuspendGuard<Self::Tracking> {
        SubjectSet::suspend_notifications(self)
    }

    fn is_suspended(&self) -> bool {
        SubjectSet::is_suspended(self)
    }
}

impl<T> Default for SubjectSet<T>
where
    T: Clone + Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> fmt::Debug for SubjectSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubjectSet")
            .field("len", &self.len())
            .field("suspended", &self.is_suspended())
            .finish()
    }
}
