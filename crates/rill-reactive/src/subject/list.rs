use std::fmt;

use rill::{ChangeTrackingList, Result};

use crate::hub::{Handle, SuspendGuard};
use crate::streams::{ChangeSets, ObservedElement, Ticks};
use crate::traits::ObservableCollection;

/// An index-ordered list that publishes its mutations as a stream of change
/// sets and supports per-index value observation.
pub struct SubjectList<T>
where
    T: Clone + PartialEq,
{
    handle: Handle<ChangeTrackingList<T>>,
}

impl<T> SubjectList<T>
where
    T: Clone + PartialEq,
{
    pub fn new() -> Self {
        SubjectList {
            handle: Handle::new(ChangeTrackingList::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        SubjectList {
            handle: Handle::new(ChangeTrackingList::with_capacity(capacity)),
        }
    }

    /// Appends `item` at the end.
    pub fn push(&mut self, item: T) {
        self.handle.mutate(|list| list.push(item));
    }

    /// Inserts `item` at `index` (`index == len` appends). On failure
    /// nothing is published.
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        self.handle.mutate(|list| list.insert(index, item))
    }

    /// Appends every element of `items` as one published batch.
    pub fn push_range<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.handle.mutate(|list| list.push_range(items));
    }

    pub fn insert_range<I>(&mut self, index: usize, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.handle.mutate(|list| list.insert_range(index, items))
    }

    /// Removes and returns the element at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        self.handle.mutate(|list| list.remove_at(index))
    }

    /// Removes the first element equal to `item`, if any.
    pub fn remove(&mut self, item: &T) -> bool {
        self.handle.mutate(|list| list.remove(item))
    }

    /// Removes `count` elements starting at `start` as one published batch
    /// (removals in descending index order).
    pub fn remove_range(&mut self, start: usize, count: usize) -> Result<()> {
        self.handle.mutate(|list| list.remove_range(start, count))
    }

    /// Replaces the element at `index` (`index == len` appends); an equal
    /// value is a no-op and publishes nothing.
    pub fn set(&mut self, index: usize, item: T) -> Result<()> {
        self.handle.mutate(|list| list.set(index, item))
    }

    /// Moves the element at `from` to `to`, publishing a single movement.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.handle.mutate(|list| list.move_item(from, to))
    }

    pub fn clear(&mut self) {
        self.handle.mutate(|list| list.clear());
    }

    /// Replaces the whole contents with `items` as one published batch.
    pub fn reset<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        self.handle.mutate(|list| list.reset(items))
    }

    /// Snapshot of the element at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.handle.read(|list| list.get(index).cloned())
    }

    pub fn len(&self) -> usize {
        self.handle.read(|list| list.len())
    }

    pub fn is_empty(&self) -> bool {
        self.handle.read(|list| list.is_empty())
    }

    /// Snapshot of the whole contents.
    pub fn to_vec(&self) -> Vec<T> {
        self.handle.read(|list| list.as_slice().to_vec())
    }

    pub fn subscribe(&self) -> ChangeSets<ChangeTrackingList<T>> {
        self.handle.subscribe()
    }

    /// Stream of the values stored at `index`; see
    /// [`ObservedElement`](crate::ObservedElement) for the lifecycle.
    pub fn observe_value(&self, index: usize) -> ObservedElement<T, ChangeTrackingList<T>> {
        ObservedElement::new(self.handle.subscribe(), index)
    }

    pub fn collection_changed(&self) -> Ticks {
        self.handle.collection_changed()
    }

    pub fn notifications_resumed(&self) -> Ticks {
        self.handle.notifications_resumed()
    }

    pub fn suspend_notifications(&self) -> SuspendGuard<ChangeTrackingList<T>> {
        self.handle.suspend_notifications()
    }

    pub fn is_suspended(&self) -> bool {
        self.handle.is_suspended()
    }
}

impl<T> ObservableCollection for SubjectList<T>
where
    T: Clone + PartialEq,
{
    type Tracking = ChangeTrackingList<T>;

    fn len(&self) -> usize {
        SubjectList::len(self)
    }

    fn subscribe(&self) -> ChangeSets<Self::Tracking> {
        SubjectList::subscribe(self)
    }

    fn collection_changed(&self) -> Ticks {
        SubjectList::collection_changed(self)
    }

    fn notifications_resumed(&self) -> Ticks {
        SubjectList::notifications_resumed(self)
    }

    fn suspend_notifications(&self) -> SuspendGuard<Self::Tracking> {
        SubjectList::suspend_notifications(self)
    }

    fn is_suspended(&self) -> bool {
        SubjectList::is_suspended(self)
    }
}

impl<T> Default for SubjectList<T>
where
    T: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SubjectList<T>
where
    T: Clone + PartialEq,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubjectList")
            .field("len", &self.len())
            .field("suspended", &self.is_suspended())
            .finish()
    }
}
