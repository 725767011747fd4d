//! Batches of atomic changes.
//!
//! A [`ChangeSet`] is an immutable ordered batch of atomic changes plus a
//! [`ChangeSetKind`] classifier. Change sets are produced by the
//! [`ChangeSetBuilder`], which infers the classifier while changes are
//! recorded so no re-scan of the batch is ever needed.

mod builder;

pub use builder::ChangeSetBuilder;

use smallvec::SmallVec;

use crate::change::{DistinctChange, KeyedChange, SortedChange};

/// Inline capacity of a change buffer. Most batches hold a handful of
/// changes, so they live entirely on the stack.
pub(crate) const INLINE_CHANGES: usize = 4;

pub(crate) type ChangeBuffer<C> = SmallVec<[C; INLINE_CHANGES]>;

/// Classification of a change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSetKind {
    /// Arbitrary point mutations.
    Update,
    /// Every change is a removal and the source collection is now empty.
    Clear,
    /// A run of removals emptying the collection, followed by new contents.
    Reset,
}

/// An immutable ordered batch of atomic changes.
///
/// Applying the changes in order to the collection state captured before the
/// batch yields the state captured after it. For `Clear` and `Reset` batches
/// the stronger guarantees of [`ChangeSetKind`] hold as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet<C> {
    kind: ChangeSetKind,
    changes: ChangeBuffer<C>,
}

/// Change set over a distinct-element set.
pub type DistinctChangeSet<T> = ChangeSet<DistinctChange<T>>;
/// Change set over a keyed map or cache.
pub type KeyedChangeSet<K, V> = ChangeSet<KeyedChange<K, V>>;
/// Change set over an index-ordered list.
pub type SortedChangeSet<T> = ChangeSet<SortedChange<T>>;

impl<C> ChangeSet<C> {
    /// The distinguished empty change set. Allocation-free.
    pub fn empty() -> Self {
        ChangeSet {
            kind: ChangeSetKind::Update,
            changes: SmallVec::new(),
        }
    }

    pub(crate) fn from_parts(kind: ChangeSetKind, changes: ChangeBuffer<C>) -> Self {
        ChangeSet { kind, changes }
    }

    pub fn kind(&self) -> ChangeSetKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The changes in application order.
    pub fn changes(&self) -> &[C] {
        &self.changes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.changes.iter()
    }
}

impl<C> Default for ChangeSet<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C> IntoIterator for ChangeSet<C> {
    type Item = C;
    type IntoIter = smallvec::IntoIter<[C; INLINE_CHANGES]>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a, C> IntoIterator for &'a ChangeSet<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl<T> DistinctChangeSet<T> {
    /// Synthesises the full contents of a set as one addition per element,
    /// the batch a new subscriber receives as its snapshot.
    pub fn additions(items: impl IntoIterator<Item = T>) -> Self {
        let changes: ChangeBuffer<_> = items.into_iter().map(DistinctChange::Addition).collect();
        ChangeSet::from_parts(ChangeSetKind::Update, changes)
    }
}

impl<K, V> KeyedChangeSet<K, V> {
    /// Synthesises the full contents of a keyed collection as one addition
    /// per entry.
    pub fn additions(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let changes: ChangeBuffer<_> = entries
            .into_iter()
            .map(|(key, item)| KeyedChange::Addition { key, item })
            .collect();
        ChangeSet::from_parts(ChangeSetKind::Update, changes)
    }
}

impl<T> SortedChangeSet<T> {
    /// Synthesises a contiguous run of insertions starting at `start`, the
    /// batch a new list subscriber receives as its snapshot.
    pub fn range_insertion(start: usize, items: impl IntoIterator<Item = T>) -> Self {
        let changes: ChangeBuffer<_> = items
            .into_iter()
            .enumerate()
            .map(|(offset, item)| SortedChange::Insertion {
                index: start + offset,
                item,
            })
            .collect();
        ChangeSet::from_parts(ChangeSetKind::Update, changes)
    }
}
