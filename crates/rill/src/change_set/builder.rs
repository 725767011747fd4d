use std::mem;

use crate::change::AtomicChange;
use crate::change_set::{ChangeBuffer, ChangeSet, ChangeSetKind};

/// Accumulates atomic changes and classifies the batch as it grows.
///
/// The classification never re-scans the buffer:
///
/// - recording any change on a fresh builder yields `Update`;
/// - [`source_cleared`](Self::source_cleared) promotes an all-removal batch
///   to `Clear`;
/// - an addition recorded after a `Clear` (or `Reset`) state demotes the
///   batch to `Reset`, the "empty everything, then refill" shape.
///
/// The builder does not validate that the sequence is semantically coherent
/// (it will happily record a removal of something never added); that is the
/// recording collection's job.
#[derive(Debug, Clone)]
pub struct ChangeSetBuilder<C> {
    changes: ChangeBuffer<C>,
    kind: Option<ChangeSetKind>,
    has_non_removals: bool,
}

impl<C: AtomicChange> ChangeSetBuilder<C> {
    pub fn new() -> Self {
        ChangeSetBuilder {
            changes: ChangeBuffer::new(),
            kind: None,
            has_non_removals: false,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ChangeSetBuilder {
            changes: ChangeBuffer::with_capacity(capacity),
            kind: None,
            has_non_removals: false,
        }
    }

    /// Appends a change and updates the classification state.
    pub fn add(&mut self, change: C) {
        if !change.is_removal() {
            self.has_non_removals = true;
        }
        self.kind = Some(match self.kind {
            Some(ChangeSetKind::Clear) | Some(ChangeSetKind::Reset) if change.is_addition() => {
                ChangeSetKind::Reset
            }
            _ => ChangeSetKind::Update,
        });
        self.changes.push(change);
    }

    /// Signals that the last recorded mutation emptied the source collection.
    ///
    /// Refines an all-removal batch to `Clear`; a batch that already contains
    /// non-removals keeps its current classification.
    pub fn source_cleared(&mut self) {
        if !self.has_non_removals {
            self.kind = Some(ChangeSetKind::Clear);
        }
    }

    /// Emits the accumulated batch and resets the builder.
    ///
    /// Ownership of the internal buffer is transferred into the change set,
    /// so no changes are copied. When nothing was recorded the distinguished
    /// empty change set is returned without allocating.
    pub fn finish(&mut self) -> ChangeSet<C> {
        let Some(kind) = self.kind.take() else {
            return ChangeSet::empty();
        };
        self.has_non_removals = false;
        ChangeSet::from_parts(kind, mem::take(&mut self.changes))
    }

    /// Drops all buffered changes and classification state.
    pub fn clear(&mut self) {
        self.changes.clear();
        self.kind = None;
        self.has_non_removals = false;
    }

    /// Capacity hint for an operation about to record `additional` more
    /// changes. Hints never affect the emitted batch.
    pub fn reserve(&mut self, additional: usize) {
        self.changes.reserve(additional);
    }

    pub fn capacity(&self) -> usize {
        self.changes.capacity()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<C: AtomicChange> Default for ChangeSetBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
