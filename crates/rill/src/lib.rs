//! Change-tracking in-memory collections for reactive data-flow pipelines.
//!
//! Every mutation of a [`ChangeTrackingSet`], [`ChangeTrackingMap`],
//! [`ChangeTrackingCache`] or [`ChangeTrackingList`] is recorded as an atomic
//! change. Calling [`ChangeTracking::capture_changes`] drains the recorded
//! changes as a single [`ChangeSet`] tagged `Update`, `Clear` or `Reset`, which
//! downstream layers (see the `rill-reactive` crate) publish to subscribers.
//!
//! The crate is deliberately single-threaded: collections are plain mutable
//! values and all bookkeeping happens on the caller's stack.

pub mod change;
pub mod change_set;
pub mod error;
pub mod tracking;
pub mod traits;

pub use change::{AtomicChange, DistinctChange, KeyedChange, SortedChange};
pub use change_set::{
    ChangeSet, ChangeSetBuilder, ChangeSetKind, DistinctChangeSet, KeyedChangeSet, SortedChangeSet,
};
pub use error::{Error, Result};
pub use tracking::{
    ChangeTracking, ChangeTrackingCache, ChangeTrackingList, ChangeTrackingMap, ChangeTrackingSet,
};
