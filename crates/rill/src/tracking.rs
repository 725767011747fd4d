//! Change-tracking collection engines.
//!
//! Each collection pairs a backing container with a
//! [`ChangeSetBuilder`](crate::change_set::ChangeSetBuilder) and two flags:
//!
//! - `dirty`: set by every state-changing operation, cleared by
//!   [`ChangeTracking::capture_changes`]; it reflects mutations even while
//!   change collection is disabled;
//! - `change_collection_enabled`: when `false` the builder is bypassed
//!   entirely, so a collection nobody observes pays nothing for tracking.
//!
//! Operations validate before mutating, so a failed operation leaves
//! storage, buffer and flags untouched.

mod cache;
mod list;
mod map;
mod set;

pub use cache::ChangeTrackingCache;
pub use list::ChangeTrackingList;
pub use map::ChangeTrackingMap;
pub use set::ChangeTrackingSet;

use crate::change::AtomicChange;
use crate::change_set::ChangeSet;

/// Common seam between the collection engines and the reactive layer.
pub trait ChangeTracking {
    /// The atomic change family this collection records.
    type Change: AtomicChange + Clone;

    /// Whether a state-changing operation has occurred since construction or
    /// the last capture.
    fn is_dirty(&self) -> bool;

    fn is_change_collection_enabled(&self) -> bool;

    /// Enables or disables change collection. Disabling discards any
    /// buffered changes, which would be inconsistent with a later
    /// resumption; re-enabling starts from an empty buffer.
    fn set_change_collection_enabled(&mut self, enabled: bool);

    /// Returns the accumulated change set and clears the dirty flag.
    ///
    /// While change collection is disabled this returns the empty change set
    /// regardless of the mutations performed in the disabled window.
    fn capture_changes(&mut self) -> ChangeSet<Self::Change>;

    /// Synthesises a change set describing the full current contents, the
    /// batch delivered to a freshly attached subscriber.
    fn snapshot_changes(&self) -> ChangeSet<Self::Change>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
