//! Observable facade over the subject shapes.

use rill::ChangeTracking;

use crate::hub::SuspendGuard;
use crate::streams::{ChangeSets, Ticks};

/// The reactive capability set every subject exposes, independent of shape.
pub trait ObservableCollection {
    /// The tracking collection behind the subject.
    type Tracking: ChangeTracking;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attaches a change-set subscriber; the first element is a snapshot of
    /// the current contents.
    fn subscribe(&self) -> ChangeSets<Self::Tracking>;

    /// Valueless tick per published notification batch.
    fn collection_changed(&self) -> Ticks;

    /// Valueless tick when a suspension window ends.
    fn notifications_resumed(&self) -> Ticks;

    /// Defers publication until the returned guard (and any others) drop.
    fn suspend_notifications(&self) -> SuspendGuard<Self::Tracking>;

    fn is_suspended(&self) -> bool;
}
