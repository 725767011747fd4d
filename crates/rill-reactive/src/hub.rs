//! Shared state behind a subject collection.
//!
//! A [`Hub`] owns the tracking collection, the suspension counter and the
//! subscriber registry. Subjects are thin shape-specific wrappers around an
//! `Rc<RefCell<Hub>>`; streams and suspension guards hold `Weak`
//! back-references so they never extend the subject's lifetime. Everything
//! is single-threaded: publication happens synchronously on the mutating
//! call, consumption is pull-based.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures_channel::mpsc;
use rill::{ChangeSet, ChangeTracking};

use crate::streams::{ChangeSets, Ticks};

pub(crate) struct Hub<Coll: ChangeTracking> {
    pub(crate) collection: Coll,
    suspend_count: usize,
    next_subscriber_id: u64,
    subscribers: Vec<ChangeSubscriber<Coll::Change>>,
    changed_ticks: Vec<mpsc::UnboundedSender<()>>,
    resumed_ticks: Vec<mpsc::UnboundedSender<()>>,
}

struct ChangeSubscriber<C> {
    id: u64,
    sender: mpsc::UnboundedSender<ChangeSet<C>>,
    /// Set while the subject is suspended at subscription time; the snapshot
    /// is delivered at resume so the subscriber sees one consistent view
    /// instead of a snapshot plus a stale pending batch.
    awaiting_snapshot: bool,
}

impl<Coll: ChangeTracking> Hub<Coll> {
    fn new(collection: Coll) -> Self {
        Hub {
            collection,
            suspend_count: 0,
            next_subscriber_id: 0,
            subscribers: Vec::new(),
            changed_ticks: Vec::new(),
            resumed_ticks: Vec::new(),
        }
    }

    /// Publishes the pending batch unless suspended or nothing changed.
    ///
    /// The `collection_changed` tick goes out strictly before the change set.
    pub(crate) fn publish_pending(&mut self) {
        if self.suspend_count != 0 || !self.collection.is_dirty() {
            return;
        }
        self.changed_ticks
            .retain(|tick| tick.unbounded_send(()).is_ok());
        let set = self.collection.capture_changes();
        let mut delivered = 0usize;
        self.subscribers.retain(|subscriber| {
            if subscriber.awaiting_snapshot {
                return true;
            }
            let alive = subscriber.sender.unbounded_send(set.clone()).is_ok();
            if alive {
                delivered += 1;
            }
            alive
        });
        tracing::trace!(
            kind = ?set.kind(),
            changes = set.len(),
            subscribers = delivered,
            "published change set"
        );
    }

    fn resume_one(&mut self) {
        if self.suspend_count == 0 {
            return;
        }
        self.suspend_count -= 1;
        if self.suspend_count != 0 {
            return;
        }
        self.publish_pending();
        if self.subscribers.iter().any(|s| s.awaiting_snapshot) {
            let snapshot = self.collection.snapshot_changes();
            self.subscribers.retain_mut(|subscriber| {
                if !subscriber.awaiting_snapshot {
                    return true;
                }
                subscriber.awaiting_snapshot = false;
                subscriber.sender.unbounded_send(snapshot.clone()).is_ok()
            });
        }
        self.resumed_ticks
            .retain(|tick| tick.unbounded_send(()).is_ok());
        tracing::trace!("notifications resumed");
    }

    /// Unregisters a change-set subscriber; change collection is switched
    /// off again when nobody is left observing.
    pub(crate) fn drop_subscriber(&mut self, id: u64) {
        self.subscribers.retain(|subscriber| subscriber.id != id);
        if self.subscribers.is_empty() {
            self.collection.set_change_collection_enabled(false);
        }
        tracing::debug!(id, remaining = self.subscribers.len(), "change subscriber detached");
    }
}

/// The subject-side handle to a hub. One per subject, not cloneable; streams
/// and guards only ever hold weak references.
pub(crate) struct Handle<Coll: ChangeTracking> {
    hub: Rc<RefCell<Hub<Coll>>>,
}

impl<Coll: ChangeTracking> Handle<Coll> {
    pub(crate) fn new(mut collection: Coll) -> Self {
        // No observers yet, so don't pay for change buffers.
        collection.set_change_collection_enabled(false);
        Handle {
            hub: Rc::new(RefCell::new(Hub::new(collection))),
        }
    }

    /// Runs a mutating operation and publishes whatever it left pending.
    pub(crate) fn mutate<R>(&self, op: impl FnOnce(&mut Coll) -> R) -> R {
        let mut hub = self.hub.borrow_mut();
        let result = op(&mut hub.collection);
        hub.publish_pending();
        result
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Coll) -> R) -> R {
        f(&self.hub.borrow().collection)
    }

    /// Attaches a change-set subscriber (snapshot-then-stream protocol).
    pub(crate) fn subscribe(&self) -> ChangeSets<Coll> {
        let mut hub = self.hub.borrow_mut();
        hub.collection.set_change_collection_enabled(true);
        let (sender, receiver) = mpsc::unbounded();
        let id = hub.next_subscriber_id;
        hub.next_subscriber_id += 1;
        let awaiting_snapshot = hub.suspend_count != 0;
        if !awaiting_snapshot {
            let _ = sender.unbounded_send(hub.collection.snapshot_changes());
        }
        hub.subscribers.push(ChangeSubscriber {
            id,
            sender,
            awaiting_snapshot,
        });
        tracing::debug!(id, deferred = awaiting_snapshot, "change subscriber attached");
        ChangeSets::new(receiver, id, Rc::downgrade(&self.hub))
    }

    pub(crate) fn collection_changed(&self) -> Ticks {
        let (sender, receiver) = mpsc::unbounded();
        self.hub.borrow_mut().changed_ticks.push(sender);
        Ticks::new(receiver)
    }

    pub(crate) fn notifications_resumed(&self) -> Ticks {
        let (sender, receiver) = mpsc::unbounded();
        self.hub.borrow_mut().resumed_ticks.push(sender);
        Ticks::new(receiver)
    }

    pub(crate) fn suspend_notifications(&self) -> SuspendGuard<Coll> {
        let mut hub = self.hub.borrow_mut();
        hub.suspend_count += 1;
        tracing::trace!(depth = hub.suspend_count, "notifications suspended");
        SuspendGuard {
            hub: Rc::downgrade(&self.hub),
        }
    }

    pub(crate) fn is_suspended(&self) -> bool {
        self.hub.borrow().suspend_count != 0
    }
}

/// Scoped suspension of a subject's notifications.
///
/// While at least one guard is alive every mutation is buffered instead of
/// published. Dropping the last guard flushes the buffered mutations as one
/// batch, delivers deferred snapshots and ticks the resume stream. A guard
/// that outlives its subject is a no-op.
pub struct SuspendGuard<Coll: ChangeTracking> {
    hub: Weak<RefCell<Hub<Coll>>>,
}

impl<Coll: ChangeTracking> Drop for SuspendGuard<Coll> {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            if let Ok(mut hub) = hub.try_borrow_mut() {
                hub.resume_one();
            }
        }
    }
}
