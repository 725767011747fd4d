//! The stream types produced by subject collections.
//!
//! All of them are plain pull-based [`Stream`]s fed by unbounded channels;
//! the publishing side lives in [`hub`](crate::hub). `ChangeSets` carries a
//! weak hub reference so dropping it unsubscribes eagerly (and turns change
//! collection off when it was the last subscriber) rather than waiting for
//! the next failed send.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::pin::Pin;
use std::rc::Weak;
use std::task::{Context, Poll};

use futures_channel::mpsc;
use futures_core::Stream;
use pin_project::{pin_project, pinned_drop};

use rill::traits::ListRead;
use rill::{ChangeSet, ChangeSetKind, ChangeTracking, KeyedChange, SortedChange, SortedChangeSet};

use crate::hub::Hub;

/// Stream of change sets published by a subject.
///
/// The first element is a snapshot of the contents at subscription time (an
/// addition per element, the empty change set for an empty collection);
/// every later element is one published batch, in publication order. When
/// the subscription happens under suspension the snapshot is deferred until
/// notifications resume.
#[pin_project(PinnedDrop)]
pub struct ChangeSets<Coll: ChangeTracking> {
    #[pin]
    receiver: mpsc::UnboundedReceiver<ChangeSet<Coll::Change>>,
    id: u64,
    hub: Weak<RefCell<Hub<Coll>>>,
}

impl<Coll: ChangeTracking> ChangeSets<Coll> {
    pub(crate) fn new(
        receiver: mpsc::UnboundedReceiver<ChangeSet<Coll::Change>>,
        id: u64,
        hub: Weak<RefCell<Hub<Coll>>>,
    ) -> Self {
        ChangeSets { receiver, id, hub }
    }

    /// Reads the live collection, if the subject is still alive.
    pub(crate) fn with_collection<R>(&self, f: impl FnOnce(&Coll) -> R) -> Option<R> {
        let hub = self.hub.upgrade()?;
        let hub = hub.borrow();
        Some(f(&hub.collection))
    }
}

impl<Coll: ChangeTracking> Stream for ChangeSets<Coll> {
    type Item = ChangeSet<Coll::Change>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().receiver.poll_next(cx)
    }
}

#[pinned_drop]
impl<Coll: ChangeTracking> PinnedDrop for ChangeSets<Coll> {
    fn drop(self: Pin<&mut Self>) {
        let this = self.project();
        if let Some(hub) = this.hub.upgrade() {
            if let Ok(mut hub) = hub.try_borrow_mut() {
                hub.drop_subscriber(*this.id);
            }
        }
    }
}

/// Valueless notification stream: one tick per event.
#[pin_project]
pub struct Ticks {
    #[pin]
    receiver: mpsc::UnboundedReceiver<()>,
}

impl Ticks {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<()>) -> Self {
        Ticks { receiver }
    }
}

impl Stream for Ticks {
    type Item = ();

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<()>> {
        self.project().receiver.poll_next(cx)
    }
}

enum ObserveState {
    /// Waiting for the snapshot batch (deferred while suspended).
    AwaitingSnapshot,
    Live,
    Done,
}

/// Stream of the values stored under one key of a keyed subject.
///
/// Emits the current value on attach, then a value per replacement.
/// Completes when the key is removed, the collection is cleared, a reset
/// drops the key, or the subject goes away. Completion is terminal: a later
/// re-addition of the key does not revive the stream.
#[pin_project]
pub struct ObservedEntry<K, V, Coll>
where
    Coll: ChangeTracking<Change = KeyedChange<K, V>>,
{
    #[pin]
    changes: ChangeSets<Coll>,
    key: K,
    state: ObserveState,
    pending: VecDeque<V>,
}

impl<K, V, Coll> ObservedEntry<K, V, Coll>
where
    Coll: ChangeTracking<Change = KeyedChange<K, V>>,
{
    pub(crate) fn new(changes: ChangeSets<Coll>, key: K) -> Self {
        ObservedEntry {
            changes,
            key,
            state: ObserveState::AwaitingSnapshot,
            pending: VecDeque::new(),
        }
    }
}

impl<K, V, Coll> Stream for ObservedEntry<K, V, Coll>
where
    Coll: ChangeTracking<Change = KeyedChange<K, V>>,
    K: PartialEq,
    V: Clone,
{
    type Item = V;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<V>> {
        let mut this = self.project();
        loop {
            if let Some(value) = this.pending.pop_front() {
                return Poll::Ready(Some(value));
            }
            if matches!(this.state, ObserveState::Done) {
                return Poll::Ready(None);
            }
            match this.changes.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(None) => {
                    *this.state = ObserveState::Done;
                    return Poll::Ready(None);
                }
                Poll::Ready(Some(set)) => {
                    absorb_keyed(this.state, this.pending, this.key, &set);
                }
            }
        }
    }
}

fn absorb_keyed<K, V>(
    state: &mut ObserveState,
    pending: &mut VecDeque<V>,
    key: &K,
    set: &ChangeSet<KeyedChange<K, V>>,
) where
    K: PartialEq,
    V: Clone,
{
    match state {
        ObserveState::Done => {}
        ObserveState::AwaitingSnapshot => {
            // The first batch is the snapshot: an addition per entry.
            let mut found = None;
            for change in set {
                if let KeyedChange::Addition { key: k, item } = change {
                    if k == key {
                        found = Some(item.clone());
                    }
                }
            }
            match found {
                Some(value) => {
                    pending.push_back(value);
                    *state = ObserveState::Live;
                }
                None => *state = ObserveState::Done,
            }
        }
        ObserveState::Live => match set.kind() {
            ChangeSetKind::Clear => *state = ObserveState::Done,
            ChangeSetKind::Reset => {
                // Final presence of the key across the whole batch decides.
                let mut present = None;
                for change in set {
                    match change {
                        KeyedChange::Removal { key: k, .. } if k == key => present = None,
                        KeyedChange::Addition { key: k, item } if k == key => {
                            present = Some(item.clone());
                        }
                        KeyedChange::Replacement { key: k, new_item, .. } if k == key => {
                            present = Some(new_item.clone());
                        }
                        _ => {}
                    }
                }
                match present {
                    Some(value) => pending.push_back(value),
                    None => *state = ObserveState::Done,
                }
            }
            ChangeSetKind::Update => {
                for change in set {
                    match change {
                        KeyedChange::Removal { key: k, .. } if k == key => {
                            *state = ObserveState::Done;
                            break;
                        }
                        KeyedChange::Replacement { key: k, new_item, .. } if k == key => {
                            pending.push_back(new_item.clone());
                        }
                        _ => {}
                    }
                }
            }
        },
    }
}

/// Stream of the values stored at one index of a list subject.
///
/// Emits the current element on attach, then the element at the observed
/// index whenever a published batch leaves a different value there.
/// Completes when the index falls out of bounds, the list is cleared, or the
/// subject goes away. Completion is terminal.
#[pin_project]
pub struct ObservedElement<T, Coll>
where
    Coll: ChangeTracking<Change = SortedChange<T>>,
{
    #[pin]
    changes: ChangeSets<Coll>,
    index: usize,
    last: Option<T>,
    state: ObserveState,
    pending: VecDeque<T>,
}

impl<T, Coll> ObservedElement<T, Coll>
where
    Coll: ChangeTracking<Change = SortedChange<T>>,
{
    pub(crate) fn new(changes: ChangeSets<Coll>, index: usize) -> Self {
        ObservedElement {
            changes,
            index,
            last: None,
            state: ObserveState::AwaitingSnapshot,
            pending: VecDeque::new(),
        }
    }
}

impl<T, Coll> Stream for ObservedElement<T, Coll>
where
    Coll: ChangeTracking<Change = SortedChange<T>> + ListRead<T>,
    T: Clone + PartialEq,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let mut this = self.project();
        loop {
            if let Some(value) = this.pending.pop_front() {
                return Poll::Ready(Some(value));
            }
            if matches!(this.state, ObserveState::Done) {
                return Poll::Ready(None);
            }
            match this.changes.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(None) => {
                    *this.state = ObserveState::Done;
                    return Poll::Ready(None);
                }
                Poll::Ready(Some(set)) => {
                    let reader = this.changes.as_ref();
                    absorb_indexed(
                        this.state,
                        this.pending,
                        this.last,
                        *this.index,
                        reader.get_ref(),
                        &set,
                    );
                }
            }
        }
    }
}

fn absorb_indexed<T, Coll>(
    state: &mut ObserveState,
    pending: &mut VecDeque<T>,
    last: &mut Option<T>,
    index: usize,
    changes: &ChangeSets<Coll>,
    set: &SortedChangeSet<T>,
) where
    Coll: ChangeTracking<Change = SortedChange<T>> + ListRead<T>,
    T: Clone + PartialEq,
{
    match state {
        ObserveState::Done => {}
        ObserveState::AwaitingSnapshot => {
            // The snapshot is a contiguous run of insertions from index 0.
            let mut found = None;
            for change in set {
                if let SortedChange::Insertion { index: i, item } = change {
                    if *i == index {
                        found = Some(item.clone());
                    }
                }
            }
            match found {
                Some(value) => {
                    *last = Some(value.clone());
                    pending.push_back(value);
                    *state = ObserveState::Live;
                }
                None => *state = ObserveState::Done,
            }
        }
        ObserveState::Live => match set.kind() {
            ChangeSetKind::Clear => *state = ObserveState::Done,
            ChangeSetKind::Reset => {
                match changes.with_collection(|list| list.get(index).cloned()) {
                    Some(Some(value)) => {
                        *last = Some(value.clone());
                        pending.push_back(value);
                    }
                    // Out of bounds after the reset, or subject gone.
                    Some(None) | None => *state = ObserveState::Done,
                }
            }
            ChangeSetKind::Update => {
                match changes.with_collection(|list| list.get(index).cloned()) {
                    Some(Some(value)) => {
                        if last.as_ref() != Some(&value) {
                            *last = Some(value.clone());
                            pending.push_back(value);
                        }
                    }
                    Some(None) | None => *state = ObserveState::Done,
                }
            }
        },
    }
}
