// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer registration and delivery bookkeeping.

use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use photostory_projection::{Diff, ProjectionState};

/// One delivery to an observer.
#[derive(Debug)]
pub enum Update<T> {
    /// The current projection, delivered exactly once per subscription.
    Initial(Arc<ProjectionState<T>>),
    /// One subsequent change, in generation order.
    Changed(Diff<T>),
}

/// Handle for a registered observer.
///
/// Dropping the subscription (or calling [`Subscription::cancel`])
/// suppresses every delivery that has not already started; the handler is
/// never invoked again afterwards.
#[derive(Debug)]
pub struct Subscription {
    cancelled: Arc<AtomicBool>,
}

impl Subscription {
    pub(crate) fn new(cancelled: Arc<AtomicBool>) -> Self {
        Self { cancelled }
    }

    /// Cancels the subscription explicitly.
    pub fn cancel(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

type Handler<T> = Box<dyn FnMut(Update<T>) + Send>;

struct Slot<T> {
    id: u64,
    /// Inactive until the worker has delivered the initial snapshot, so a
    /// diff can never outrun it.
    active: bool,
    cancelled: Arc<AtomicBool>,
    handler: Handler<T>,
}

/// The set of registered observers.
///
/// Registration happens on caller threads; activation and delivery happen
/// only on the engine's worker thread, which is the single serialized
/// delivery queue. Handlers are invoked with the slot list taken out of the
/// lock, so a handler may register further observers without deadlocking.
pub(crate) struct ObserverSet<T> {
    slots: Mutex<Vec<Slot<T>>>,
    next_id: AtomicU64,
}

impl<T> ObserverSet<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Adds a handler and returns its id plus the shared cancellation flag.
    ///
    /// An `active` slot takes part in diff delivery immediately and never
    /// receives an initial snapshot; an inactive one waits for
    /// [`ObserverSet::activate`].
    pub(crate) fn register(
        &self,
        handler: Handler<T>,
        active: bool,
    ) -> (u64, Arc<AtomicBool>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancelled = Arc::new(AtomicBool::new(false));
        self.slots.lock().push(Slot {
            id,
            active,
            cancelled: Arc::clone(&cancelled),
            handler,
        });
        (id, cancelled)
    }

    /// Activates a slot and hands it the initial snapshot. Worker only.
    pub(crate) fn activate(&self, id: u64, state: Arc<ProjectionState<T>>) {
        self.with_taken(|slots| {
            if let Some(slot) = slots.iter_mut().find(|slot| slot.id == id) {
                slot.active = true;
                if !slot.cancelled.load(Ordering::Acquire) {
                    (slot.handler)(Update::Initial(state));
                }
            }
        });
    }

    /// Delivers one diff to every active, uncancelled observer. Worker only.
    pub(crate) fn deliver(&self, diff: &Diff<T>)
    where
        T: Clone,
    {
        self.with_taken(|slots| {
            slots.retain(|slot| !slot.cancelled.load(Ordering::Acquire));
            for slot in slots.iter_mut().filter(|slot| slot.active) {
                (slot.handler)(Update::Changed(diff.clone()));
            }
        });
    }

    /// Runs `f` on the slot list outside the lock, then merges back any
    /// registrations that arrived while `f` ran.
    fn with_taken(&self, f: impl FnOnce(&mut Vec<Slot<T>>)) {
        let mut taken = mem::take(&mut *self.slots.lock());
        f(&mut taken);
        let mut guard = self.slots.lock();
        taken.extend(guard.drain(..));
        *guard = taken;
    }
}

impl<T> std::fmt::Debug for ObserverSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.slots.lock().len())
            .finish()
    }
}
