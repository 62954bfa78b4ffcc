// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The attachment engine: one worker thread, one delivery queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use arc_swap::ArcSwap;
use crossbeam_channel::{Receiver, Sender, unbounded};
use photostory_projection::{
    ChangeTranslator, Classifier, Diff, OrderPolicy, ProjectionBuilder, ProjectionState,
    RemainderScan,
};
use photostory_source::ChangeDetails;

use crate::observer::{ObserverSet, Subscription, Update};

/// Countdown applied when the host does not pick one: roughly a first
/// screen's worth of thumbnails.
pub const DEFAULT_SYNC_BUDGET: usize = 100;

/// Configuration fixed for the lifetime of an attachment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// How source order translates into projection order.
    pub order: OrderPolicy,
    /// Number of leading source positions included synchronously at attach
    /// time (the countdown).
    pub sync_budget: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            order: OrderPolicy::Natural,
            sync_budget: DEFAULT_SYNC_BUDGET,
        }
    }
}

/// An owned external change notification, as handed to
/// [`Engine::apply_change`].
///
/// The before-snapshot is implicit: the engine tracks the source collection
/// it last saw, so the host only supplies the post-change snapshot and the
/// index sets. Index conventions follow
/// [`ChangeDetails`](photostory_source::ChangeDetails).
#[derive(Clone, Debug)]
pub struct SourceChange<T> {
    /// The collection after the mutation.
    pub after: Vec<T>,
    /// Removed before-snapshot positions.
    pub removed: Vec<usize>,
    /// Inserted after-snapshot positions.
    pub inserted: Vec<usize>,
    /// The inserted objects, one per entry of `inserted`.
    pub inserted_items: Vec<T>,
    /// Before-snapshot positions changed in place.
    pub changed: Vec<usize>,
    /// The changed objects, one per entry of `changed`.
    pub changed_items: Vec<T>,
    /// `(from, to)` move pairs.
    pub moved: Vec<(usize, usize)>,
}

impl<T> SourceChange<T> {
    /// A notification with the given after-snapshot and no changes; fill in
    /// the relevant sets with struct-update syntax or field assignment.
    #[must_use]
    pub const fn new(after: Vec<T>) -> Self {
        Self {
            after,
            removed: Vec::new(),
            inserted: Vec::new(),
            inserted_items: Vec::new(),
            changed: Vec::new(),
            changed_items: Vec::new(),
            moved: Vec::new(),
        }
    }
}

/// Error for operations on an engine whose worker is gone.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    /// The engine was detached; no further work is accepted.
    #[error("engine is detached")]
    Detached,
}

enum Command<T> {
    Settle(RemainderScan),
    Change(SourceChange<T>),
    Activate(u64),
    Shutdown,
}

/// One attachment to an external media collection.
///
/// Created by [`Engine::attach`], which performs the budgeted synchronous
/// cold start on the calling thread and queues the background classification
/// pass. A single worker thread owns the tracked source snapshot and
/// projection state and doubles as the delivery queue: commands — the
/// background settle, external change notifications, observer activations —
/// are processed strictly in arrival order, and observer callbacks run
/// inline on it, never concurrently with each other or with projection
/// mutation.
///
/// Ordering guarantees, in the terms of the host-facing callbacks:
///
/// 1. The initial projection is returned before any diff is delivered.
/// 2. The background-completion diff, if any, precedes every diff derived
///    from a later change notification.
/// 3. Change diffs are delivered in notification order.
///
/// Dropping the engine detaches it: the worker stops, and a still-pending
/// completion diff is never delivered.
///
/// # Example
///
/// ```rust
/// use photostory_engine::{Engine, EngineOptions, SourceChange};
/// use photostory_projection::{FnClassifier, OrderPolicy};
/// use std::sync::mpsc;
///
/// let even_only = FnClassifier::new(|n: &u32| n % 2 == 0);
/// let options = EngineOptions { order: OrderPolicy::Natural, sync_budget: 10 };
/// let (diff_tx, diff_rx) = mpsc::channel();
///
/// let (engine, shown) = Engine::attach(even_only, options, vec![2, 3, 4], move |diff| {
///     diff_tx.send(diff).unwrap();
/// });
/// // Budget covers the snapshot: fully classified, no completion diff.
/// assert_eq!(shown, [2, 4]);
///
/// engine
///     .apply_change(SourceChange {
///         removed: vec![0],
///         ..SourceChange::new(vec![3, 4])
///     })
///     .unwrap();
/// let diff = diff_rx.recv().unwrap();
/// assert_eq!(diff.removed, [0]);
/// ```
#[derive(Debug)]
pub struct Engine<T> {
    tx: Sender<Command<T>>,
    observers: Arc<ObserverSet<T>>,
    published: Arc<ArcSwap<ProjectionState<T>>>,
    detached: Arc<AtomicBool>,
    options: EngineOptions,
    worker: Option<JoinHandle<()>>,
}

impl<T> Engine<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Attaches to `snapshot`, returning the engine and the immediately
    /// available projection.
    ///
    /// `on_change` is the host's diff callback: it receives the
    /// background-completion diff (when the budget does not cover the
    /// snapshot) and one diff per applied change notification, in order, on
    /// the worker thread. Additional observers can join later via
    /// [`Engine::observe`].
    pub fn attach<C, F>(
        classifier: C,
        options: EngineOptions,
        snapshot: Vec<T>,
        on_change: F,
    ) -> (Self, Vec<T>)
    where
        C: Classifier<T> + Send + 'static,
        F: FnMut(Diff<T>) + Send + 'static,
    {
        let builder = ProjectionBuilder::new(&classifier, options.order, options.sync_budget);
        let cold = builder.cold_start(&snapshot);
        let initial = cold.state.items().to_vec();

        let observers = Arc::new(ObserverSet::new());
        let mut on_change = on_change;
        let _ = observers.register(
            Box::new(move |update| {
                if let Update::Changed(diff) = update {
                    on_change(diff);
                }
            }),
            true,
        );

        let published = Arc::new(ArcSwap::from_pointee(cold.state.clone()));
        let detached = Arc::new(AtomicBool::new(false));
        let (tx, rx) = unbounded();

        if let Some(scan) = cold.scan {
            // Queued before anything else the host can send, so the settle
            // always precedes the first change notification.
            let _ = tx.send(Command::Settle(scan));
        }

        let worker = Worker {
            rx,
            classifier,
            options,
            source: snapshot,
            state: cold.state,
            observers: Arc::clone(&observers),
            published: Arc::clone(&published),
            detached: Arc::clone(&detached),
        };
        let handle = thread::spawn(move || worker.run());

        let engine = Self {
            tx,
            observers,
            published,
            detached,
            options,
            worker: Some(handle),
        };
        (engine, initial)
    }

    /// Registers a late observer.
    ///
    /// The handler receives [`Update::Initial`] with the projection as of
    /// its position in the command queue, then every subsequent
    /// [`Update::Changed`] exactly once, in generation order. Dropping the
    /// returned [`Subscription`] suppresses further delivery.
    pub fn observe<F>(&self, handler: F) -> Result<Subscription, EngineError>
    where
        F: FnMut(Update<T>) + Send + 'static,
    {
        let (id, cancelled) = self.observers.register(Box::new(handler), false);
        self.tx
            .send(Command::Activate(id))
            .map_err(|_| EngineError::Detached)?;
        Ok(Subscription::new(cancelled))
    }

    /// Enqueues an external change notification.
    ///
    /// The worker validates and translates it against the tracked state; the
    /// resulting diff reaches the attach callback and all observers. A
    /// structurally inconsistent notification is a programmer error: it is
    /// logged and debug-asserted, and no diff is delivered for it.
    pub fn apply_change(&self, change: SourceChange<T>) -> Result<(), EngineError> {
        self.tx
            .send(Command::Change(change))
            .map_err(|_| EngineError::Detached)
    }

    /// The most recently published projection state.
    ///
    /// Always one coherent, atomically swapped version; never a partially
    /// rebuilt one.
    #[must_use]
    pub fn current(&self) -> Arc<ProjectionState<T>> {
        self.published.load_full()
    }

    /// The options this attachment was created with.
    #[must_use]
    pub fn options(&self) -> EngineOptions {
        self.options
    }
}

impl<T> Drop for Engine<T> {
    fn drop(&mut self) {
        self.detached.store(true, Ordering::Release);
        let _ = self.tx.send(Command::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

struct Worker<T, C> {
    rx: Receiver<Command<T>>,
    classifier: C,
    options: EngineOptions,
    source: Vec<T>,
    state: ProjectionState<T>,
    observers: Arc<ObserverSet<T>>,
    published: Arc<ArcSwap<ProjectionState<T>>>,
    detached: Arc<AtomicBool>,
}

impl<T, C> Worker<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: Classifier<T>,
{
    fn run(mut self) {
        while let Ok(command) = self.rx.recv() {
            if self.detached.load(Ordering::Acquire) {
                break;
            }
            match command {
                Command::Settle(scan) => self.settle(scan),
                Command::Change(change) => self.apply(change),
                Command::Activate(id) => {
                    self.observers.activate(id, self.published.load_full());
                }
                Command::Shutdown => break,
            }
        }
        log::trace!("engine worker stopped");
    }

    fn settle(&mut self, scan: RemainderScan) {
        let builder = ProjectionBuilder::new(
            &self.classifier,
            self.options.order,
            self.options.sync_budget,
        );
        let settled = builder.settle(&self.source, scan);
        log::debug!(
            "background scan settled: {} of {} items shown, {} provisional removals",
            settled.state.len(),
            self.source.len(),
            settled.diff.removed.len(),
        );
        self.state = settled.state;
        self.publish_and_deliver(settled.diff);
    }

    fn apply(&mut self, change: SourceChange<T>) {
        let translator = ChangeTranslator::new(&self.classifier, self.options.order);
        let translated = {
            let details = ChangeDetails {
                before: self.source.as_slice(),
                after: change.after.as_slice(),
                removed: &change.removed,
                inserted: &change.inserted,
                inserted_items: &change.inserted_items,
                changed: &change.changed,
                changed_items: &change.changed_items,
                moved: &change.moved,
            };
            translator.translate(&self.state, &details)
        };
        match translated {
            Ok(translation) => {
                self.state = translation.state;
                self.source = change.after;
                self.publish_and_deliver(translation.diff);
            }
            Err(error) => {
                log::error!("rejecting change notification: {error}");
                debug_assert!(false, "invalid change notification: {error}");
            }
        }
    }

    fn publish_and_deliver(&self, diff: Diff<T>) {
        self.published.store(Arc::new(self.state.clone()));
        if self.detached.load(Ordering::Acquire) {
            return;
        }
        log::trace!(
            "delivering diff: -{} +{} ~{} moved {}",
            diff.removed.len(),
            diff.inserted.len(),
            diff.updated.len(),
            diff.moved.len(),
        );
        self.observers.deliver(&diff);
    }
}
