// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-phase cold start: a budgeted synchronous prefix, then a full
//! background classification pass.

use alloc::vec::Vec;

use photostory_source::SourceSnapshot;

use crate::classify::Classifier;
use crate::diff::Diff;
use crate::order::OrderPolicy;
use crate::state::ProjectionState;

/// Builds the initial projection of a source snapshot in two phases.
///
/// The first `sync_budget` source positions (the *countdown*) are handled
/// synchronously so the caller gets an immediately usable first screen
/// without waiting for an unbounded scan; the remainder is resolved by a
/// background pass the host drives whenever it likes (see
/// [`ProjectionBuilder::settle`]).
///
/// Within the countdown, items are included *provisionally*, without
/// classification; the settling pass re-examines them and reports the ones
/// that fail classification as removals. Showing content fast and correcting
/// it shortly after is the preserved behavior of the reference system. Two
/// edges collapse the phases:
///
/// - `sync_budget >= snapshot.len()`: everything is classified synchronously
///   and there is no background phase — no completion diff ever fires.
/// - `sync_budget == 0`: the initial projection is empty and the whole
///   classification is deferred to the settling pass.
///
/// # Example
///
/// ```rust
/// use photostory_projection::{FnClassifier, OrderPolicy, ProjectionBuilder};
///
/// let snapshot = [2_u32, 3, 4, 5, 6, 8];
/// let even_only = FnClassifier::new(|n: &u32| n % 2 == 0);
/// let builder = ProjectionBuilder::new(even_only, OrderPolicy::Natural, 3);
///
/// let cold = builder.cold_start(&snapshot[..]);
/// // The countdown is shown as-is, odd item included.
/// assert_eq!(cold.state.items(), &[2, 3, 4]);
///
/// let scan = cold.scan.expect("budget below snapshot length");
/// let settled = builder.settle(&snapshot[..], scan);
/// assert_eq!(settled.state.items(), &[2, 4, 6, 8]);
/// // One provisional item (3) failed classification.
/// assert_eq!(settled.diff.removed.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct ProjectionBuilder<C> {
    classifier: C,
    order: OrderPolicy,
    sync_budget: usize,
}

/// The synchronous half of a cold start.
#[derive(Clone, Debug)]
pub struct ColdStart<T> {
    /// The immediately available projection. Provisional if `scan` is
    /// `Some`, final otherwise.
    pub state: ProjectionState<T>,
    /// The pending background pass, when the budget did not cover the
    /// snapshot.
    pub scan: Option<RemainderScan>,
}

/// Token for a pending background classification pass.
///
/// Created by [`ProjectionBuilder::cold_start`] and consumed by
/// [`ProjectionBuilder::settle`], which must be handed the same snapshot the
/// cold start saw.
#[derive(Clone, Debug)]
pub struct RemainderScan {
    countdown: usize,
    source_len: usize,
}

/// The result of the background pass.
#[derive(Clone, Debug)]
pub struct Settled<T> {
    /// The fully classified projection.
    pub state: ProjectionState<T>,
    /// The completion diff.
    ///
    /// Reports only removals: the countdown positions that were provisionally
    /// included but failed classification. Indexes are expressed against the
    /// *expanded* projection — the full snapshot's projection with the
    /// countdown still provisionally included — so applying the diff to that
    /// list yields `state.items()`. Newly discovered items beyond the
    /// countdown are intentionally not reported as insertions.
    pub diff: Diff<T>,
}

impl<C> ProjectionBuilder<C> {
    /// Creates a builder with a fixed classifier, order policy, and
    /// countdown budget.
    #[must_use]
    pub const fn new(classifier: C, order: OrderPolicy, sync_budget: usize) -> Self {
        Self {
            classifier,
            order,
            sync_budget,
        }
    }

    /// The configured order policy.
    #[must_use]
    pub const fn order(&self) -> OrderPolicy {
        self.order
    }

    /// The configured countdown budget.
    #[must_use]
    pub const fn sync_budget(&self) -> usize {
        self.sync_budget
    }

    /// Runs the synchronous phase against `snapshot`.
    pub fn cold_start<T, S>(&self, snapshot: &S) -> ColdStart<T>
    where
        T: Clone,
        S: SourceSnapshot<T> + ?Sized,
        C: Classifier<T>,
    {
        let len = snapshot.len();
        if self.sync_budget >= len {
            return ColdStart {
                state: ProjectionState::derive(snapshot, &self.classifier, self.order),
                scan: None,
            };
        }

        let flags: Vec<bool> = (0..len).map(|position| position < self.sync_budget).collect();
        ColdStart {
            state: ProjectionState::from_flags(snapshot, &flags, self.order),
            scan: Some(RemainderScan {
                countdown: self.sync_budget,
                source_len: len,
            }),
        }
    }

    /// Runs the background phase against the same snapshot.
    pub fn settle<T, S>(&self, snapshot: &S, scan: RemainderScan) -> Settled<T>
    where
        T: Clone,
        S: SourceSnapshot<T> + ?Sized,
        C: Classifier<T>,
    {
        debug_assert_eq!(
            snapshot.len(),
            scan.source_len,
            "settle must be handed the snapshot the cold start saw"
        );

        let flags: Vec<bool> = snapshot
            .items()
            .map(|item| self.classifier.includes(item))
            .collect();
        let state = ProjectionState::from_flags(snapshot, &flags, self.order);

        // The expanded projection keeps the countdown provisionally included
        // alongside everything that passed classification; the completion
        // diff removes the provisional failures from it.
        let expanded: Vec<bool> = flags
            .iter()
            .enumerate()
            .map(|(position, &included)| included || position < scan.countdown)
            .collect();
        let expanded_map = crate::index_map::IndexMap::from_flags(&expanded, self.order);

        let mut removed: Vec<usize> = (0..scan.countdown)
            .filter(|&position| !flags[position])
            .filter_map(|position| expanded_map.position_of(position))
            .collect();
        removed.sort_unstable();

        let diff = Diff {
            removed,
            items_after_changes: state.len(),
            ..Diff::none(0)
        };
        Settled { state, diff }
    }
}
