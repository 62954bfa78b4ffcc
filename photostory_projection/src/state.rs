// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Versioned projection snapshots.

use alloc::vec::Vec;

use photostory_source::SourceSnapshot;

use crate::classify::Classifier;
use crate::index_map::IndexMap;
use crate::order::OrderPolicy;

/// One immutable version of the projection: the filtered, policy-ordered
/// item list plus the [`IndexMap`] it was derived from.
///
/// Every rebuild produces a fresh `ProjectionState`; readers always see one
/// coherent version and never a partially updated one. The items and the map
/// always describe the same classification pass over the same snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectionState<T> {
    items: Vec<T>,
    map: IndexMap,
}

impl<T: Clone> ProjectionState<T> {
    /// Derives the projection of `snapshot` from scratch.
    ///
    /// This is the authoritative rebuild used on cold start (when the budget
    /// covers the whole snapshot), at background-scan completion, and after
    /// every external change notification.
    pub fn derive<S, C>(snapshot: &S, classifier: &C, order: OrderPolicy) -> Self
    where
        S: SourceSnapshot<T> + ?Sized,
        C: Classifier<T>,
    {
        let flags: Vec<bool> = snapshot
            .items()
            .map(|item| classifier.includes(item))
            .collect();
        Self::from_flags(snapshot, &flags, order)
    }

    /// Builds a state from precomputed inclusion flags over `snapshot`.
    pub(crate) fn from_flags<S>(snapshot: &S, flags: &[bool], order: OrderPolicy) -> Self
    where
        S: SourceSnapshot<T> + ?Sized,
    {
        debug_assert_eq!(flags.len(), snapshot.len(), "one flag per source position");
        let map = IndexMap::from_flags(flags, order);

        let mut items = Vec::with_capacity(map.included_len());
        let positions = 0..flags.len();
        if order.is_reversed() {
            for position in positions.rev() {
                if flags[position] {
                    items.push(snapshot.item(position).clone());
                }
            }
        } else {
            for position in positions {
                if flags[position] {
                    items.push(snapshot.item(position).clone());
                }
            }
        }
        Self { items, map }
    }
}

impl<T> ProjectionState<T> {
    /// An empty projection over an empty source.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            map: IndexMap::from_flags(&[], OrderPolicy::Natural),
        }
    }

    /// The projected items, in policy order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The index map this projection was derived with.
    #[must_use]
    pub fn index_map(&self) -> &IndexMap {
        &self.map
    }

    /// Number of projected items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is projected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
