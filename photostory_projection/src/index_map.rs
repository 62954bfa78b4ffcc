// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-source-position table mapping into projection coordinates.

use alloc::vec::Vec;

use photostory_source::SourceSnapshot;

use crate::classify::Classifier;
use crate::order::OrderPolicy;

/// Where one source position ended up in the projection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FinalPosition {
    /// The item was excluded by classification.
    Skipped,
    /// The item is shown at this projection index.
    Included(usize),
}

impl FinalPosition {
    /// Returns `true` if the position contributes to the projection.
    #[must_use]
    pub const fn is_included(self) -> bool {
        matches!(self, Self::Included(_))
    }

    /// Returns the projection index, if included.
    #[must_use]
    pub const fn final_index(self) -> Option<usize> {
        match self {
            Self::Skipped => None,
            Self::Included(index) => Some(index),
        }
    }
}

/// One [`FinalPosition`] per source position.
///
/// The map records, for every position of a known source snapshot, whether
/// that position was skipped or where it landed in the projection. Indexes
/// are already in the [`OrderPolicy`]'s coordinate space, so readers never
/// mirror anything themselves.
///
/// Invariant: the `Included` entries, read in source order (reverse source
/// order under [`OrderPolicy::Reversed`]), carry strictly increasing, dense
/// indexes `0..included_len()`.
///
/// A map is always derived wholesale from a classification pass over one
/// snapshot; it is never patched in place. Any renumbering of source
/// positions (a removal or insertion before a position) invalidates the map,
/// and the owner must rebuild it from the post-change snapshot.
///
/// # Example
///
/// ```rust
/// use photostory_projection::{FinalPosition, FnClassifier, IndexMap, OrderPolicy};
///
/// let snapshot = [3_u32, 4, 5, 6];
/// let even_only = FnClassifier::new(|n: &u32| n % 2 == 0);
/// let map = IndexMap::build(&snapshot[..], &even_only, OrderPolicy::Natural);
///
/// assert_eq!(map.get(0), FinalPosition::Skipped);
/// assert_eq!(map.get(1), FinalPosition::Included(0));
/// assert_eq!(map.get(3), FinalPosition::Included(1));
/// assert_eq!(map.included_len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexMap {
    slots: Vec<FinalPosition>,
    included: usize,
}

impl IndexMap {
    /// Runs a full classification pass over `snapshot` and builds the map.
    pub fn build<T, S, C>(snapshot: &S, classifier: &C, order: OrderPolicy) -> Self
    where
        S: SourceSnapshot<T> + ?Sized,
        C: Classifier<T>,
    {
        let flags: Vec<bool> = snapshot
            .items()
            .map(|item| classifier.includes(item))
            .collect();
        Self::from_flags(&flags, order)
    }

    /// Builds the map from precomputed inclusion flags, one per source
    /// position.
    pub(crate) fn from_flags(flags: &[bool], order: OrderPolicy) -> Self {
        let included = flags.iter().filter(|&&included| included).count();
        let mut rank = 0;
        let slots = flags
            .iter()
            .map(|&flag| {
                if flag {
                    let index = order.mirror(rank, included);
                    rank += 1;
                    FinalPosition::Included(index)
                } else {
                    FinalPosition::Skipped
                }
            })
            .collect();
        Self { slots, included }
    }

    /// Returns the number of source positions covered by the map.
    #[must_use]
    pub fn source_len(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of included positions, i.e. the projection length.
    #[must_use]
    pub fn included_len(&self) -> usize {
        self.included
    }

    /// Returns the entry for a source position.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.source_len()`.
    #[must_use]
    pub fn get(&self, position: usize) -> FinalPosition {
        self.slots[position]
    }

    /// Returns the projection index of a source position, or `None` if that
    /// position was skipped or lies outside the map.
    #[must_use]
    pub fn position_of(&self, position: usize) -> Option<usize> {
        self.slots.get(position).copied()?.final_index()
    }

    /// Enumerates the entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = FinalPosition> + '_ {
        self.slots.iter().copied()
    }
}
