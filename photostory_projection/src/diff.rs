// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal projection-space change descriptions.

use alloc::vec::Vec;

/// A minimal description of how the projection changed between two observed
/// states.
///
/// All indexes are projection-space. Pre-change-space indexes (`removed`,
/// the positions of `updated`, move sources) refer to the projection as the
/// observer last saw it; post-change-space indexes (the positions of
/// `inserted`, move targets) refer to the projection after this diff is
/// applied. Each diff is self-consistent and independently applicable: the
/// observer never needs to correlate it with other diffs.
///
/// [`Diff::apply_to`] materializes the diff against a copy of the previous
/// item list using collection-view batch semantics: content updates first,
/// then removals (including move sources) from highest index down, then
/// insertions (including move targets) from lowest index up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diff<T> {
    /// Pre-change indexes that disappeared, in ascending order.
    pub removed: Vec<usize>,
    /// New items with their post-change indexes, in ascending index order.
    pub inserted: Vec<(usize, T)>,
    /// In-place content updates at pre-change indexes.
    pub updated: Vec<(usize, T)>,
    /// `(from, to)` projection index pairs, `from` pre-change, `to`
    /// post-change.
    pub moved: Vec<(usize, usize)>,
    /// The projection length after this diff is applied.
    pub items_after_changes: usize,
}

impl<T> Diff<T> {
    /// A diff describing no changes to a projection of `len` items.
    #[must_use]
    pub const fn none(len: usize) -> Self {
        Self {
            removed: Vec::new(),
            inserted: Vec::new(),
            updated: Vec::new(),
            moved: Vec::new(),
            items_after_changes: len,
        }
    }

    /// Returns `true` if the diff carries no removals, insertions, updates,
    /// or moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
            && self.inserted.is_empty()
            && self.updated.is_empty()
            && self.moved.is_empty()
    }

    /// Applies the diff to a materialized copy of the previous projection.
    ///
    /// After this call `items` equals the post-change projection. Intended
    /// for hosts that mirror the projection into their own list (and for
    /// tests of the round-trip property).
    ///
    /// # Panics
    ///
    /// Panics if the diff does not belong to a projection shaped like
    /// `items` (indexes out of range).
    pub fn apply_to(&self, items: &mut Vec<T>)
    where
        T: Clone,
    {
        for (index, item) in &self.updated {
            items[*index] = item.clone();
        }

        let mut landings: Vec<(usize, T)> = self
            .moved
            .iter()
            .map(|&(from, to)| (to, items[from].clone()))
            .collect();
        landings.extend(self.inserted.iter().cloned());

        let mut vacated: Vec<usize> = self.removed.clone();
        vacated.extend(self.moved.iter().map(|&(from, _)| from));
        vacated.sort_unstable();
        for &index in vacated.iter().rev() {
            items.remove(index);
        }

        landings.sort_by_key(|&(index, _)| index);
        for (index, item) in landings {
            items.insert(index, item);
        }

        debug_assert_eq!(
            items.len(),
            self.items_after_changes,
            "diff applied to a projection of the wrong shape"
        );
    }
}
