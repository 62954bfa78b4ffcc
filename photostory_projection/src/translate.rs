// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation of external change notifications into projection-space diffs.

use alloc::vec::Vec;
use core::fmt;

use photostory_source::{ChangeDetails, InvalidChange, SourceSnapshot};

use crate::classify::Classifier;
use crate::diff::Diff;
use crate::order::OrderPolicy;
use crate::state::ProjectionState;

/// Error returned when a change notification cannot be translated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TranslateError {
    /// The notification itself is structurally inconsistent.
    Change(InvalidChange),
    /// The tracked projection state was not derived from the notification's
    /// before-snapshot.
    StaleState {
        /// Source length the tracked state covers.
        tracked: usize,
        /// Length of the notification's before-snapshot.
        before: usize,
    },
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Change(inner) => write!(f, "invalid change notification: {inner}"),
            Self::StaleState { tracked, before } => write!(
                f,
                "tracked state covers {tracked} source positions, notification expects {before}"
            ),
        }
    }
}

impl core::error::Error for TranslateError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Change(inner) => Some(inner),
            Self::StaleState { .. } => None,
        }
    }
}

impl From<InvalidChange> for TranslateError {
    fn from(inner: InvalidChange) -> Self {
        Self::Change(inner)
    }
}

/// The outcome of translating one notification.
#[derive(Clone, Debug, PartialEq)]
pub struct Translation<T> {
    /// The projection-space diff to deliver to observers.
    pub diff: Diff<T>,
    /// The post-change projection state, derived fresh from the
    /// after-snapshot.
    pub state: ProjectionState<T>,
}

/// Translates external change notifications into projection-space [`Diff`]s.
///
/// The translator never patches the index map incrementally: source positions
/// are absolute, so any structural change renumbers everything behind it. It
/// instead resolves removals against the tracked (pre-change) state, then
/// re-derives the map wholesale from the after-snapshot and resolves
/// insertions, updates, and move targets against that.
///
/// All reported indexes are in the [`OrderPolicy`]'s coordinate space, using
/// the pre-change projection for pre-change-space indexes and the post-change
/// projection for post-change-space ones.
///
/// # Example
///
/// ```rust
/// use photostory_projection::{ChangeTranslator, FnClassifier, OrderPolicy, ProjectionState};
/// use photostory_source::ChangeDetails;
///
/// let even_only = FnClassifier::new(|n: &u32| n % 2 == 0);
/// let translator = ChangeTranslator::new(even_only, OrderPolicy::Natural);
///
/// let before = [2_u32, 3, 4];
/// let after = [8_u32, 2, 3, 4];
/// let state = ProjectionState::derive(&before[..], translator.classifier(), OrderPolicy::Natural);
///
/// let change = ChangeDetails {
///     inserted: &[0],
///     inserted_items: &[8],
///     ..ChangeDetails::empty(&before[..], &after[..])
/// };
/// let translation = translator.translate(&state, &change).unwrap();
/// assert_eq!(translation.diff.inserted, vec![(0, 8)]);
/// assert_eq!(translation.state.items(), &[8, 2, 4]);
/// ```
#[derive(Clone, Debug)]
pub struct ChangeTranslator<C> {
    classifier: C,
    order: OrderPolicy,
}

impl<C> ChangeTranslator<C> {
    /// Creates a translator with a fixed classifier and order policy.
    #[must_use]
    pub const fn new(classifier: C, order: OrderPolicy) -> Self {
        Self { classifier, order }
    }

    /// The classifier driving inclusion decisions.
    #[must_use]
    pub const fn classifier(&self) -> &C {
        &self.classifier
    }

    /// The configured order policy.
    #[must_use]
    pub const fn order(&self) -> OrderPolicy {
        self.order
    }

    /// Translates one notification against the tracked pre-change state.
    ///
    /// Returns the diff plus the post-change state to track from here on.
    /// The notification is validated first; a malformed one yields a
    /// [`TranslateError`] and leaves no trace — a wrong diff is never
    /// produced.
    ///
    /// The caller must hand in the state derived from the notification's
    /// before-snapshot. The staleness guard compares source lengths only;
    /// a before-snapshot with the same length but different content is
    /// undetectable without an item identity, so honoring that contract is
    /// on the caller (the engine tracks source and state together, which
    /// guarantees it).
    pub fn translate<T, S>(
        &self,
        state: &ProjectionState<T>,
        change: &ChangeDetails<'_, T, S>,
    ) -> Result<Translation<T>, TranslateError>
    where
        T: Clone,
        S: SourceSnapshot<T> + ?Sized,
        C: Classifier<T>,
    {
        change.validate()?;
        let tracked = state.index_map().source_len();
        if tracked != change.before.len() {
            return Err(TranslateError::StaleState {
                tracked,
                before: change.before.len(),
            });
        }

        let after_state = ProjectionState::derive(change.after, &self.classifier, self.order);

        let mut removed = Vec::new();
        let mut inserted = Vec::new();
        let mut updated = Vec::new();
        let mut moved = Vec::new();

        for &position in change.removed {
            if let Some(index) = state.index_map().position_of(position) {
                removed.push(index);
            }
        }

        for (&position, item) in change.inserted.iter().zip(change.inserted_items) {
            if let Some(index) = after_state.index_map().position_of(position) {
                inserted.push((index, item.clone()));
            }
        }

        for (&position, item) in change.changed.iter().zip(change.changed_items) {
            let was_shown = state.index_map().position_of(position);
            let includable = self.classifier.includes(item);
            match (was_shown, includable) {
                // Content update in place; the index does not change.
                (Some(index), true) => updated.push((index, item.clone())),
                // Reclassified out: an implicit removal, never dropped.
                (Some(index), false) => removed.push(index),
                // Reclassified in: surfaces at its post-change index.
                (None, true) => {
                    if let Some(landing) = change
                        .after_position(position)
                        .and_then(|p| after_state.index_map().position_of(p))
                    {
                        inserted.push((landing, item.clone()));
                    }
                }
                (None, false) => {}
            }
        }

        for &(from, to) in change.moved {
            let shown_before = state.index_map().position_of(from);
            let shown_after = after_state.index_map().position_of(to);
            if let (Some(from_index), Some(to_index)) = (shown_before, shown_after) {
                moved.push((from_index, to_index));
            }
        }

        removed.sort_unstable();
        inserted.sort_by_key(|&(index, _)| index);
        updated.sort_by_key(|&(index, _)| index);
        moved.sort_unstable();

        let diff = Diff {
            removed,
            inserted,
            updated,
            moved,
            items_after_changes: after_state.len(),
        };
        Ok(Translation {
            diff,
            state: after_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    use crate::classify::FnClassifier;

    type Even = FnClassifier<fn(&u32) -> bool>;

    fn even(n: &u32) -> bool {
        n % 2 == 0
    }

    fn translator(order: OrderPolicy) -> ChangeTranslator<Even> {
        ChangeTranslator::new(FnClassifier::new(even as fn(&u32) -> bool), order)
    }

    fn state(snapshot: &[u32], order: OrderPolicy) -> ProjectionState<u32> {
        ProjectionState::derive(snapshot, &FnClassifier::new(even as fn(&u32) -> bool), order)
    }

    #[test]
    fn removal_reports_pre_change_index() {
        let before = [2_u32, 3, 4, 6];
        let after = [2_u32, 3, 6];
        let tr = translator(OrderPolicy::Natural);
        let change = ChangeDetails {
            removed: &[2],
            ..ChangeDetails::empty(&before[..], &after[..])
        };

        let out = tr.translate(&state(&before, OrderPolicy::Natural), &change).unwrap();
        assert_eq!(out.diff.removed, vec![1]);
        assert_eq!(out.diff.items_after_changes, 2);
        assert_eq!(out.state.items(), &[2, 6]);
    }

    #[test]
    fn removing_a_skipped_position_is_silent() {
        let before = [2_u32, 3, 4];
        let after = [2_u32, 4];
        let tr = translator(OrderPolicy::Natural);
        let change = ChangeDetails {
            removed: &[1],
            ..ChangeDetails::empty(&before[..], &after[..])
        };

        let out = tr.translate(&state(&before, OrderPolicy::Natural), &change).unwrap();
        assert!(out.diff.is_empty());
        assert_eq!(out.diff.items_after_changes, 2);
    }

    #[test]
    fn insertions_are_classified_and_sorted() {
        let before = [2_u32, 4];
        let after = [6_u32, 7, 2, 8, 4];
        let tr = translator(OrderPolicy::Natural);
        let change = ChangeDetails {
            inserted: &[0, 1, 3],
            inserted_items: &[6, 7, 8],
            ..ChangeDetails::empty(&before[..], &after[..])
        };

        let out = tr.translate(&state(&before, OrderPolicy::Natural), &change).unwrap();
        // 7 is odd and never surfaces; 6 and 8 land at their after indexes.
        assert_eq!(out.diff.inserted, vec![(0, 6), (2, 8)]);
        assert_eq!(out.state.items(), &[6, 2, 8, 4]);
    }

    #[test]
    fn update_keeps_index_when_still_included() {
        let before = [2_u32, 3, 4];
        let after = [2_u32, 3, 6];
        let tr = translator(OrderPolicy::Natural);
        let change = ChangeDetails {
            changed: &[2],
            changed_items: &[6],
            ..ChangeDetails::empty(&before[..], &after[..])
        };

        let out = tr.translate(&state(&before, OrderPolicy::Natural), &change).unwrap();
        assert_eq!(out.diff.updated, vec![(1, 6)]);
        assert!(out.diff.removed.is_empty());
    }

    #[test]
    fn update_that_reclassifies_out_becomes_a_removal() {
        let before = [2_u32, 4];
        let after = [2_u32, 5];
        let tr = translator(OrderPolicy::Natural);
        let change = ChangeDetails {
            changed: &[1],
            changed_items: &[5],
            ..ChangeDetails::empty(&before[..], &after[..])
        };

        let out = tr.translate(&state(&before, OrderPolicy::Natural), &change).unwrap();
        assert_eq!(out.diff.removed, vec![1]);
        assert!(out.diff.updated.is_empty());
        assert_eq!(out.state.items(), &[2]);
    }

    #[test]
    fn update_that_reclassifies_in_becomes_an_insertion() {
        let before = [2_u32, 5];
        let after = [2_u32, 6];
        let tr = translator(OrderPolicy::Natural);
        let change = ChangeDetails {
            changed: &[1],
            changed_items: &[6],
            ..ChangeDetails::empty(&before[..], &after[..])
        };

        let out = tr.translate(&state(&before, OrderPolicy::Natural), &change).unwrap();
        assert_eq!(out.diff.inserted, vec![(1, 6)]);
        assert_eq!(out.state.items(), &[2, 6]);
    }

    #[test]
    fn moves_need_inclusion_on_both_sides() {
        let before = [2_u32, 3, 4];
        let after = [4_u32, 2, 3];
        let tr = translator(OrderPolicy::Natural);
        let change = ChangeDetails {
            moved: &[(2, 0), (1, 2)],
            ..ChangeDetails::empty(&before[..], &after[..])
        };

        let out = tr.translate(&state(&before, OrderPolicy::Natural), &change).unwrap();
        // 4 moves from projection index 1 to 0; 3 is skipped on both sides.
        assert_eq!(out.diff.moved, vec![(1, 0)]);
        assert_eq!(out.state.items(), &[4, 2]);
    }

    #[test]
    fn reversed_indexes_are_mirrored_per_coordinate_space() {
        let before = [2_u32, 4];
        let after = [6_u32, 8, 2, 4];
        let tr = translator(OrderPolicy::Reversed);
        let change = ChangeDetails {
            inserted: &[0, 1],
            inserted_items: &[6, 8],
            ..ChangeDetails::empty(&before[..], &after[..])
        };

        let out = tr.translate(&state(&before, OrderPolicy::Reversed), &change).unwrap();
        // Head insertions land at the tail of the reversed projection, in
        // reverse relative order.
        assert_eq!(out.diff.inserted, vec![(2, 8), (3, 6)]);
        assert_eq!(out.state.items(), &[4, 2, 8, 6]);
    }

    #[test]
    fn stale_state_is_rejected() {
        let before = [2_u32, 3];
        let after = [2_u32, 3];
        let tr = translator(OrderPolicy::Natural);
        let tracked = state(&[2_u32], OrderPolicy::Natural);
        let change = ChangeDetails::empty(&before[..], &after[..]);

        assert_eq!(
            tr.translate(&tracked, &change),
            Err(TranslateError::StaleState {
                tracked: 1,
                before: 2,
            })
        );
    }

    #[test]
    fn staleness_guard_compares_lengths_only() {
        // Same length, different content: undetectable without an item
        // identity. The documented contract puts this on the caller.
        let claimed_before = [6_u32, 8];
        let after = [8_u32];
        let tr = translator(OrderPolicy::Natural);
        let tracked = state(&[2_u32, 4], OrderPolicy::Natural);
        let change = ChangeDetails {
            removed: &[0],
            ..ChangeDetails::empty(&claimed_before[..], &after[..])
        };

        let out = tr.translate(&tracked, &change).unwrap();
        // Indexes resolve against the tracked state, as documented.
        assert_eq!(out.diff.removed, vec![0]);
        assert_eq!(out.state.items(), &[8]);
    }

    #[test]
    fn malformed_notifications_never_produce_a_diff() {
        let before = [2_u32, 3];
        let after = [2_u32, 3];
        let tr = translator(OrderPolicy::Natural);
        let change = ChangeDetails {
            removed: &[7],
            ..ChangeDetails::empty(&before[..], &after[..])
        };

        let result = tr.translate(&state(&before, OrderPolicy::Natural), &change);
        assert!(matches!(result, Err(TranslateError::Change(_))));
    }
}
