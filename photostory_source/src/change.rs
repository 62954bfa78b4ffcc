// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! External change notifications and their structural validation.

use core::fmt;

use hashbrown::HashSet;

use crate::snapshot::SourceSnapshot;

/// Which part of a [`ChangeDetails`] value a defect was found in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChangeField {
    /// The `removed` index set (before-snapshot positions).
    Removed,
    /// The `inserted` index set (after-snapshot positions).
    Inserted,
    /// The `changed` index set (before-snapshot positions).
    Changed,
    /// The source position of a move pair.
    MovedFrom,
    /// The destination position of a move pair.
    MovedTo,
}

impl fmt::Display for ChangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Removed => "removed",
            Self::Inserted => "inserted",
            Self::Changed => "changed",
            Self::MovedFrom => "move source",
            Self::MovedTo => "move destination",
        };
        f.write_str(name)
    }
}

/// Error returned when a change notification is structurally inconsistent.
///
/// A malformed notification is a broken collaborator contract, not an
/// ordinary "no changes" outcome: the engine must surface it explicitly
/// rather than compute a plausible-looking but wrong diff from it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InvalidChange {
    /// An index refers to a position outside the relevant snapshot.
    IndexOutOfRange {
        /// The index set containing the offending index.
        field: ChangeField,
        /// The offending index.
        index: usize,
        /// The length of the snapshot the index was checked against.
        len: usize,
    },
    /// The same index appears twice in one index set.
    DuplicateIndex {
        /// The index set containing the duplicate.
        field: ChangeField,
        /// The duplicated index.
        index: usize,
    },
    /// An index set and its accompanying object list disagree in length.
    ObjectCountMismatch {
        /// The index set the objects accompany.
        field: ChangeField,
        /// Number of indexes in the set.
        indexes: usize,
        /// Number of accompanying objects.
        objects: usize,
    },
    /// A position is claimed both removed and changed/moved.
    ConflictingSets {
        /// The set conflicting with `removed`.
        field: ChangeField,
        /// The position present in both sets.
        index: usize,
    },
    /// The snapshot lengths do not agree with the removal/insertion counts.
    LengthMismatch {
        /// `before.len() - removed.len() + inserted.len()`.
        expected_after: usize,
        /// The actual after-snapshot length.
        actual_after: usize,
    },
}

impl fmt::Display for InvalidChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { field, index, len } => {
                write!(f, "{field} index {index} out of range for snapshot of {len}")
            }
            Self::DuplicateIndex { field, index } => {
                write!(f, "{field} index {index} listed more than once")
            }
            Self::ObjectCountMismatch {
                field,
                indexes,
                objects,
            } => {
                write!(f, "{field} lists {indexes} indexes but {objects} objects")
            }
            Self::ConflictingSets { field, index } => {
                write!(f, "position {index} is both removed and {field}")
            }
            Self::LengthMismatch {
                expected_after,
                actual_after,
            } => {
                write!(
                    f,
                    "after snapshot has {actual_after} items, removal/insertion counts imply {expected_after}"
                )
            }
        }
    }
}

impl core::error::Error for InvalidChange {}

/// One external mutation notification.
///
/// Describes how `before` became `after`: which before-positions disappeared,
/// which after-positions are new (with the inserted objects in index order),
/// which positions changed in place (with the replacement objects), and which
/// items moved as `(from, to)` position pairs.
///
/// Index spaces follow the external collection's convention: `removed` and
/// `changed` are positions in `before`, `inserted` and move destinations are
/// positions in `after`. Unremoved, unmoved items keep their relative order.
///
/// The notification is a borrowed view; the engine copies out what it needs.
#[derive(Debug)]
pub struct ChangeDetails<'a, T, S: ?Sized = [T]> {
    /// The collection as it was before the mutation.
    pub before: &'a S,
    /// The collection as it is after the mutation.
    pub after: &'a S,
    /// Before-snapshot positions that were removed.
    pub removed: &'a [usize],
    /// After-snapshot positions that were inserted.
    pub inserted: &'a [usize],
    /// The inserted objects, one per entry of `inserted`, in index order.
    pub inserted_items: &'a [T],
    /// Before-snapshot positions whose item changed in place.
    pub changed: &'a [usize],
    /// The changed objects, one per entry of `changed`, in index order.
    pub changed_items: &'a [T],
    /// `(from, to)` position pairs for items that moved.
    pub moved: &'a [(usize, usize)],
}

impl<'a, T, S: ?Sized> Clone for ChangeDetails<'a, T, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, S: ?Sized> Copy for ChangeDetails<'a, T, S> {}

impl<'a, T, S: ?Sized> ChangeDetails<'a, T, S> {
    /// Creates a notification with the given snapshots and no changes.
    ///
    /// Useful as a base for struct-update syntax in tests and adapters.
    #[must_use]
    pub const fn empty(before: &'a S, after: &'a S) -> Self {
        Self {
            before,
            after,
            removed: &[],
            inserted: &[],
            inserted_items: &[],
            changed: &[],
            changed_items: &[],
            moved: &[],
        }
    }
}

impl<'a, T, S: SourceSnapshot<T> + ?Sized> ChangeDetails<'a, T, S> {
    /// Checks the notification for structural consistency.
    ///
    /// Verifies index ranges, duplicate-free index sets, index/object count
    /// agreement, removed/changed and removed/moved disjointness, and that
    /// the snapshot lengths agree with the removal and insertion counts.
    ///
    /// This is a contract check, not content validation: it never inspects
    /// the items themselves.
    pub fn validate(&self) -> Result<(), InvalidChange> {
        let before_len = self.before.len();
        let after_len = self.after.len();

        let removed = check_index_set(self.removed, ChangeField::Removed, before_len)?;
        check_index_set(self.inserted, ChangeField::Inserted, after_len)?;
        let changed = check_index_set(self.changed, ChangeField::Changed, before_len)?;

        check_objects(
            ChangeField::Inserted,
            self.inserted.len(),
            self.inserted_items.len(),
        )?;
        check_objects(
            ChangeField::Changed,
            self.changed.len(),
            self.changed_items.len(),
        )?;

        for &index in changed.iter() {
            if removed.contains(&index) {
                return Err(InvalidChange::ConflictingSets {
                    field: ChangeField::Changed,
                    index,
                });
            }
        }

        let mut move_sources = HashSet::new();
        let mut move_targets = HashSet::new();
        for &(from, to) in self.moved {
            if from >= before_len {
                return Err(InvalidChange::IndexOutOfRange {
                    field: ChangeField::MovedFrom,
                    index: from,
                    len: before_len,
                });
            }
            if to >= after_len {
                return Err(InvalidChange::IndexOutOfRange {
                    field: ChangeField::MovedTo,
                    index: to,
                    len: after_len,
                });
            }
            if !move_sources.insert(from) {
                return Err(InvalidChange::DuplicateIndex {
                    field: ChangeField::MovedFrom,
                    index: from,
                });
            }
            if !move_targets.insert(to) {
                return Err(InvalidChange::DuplicateIndex {
                    field: ChangeField::MovedTo,
                    index: to,
                });
            }
            if removed.contains(&from) {
                return Err(InvalidChange::ConflictingSets {
                    field: ChangeField::MovedFrom,
                    index: from,
                });
            }
        }

        let expected_after = before_len - self.removed.len() + self.inserted.len();
        if expected_after != after_len {
            return Err(InvalidChange::LengthMismatch {
                expected_after,
                actual_after: after_len,
            });
        }

        Ok(())
    }

    /// Maps a before-snapshot position to its after-snapshot position.
    ///
    /// Returns `None` for removed positions. Moved positions resolve through
    /// their move pair; everything else is shifted by the removals, moves,
    /// and insertions renumbering around it. Only meaningful for validated
    /// notifications.
    #[must_use]
    pub fn after_position(&self, position: usize) -> Option<usize> {
        if self.removed.contains(&position) {
            return None;
        }
        if let Some(&(_, to)) = self.moved.iter().find(|&&(from, _)| from == position) {
            return Some(to);
        }

        // Treat a move as a removal at `from` plus an insertion at `to`,
        // then shift through removals first and insertions second.
        let vacated = self
            .removed
            .iter()
            .chain(self.moved.iter().map(|(from, _)| from))
            .filter(|&&p| p < position)
            .count();
        let mut shifted = position - vacated;

        let mut occupied: alloc::vec::Vec<usize> = self
            .inserted
            .iter()
            .chain(self.moved.iter().map(|(_, to)| to))
            .copied()
            .collect();
        occupied.sort_unstable();
        for landing in occupied {
            if landing <= shifted {
                shifted += 1;
            }
        }
        Some(shifted)
    }
}

fn check_index_set(
    indexes: &[usize],
    field: ChangeField,
    len: usize,
) -> Result<HashSet<usize>, InvalidChange> {
    let mut seen = HashSet::with_capacity(indexes.len());
    for &index in indexes {
        if index >= len {
            return Err(InvalidChange::IndexOutOfRange { field, index, len });
        }
        if !seen.insert(index) {
            return Err(InvalidChange::DuplicateIndex { field, index });
        }
    }
    Ok(seen)
}

fn check_objects(field: ChangeField, indexes: usize, objects: usize) -> Result<(), InvalidChange> {
    if indexes != objects {
        return Err(InvalidChange::ObjectCountMismatch {
            field,
            indexes,
            objects,
        });
    }
    Ok(())
}
