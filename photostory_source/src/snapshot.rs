// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only snapshot views of the external collection.

use alloc::vec::Vec;

/// A read-only view of the external collection at one instant.
///
/// A snapshot supports exactly the three operations the engine needs: total
/// count, random access by source position, and forward enumeration. The
/// order of positions is fixed by the collection's owner and is never
/// interpreted by the engine beyond "0-based, stable for the lifetime of the
/// snapshot".
///
/// Slices and `Vec`s implement this trait, so tests and simple hosts can use
/// plain arrays of items directly:
///
/// ```rust
/// use photostory_source::SourceSnapshot;
///
/// let snapshot = [10_u32, 20, 30];
/// assert_eq!(SourceSnapshot::len(&snapshot[..]), 3);
/// assert_eq!(*snapshot[..].item(1), 20);
/// let doubled: Vec<u32> = snapshot[..].items().map(|v| v * 2).collect();
/// assert_eq!(doubled, [20, 40, 60]);
/// ```
pub trait SourceSnapshot<T> {
    /// Returns the number of items in the snapshot.
    fn len(&self) -> usize;

    /// Returns the item at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`. Positions under discussion always
    /// come from the snapshot itself or from a validated change
    /// notification, so an out-of-range access is a programmer error.
    fn item(&self, position: usize) -> &T;

    /// Returns `true` if the snapshot contains no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerates the items in source order.
    fn items(&self) -> SnapshotIter<'_, T, Self> {
        SnapshotIter {
            snapshot: self,
            next: 0,
            _marker: core::marker::PhantomData,
        }
    }
}

impl<T> SourceSnapshot<T> for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn item(&self, position: usize) -> &T {
        &self[position]
    }
}

impl<T> SourceSnapshot<T> for Vec<T> {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn item(&self, position: usize) -> &T {
        &self[position]
    }
}

/// Forward iterator over a [`SourceSnapshot`].
///
/// Returned by [`SourceSnapshot::items`].
#[derive(Debug)]
pub struct SnapshotIter<'a, T, S: ?Sized> {
    snapshot: &'a S,
    next: usize,
    _marker: core::marker::PhantomData<&'a T>,
}

impl<'a, T, S: SourceSnapshot<T> + ?Sized> Iterator for SnapshotIter<'a, T, S> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.snapshot.len() {
            return None;
        }
        let item = self.snapshot.item(self.next);
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.snapshot.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<'a, T, S: SourceSnapshot<T> + ?Sized> ExactSizeIterator for SnapshotIter<'a, T, S> {}
