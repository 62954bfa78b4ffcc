// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection ordering strategy.

/// How source order translates into projection order.
///
/// The policy is fixed when an engine attaches to a collection and is applied
/// consistently to the initial build and to every incremental update. This is
/// the subtlest correctness requirement of the whole engine: under
/// [`OrderPolicy::Reversed`], an insertion "at the start" in source order
/// lands "at the end" of the projection and vice versa, so every index that
/// crosses the boundary must be mirrored against the projection length of its
/// coordinate space.
///
/// # Example
///
/// ```rust
/// use photostory_projection::OrderPolicy;
///
/// // A 6-item projection: forward index 0 is the oldest item.
/// assert_eq!(OrderPolicy::Natural.mirror(0, 6), 0);
/// assert_eq!(OrderPolicy::Reversed.mirror(0, 6), 5);
/// assert_eq!(OrderPolicy::Reversed.mirror(5, 6), 0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum OrderPolicy {
    /// Projection order matches source order.
    #[default]
    Natural,
    /// Projection order is the full reversal of source order.
    Reversed,
}

impl OrderPolicy {
    /// Returns `true` for [`OrderPolicy::Reversed`].
    #[must_use]
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::Reversed)
    }

    /// Maps a forward (source-order) projection index into this policy's
    /// coordinate space for a projection of `len` items.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `index >= len`.
    #[must_use]
    pub const fn mirror(self, index: usize, len: usize) -> usize {
        debug_assert!(index < len, "index out of range for projection length");
        match self {
            Self::Natural => index,
            Self::Reversed => len - 1 - index,
        }
    }
}
