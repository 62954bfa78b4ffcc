// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inclusion predicates over source items.

use photostory_source::{MediaKind, SourceItem};

/// A pure inclusion predicate over source items.
///
/// A classifier decides whether an item contributes to the projection. It is
/// total and side-effect free: there is no error path, and anything the
/// classifier cannot recognize must simply be excluded (fail-closed).
pub trait Classifier<T> {
    /// Returns `true` if `item` belongs in the projection.
    fn includes(&self, item: &T) -> bool;
}

impl<T, C: Classifier<T> + ?Sized> Classifier<T> for &C {
    fn includes(&self, item: &T) -> bool {
        (**self).includes(item)
    }
}

/// The production classifier: includes exactly still images.
///
/// Videos, audio assets, and unrecognized items are all excluded.
///
/// # Example
///
/// ```rust
/// use photostory_projection::{Classifier, StillImageClassifier};
/// use photostory_source::{MediaKind, SourceItem};
///
/// struct Asset(MediaKind);
///
/// impl SourceItem for Asset {
///     fn kind(&self) -> MediaKind {
///         self.0
///     }
/// }
///
/// assert!(StillImageClassifier.includes(&Asset(MediaKind::Image)));
/// assert!(!StillImageClassifier.includes(&Asset(MediaKind::Video)));
/// assert!(!StillImageClassifier.includes(&Asset(MediaKind::Unknown)));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StillImageClassifier;

impl<T: SourceItem> Classifier<T> for StillImageClassifier {
    fn includes(&self, item: &T) -> bool {
        matches!(item.kind(), MediaKind::Image)
    }
}

/// Adapts a plain predicate closure into a [`Classifier`].
///
/// Useful in tests and for hosts whose inclusion rule is not kind-based:
///
/// ```rust
/// use photostory_projection::{Classifier, FnClassifier};
///
/// let even_only = FnClassifier::new(|n: &u32| n % 2 == 0);
/// assert!(even_only.includes(&4));
/// assert!(!even_only.includes(&5));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct FnClassifier<F>(F);

impl<F> FnClassifier<F> {
    /// Wraps `predicate` as a classifier.
    #[must_use]
    pub const fn new(predicate: F) -> Self {
        Self(predicate)
    }
}

impl<T, F: Fn(&T) -> bool> Classifier<T> for FnClassifier<F> {
    fn includes(&self, item: &T) -> bool {
        (self.0)(item)
    }
}
