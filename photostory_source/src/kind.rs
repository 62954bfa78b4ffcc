// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Media type tags and the source item abstraction.

/// The coarse media type of an asset.
///
/// Classification is driven entirely by this tag: only [`MediaKind::Image`]
/// assets are ever shown. Anything the adapter cannot recognize must be
/// mapped to [`MediaKind::Unknown`], which classifies as excluded
/// (fail-closed) rather than erroring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// A still image.
    Image,
    /// A video asset.
    Video,
    /// An audio-only asset.
    Audio,
    /// Anything the adapter could not identify.
    Unknown,
}

/// An opaque handle to one externally-owned media asset.
///
/// Items are cheap, cloneable handles: the engine stores and hands out copies
/// freely, and equality (where implemented) is expected to reflect the
/// asset's stable identity, not its pixel content.
///
/// The engine reads exactly one attribute: the [`MediaKind`] tag. Everything
/// else about the asset (identifiers, metadata, loading) is the host's
/// business.
pub trait SourceItem {
    /// Returns the media type tag for this asset.
    fn kind(&self) -> MediaKind;
}

impl<T: SourceItem + ?Sized> SourceItem for &T {
    fn kind(&self) -> MediaKind {
        (**self).kind()
    }
}
