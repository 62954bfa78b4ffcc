// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Photostory Source: the collaborator contract for external media collections.
//!
//! This crate defines the boundary between the projection engine and an
//! externally-owned, ordered collection of media assets (typically the device
//! photo library). The engine never mutates the collection; it only observes
//! snapshots of it and receives change notifications describing how one
//! snapshot became the next.
//!
//! The core pieces are:
//!
//! - [`MediaKind`] and [`SourceItem`]: the type tag an asset exposes, and the
//!   minimal trait an asset handle must implement. All OS-specific branching
//!   (object downcasts, asset subtypes) belongs in an adapter *outside* this
//!   workspace; by the time an item crosses this boundary it is already a
//!   plain [`SourceItem`].
//! - [`SourceSnapshot`]: a read-only view of the collection at one instant,
//!   supporting total count, random access, and forward enumeration. Slices
//!   implement it, so `&[T]` and `&Vec<T>` work directly.
//! - [`ChangeDetails`]: one external mutation notification — the before and
//!   after snapshots plus the removed/inserted/changed index sets and move
//!   pairs — together with [`ChangeDetails::validate`], which rejects
//!   structurally inconsistent notifications with an [`InvalidChange`] error
//!   instead of letting a wrong diff be computed downstream.
//!
//! ## Minimal example
//!
//! ```rust
//! use photostory_source::{ChangeDetails, MediaKind, SourceItem, SourceSnapshot};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Debug)]
//! struct Asset {
//!     id: u32,
//!     kind: MediaKind,
//! }
//!
//! impl SourceItem for Asset {
//!     fn kind(&self) -> MediaKind {
//!         self.kind
//!     }
//! }
//!
//! let photo = Asset { id: 1, kind: MediaKind::Image };
//! let clip = Asset { id: 2, kind: MediaKind::Video };
//! let before = [photo, clip];
//! let after = [photo];
//!
//! let change = ChangeDetails {
//!     before: &before[..],
//!     after: &after[..],
//!     removed: &[1],
//!     ..ChangeDetails::empty(&before[..], &after[..])
//! };
//! assert!(change.validate().is_ok());
//! assert_eq!(change.before.len(), 2);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod change;
mod kind;
mod snapshot;

pub use change::{ChangeDetails, ChangeField, InvalidChange};
pub use kind::{MediaKind, SourceItem};
pub use snapshot::{SnapshotIter, SourceSnapshot};
