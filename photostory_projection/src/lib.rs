// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Photostory Projection: the incremental projection and diff engine.
//!
//! Given snapshots of an externally-owned, ordered media collection (see
//! `photostory_source`), this crate maintains the *projection* the UI
//! renders: the subset of items that pass a [`Classifier`], in
//! [`OrderPolicy`] order. It solves an incremental-view-maintenance problem
//! in two parts:
//!
//! - **Cold start** ([`ProjectionBuilder`]): a bounded synchronous prefix
//!   (the *countdown*) gives the caller a first screen immediately; the
//!   unbounded remainder of the classification runs as a separate settling
//!   pass that corrects the provisional prefix via a completion [`Diff`].
//! - **Change translation** ([`ChangeTranslator`]): every external mutation
//!   notification (insert/remove/update/move in source coordinates) is
//!   converted into a minimal [`Diff`] expressed entirely in projection
//!   coordinates, against a freshly derived [`IndexMap`].
//!
//! The supporting types are deliberately small and pure: [`IndexMap`]
//! records where every source position landed, [`ProjectionState`] pairs one
//! item list with the map it was derived from (always replaced wholesale,
//! never patched), and [`Diff`] is self-consistent and independently
//! applicable. Scheduling — worker threads, delivery queues, observers —
//! lives in `photostory_engine`; everything here is synchronous and
//! host-driven.
//!
//! ## Minimal example
//!
//! ```rust
//! use photostory_projection::{
//!     ChangeTranslator, FnClassifier, OrderPolicy, ProjectionBuilder,
//! };
//! use photostory_source::ChangeDetails;
//!
//! let even_only = FnClassifier::new(|n: &u32| n % 2 == 0);
//! let builder = ProjectionBuilder::new(even_only, OrderPolicy::Natural, 2);
//!
//! // Cold start: the first two positions are shown immediately.
//! let snapshot = [2_u32, 3, 4, 5, 6];
//! let cold = builder.cold_start(&snapshot[..]);
//! assert_eq!(cold.state.items(), &[2, 3]);
//!
//! // The settling pass confirms the countdown and scans the rest.
//! let settled = builder.settle(&snapshot[..], cold.scan.unwrap());
//! assert_eq!(settled.state.items(), &[2, 4, 6]);
//!
//! // Thereafter, external mutations become projection-space diffs.
//! let even_only = FnClassifier::new(|n: &u32| n % 2 == 0);
//! let translator = ChangeTranslator::new(even_only, OrderPolicy::Natural);
//! let after = [2_u32, 3, 4, 5];
//! let change = ChangeDetails {
//!     removed: &[4],
//!     ..ChangeDetails::empty(&snapshot[..], &after[..])
//! };
//! let translation = translator.translate(&settled.state, &change).unwrap();
//! assert_eq!(translation.diff.removed, vec![2]);
//! assert_eq!(translation.state.items(), &[2, 4]);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod builder;
mod classify;
mod diff;
mod index_map;
mod order;
mod state;
mod translate;

pub use builder::{ColdStart, ProjectionBuilder, RemainderScan, Settled};
pub use classify::{Classifier, FnClassifier, StillImageClassifier};
pub use diff::Diff;
pub use index_map::{FinalPosition, IndexMap};
pub use order::OrderPolicy;
pub use state::ProjectionState;
pub use translate::{ChangeTranslator, TranslateError, Translation};
