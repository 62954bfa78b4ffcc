// Copyright 2025 the Photostory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serialized scheduling, observers, and background classification on top of
//! [`photostory_projection`].
//!
//! An [`Engine`] attaches to one external media collection: it runs the
//! budgeted synchronous cold start on the calling thread, hands back the
//! first screen immediately, and moves everything else — the background
//! classification pass, change-notification translation, and observer
//! delivery — onto a single worker thread that doubles as the serialized
//! delivery queue.
//!
//! # Example
//!
//! ```rust
//! use photostory_engine::{Engine, EngineOptions, SourceChange};
//! use photostory_projection::{FnClassifier, OrderPolicy};
//! use std::sync::mpsc;
//!
//! let even_only = FnClassifier::new(|n: &u32| n % 2 == 0);
//! let options = EngineOptions { order: OrderPolicy::Natural, sync_budget: 16 };
//! let (tx, rx) = mpsc::channel();
//!
//! let (engine, shown) = Engine::attach(even_only, options, vec![2, 3, 4, 6], move |diff| {
//!     tx.send(diff).unwrap();
//! });
//! assert_eq!(shown, [2, 4, 6]);
//!
//! engine
//!     .apply_change(SourceChange {
//!         inserted: vec![0],
//!         inserted_items: vec![8],
//!         ..SourceChange::new(vec![8, 2, 3, 4, 6])
//!     })
//!     .unwrap();
//! assert_eq!(rx.recv().unwrap().inserted, [(0, 8)]);
//! ```

mod engine;
mod observer;

pub use engine::{DEFAULT_SYNC_BUDGET, Engine, EngineError, EngineOptions, SourceChange};
pub use observer::{Subscription, Update};
